//! `clean_data`: remove structurally empty rows from the tabular field.

use super::traits::Tool;
use crate::error::ToolError;
use crate::state::RunState;
use async_trait::async_trait;
use serde_json::Value;

pub struct CleanDataTool;

impl CleanDataTool {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for CleanDataTool {
    fn name(&self) -> &str {
        "clean_data"
    }

    fn description(&self) -> &str {
        "Drop rows with no fields at all from the ingested table"
    }

    async fn execute(&self, state: &mut RunState, _args: &[Value]) -> Result<Value, ToolError> {
        let table = state
            .table
            .as_mut()
            .ok_or_else(|| ToolError::MissingPrecondition("no data to clean".to_string()))?;

        let before = table.len();
        table.retain(|row| !row.is_empty());
        if table.len() < before {
            tracing::info!(dropped = before - table.len(), "removed empty rows");
        }

        Ok(Value::Array(
            table.iter().cloned().map(Value::Object).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Row;
    use serde_json::json;

    #[tokio::test]
    async fn drops_only_field_less_rows() {
        let mut populated = Row::new();
        populated.insert("revenue".to_string(), json!(100));

        let mut state = RunState::new();
        state.table = Some(vec![populated, Row::new(), Row::new()]);

        let value = CleanDataTool::new().execute(&mut state, &[]).await.unwrap();
        assert_eq!(state.table.as_ref().unwrap().len(), 1);
        assert_eq!(value.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_table_is_a_precondition_failure() {
        let mut state = RunState::new();
        let err = CleanDataTool::new()
            .execute(&mut state, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingPrecondition(_)));
    }
}
