//! `analyze_data`: derive per-row profit and the aggregate summary.
//!
//! Revenue and expenses default to 0 when missing or non-numeric, which makes
//! the tool idempotent: once the fields are numeric, re-analysis recomputes
//! the same sums.

use super::common::value_as_f64;
use super::traits::Tool;
use crate::error::ToolError;
use crate::state::{Analysis, RunState};
use async_trait::async_trait;
use serde_json::Value;

pub struct AnalyzeDataTool;

impl AnalyzeDataTool {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for AnalyzeDataTool {
    fn name(&self) -> &str {
        "analyze_data"
    }

    fn description(&self) -> &str {
        "Compute per-row profit and revenue/expenses/profit totals"
    }

    async fn execute(&self, state: &mut RunState, _args: &[Value]) -> Result<Value, ToolError> {
        let table = state
            .table
            .as_mut()
            .ok_or_else(|| ToolError::MissingPrecondition("no data to analyze".to_string()))?;

        let mut total_revenue = 0.0;
        let mut total_expenses = 0.0;

        for row in table.iter_mut() {
            let revenue = value_as_f64(row.get("revenue"));
            let expenses = value_as_f64(row.get("expenses"));
            let profit = revenue - expenses;

            row.insert("revenue".to_string(), Value::from(revenue));
            row.insert("expenses".to_string(), Value::from(expenses));
            row.insert("profit".to_string(), Value::from(profit));

            total_revenue += revenue;
            total_expenses += expenses;
        }

        let analysis = Analysis {
            rows: table.len(),
            total_revenue,
            total_expenses,
            total_profit: total_revenue - total_expenses,
        };
        state.analysis = Some(analysis.clone());

        serde_json::to_value(analysis).map_err(|e| ToolError::Execution {
            name: self.name().to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Row;
    use serde_json::json;

    fn row(revenue: Value, expenses: Value) -> Row {
        let mut row = Row::new();
        row.insert("revenue".to_string(), revenue);
        row.insert("expenses".to_string(), expenses);
        row
    }

    #[tokio::test]
    async fn aggregates_match_the_contract_example() {
        let mut state = RunState::new();
        state.table = Some(vec![
            row(json!(1000), json!(400)),
            row(json!(1200), json!(500)),
        ]);

        AnalyzeDataTool::new()
            .execute(&mut state, &[])
            .await
            .unwrap();

        let analysis = state.analysis.as_ref().unwrap();
        assert_eq!(analysis.rows, 2);
        assert_eq!(analysis.total_revenue, 2200.0);
        assert_eq!(analysis.total_expenses, 900.0);
        assert_eq!(analysis.total_profit, 1300.0);
    }

    #[tokio::test]
    async fn missing_and_textual_values_default_to_zero() {
        let mut state = RunState::new();
        let mut sparse = Row::new();
        sparse.insert("revenue".to_string(), json!("not a number"));
        state.table = Some(vec![sparse]);

        AnalyzeDataTool::new()
            .execute(&mut state, &[])
            .await
            .unwrap();

        let analysis = state.analysis.as_ref().unwrap();
        assert_eq!(analysis.total_revenue, 0.0);
        assert_eq!(analysis.total_profit, 0.0);
        assert_eq!(state.table.as_ref().unwrap()[0]["profit"], json!(0.0));
    }

    #[tokio::test]
    async fn reapplication_is_idempotent() {
        let mut state = RunState::new();
        state.table = Some(vec![row(json!("1000"), json!(400))]);

        let tool = AnalyzeDataTool::new();
        tool.execute(&mut state, &[]).await.unwrap();
        let first = state.analysis.clone().unwrap();
        tool.execute(&mut state, &[]).await.unwrap();
        let second = state.analysis.clone().unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn analyzing_before_ingestion_is_a_precondition_failure() {
        let mut state = RunState::new();
        let err = AnalyzeDataTool::new()
            .execute(&mut state, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingPrecondition(_)));
    }
}
