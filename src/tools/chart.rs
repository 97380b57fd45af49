//! `generate_charts`: mark chart readiness. Rendering itself is an external
//! presentation concern; this tool never fails.

use super::traits::Tool;
use crate::error::ToolError;
use crate::state::RunState;
use async_trait::async_trait;
use serde_json::Value;

const CHART_READY: &str = "chart_ready";

pub struct GenerateChartsTool;

impl GenerateChartsTool {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for GenerateChartsTool {
    fn name(&self) -> &str {
        "generate_charts"
    }

    fn description(&self) -> &str {
        "Mark the table as chart-ready when it has rows"
    }

    async fn execute(&self, state: &mut RunState, _args: &[Value]) -> Result<Value, ToolError> {
        let ready = state.table.as_ref().is_some_and(|t| !t.is_empty());
        state.chart = ready.then(|| CHART_READY.to_string());

        Ok(state
            .chart
            .clone()
            .map_or(Value::Null, Value::String))
    }
}
