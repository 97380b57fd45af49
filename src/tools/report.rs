//! `compile_report`: assemble the report object from whatever analysis,
//! tabular and chart fields are currently present. Never fails.

use super::traits::Tool;
use crate::error::ToolError;
use crate::state::{Report, RunState};
use async_trait::async_trait;
use serde_json::Value;

pub struct CompileReportTool;

impl CompileReportTool {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for CompileReportTool {
    fn name(&self) -> &str {
        "compile_report"
    }

    fn description(&self) -> &str {
        "Assemble the final report from analysis, table and chart marker"
    }

    async fn execute(&self, state: &mut RunState, _args: &[Value]) -> Result<Value, ToolError> {
        let report = Report {
            analysis: state.analysis.clone(),
            data: state.table.clone().unwrap_or_default(),
            chart: state.chart.clone(),
        };
        state.report = Some(report.clone());

        serde_json::to_value(report).map_err(|e| ToolError::Execution {
            name: self.name().to_string(),
            message: e.to_string(),
        })
    }
}
