//! `distribute_report`: record the requested recipient list. Actual delivery
//! is an external collaborator's concern; nothing is sent from here.

use super::traits::Tool;
use crate::error::ToolError;
use crate::state::RunState;
use async_trait::async_trait;
use serde_json::Value;

pub struct DistributeReportTool;

impl DistributeReportTool {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for DistributeReportTool {
    fn name(&self) -> &str {
        "distribute_report"
    }

    fn description(&self) -> &str {
        "Record report recipients (delivery is simulated)"
    }

    async fn execute(&self, state: &mut RunState, args: &[Value]) -> Result<Value, ToolError> {
        let recipients = args.to_vec();
        tracing::info!(recipients = recipients.len(), "recording distribution");
        state.distributed = Some(recipients.clone());
        Ok(Value::Array(recipients))
    }
}
