//! Generic-capability fallback: unresolved actions are delegated to the
//! external LLM service with a snapshot of the current run state.
//!
//! A structured `{"result": …}` reply is unwrapped; unparseable output
//! degrades to a `{"text": …}` wrapper rather than failing the step. Only a
//! transport failure of the service itself surfaces as an error.

use super::traits::Fallback;
use crate::error::ToolError;
use crate::llm::{strip_code_fences, Provider};
use crate::state::RunState;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct LlmFallback {
    provider: Arc<dyn Provider>,
}

impl LlmFallback {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    fn prompt(action: &str, state: &RunState, args: &[Value]) -> String {
        let snapshot = serde_json::to_string_pretty(&state.to_result_json())
            .unwrap_or_else(|_| "{}".to_string());
        let args_json = serde_json::to_string(args).unwrap_or_else(|_| "[]".to_string());

        format!(
            r#"You are an assistant performing a single workflow step for an autonomous agent.
Current state (JSON): {snapshot}

Execute the requested action "{action}" with args: {args_json}

Return a JSON object only, describing the result in the key "result".
Example: {{ "result": {{ "summary": "...", "notes": "..." }} }}
If you produce tables, return them as arrays of objects."#
        )
    }

    fn parse_reply(raw: &str) -> Value {
        let cleaned = strip_code_fences(raw);
        match serde_json::from_str::<Value>(&cleaned) {
            Ok(value) => value.get("result").cloned().unwrap_or(value),
            Err(_) => json!({ "text": cleaned }),
        }
    }
}

#[async_trait]
impl Fallback for LlmFallback {
    async fn fulfill(
        &self,
        action: &str,
        state: &RunState,
        args: &[Value],
    ) -> Result<Value, ToolError> {
        tracing::info!(action, "delegating unresolved action to fallback service");

        let raw = self
            .provider
            .chat(&Self::prompt(action, state, args))
            .await
            .map_err(|e| ToolError::Fallback(e.to_string()))?;

        Ok(Self::parse_reply(&raw))
    }
}
