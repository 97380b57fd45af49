//! Planner: turns a natural-language task into a linear [`Plan`].
//!
//! The planning service is an external collaborator behind the [`Planner`]
//! trait. Malformed service output is a deliberate soft failure: the caller
//! receives a one-step `"error"` plan that, if executed, is absorbed by the
//! registry's fallback rather than crashing the request.

use crate::llm::{strip_code_fences, Provider};
use crate::plan::Plan;
use async_trait::async_trait;
use std::sync::Arc;

/// Capability interface: task → Plan, may fail.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(&self, task: &str) -> anyhow::Result<Plan>;
}

/// LLM-backed planner over the provider seam.
pub struct LlmPlanner {
    provider: Arc<dyn Provider>,
}

impl LlmPlanner {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    fn prompt(task: &str) -> String {
        format!(
            r#"You are an assistant who decomposes a user's high-level request into a linear
sequence of actionable steps for an autonomous agent. The user request is:

"{task}"

Return only valid JSON with the following structure:

{{
  "steps": [
    {{ "id": 1, "action": "some_action_name", "args": ["optional", "args"] }}
  ]
}}

Action names should be short snake_case tokens (e.g. "load_table",
"analyze_data", "generate_charts", "send_email"). If a step requires
parameters, put them into the args array. Only return the JSON object and
nothing else."#
        )
    }

    /// Parse the raw planning-service reply. Anything that does not yield a
    /// structurally valid plan degrades to the one-step `"error"` plan.
    fn parse_reply(raw: &str) -> Plan {
        let cleaned = strip_code_fences(raw);

        match serde_json::from_str::<serde_json::Value>(&cleaned) {
            Ok(value) => match Plan::from_value(value) {
                Ok(plan) => plan,
                Err(err) => {
                    tracing::warn!(error = %err, "planner returned JSON without a valid step list");
                    Plan::error_plan(cleaned)
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "planner returned non-JSON output");
                Plan::error_plan(cleaned)
            }
        }
    }
}

#[async_trait]
impl Planner for LlmPlanner {
    async fn plan(&self, task: &str) -> anyhow::Result<Plan> {
        let raw = self.provider.chat(&Self::prompt(task)).await?;
        Ok(Self::parse_reply(&raw))
    }
}
