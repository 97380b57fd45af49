//! Plan model: the data shapes the planner produces and the executor consumes.
//!
//! A `Plan` is a linear, ordered sequence of named steps. Structural
//! validation is fail-fast for the whole run; an empty step list is valid and
//! executes as a no-op.

use crate::error::PlanError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One named action plus its arguments. Immutable once produced by the
/// planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub id: u64,
    pub action: String,
    #[serde(default)]
    pub args: Vec<Value>,
    /// Raw diagnostic carried by the soft-failure `"error"` step the planner
    /// emits when the planning service returns unparseable output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Step {
    pub fn new(id: u64, action: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            id,
            action: action.into(),
            args,
            message: None,
        }
    }
}

/// An ordered sequence of steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<Step>,
}

impl Plan {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Parse a plan out of arbitrary JSON. A missing or malformed `steps`
    /// field rejects the whole execution request before any step runs.
    pub fn from_value(value: Value) -> Result<Self, PlanError> {
        let plan: Plan =
            serde_json::from_value(value).map_err(|e| PlanError::Invalid(e.to_string()))?;
        plan.validate()?;
        Ok(plan)
    }

    /// Structural validation: every step must carry a non-empty action name.
    pub fn validate(&self) -> Result<(), PlanError> {
        for step in &self.steps {
            if step.action.trim().is_empty() {
                return Err(PlanError::Invalid(format!(
                    "step {} has an empty action name",
                    step.id
                )));
            }
        }
        Ok(())
    }

    /// The soft-failure plan returned when the planning service produces
    /// output that cannot be parsed: one step, action `"error"`, carrying the
    /// raw diagnostic. Executing it is absorbed by the registry's fallback
    /// rather than crashing the request.
    pub fn error_plan(diagnostic: impl Into<String>) -> Self {
        Self {
            steps: vec![Step {
                id: 1,
                action: "error".to_string(),
                args: Vec::new(),
                message: Some(diagnostic.into()),
            }],
        }
    }
}

/// Per-step state machine: `pending → done` or `pending → error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Done,
    Error,
}

/// One record in the append-only status log. Exactly one `pending` entry is
/// appended immediately before dispatch and exactly one terminal entry after
/// the handler returns or fails; entries are never removed or reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepLogEntry {
    pub step: String,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StepLogEntry {
    pub fn pending(step: &str) -> Self {
        Self {
            step: step.to_string(),
            status: StepStatus::Pending,
            message: None,
        }
    }

    pub fn done(step: &str) -> Self {
        Self {
            step: step.to_string(),
            status: StepStatus::Done,
            message: None,
        }
    }

    pub fn error(step: &str, message: impl Into<String>) -> Self {
        Self {
            step: step.to_string(),
            status: StepStatus::Error,
            message: Some(message.into()),
        }
    }
}
