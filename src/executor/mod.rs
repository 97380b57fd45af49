//! Sequential dispatcher: consumes a plan and an initial run state, resolves
//! one handler per step, merges outputs into state, and records a per-step
//! status log.
//!
//! Continue-on-error semantics: a failing step is recorded and the run
//! carries on with the next step. The single fail-fast check is the up-front
//! structural plan validation, which rejects the whole request before any
//! step is dispatched or any log entry written.

use crate::error::PlanError;
use crate::plan::{Plan, StepLogEntry};
use crate::state::RunState;
use crate::tools::{Resolution, ToolRegistry};
use std::sync::Arc;

/// Final state plus the ordered pending/done/error log of one run.
#[derive(Debug)]
pub struct ExecutionOutput {
    pub state: RunState,
    pub log: Vec<StepLogEntry>,
}

pub struct Executor {
    registry: Arc<ToolRegistry>,
}

impl Executor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Run a plan to completion against a caller-supplied initial state.
    ///
    /// Errors only for a structurally invalid plan; per-step failures are
    /// visible solely in the returned log. Steps run strictly in order, each
    /// later step observing every state mutation earlier ones made, whether
    /// or not those earlier steps ended in `error`.
    pub async fn execute(
        &self,
        plan: &Plan,
        mut state: RunState,
    ) -> Result<ExecutionOutput, PlanError> {
        plan.validate()?;

        let mut log = Vec::with_capacity(plan.steps.len() * 2);

        for step in &plan.steps {
            log.push(StepLogEntry::pending(&step.action));
            tracing::info!(step = step.id, action = %step.action, "dispatching step");

            let outcome = match self.registry.resolve(&step.action) {
                Resolution::Tool { canonical, tool } => {
                    if canonical != step.action {
                        tracing::debug!(from = %step.action, to = %canonical, "alias applied");
                    }
                    tool.execute(&mut state, &step.args).await
                }
                Resolution::Fallback { action, handler } => {
                    handler.fulfill(&action, &state, &step.args).await
                }
            };

            match outcome {
                Ok(output) => {
                    state.record_output(&step.action, output);
                    log.push(StepLogEntry::done(&step.action));
                }
                Err(err) => {
                    tracing::warn!(step = step.id, action = %step.action, error = %err, "step failed, continuing");
                    log.push(StepLogEntry::error(&step.action, err.to_string()));
                }
            }
        }

        Ok(ExecutionOutput { state, log })
    }
}
