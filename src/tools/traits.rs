use crate::error::ToolError;
use crate::state::RunState;
use async_trait::async_trait;
use serde_json::Value;

/// One action's effect on the run state.
///
/// Side effects are limited to mutating `state` and returning a value that
/// the executor also stores under the step's action key, so the executor's
/// generic bookkeeping and the tool's own field writes stay consistent.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Canonical tool name (the key in the registry's handler map).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Execute against the shared run state. Missing args mean "no
    /// parameters", never an error.
    async fn execute(&self, state: &mut RunState, args: &[Value]) -> Result<Value, ToolError>;
}

/// Catch-all handler for action names the registry cannot resolve, backed by
/// the external generic-capability service. Receives the original, unaliased
/// action name and a read-only state snapshot.
#[async_trait]
pub trait Fallback: Send + Sync {
    async fn fulfill(
        &self,
        action: &str,
        state: &RunState,
        args: &[Value],
    ) -> Result<Value, ToolError>;
}
