use super::AppState;
use crate::plan::Plan;
use crate::state::RunState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
pub(super) struct PlanBody {
    pub task: String,
}

#[derive(Deserialize)]
pub(super) struct ExecuteBody {
    pub plan: Value,
    /// Optional upload, decoded once into the ingestion-source field before
    /// execution begins.
    #[serde(rename = "fileBase64")]
    pub file_base64: Option<String>,
}

/// GET /health
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// POST /plan: task to plan via the external planning service.
///
/// Malformed planner *output* soft-fails inside the planner (one-step
/// `"error"` plan); only a transport failure of the service surfaces here.
pub(super) async fn handle_plan(
    State(state): State<AppState>,
    body: Result<Json<PlanBody>, axum::extract::rejection::JsonRejection>,
) -> impl IntoResponse {
    let Json(plan_body) = match body {
        Ok(b) => b,
        Err(e) => {
            let err = json!({ "error": format!("Invalid JSON: {e}. Expected: {{\"task\": \"...\"}}") });
            return (StatusCode::BAD_REQUEST, Json(err));
        }
    };

    match state.planner.plan(&plan_body.task).await {
        Ok(plan) => (StatusCode::OK, Json(json!({ "plan": plan }))),
        Err(e) => {
            tracing::error!(error = %e, "planning service unreachable");
            let err = json!({ "error": e.to_string() });
            (StatusCode::BAD_GATEWAY, Json(err))
        }
    }
}

/// POST /execute: run a plan against a fresh state.
///
/// Errors (non-2xx) only for an invalid plan or an undecodable upload;
/// otherwise the reply is a success and step failures appear in `logs`.
pub(super) async fn handle_execute(
    State(state): State<AppState>,
    body: Result<Json<ExecuteBody>, axum::extract::rejection::JsonRejection>,
) -> impl IntoResponse {
    let Json(execute_body) = match body {
        Ok(b) => b,
        Err(e) => {
            let err = json!({ "error": format!("Invalid JSON: {e}. Expected: {{\"plan\": {{\"steps\": [...]}}}}") });
            return (StatusCode::BAD_REQUEST, Json(err));
        }
    };

    let plan = match Plan::from_value(execute_body.plan) {
        Ok(plan) => plan,
        Err(e) => {
            let err = json!({ "error": e.to_string() });
            return (StatusCode::BAD_REQUEST, Json(err));
        }
    };

    let initial = match execute_body.file_base64 {
        Some(encoded) => match BASE64.decode(encoded.as_bytes()) {
            Ok(bytes) => RunState::with_source(bytes),
            Err(e) => {
                let err = json!({ "error": format!("invalid fileBase64 payload: {e}") });
                return (StatusCode::BAD_REQUEST, Json(err));
            }
        },
        None => RunState::new(),
    };

    match state.executor.execute(&plan, initial).await {
        Ok(output) => {
            let body = json!({
                "result": output.state.to_result_json(),
                "logs": output.log,
            });
            (StatusCode::OK, Json(body))
        }
        Err(e) => {
            // Only reachable for a plan that passed parsing but failed
            // structural validation.
            let err = json!({ "error": e.to_string() });
            (StatusCode::BAD_REQUEST, Json(err))
        }
    }
}
