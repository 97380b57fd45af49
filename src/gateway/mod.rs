//! Axum-based HTTP transport for the plan-execution engine.
//!
//! Two logical operations are exposed: `POST /plan` (task → plan via the
//! external planner) and `POST /execute` (plan + optional upload → final
//! state + status log). The execute reply is a success whenever the plan was
//! structurally valid; per-step failures are visible only in `logs`.

mod handlers;

use crate::config::Config;
use crate::executor::Executor;
use crate::llm::OpenAiCompatProvider;
use crate::planner::{LlmPlanner, Planner};
use crate::tools::{default_registry, LlmFallback};
use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use handlers::{handle_execute, handle_health, handle_plan};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (8 MiB); uploads arrive base64-encoded inline.
pub const MAX_BODY_SIZE: usize = 8 * 1024 * 1024;
/// Request timeout; a hung planning/fallback call blocks the whole run.
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Shared state for all axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<dyn Planner>,
    pub executor: Arc<Executor>,
}

impl AppState {
    /// Wire the engine together from config: one provider shared by the
    /// planner and the fallback tool, default tools plus configured aliases.
    pub fn from_config(config: &Config) -> Self {
        let provider = Arc::new(OpenAiCompatProvider::new(
            &config.provider.base_url,
            config.provider.resolved_api_key().as_deref(),
            &config.provider.model,
            config.provider.temperature,
        ));

        let registry = default_registry(
            Arc::new(LlmFallback::new(provider.clone())),
            config.export.strict,
            &config.aliases,
        );

        Self {
            planner: Arc::new(LlmPlanner::new(provider)),
            executor: Arc::new(Executor::new(Arc::new(registry))),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/plan", post(handle_plan))
        .route("/execute", post(handle_execute))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run the HTTP gateway.
pub async fn run_gateway(config: &Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.gateway.host, config.gateway.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    run_gateway_with_listener(listener, AppState::from_config(config)).await
}

/// Run the gateway from a pre-bound listener (used by tests for ephemeral
/// ports).
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    state: AppState,
) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "gateway listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
