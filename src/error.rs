use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `reportforge`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; internal code continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum ForgeError {
    // ── Plan model ──────────────────────────────────────────────────────
    #[error("plan: {0}")]
    Plan(#[from] PlanError),

    // ── Tools ───────────────────────────────────────────────────────────
    #[error("tool: {0}")]
    Tool(#[from] ToolError),

    // ── LLM / Provider ──────────────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    // ── Config ──────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Transport / Gateway ─────────────────────────────────────────────
    #[error("transport: {0}")]
    Transport(#[from] TransportError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Plan errors ─────────────────────────────────────────────────────────────

/// Structural plan rejection. The only failure that aborts a run before any
/// step is dispatched; everything else is absorbed at the per-step boundary.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid plan: {0}")]
    Invalid(String),
}

// ─── Tool errors ─────────────────────────────────────────────────────────────

/// Per-step failures. The executor records these in the status log and keeps
/// going; they never terminate the run.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("missing precondition: {0}")]
    MissingPrecondition(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("fallback service failed: {0}")]
    Fallback(String),

    #[error("tool {name} execution failed: {message}")]
    Execution { name: String, message: String },
}

// ─── LLM / Provider errors ──────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("provider request failed: {0}")]
    Request(String),

    #[error("provider returned an empty response")]
    EmptyResponse,

    #[error("provider authentication failed")]
    Auth,
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Transport errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid request body: {0}")]
    BadRequest(String),

    #[error("gateway: {0}")]
    Gateway(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, ForgeError>;
