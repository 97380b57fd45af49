#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod config;
pub mod error;
pub mod executor;
pub mod gateway;
pub mod llm;
pub mod plan;
pub mod planner;
pub mod state;
pub mod tools;

pub use config::Config;
pub use error::{ForgeError, PlanError, ToolError};
pub use executor::{ExecutionOutput, Executor};
pub use plan::{Plan, Step, StepLogEntry, StepStatus};
pub use state::{Analysis, Report, Row, RunState};
