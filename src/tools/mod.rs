pub mod analyze;
pub mod chart;
pub mod clean;
mod common;
pub mod distribute;
pub mod export;
pub mod factory;
pub mod fallback;
pub mod ingest;
pub mod registry;
pub mod report;
pub mod traits;

pub use analyze::AnalyzeDataTool;
pub use chart::GenerateChartsTool;
pub use clean::CleanDataTool;
pub use distribute::DistributeReportTool;
pub use export::ExportReportTool;
pub use factory::{default_aliases, default_registry, default_tools};
pub use fallback::LlmFallback;
pub use ingest::LoadTableTool;
pub use registry::{Resolution, ToolRegistry};
pub use report::CompileReportTool;
pub use traits::{Fallback, Tool};
