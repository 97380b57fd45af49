//! Default tool set and alias vocabulary.
//!
//! The alias table normalizes the many natural-language-derived action
//! spellings planners emit down to one canonical tool vocabulary. It is a
//! default, not a closed set: `[aliases]` entries from config are merged on
//! top at registry construction.

use super::{
    AnalyzeDataTool, CleanDataTool, CompileReportTool, DistributeReportTool, ExportReportTool,
    Fallback, GenerateChartsTool, LoadTableTool, Tool, ToolRegistry,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// All built-in state transformers.
pub fn default_tools(strict_exports: bool) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(LoadTableTool::new()),
        Arc::new(CleanDataTool::new()),
        Arc::new(AnalyzeDataTool::new()),
        Arc::new(GenerateChartsTool::new()),
        Arc::new(CompileReportTool::new()),
        Arc::new(ExportReportTool::new(strict_exports)),
        Arc::new(DistributeReportTool::new()),
    ]
}

/// Built-in alias table: alternate spelling → canonical tool name.
pub fn default_aliases() -> BTreeMap<String, String> {
    [
        ("load_excel", "load_table"),
        ("load_csv", "load_table"),
        ("load_data", "load_table"),
        ("ingest", "load_table"),
        ("ingest_data", "load_table"),
        ("parse_file", "load_table"),
        ("clean_and_validate_data", "clean_data"),
        ("validate_data", "clean_data"),
        ("clean", "clean_data"),
        ("analyze", "analyze_data"),
        ("analyse_data", "analyze_data"),
        ("run_analysis", "analyze_data"),
        ("generate_chart", "generate_charts"),
        ("create_charts", "generate_charts"),
        ("render_charts", "generate_charts"),
        ("build_report", "compile_report"),
        ("create_report", "compile_report"),
        ("generate_report", "compile_report"),
        ("export", "export_report"),
        ("export_files", "export_report"),
        ("distribute", "distribute_report"),
        ("send_report", "distribute_report"),
        ("send_email", "distribute_report"),
        ("email_report", "distribute_report"),
    ]
    .into_iter()
    .map(|(from, to)| (from.to_string(), to.to_string()))
    .collect()
}

/// Build a registry with the default tools and aliases, then merge the
/// caller's extra aliases over the defaults.
pub fn default_registry(
    fallback: Arc<dyn Fallback>,
    strict_exports: bool,
    extra_aliases: &BTreeMap<String, String>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new(fallback);
    for tool in default_tools(strict_exports) {
        registry.register(tool);
    }
    for (from, to) in default_aliases() {
        registry.add_alias(from, to);
    }
    for (from, to) in extra_aliases {
        registry.add_alias(from.clone(), to.clone());
    }
    registry
}
