//! Run state: the mutable key-value accumulator shared across the steps of
//! one execution.
//!
//! The well-known semantic fields written by specific tools live as typed
//! struct fields; arbitrary step outputs (including everything the fallback
//! produces) go into the open `outputs` map keyed by the literal action name.
//! A `RunState` is exclusively owned by one executor run and never persisted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One ingested row: column name (lower-cased, trimmed) → cell value.
pub type Row = Map<String, Value>;

/// Aggregate produced by `analyze_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub rows: usize,
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub total_profit: f64,
}

/// Compiled report: whatever analysis, tabular and chart fields were present
/// at compile time, absent ones defaulting to null/empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub analysis: Option<Analysis>,
    pub data: Vec<Row>,
    pub chart: Option<String>,
}

/// Mutable state for one execution run.
#[derive(Debug, Default)]
pub struct RunState {
    /// Caller-supplied upload, decoded from base64 once before execution.
    pub source: Option<Vec<u8>>,
    /// Canonical tabular field written by `load_table`.
    pub table: Option<Vec<Row>>,
    pub analysis: Option<Analysis>,
    /// Chart-readiness marker; rendering itself is a presentation concern.
    pub chart: Option<String>,
    pub report: Option<Report>,
    pub pdf_base64: Option<String>,
    pub xlsx_base64: Option<String>,
    pub distributed: Option<Vec<Value>>,
    outputs: Map<String, Value>,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(source: Vec<u8>) -> Self {
        Self {
            source: Some(source),
            ..Self::default()
        }
    }

    /// Store a step's returned value under its literal action name.
    pub fn record_output(&mut self, action: &str, value: Value) {
        self.outputs.insert(action.to_string(), value);
    }

    pub fn output(&self, action: &str) -> Option<&Value> {
        self.outputs.get(action)
    }

    /// Rows of the tabular field, or a `MissingPrecondition`-style `None`.
    pub fn table_rows(&self) -> Option<&Vec<Row>> {
        self.table.as_ref()
    }

    /// Flat `result` object for the transport layer: action-keyed outputs
    /// merged with the well-known fields, typed fields winning on collision.
    /// Raw upload bytes are never echoed back.
    pub fn to_result_json(&self) -> Value {
        let mut result = self.outputs.clone();

        if let Some(table) = &self.table {
            result.insert(
                "table".to_string(),
                Value::Array(table.iter().cloned().map(Value::Object).collect()),
            );
        }
        if let Some(analysis) = &self.analysis {
            result.insert(
                "analysis".to_string(),
                serde_json::to_value(analysis).unwrap_or(Value::Null),
            );
        }
        if let Some(chart) = &self.chart {
            result.insert("chart".to_string(), Value::String(chart.clone()));
        }
        if let Some(report) = &self.report {
            result.insert(
                "report".to_string(),
                serde_json::to_value(report).unwrap_or(Value::Null),
            );
        }
        if let Some(pdf) = &self.pdf_base64 {
            result.insert("pdf_base64".to_string(), Value::String(pdf.clone()));
        }
        if let Some(xlsx) = &self.xlsx_base64 {
            result.insert("xlsx_base64".to_string(), Value::String(xlsx.clone()));
        }
        if let Some(recipients) = &self.distributed {
            result.insert(
                "distributed".to_string(),
                Value::Array(recipients.clone()),
            );
        }

        Value::Object(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn record_output_is_visible_in_result() {
        let mut state = RunState::new();
        state.record_output("send_email", json!({ "sent": true }));

        let result = state.to_result_json();
        assert_eq!(result["send_email"], json!({ "sent": true }));
    }

    #[test]
    fn typed_fields_win_over_action_keyed_outputs() {
        let mut state = RunState::new();
        state.record_output("chart", json!("stale"));
        state.chart = Some("chart_ready".to_string());

        let result = state.to_result_json();
        assert_eq!(result["chart"], json!("chart_ready"));
    }

    #[test]
    fn result_never_echoes_raw_source_bytes() {
        let state = RunState::with_source(vec![0x50, 0x4b, 0x03, 0x04]);
        let result = state.to_result_json();
        assert!(result.get("source").is_none());
    }

    #[test]
    fn result_includes_table_and_analysis() {
        let mut state = RunState::new();
        state.table = Some(vec![row(&[("revenue", json!(1000))])]);
        state.analysis = Some(Analysis {
            rows: 1,
            total_revenue: 1000.0,
            total_expenses: 0.0,
            total_profit: 1000.0,
        });

        let result = state.to_result_json();
        assert_eq!(result["table"][0]["revenue"], json!(1000));
        assert_eq!(result["analysis"]["total_profit"], json!(1000.0));
    }

    #[test]
    fn empty_state_projects_to_empty_object() {
        assert_eq!(RunState::new().to_result_json(), json!({}));
    }
}
