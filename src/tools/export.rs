//! `export_report`: serialize state slices into transportable encodings.
//!
//! `pdf` renders the compiled report, `xlsx` (alias `excel`) serializes the
//! table; both are stored base64-encoded under format-specific keys. Unknown
//! formats are silently skipped. A requested format whose precondition is
//! unmet is skipped too unless `strict` export policy is configured, in which
//! case the step fails with a missing-precondition error (see DESIGN.md).

use super::traits::Tool;
use crate::error::ToolError;
use crate::state::{Report, Row, RunState};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use rust_xlsxwriter::Workbook;
use serde_json::Value;

const BODY_WRAP_COLUMNS: usize = 90;

pub struct ExportReportTool {
    strict: bool,
}

impl ExportReportTool {
    pub const fn new(strict: bool) -> Self {
        Self { strict }
    }

    fn requested_formats(args: &[Value]) -> Vec<String> {
        args.iter()
            .filter_map(Value::as_str)
            .map(|f| {
                let lower = f.trim().to_lowercase();
                if lower == "excel" {
                    "xlsx".to_string()
                } else {
                    lower
                }
            })
            .collect()
    }

    fn skip_or_fail(&self, format: &str, precondition: &str) -> Result<(), ToolError> {
        if self.strict {
            return Err(ToolError::MissingPrecondition(format!(
                "{format} export requires {precondition}"
            )));
        }
        tracing::debug!(format, precondition, "skipping export with unmet precondition");
        Ok(())
    }

    fn render_pdf(report: &Report) -> Result<Vec<u8>, ToolError> {
        let (doc, first_page, first_layer) =
            PdfDocument::new("Automated Report", Mm(210.0), Mm(297.0), "report");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| pdf_error(e.to_string()))?;

        let mut layer = doc.get_page(first_page).get_layer(first_layer);
        let mut y = 280.0;

        let summary = |value: Option<f64>| {
            value.map_or_else(|| "N/A".to_string(), |v| format!("{v}"))
        };
        let analysis = report.analysis.as_ref();

        layer.use_text("Automated Report", 16.0, Mm(10.0), Mm(y), &font);
        y -= 10.0;
        layer.use_text(
            format!(
                "Total revenue: {}",
                summary(analysis.map(|a| a.total_revenue))
            ),
            12.0,
            Mm(10.0),
            Mm(y),
            &font,
        );
        y -= 7.0;
        layer.use_text(
            format!("Total profit: {}", summary(analysis.map(|a| a.total_profit))),
            12.0,
            Mm(10.0),
            Mm(y),
            &font,
        );
        y -= 10.0;
        layer.use_text("Full report (JSON):", 12.0, Mm(10.0), Mm(y), &font);
        y -= 7.0;

        let body = serde_json::to_string_pretty(report).map_err(|e| pdf_error(e.to_string()))?;
        for line in body.lines().flat_map(wrap_line) {
            if y < 15.0 {
                let (page, page_layer) = doc.add_page(Mm(210.0), Mm(297.0), "report");
                layer = doc.get_page(page).get_layer(page_layer);
                y = 280.0;
            }
            layer.use_text(line, 9.0, Mm(10.0), Mm(y), &font);
            y -= 5.0;
        }

        doc.save_to_bytes().map_err(|e| pdf_error(e.to_string()))
    }

    fn render_xlsx(rows: &[Row]) -> Result<Vec<u8>, ToolError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        // Header union in first-seen order, like the rows themselves.
        let mut headers: Vec<String> = Vec::new();
        for row in rows {
            for key in row.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }

        for (col, header) in headers.iter().enumerate() {
            worksheet
                .write(0, col as u16, header.as_str())
                .map_err(|e| xlsx_error(e.to_string()))?;
        }

        for (idx, row) in rows.iter().enumerate() {
            let sheet_row = (idx + 1) as u32;
            for (col, header) in headers.iter().enumerate() {
                let col = col as u16;
                match row.get(header) {
                    Some(Value::Number(n)) => {
                        worksheet
                            .write(sheet_row, col, n.as_f64().unwrap_or(0.0))
                            .map_err(|e| xlsx_error(e.to_string()))?;
                    }
                    Some(Value::String(s)) => {
                        worksheet
                            .write(sheet_row, col, s.as_str())
                            .map_err(|e| xlsx_error(e.to_string()))?;
                    }
                    Some(Value::Bool(b)) => {
                        worksheet
                            .write(sheet_row, col, *b)
                            .map_err(|e| xlsx_error(e.to_string()))?;
                    }
                    Some(Value::Null) | None => {}
                    Some(other) => {
                        worksheet
                            .write(sheet_row, col, other.to_string())
                            .map_err(|e| xlsx_error(e.to_string()))?;
                    }
                }
            }
        }

        workbook
            .save_to_buffer()
            .map_err(|e| xlsx_error(e.to_string()))
    }
}

fn pdf_error(message: String) -> ToolError {
    ToolError::Execution {
        name: "export_report".to_string(),
        message: format!("pdf: {message}"),
    }
}

fn xlsx_error(message: String) -> ToolError {
    ToolError::Execution {
        name: "export_report".to_string(),
        message: format!("xlsx: {message}"),
    }
}

fn wrap_line(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.len() <= BODY_WRAP_COLUMNS {
        return vec![line.to_string()];
    }
    chars
        .chunks(BODY_WRAP_COLUMNS)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[async_trait]
impl Tool for ExportReportTool {
    fn name(&self) -> &str {
        "export_report"
    }

    fn description(&self) -> &str {
        "Serialize the report (pdf) and table (xlsx) to base64 payloads"
    }

    async fn execute(&self, state: &mut RunState, args: &[Value]) -> Result<Value, ToolError> {
        let mut produced: Vec<Value> = Vec::new();

        for format in Self::requested_formats(args) {
            match format.as_str() {
                "pdf" => {
                    let Some(report) = &state.report else {
                        self.skip_or_fail("pdf", "a compiled report")?;
                        continue;
                    };
                    let bytes = Self::render_pdf(report)?;
                    state.pdf_base64 = Some(BASE64.encode(bytes));
                    produced.push(Value::String("pdf".to_string()));
                }
                "xlsx" => {
                    let Some(rows) = state.table.as_ref().filter(|t| !t.is_empty()) else {
                        self.skip_or_fail("xlsx", "a non-empty table")?;
                        continue;
                    };
                    let bytes = Self::render_xlsx(rows)?;
                    state.xlsx_base64 = Some(BASE64.encode(bytes));
                    produced.push(Value::String("xlsx".to_string()));
                }
                other => {
                    tracing::debug!(format = other, "ignoring unsupported export format");
                }
            }
        }

        Ok(Value::Array(produced))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Analysis;
    use serde_json::json;

    fn row(revenue: f64, expenses: f64) -> Row {
        let mut row = Row::new();
        row.insert("revenue".to_string(), json!(revenue));
        row.insert("expenses".to_string(), json!(expenses));
        row
    }

    fn ready_state() -> RunState {
        let mut state = RunState::new();
        state.table = Some(vec![row(1000.0, 400.0), row(1200.0, 500.0)]);
        state.analysis = Some(Analysis {
            rows: 2,
            total_revenue: 2200.0,
            total_expenses: 900.0,
            total_profit: 1300.0,
        });
        state.report = Some(Report {
            analysis: state.analysis.clone(),
            data: state.table.clone().unwrap_or_default(),
            chart: Some("chart_ready".to_string()),
        });
        state
    }

    #[tokio::test]
    async fn produces_pdf_and_xlsx_payloads() {
        let mut state = ready_state();
        let value = ExportReportTool::new(false)
            .execute(&mut state, &[json!("pdf"), json!("excel")])
            .await
            .unwrap();

        assert_eq!(value, json!(["pdf", "xlsx"]));
        assert!(state.pdf_base64.as_ref().is_some_and(|p| !p.is_empty()));
        assert!(state.xlsx_base64.as_ref().is_some_and(|x| !x.is_empty()));
        // xlsx payload decodes to a ZIP container
        let bytes = BASE64.decode(state.xlsx_base64.as_ref().unwrap()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn unknown_formats_are_silently_skipped() {
        let mut state = ready_state();
        let value = ExportReportTool::new(false)
            .execute(&mut state, &[json!("docx"), json!("pdf")])
            .await
            .unwrap();
        assert_eq!(value, json!(["pdf"]));
    }

    #[tokio::test]
    async fn unmet_precondition_skips_by_default() {
        let mut state = RunState::new();
        let value = ExportReportTool::new(false)
            .execute(&mut state, &[json!("pdf"), json!("xlsx")])
            .await
            .unwrap();
        assert_eq!(value, json!([]));
        assert!(state.pdf_base64.is_none());
    }

    #[tokio::test]
    async fn unmet_precondition_fails_under_strict_policy() {
        let mut state = RunState::new();
        let err = ExportReportTool::new(true)
            .execute(&mut state, &[json!("pdf")])
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingPrecondition(_)));
    }

    #[tokio::test]
    async fn non_string_args_are_ignored() {
        let mut state = ready_state();
        let value = ExportReportTool::new(false)
            .execute(&mut state, &[json!(42), json!("pdf")])
            .await
            .unwrap();
        assert_eq!(value, json!(["pdf"]));
    }

    #[test]
    fn wrap_line_chunks_long_lines() {
        let long = "x".repeat(200);
        let wrapped = wrap_line(&long);
        assert_eq!(wrapped.len(), 3);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 90));
    }
}
