//! `load_table`: parse the uploaded tabular source into normalized rows.
//!
//! The buffer is sniffed: a ZIP magic number means XLSX (read via calamine),
//! anything else is treated as CSV. Column keys are lower-cased and trimmed,
//! numeric-looking string cells are coerced to numbers, blank cells become
//! null. With no upload present the tool falls back to built-in sample rows
//! so demo plans work end to end.

use super::common::coerce_cell;
use super::traits::Tool;
use crate::error::ToolError;
use crate::state::{Row, RunState};
use async_trait::async_trait;
use calamine::{Data, Reader, Xlsx};
use serde_json::{json, Value};
use std::io::Cursor;

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

pub struct LoadTableTool;

impl LoadTableTool {
    pub const fn new() -> Self {
        Self
    }

    fn sample_rows() -> Vec<Row> {
        [(1000, 400), (1200, 500), (900, 300)]
            .into_iter()
            .map(|(revenue, expenses)| {
                let mut row = Row::new();
                row.insert("revenue".to_string(), json!(revenue));
                row.insert("expenses".to_string(), json!(expenses));
                row
            })
            .collect()
    }

    fn parse_xlsx(bytes: &[u8]) -> Result<Vec<Row>, ToolError> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| ToolError::Parse(format!("not a readable workbook: {e}")))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ToolError::Parse("workbook has no sheets".to_string()))?
            .map_err(|e| ToolError::Parse(format!("failed to read first sheet: {e}")))?;

        let mut cells = range.rows();
        let Some(header_cells) = cells.next() else {
            return Ok(Vec::new());
        };
        let headers: Vec<String> = header_cells
            .iter()
            .map(|cell| cell.to_string().trim().to_lowercase())
            .collect();

        let mut rows = Vec::new();
        for record in cells {
            let mut row = Row::new();
            for (header, cell) in headers.iter().zip(record) {
                if header.is_empty() {
                    continue;
                }
                row.insert(header.clone(), Self::cell_to_value(cell));
            }
            rows.push(row);
        }
        Ok(rows)
    }

    fn cell_to_value(cell: &Data) -> Value {
        match cell {
            Data::Empty => Value::Null,
            Data::Int(i) => json!(i),
            Data::Float(f) => json!(f),
            Data::Bool(b) => json!(b),
            Data::String(s) => coerce_cell(json!(s)),
            Data::DateTime(dt) => json!(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => json!(s),
            Data::Error(e) => {
                tracing::debug!(cell_error = %e, "mapping spreadsheet error cell to null");
                Value::Null
            }
        }
    }

    fn parse_csv(bytes: &[u8]) -> Result<Vec<Row>, ToolError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ToolError::Parse(format!("unreadable CSV header: {e}")))?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record =
                record.map_err(|e| ToolError::Parse(format!("unreadable CSV record: {e}")))?;
            let mut row = Row::new();
            for (header, field) in headers.iter().zip(record.iter()) {
                if header.is_empty() {
                    continue;
                }
                let value = if field.is_empty() {
                    Value::Null
                } else {
                    coerce_cell(json!(field))
                };
                row.insert(header.clone(), value);
            }
            rows.push(row);
        }
        Ok(rows)
    }

    fn parse_source(bytes: &[u8]) -> Result<Vec<Row>, ToolError> {
        if bytes.starts_with(ZIP_MAGIC) {
            Self::parse_xlsx(bytes)
        } else {
            Self::parse_csv(bytes)
        }
    }
}

#[async_trait]
impl Tool for LoadTableTool {
    fn name(&self) -> &str {
        "load_table"
    }

    fn description(&self) -> &str {
        "Parse the uploaded tabular source (XLSX or CSV) into normalized rows"
    }

    async fn execute(&self, state: &mut RunState, _args: &[Value]) -> Result<Value, ToolError> {
        let rows = match &state.source {
            Some(bytes) => Self::parse_source(bytes)?,
            None => {
                tracing::info!("no upload present, ingesting built-in sample rows");
                Self::sample_rows()
            }
        };

        state.table = Some(rows.clone());
        Ok(Value::Array(rows.into_iter().map(Value::Object).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn falls_back_to_sample_rows_without_upload() {
        let mut state = RunState::new();
        let value = LoadTableTool::new()
            .execute(&mut state, &[])
            .await
            .unwrap();

        let table = state.table.as_ref().unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table[0]["revenue"], json!(1000));
        assert_eq!(value.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn parses_csv_with_key_normalization_and_coercion() {
        let csv = b" Revenue ,Expenses,Region\n1000,400,north\n1200,500,\n".to_vec();
        let mut state = RunState::with_source(csv);
        LoadTableTool::new().execute(&mut state, &[]).await.unwrap();

        let table = state.table.as_ref().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0]["revenue"], json!(1000.0));
        assert_eq!(table[0]["region"], json!("north"));
        assert_eq!(table[1]["region"], json!(null));
    }

    #[tokio::test]
    async fn rerunning_overwrites_the_tabular_field() {
        let mut state = RunState::with_source(b"revenue\n10\n".to_vec());
        let tool = LoadTableTool::new();
        tool.execute(&mut state, &[]).await.unwrap();
        tool.execute(&mut state, &[]).await.unwrap();

        assert_eq!(state.table.as_ref().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_zip_source_is_a_parse_error() {
        // ZIP magic with garbage after it: claims XLSX, is not one.
        let mut bytes = b"PK\x03\x04".to_vec();
        bytes.extend_from_slice(b"definitely not a workbook");
        let mut state = RunState::with_source(bytes);

        let err = LoadTableTool::new()
            .execute(&mut state, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Parse(_)));
    }

    #[test]
    fn xlsx_cells_map_to_json() {
        assert_eq!(LoadTableTool::cell_to_value(&Data::Int(7)), json!(7));
        assert_eq!(LoadTableTool::cell_to_value(&Data::Float(2.5)), json!(2.5));
        assert_eq!(
            LoadTableTool::cell_to_value(&Data::String("120".to_string())),
            json!(120.0)
        );
        assert_eq!(LoadTableTool::cell_to_value(&Data::Empty), json!(null));
    }
}
