//! Export generated rows as JSON or CSV

use crate::api::Row;
use crate::error::{Result, SynthError};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Output format for generated rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// File name used when the user does not pick one
    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "synthetic-data.json",
            ExportFormat::Csv => "synthetic-data.csv",
        }
    }

    /// Render `rows` in this format
    pub fn render(&self, rows: &[Row]) -> Result<String> {
        match self {
            ExportFormat::Json => to_json(rows),
            ExportFormat::Csv => to_csv(rows),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => f.write_str("json"),
            ExportFormat::Csv => f.write_str("csv"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = SynthError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(SynthError::Validation(format!(
                "Unknown export format: {}. Must be json or csv",
                other
            ))),
        }
    }
}

/// Pretty-printed JSON array of the rows, column order preserved
pub fn to_json(rows: &[Row]) -> Result<String> {
    ensure_rows(rows)?;
    Ok(serde_json::to_string_pretty(rows)?)
}

/// CSV with a header taken from the first row's columns.
///
/// Later rows are written in header order; columns they lack are left
/// empty and columns the first row lacks are dropped. A field containing a
/// comma (or a quote or line break) is quoted with inner quotes doubled.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use synthdata::export::to_csv;
///
/// let row = json!({"name": "Doe, Jane", "age": 41});
/// let csv = to_csv(&[row.as_object().unwrap().clone()]).unwrap();
/// assert_eq!(csv, "name,age\n\"Doe, Jane\",41\n");
/// ```
pub fn to_csv(rows: &[Row]) -> Result<String> {
    ensure_rows(rows)?;
    let headers: Vec<&str> = rows[0].keys().map(String::as_str).collect();

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&headers)?;
    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(cell_text).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SynthError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SynthError::Export(e.to_string()).into())
}

/// Render `rows` and write them to `path`.
pub fn write_export(rows: &[Row], format: ExportFormat, path: &Path) -> Result<()> {
    let contents = format.render(rows)?;
    std::fs::write(path, contents).map_err(|e| {
        SynthError::Export(format!("Failed to write {}: {}", path.display(), e))
    })?;
    tracing::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn ensure_rows(rows: &[Row]) -> Result<()> {
    if rows.is_empty() {
        return Err(SynthError::Export("No data to export".to_string()).into());
    }
    Ok(())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
