//! CSV export of record sets.
//!
//! The header is the union of every field name across the exported records,
//! in order of first appearance. Missing, null, `false` and zero cells are
//! written as an empty quoted string; strings are always quoted with embedded
//! quotes doubled; other numbers and `true` are written bare.

use crate::{entities::EquipmentRecord, errors::Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashSet;

/// Timestamp format appended to export file names (sortable, filesystem-safe).
pub const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// A rendered CSV document ready to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// Download file name, e.g. `Galle_all_data_2024-01-15_10-20-30.csv`
    pub file_name: String,
    /// CSV text, rows separated by `\n`
    pub content: String,
    /// Number of data rows (excluding the header)
    pub row_count: usize,
}

/// Builds the export file name from a prefix and a timestamp.
#[must_use]
pub fn export_file_name(prefix: &str, timestamp: DateTime<Utc>) -> String {
    format!("{prefix}_{}.csv", timestamp.format(FILE_TIMESTAMP_FORMAT))
}

/// Quotes a string value, doubling any embedded quotes.
#[must_use]
pub fn escape_csv_text(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null | Value::Bool(false)) => escape_csv_text(""),
        Some(Value::Number(n)) if n.as_f64().is_none_or(|v| v == 0.0) => escape_csv_text(""),
        Some(Value::String(s)) => escape_csv_text(s),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(other @ (Value::Array(_) | Value::Object(_))) => escape_csv_text(&other.to_string()),
    }
}

fn render_header(name: &str) -> String {
    if name.contains([',', '"', '\n', '\r']) {
        escape_csv_text(name)
    } else {
        name.to_string()
    }
}

/// Renders `records` as CSV.
///
/// Returns `Ok(None)` when there is nothing to export; callers report that to
/// the user rather than treating it as a failure.
pub fn export_csv(
    records: &[EquipmentRecord],
    file_name_prefix: &str,
    timestamp: DateTime<Utc>,
) -> Result<Option<CsvExport>> {
    if records.is_empty() {
        return Ok(None);
    }

    let rows = records
        .iter()
        .map(EquipmentRecord::to_field_map)
        .collect::<serde_json::Result<Vec<_>>>()?;

    let mut seen = HashSet::new();
    let mut headers: Vec<&str> = Vec::new();
    for row in &rows {
        for key in row.keys() {
            if seen.insert(key.as_str()) {
                headers.push(key);
            }
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| render_header(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in &rows {
        lines.push(
            headers
                .iter()
                .map(|h| render_cell(row.get(*h)))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    Ok(Some(CsvExport {
        file_name: export_file_name(file_name_prefix, timestamp),
        content: lines.join("\n"),
        row_count: rows.len(),
    }))
}
