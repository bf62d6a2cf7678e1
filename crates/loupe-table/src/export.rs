//! CSV export of a result row set.
//!
//! Header row is the column names joined by commas; each data row renders
//! cells in their raw string form (empty for null). A string containing a
//! comma is wrapped in quotes with internal quotes doubled. Row order is
//! preserved from input.

use chrono::NaiveDate;

use loupe_core::{CellValue, Row};

/// Column names in first-row insertion order; empty for an empty set.
pub fn columns(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|row| row.columns().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Serialize `rows` to CSV text under the given header columns.
pub fn to_csv(rows: &[Row], columns: &[String]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(columns.join(","));

    for row in rows {
        let fields: Vec<String> = columns
            .iter()
            .map(|column| csv_field(row.get(column)))
            .collect();
        lines.push(fields.join(","));
    }

    lines.join("\n")
}

/// Export filename for a result set downloaded on `date`:
/// `ga4-data-<ISO date>.csv`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("ga4-data-{}.csv", date.format("%Y-%m-%d"))
}

fn csv_field(value: Option<&CellValue>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    match value {
        CellValue::Text(s) if s.contains(',') => {
            format!("\"{}\"", s.replace('"', "\"\""))
        }
        other => other.raw(),
    }
}
