//! Tabular data model for query results.
//!
//! A query result is an ordered list of [`Row`]s, each an ordered mapping
//! from column name to a scalar [`CellValue`]. Column order matters: the
//! presentation layer derives the table header from the first row's
//! insertion order, so `Row` keeps its own entry list instead of a sorted
//! map and deserializes entries in document order.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// CellValue
// =============================================================================

/// A single scalar cell in a result row.
///
/// Backend payloads may only carry scalars in cells; nested objects or
/// arrays fail deserialization and are rejected at the transport boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Raw string form of the cell, as used for CSV export: empty for
    /// null, `true`/`false` for booleans, literal digits for numbers.
    pub fn raw(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(n) => n.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Int(n)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

// =============================================================================
// Row
// =============================================================================

/// An ordered column -> cell mapping.
///
/// Insertion order is preserved through serialization and deserialization;
/// duplicate column names are kept as-is (the backend never produces them,
/// and lookup returns the first occurrence).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(column, value)` pairs, preserving order.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, CellValue)>,
        S: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(column, value)| (column.into(), value))
                .collect(),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.push((column.into(), value));
    }

    /// Look up a cell by column name (first occurrence).
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RowVisitor;

        impl<'de> Visitor<'de> for RowVisitor {
            type Value = Row;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object with scalar values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Row, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut cells = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((column, value)) = map.next_entry::<String, CellValue>()? {
                    cells.push((column, value));
                }
                Ok(Row { cells })
            }
        }

        deserializer.deserialize_map(RowVisitor)
    }
}

// =============================================================================
// QueryResult
// =============================================================================

/// A validated, successful query execution result.
///
/// `row_count` is the authoritative total reported by the backend. The
/// backend may cap the transmitted `rows` below that total, so
/// `row_count >= rows.len()` is expected but `row_count == rows.len()` is
/// not guaranteed; the two are never reconciled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// The question as echoed by the executor.
    pub question: String,
    /// The SQL generated for the question.
    pub generated_sql: String,
    /// Transmitted result rows, in backend order.
    pub rows: Vec<Row>,
    /// Authoritative total row count.
    pub row_count: u64,
}

impl QueryResult {
    /// True when fewer rows were transmitted than the reported total.
    pub fn truncated(&self) -> bool {
        self.row_count > self.rows.len() as u64
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> Row {
        Row::from_pairs([
            ("country", CellValue::from("United States")),
            ("unique_users", CellValue::Int(8934)),
            ("share", CellValue::Float(62.34)),
            ("active", CellValue::Bool(true)),
            ("note", CellValue::Null),
        ])
    }

    // ---- CellValue parsing ----

    #[test]
    fn test_cell_value_from_json_scalars() {
        assert_eq!(
            serde_json::from_str::<CellValue>("null").unwrap(),
            CellValue::Null
        );
        assert_eq!(
            serde_json::from_str::<CellValue>("true").unwrap(),
            CellValue::Bool(true)
        );
        assert_eq!(
            serde_json::from_str::<CellValue>("41980").unwrap(),
            CellValue::Int(41980)
        );
        assert_eq!(
            serde_json::from_str::<CellValue>("-17").unwrap(),
            CellValue::Int(-17)
        );
        assert_eq!(
            serde_json::from_str::<CellValue>("62.34").unwrap(),
            CellValue::Float(62.34)
        );
        assert_eq!(
            serde_json::from_str::<CellValue>("\"mobile\"").unwrap(),
            CellValue::Text("mobile".to_string())
        );
    }

    #[test]
    fn test_cell_value_rejects_nested_shapes() {
        assert!(serde_json::from_str::<CellValue>("[1, 2]").is_err());
        assert!(serde_json::from_str::<CellValue>("{\"a\": 1}").is_err());
    }

    #[test]
    fn test_cell_value_integer_stays_integer() {
        // Whole numbers must not collapse into floats; the formatter
        // renders them without a decimal point.
        let v = serde_json::from_str::<CellValue>("1000").unwrap();
        assert_eq!(v, CellValue::Int(1000));
    }

    // ---- CellValue raw form ----

    #[test]
    fn test_cell_value_raw_forms() {
        assert_eq!(CellValue::Null.raw(), "");
        assert_eq!(CellValue::Bool(false).raw(), "false");
        assert_eq!(CellValue::Int(42).raw(), "42");
        assert_eq!(CellValue::Float(3.5).raw(), "3.5");
        assert_eq!(CellValue::Text("a,b".to_string()).raw(), "a,b");
    }

    #[test]
    fn test_cell_value_display_matches_raw() {
        let v = CellValue::Int(7);
        assert_eq!(v.to_string(), v.raw());
    }

    // ---- Row ordering ----

    #[test]
    fn test_row_preserves_insertion_order() {
        let row = sample_row();
        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(
            columns,
            vec!["country", "unique_users", "share", "active", "note"]
        );
    }

    #[test]
    fn test_row_deserialize_preserves_document_order() {
        // Keys chosen so that alphabetical order differs from document
        // order; a sorted-map representation would reorder them.
        let row: Row =
            serde_json::from_str(r#"{"zebra": 1, "apple": 2, "mango": 3}"#).unwrap();
        let columns: Vec<&str> = row.columns().collect();
        assert_eq!(columns, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_row_serde_round_trip() {
        let row = sample_row();
        let json = serde_json::to_string(&row).unwrap();
        let back: Row = serde_json::from_str(&json).unwrap();
        assert_eq!(row, back);
    }

    #[test]
    fn test_row_get() {
        let row = sample_row();
        assert_eq!(row.get("unique_users"), Some(&CellValue::Int(8934)));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_row_rejects_nested_cell() {
        let result = serde_json::from_str::<Row>(r#"{"a": {"nested": true}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_row_rejects_non_object() {
        assert!(serde_json::from_str::<Row>("[1, 2, 3]").is_err());
        assert!(serde_json::from_str::<Row>("\"text\"").is_err());
    }

    #[test]
    fn test_empty_row() {
        let row: Row = serde_json::from_str("{}").unwrap();
        assert!(row.is_empty());
        assert_eq!(row.len(), 0);
    }

    // ---- QueryResult ----

    #[test]
    fn test_query_result_not_truncated() {
        let result = QueryResult {
            question: "q".to_string(),
            generated_sql: "SELECT 1;".to_string(),
            rows: vec![sample_row()],
            row_count: 1,
        };
        assert!(!result.truncated());
    }

    #[test]
    fn test_query_result_truncated_when_backend_caps_rows() {
        let result = QueryResult {
            question: "q".to_string(),
            generated_sql: "SELECT *;".to_string(),
            rows: vec![sample_row()],
            row_count: 500,
        };
        assert!(result.truncated());
    }

    #[test]
    fn test_query_result_serde_round_trip() {
        let result = QueryResult {
            question: "국가별 사용자 수를 보여주세요".to_string(),
            generated_sql: "SELECT geo.country FROM t;".to_string(),
            rows: vec![sample_row(), sample_row()],
            row_count: 2,
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: QueryResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
