//! Value, row and result set types.
//!
//! Defines the structures used to represent dataset rows and query results.

use super::TableName;
use crate::error::{PlaygroundError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A row of data, aligned with the owning dataset's column list.
pub type Row = Vec<Value>;

/// Represents a single scalar value from a dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum Value {
    /// NULL value.
    #[default]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Signed integer (up to i64).
    Int(i64),

    /// Floating point number.
    Float(f64),

    /// Text/string value.
    String(String),
}

impl Value {
    /// Returns true if this value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the value as shown in the results table (`N/A` for NULL).
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "N/A".to_string(),
            other => other.to_text(),
        }
    }

    /// Returns the plain textual form used for searching and export.
    ///
    /// NULL becomes the empty string.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::String(s) => s.clone(),
        }
    }

    /// Converts a JSON scalar into a value.
    ///
    /// Nested arrays and objects are kept as their JSON text.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            nested => Value::String(nested.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => Value::Null,
        }
    }
}

/// One named table: an ordered column list and rows aligned with it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Creates a dataset from columns and aligned rows.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Parses a JSON array of flat objects.
    ///
    /// The column order is taken from the first object. Keys missing from a
    /// later object become NULL; keys the first object does not have are
    /// dropped.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let parsed: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| PlaygroundError::dataset(format!("invalid JSON: {e}")))?;

        let serde_json::Value::Array(items) = parsed else {
            return Err(PlaygroundError::dataset("expected a JSON array of objects"));
        };

        let mut columns: Vec<String> = Vec::new();
        let mut rows = Vec::with_capacity(items.len());

        for (index, item) in items.into_iter().enumerate() {
            let serde_json::Value::Object(mut object) = item else {
                return Err(PlaygroundError::dataset(format!(
                    "element {index} is not an object"
                )));
            };

            if index == 0 {
                columns = object.keys().cloned().collect();
            } else if object.keys().any(|key| !columns.contains(key)) {
                tracing::warn!(
                    "Row {} has columns outside the dataset header; extra keys are ignored",
                    index
                );
            }

            let row = columns
                .iter()
                .map(|column| {
                    object
                        .remove(column)
                        .map(Value::from_json)
                        .unwrap_or(Value::Null)
                })
                .collect();
            rows.push(row);
        }

        Ok(Self { columns, rows })
    }

    /// Returns the column names in display order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns all rows in stored order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The rows produced by one successful query.
///
/// Shares the dataset it was taken from and exposes a prefix of its rows,
/// so neither a full-table result nor a LIMIT copies any row.
#[derive(Debug, Clone)]
pub struct ResultSet {
    table: TableName,
    dataset: Arc<Dataset>,
    len: usize,
    execution_time: Duration,
}

impl ResultSet {
    /// Creates a result over the first `limit` rows of a dataset (all rows if `None`).
    pub fn new(table: TableName, dataset: Arc<Dataset>, limit: Option<usize>) -> Self {
        let len = limit.map_or(dataset.len(), |limit| limit.min(dataset.len()));
        Self {
            table,
            dataset,
            len,
            execution_time: Duration::ZERO,
        }
    }

    /// Sets the execution time.
    pub fn with_execution_time(mut self, duration: Duration) -> Self {
        self.execution_time = duration;
        self
    }

    /// Returns the table the rows came from.
    pub fn table(&self) -> TableName {
        self.table
    }

    /// Returns the column names in display order.
    pub fn columns(&self) -> &[String] {
        self.dataset.columns()
    }

    /// Returns the result rows in dataset order.
    pub fn rows(&self) -> &[Row] {
        &self.dataset.rows()[..self.len]
    }

    /// Returns the number of rows in the result.
    pub fn row_count(&self) -> usize {
        self.len
    }

    /// Returns true if the result set is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the time taken to produce the result.
    pub fn execution_time(&self) -> Duration {
        self.execution_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_display_string(), "N/A");
        assert_eq!(Value::Bool(true).to_display_string(), "true");
        assert_eq!(Value::Int(42).to_display_string(), "42");
        assert_eq!(Value::Float(2.71).to_display_string(), "2.71");
        assert_eq!(Value::Float(18.0).to_display_string(), "18");
        assert_eq!(Value::from("hello").to_display_string(), "hello");
    }

    #[test]
    fn test_null_text_is_empty() {
        assert_eq!(Value::Null.to_text(), "");
        assert!(Value::Null.is_null());
        assert!(!Value::Int(0).is_null());
    }

    #[test]
    fn test_value_from_conversions() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(42i32), Value::Int(42));
        assert_eq!(Value::from(2.71f64), Value::Float(2.71));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::String("x".to_string()));
    }

    #[test]
    fn test_value_from_json() {
        assert_eq!(Value::from_json(serde_json::json!(null)), Value::Null);
        assert_eq!(Value::from_json(serde_json::json!(7)), Value::Int(7));
        assert_eq!(Value::from_json(serde_json::json!(7.5)), Value::Float(7.5));
        assert_eq!(Value::from_json(serde_json::json!(false)), Value::Bool(false));
        assert_eq!(
            Value::from_json(serde_json::json!([1, 2])),
            Value::String("[1,2]".to_string())
        );
    }

    #[test]
    fn test_dataset_from_json_keeps_key_order() {
        let json = r#"[
            {"ProductID": 1, "ProductName": "Chai", "Discontinued": false},
            {"ProductID": 2, "ProductName": "Chang", "Discontinued": true}
        ]"#;
        let dataset = Dataset::from_json_str(json).unwrap();

        assert_eq!(
            dataset.columns(),
            &["ProductID", "ProductName", "Discontinued"]
        );
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.rows()[1][1], Value::from("Chang"));
    }

    #[test]
    fn test_dataset_missing_key_becomes_null() {
        let json = r#"[{"a": 1, "b": "x"}, {"a": 2}]"#;
        let dataset = Dataset::from_json_str(json).unwrap();
        assert_eq!(dataset.rows()[1], vec![Value::Int(2), Value::Null]);
    }

    #[test]
    fn test_dataset_rejects_non_array() {
        let err = Dataset::from_json_str(r#"{"a": 1}"#).unwrap_err();
        assert!(err.to_string().contains("expected a JSON array"));
    }

    #[test]
    fn test_dataset_rejects_non_object_element() {
        let err = Dataset::from_json_str("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("element 0"));
    }

    #[test]
    fn test_empty_array_is_empty_dataset() {
        let dataset = Dataset::from_json_str("[]").unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.columns().is_empty());
    }

    #[test]
    fn test_result_set_limit_is_clamped() {
        let dataset = Arc::new(Dataset::new(
            vec!["id".to_string()],
            (1..=3).map(|i| vec![Value::Int(i)]).collect(),
        ));

        let all = ResultSet::new(TableName::Products, Arc::clone(&dataset), None);
        assert_eq!(all.row_count(), 3);

        let limited = ResultSet::new(TableName::Products, Arc::clone(&dataset), Some(2));
        assert_eq!(limited.rows(), &[vec![Value::Int(1)], vec![Value::Int(2)]]);

        let over = ResultSet::new(TableName::Products, dataset, Some(10));
        assert_eq!(over.row_count(), 3);
        assert!(!over.is_empty());
    }
}
