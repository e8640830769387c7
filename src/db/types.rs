//! Result relations.
//!
//! The column set of a result is only known once the query has run, so rows
//! are vectors of dynamically typed cells.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Columns and rows returned by one query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<Row>,
    /// Wall time spent in the engine.
    pub elapsed: Duration,
    /// Rows kept, which is `rows.len()`.
    pub row_count: usize,
    /// Rows the engine produced, when more than were kept.
    pub truncated_from: Option<usize>,
}

impl QueryResult {
    pub fn with_data(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        Self {
            row_count: rows.len(),
            columns,
            rows,
            ..Self::default()
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Keeps at most `max_rows` rows, remembering how many there were.
    pub fn truncate_to(mut self, max_rows: usize) -> Self {
        if self.rows.len() > max_rows {
            self.truncated_from = Some(self.rows.len());
            self.rows.truncate(max_rows);
            self.row_count = max_rows;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated_from.is_some()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Position of the named column. Names match exactly, case included.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn truncation_warning(&self) -> Option<String> {
        self.truncated_from.map(|total| {
            format!(
                "Result truncated: showing {} of {} rows",
                self.row_count, total
            )
        })
    }
}

/// Name and engine-reported type of a result column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

pub type Row = Vec<Value>;

/// One result cell.
///
/// Serializes as the bare JSON value, so a row becomes a JSON array.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the cell. Text holding a number, such as a
    /// `strftime` year, counts.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }
}

/// Two decimals, with a zero fraction dropped: `1600`, `41.91`, `-0.5`.
pub fn format_float(f: f64) -> String {
    let formatted = format!("{f:.2}");
    match formatted.strip_suffix(".00") {
        Some("-0") => "0".to_string(),
        Some(whole) => whole.to_string(),
        None => formatted,
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v.into())
            }
        })*
    };
}

value_from! {
    bool => Bool,
    i64 => Int,
    f64 => Float,
    String => String,
    &str => String,
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
