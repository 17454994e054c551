//! Generic tabular structure
//!
//! Tables are exchanged with the CSV reader/writer as ordered column names
//! plus rows of JSON cells. `Value::Null` marks an empty cell.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Largest integer an f64 represents exactly
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Named table with positional rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from string columns and rows (test and fixture helper)
    pub fn from_rows(name: impl Into<String>, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let mut table = Self::new(name, columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Position of a column by exact name
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    /// Append a row, padding with nulls or truncating to the column count
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    /// Cell at `row` in the named column
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// All cells of the named column, top to bottom
    pub fn column_values<'a>(&'a self, column: &str) -> Option<impl Iterator<Item = &'a Value> + 'a> {
        let index = self.column_index(column)?;
        Some(self.rows.iter().map(move |row| &row[index]))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Outcome of coercing a cell to a number
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerced {
    /// Numeric cell
    Number(f64),
    /// Null or blank cell
    Empty,
    /// Non-empty cell that is not a number
    Invalid,
}

/// Coerce a cell to a number
///
/// Text is trimmed before parsing. NaN is treated as absent; infinities
/// (`inf`, or an overflowing `1e400`) are not numbers a cell can hold and
/// count as invalid.
pub fn coerce_number(cell: &Value) -> Coerced {
    let parsed = match cell {
        Value::Null => return Coerced::Empty,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Coerced::Empty;
            }
            trimmed.parse::<f64>().ok()
        }
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    };

    match parsed {
        Some(n) if n.is_nan() => Coerced::Empty,
        Some(n) if n.is_infinite() => Coerced::Invalid,
        Some(n) => Coerced::Number(n),
        None => Coerced::Invalid,
    }
}

/// Text content of a cell, `None` for null
pub fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// JSON cell for a number, integral values stored as integers
pub fn number_cell(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// JSON cell for an optional number
pub fn optional_number_cell(n: Option<f64>) -> Value {
    n.map(number_cell).unwrap_or(Value::Null)
}
