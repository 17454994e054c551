//! Common error types for kwgap

use std::fmt;
use thiserror::Error;

/// Common result type for kwgap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which rule list a configuration problem belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Category,
    Pattern,
}

impl RuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Category => "category",
            RuleKind::Pattern => "keyword pattern",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common error types across kwgap crates
#[derive(Error, Debug)]
pub enum Error {
    /// A rule pair lacks the `:` separator (or has an empty label)
    #[error("Invalid format for {kind} pair: '{pair}' (expected 'Label: Pattern')")]
    ConfigFormat { kind: RuleKind, pair: String },

    /// A rule pattern is not a valid regular expression
    #[error("Invalid {kind} pattern '{pattern}' for '{label}': {source}")]
    InvalidPattern {
        kind: RuleKind,
        label: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A required column is absent from the input
    #[error("Schema error: column '{column}' does not exist{}", table_suffix(.table))]
    Schema {
        column: String,
        table: Option<String>,
    },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn table_suffix(table: &Option<String>) -> String {
    match table {
        Some(name) => format!(" in '{}'", name),
        None => String::new(),
    }
}

impl Error {
    /// Schema error for a column missing from the merged input
    pub fn missing_column(column: impl Into<String>) -> Self {
        Error::Schema {
            column: column.into(),
            table: None,
        }
    }

    /// Schema error for a column missing from one named source table
    pub fn missing_column_in(column: impl Into<String>, table: impl Into<String>) -> Self {
        Error::Schema {
            column: column.into(),
            table: Some(table.into()),
        }
    }
}
