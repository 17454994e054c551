//! Error types for kwgap-an

use thiserror::Error;

/// Analyzer error type
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// Configuration or schema error from kwgap-common
    #[error(transparent)]
    Common(#[from] kwgap_common::Error),

    /// CSV parse or write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for analyzer operations
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
