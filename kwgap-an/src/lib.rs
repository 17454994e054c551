//! kwgap-an library - keyword gap analysis
//!
//! Merges keyword ranking exports for one domain, keeps the best rank per
//! keyword, classifies each row by page category, keyword pattern and rank
//! band, and produces the enriched table plus summary tables.

pub mod csv_io;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;

pub use crate::error::{AnalyzerError, AnalyzerResult};
pub use crate::pipeline::{run, AnalysisReport};
