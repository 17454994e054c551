//! # kwgap Common Library
//!
//! Shared code for the keyword gap tools including:
//! - Error types
//! - Rule string parsing (`Label: Pattern` pairs)
//! - Configuration loading and the immutable analysis configuration
//! - The generic table structure exchanged with CSV readers/writers

pub mod config;
pub mod error;
pub mod rules;
pub mod table;

pub use config::{AnalysisConfig, CategoryMode, PatternMode};
pub use error::{Error, Result, RuleKind};
pub use table::Table;
