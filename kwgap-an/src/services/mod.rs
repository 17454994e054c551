//! Pipeline stages
//!
//! Merger → Deduplicator → {Category, Pattern, Rank} classification →
//! Projector → Aggregator. Each stage takes its input by value or by
//! reference and returns a new structure.

pub mod aggregator;
pub mod category_classifier;
pub mod deduplicator;
pub mod merger;
pub mod pattern_classifier;
pub mod projector;
pub mod rank_bucketer;

pub use aggregator::{summarize, Summaries};
pub use category_classifier::categorize;
pub use deduplicator::deduplicate;
pub use merger::merge_tables;
pub use pattern_classifier::label_keyword;
pub use projector::{ProjectionLayout, DROPPED_COLUMNS};
pub use rank_bucketer::{bucket, RankStatus};
