//! Keyword Deduplicator
//!
//! Keeps the best-ranked row for every keyword. Rows are stable-sorted by
//! coerced rank ascending with missing ranks last, then the first occurrence
//! of each keyword survives. Equal ranks keep merge order.

use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::info;

use crate::models::{KeywordRecord, MergedTable};

/// Order by rank ascending, missing last
pub fn compare_rank(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Remove duplicate keywords, keeping the lowest rank
///
/// Survivors are returned in rank order.
pub fn deduplicate(merged: MergedTable) -> MergedTable {
    let MergedTable {
        columns,
        mut records,
        warnings,
    } = merged;
    let before = records.len();

    // sort_by is stable: ties stay in merge order
    records.sort_by(|a, b| compare_rank(a.rank, b.rank));

    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    let records: Vec<KeywordRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.keyword.clone()))
        .collect();

    info!(
        "Deduplicated {} rows to {} unique keywords ({} duplicates removed)",
        before,
        records.len(),
        before - records.len()
    );

    MergedTable {
        columns,
        records,
        warnings,
    }
}
