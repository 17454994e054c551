//! Projector
//!
//! Lays enriched records out as output tables:
//! - leading columns in a fixed order, skipping optional ones no source had
//! - every other merged column afterwards, sorted by name
//! - `Competition`, `Results` and the `File_Name` source tag dropped
//! - rows ordered by search volume descending, missing volume last, ties in
//!   merge order

use kwgap_common::Table;
use serde_json::Value;
use std::cmp::Ordering;
use tracing::debug;

use crate::models::{
    EnrichedRecord, MergedTable, CATEGORY_COLUMN, KEYWORD_COLUMN, PATTERN_LABEL_COLUMN,
    SEARCH_VOLUME_COLUMN, SOURCE_COLUMN, STATUS_COLUMN,
};
use crate::services::rank_bucketer::RankStatus;

/// Working columns never written out
pub const DROPPED_COLUMNS: [&str; 3] = ["Competition", "Results", SOURCE_COLUMN];

/// Where an output column takes its value from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnSource {
    Category,
    PatternLabel,
    Status,
    Merged(usize),
}

/// Output column layout derived from the merged schema
#[derive(Debug, Clone)]
pub struct ProjectionLayout {
    columns: Vec<String>,
    sources: Vec<ColumnSource>,
}

impl ProjectionLayout {
    /// Build the layout for `domain` over the merged columns
    pub fn new(merged: &MergedTable, domain: &str) -> Self {
        let pages_column = format!("{} (pages)", domain);
        let leading: [&str; 10] = [
            KEYWORD_COLUMN,
            CATEGORY_COLUMN,
            PATTERN_LABEL_COLUMN,
            STATUS_COLUMN,
            SEARCH_VOLUME_COLUMN,
            "Keyword Difficulty",
            "CPC",
            "Keyword Intents",
            domain,
            &pages_column,
        ];

        let mut columns = Vec::new();
        let mut sources = Vec::new();
        for name in leading {
            let source = match name {
                CATEGORY_COLUMN => Some(ColumnSource::Category),
                PATTERN_LABEL_COLUMN => Some(ColumnSource::PatternLabel),
                STATUS_COLUMN => Some(ColumnSource::Status),
                other => merged.column_index(other).map(ColumnSource::Merged),
            };
            match source {
                Some(source) => {
                    columns.push(name.to_string());
                    sources.push(source);
                }
                None => debug!(column = name, "Leading column absent from input, skipped"),
            }
        }

        let mut remaining: Vec<(&String, usize)> = merged
            .columns
            .iter()
            .enumerate()
            .filter(|(_, name)| !leading.contains(&name.as_str()))
            .filter(|(_, name)| !DROPPED_COLUMNS.contains(&name.as_str()))
            .map(|(index, name)| (name, index))
            .collect();
        remaining.sort();

        for (name, index) in remaining {
            columns.push(name.clone());
            sources.push(ColumnSource::Merged(index));
        }

        Self { columns, sources }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Render records into a named table
    pub fn project<'a, I>(&self, name: &str, records: I) -> Table
    where
        I: IntoIterator<Item = &'a EnrichedRecord>,
    {
        let mut table = Table::new(name, self.columns.clone());
        for enriched in records {
            let row = self
                .sources
                .iter()
                .map(|source| match source {
                    ColumnSource::Category => Value::String(enriched.category.clone()),
                    ColumnSource::PatternLabel => Value::String(enriched.pattern_label.clone()),
                    ColumnSource::Status => Value::String(enriched.status.as_str().to_string()),
                    ColumnSource::Merged(index) => enriched
                        .record
                        .cells
                        .get(*index)
                        .cloned()
                        .unwrap_or(Value::Null),
                })
                .collect();
            table.push_row(row);
        }
        table
    }
}

/// Order by search volume descending, missing last, then merge order
pub fn sort_by_search_volume(records: &mut [EnrichedRecord]) {
    records.sort_by(|a, b| {
        let by_volume = match (a.record.search_volume, b.record.search_volume) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_volume.then(a.record.ordinal.cmp(&b.record.ordinal))
    });
}

/// Rows exported per position band: the band, a known category, a label
pub fn is_position_export(record: &EnrichedRecord, status: RankStatus) -> bool {
    record.status == status && record.has_known_category() && !record.pattern_label.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeywordRecord;
    use serde_json::json;

    const DOMAIN: &str = "example.com";

    fn merged(columns: &[&str]) -> MergedTable {
        MergedTable {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn enriched(ordinal: usize, volume: Option<f64>, cells: Vec<Value>) -> EnrichedRecord {
        EnrichedRecord {
            record: KeywordRecord {
                ordinal,
                source: "a.csv".to_string(),
                keyword: format!("kw{ordinal}"),
                rank: Some(1.0),
                search_volume: volume,
                cells,
            },
            category: "Shop".to_string(),
            pattern_label: "non brand".to_string(),
            status: RankStatus::Top3,
        }
    }

    #[test]
    fn test_layout_leading_then_sorted_remaining() {
        let table = merged(&[
            "Zeta",
            DOMAIN,
            "Keyword",
            "Competition",
            "Search Volume",
            "Alpha",
            "example.com (pages)",
            "Results",
            "CPC",
            SOURCE_COLUMN,
        ]);
        let layout = ProjectionLayout::new(&table, DOMAIN);
        assert_eq!(
            layout.columns(),
            &[
                "Keyword",
                "Category",
                "Pattern Label",
                "Status",
                "Search Volume",
                "CPC",
                DOMAIN,
                "example.com (pages)",
                "Alpha",
                "Zeta",
            ]
        );
    }

    #[test]
    fn test_layout_full_leading_order() {
        let table = merged(&[
            "Trend",
            "Keyword Intents",
            "example.com (pages)",
            DOMAIN,
            "CPC",
            "Keyword Difficulty",
            "Search Volume",
            "Keyword",
            "Results",
        ]);
        let layout = ProjectionLayout::new(&table, DOMAIN);
        assert_eq!(
            layout.columns(),
            &[
                "Keyword",
                "Category",
                "Pattern Label",
                "Status",
                "Search Volume",
                "Keyword Difficulty",
                "CPC",
                "Keyword Intents",
                DOMAIN,
                "example.com (pages)",
                "Trend",
            ]
        );
    }

    #[test]
    fn test_source_category_column_is_replaced() {
        let table = merged(&["Keyword", "Category", "Search Volume", DOMAIN]);
        let layout = ProjectionLayout::new(&table, DOMAIN);
        let categories = layout.columns().iter().filter(|c| *c == "Category").count();
        assert_eq!(categories, 1);

        let record = enriched(0, Some(1.0), vec![json!("kw"), json!("stale"), json!("1"), json!(2)]);
        let projected = layout.project("overall", [&record]);
        assert_eq!(projected.cell(0, "Category"), Some(&json!("Shop")));
        assert_eq!(projected.cell(0, DOMAIN), Some(&json!(2)));
    }

    #[test]
    fn test_sort_by_volume_descending_stable() {
        let mut records = vec![
            enriched(0, Some(10.0), vec![]),
            enriched(1, None, vec![]),
            enriched(2, Some(50.0), vec![]),
            enriched(3, Some(10.0), vec![]),
        ];
        // Scramble so the tie-break has to come from the ordinal
        records.swap(0, 3);
        sort_by_search_volume(&mut records);
        let order: Vec<_> = records.iter().map(|r| r.record.ordinal).collect();
        assert_eq!(order, vec![2, 0, 3, 1]);
    }

    #[test]
    fn test_position_export_filter() {
        let mut record = enriched(0, Some(1.0), vec![]);
        record.status = RankStatus::Top10;
        assert!(is_position_export(&record, RankStatus::Top10));
        assert!(!is_position_export(&record, RankStatus::Top30));

        record.category = "Other".to_string();
        assert!(!is_position_export(&record, RankStatus::Top10));
    }
}
