//! Aggregator
//!
//! Summarizes rows with a known category (the "Other" fallback is excluded)
//! into three tables:
//! 1. by (Status, Category, Pattern Label), percentages within each category
//! 2. by Status, percentages of the grand total
//! 3. by Category, percentages of the grand total, largest count first
//!
//! Percentages are 0-100. Missing search volume contributes 0 to sums.

use kwgap_common::table::number_cell;
use kwgap_common::Table;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::info;

use crate::models::{EnrichedRecord, CATEGORY_COLUMN, PATTERN_LABEL_COLUMN, STATUS_COLUMN};
use crate::services::rank_bucketer::RankStatus;

pub const SUMMARY_BY_STATUS_CATEGORY_PATTERN: &str = "summary_by_status_category_keyword_pattern";
pub const SUMMARY_BY_STATUS: &str = "summary_by_status";
pub const SUMMARY_BY_CATEGORY: &str = "summary_by_category";

const KEYWORD_COUNT: &str = "keyword_count";
const SEARCH_VOLUME_SUM: &str = "search_volume_sum";
const PCT_OF_CATEGORY: &str = "% of category";
const PCT_OF_STATUS: &str = "% of status";
const PCT_OF_SEARCH_VOLUME: &str = "% of search volume";

/// Keyword count and search volume sum of one group
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Totals {
    count: u64,
    volume: f64,
}

impl Totals {
    fn add(&mut self, record: &EnrichedRecord) {
        self.count += 1;
        self.volume += record.record.search_volume.unwrap_or(0.0);
    }

    fn merge(&mut self, other: &Totals) {
        self.count += other.count;
        self.volume += other.volume;
    }
}

/// The three summary tables
#[derive(Debug, Clone)]
pub struct Summaries {
    pub by_status_category_pattern: Table,
    pub by_status: Table,
    pub by_category: Table,
}

/// Aggregate enriched records
pub fn summarize(records: &[EnrichedRecord]) -> Summaries {
    let filtered: Vec<&EnrichedRecord> = records.iter().filter(|r| r.has_known_category()).collect();
    info!(
        "Summarizing {} of {} rows (category Other excluded)",
        filtered.len(),
        records.len()
    );

    Summaries {
        by_status_category_pattern: summarize_by_status_category_pattern(&filtered),
        by_status: summarize_by_status(&filtered),
        by_category: summarize_by_category(&filtered),
    }
}

fn summarize_by_status_category_pattern(records: &[&EnrichedRecord]) -> Table {
    let mut groups: BTreeMap<(RankStatus, &str, &str), Totals> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.status, record.category.as_str(), record.pattern_label.as_str()))
            .or_default()
            .add(record);
    }
    groups.retain(|_, totals| totals.count > 0);

    let mut per_category: BTreeMap<&str, Totals> = BTreeMap::new();
    for ((_, category, _), totals) in &groups {
        per_category.entry(*category).or_default().merge(totals);
    }

    let mut table = Table::new(
        SUMMARY_BY_STATUS_CATEGORY_PATTERN,
        columns(&[
            STATUS_COLUMN,
            CATEGORY_COLUMN,
            PATTERN_LABEL_COLUMN,
            KEYWORD_COUNT,
            PCT_OF_CATEGORY,
            SEARCH_VOLUME_SUM,
            PCT_OF_SEARCH_VOLUME,
        ]),
    );
    for ((status, category, label), totals) in &groups {
        let category_totals = per_category.get(category).copied().unwrap_or_default();
        table.push_row(vec![
            Value::from(status.as_str()),
            Value::from(*category),
            Value::from(*label),
            Value::from(totals.count),
            percent_cell(percent_of(totals.count as f64, category_totals.count as f64)),
            number_cell(totals.volume),
            percent_cell(percent_of(totals.volume, category_totals.volume)),
        ]);
    }
    table
}

fn summarize_by_status(records: &[&EnrichedRecord]) -> Table {
    let mut groups: BTreeMap<RankStatus, Totals> = BTreeMap::new();
    for record in records {
        groups.entry(record.status).or_default().add(record);
    }
    groups.retain(|_, totals| totals.count > 0);
    let grand = grand_total(groups.values());

    let mut table = Table::new(
        SUMMARY_BY_STATUS,
        columns(&[
            STATUS_COLUMN,
            KEYWORD_COUNT,
            PCT_OF_STATUS,
            SEARCH_VOLUME_SUM,
            PCT_OF_SEARCH_VOLUME,
        ]),
    );
    for (status, totals) in &groups {
        table.push_row(vec![
            Value::from(status.as_str()),
            Value::from(totals.count),
            percent_cell(percent_of(totals.count as f64, grand.count as f64)),
            number_cell(totals.volume),
            percent_cell(percent_of(totals.volume, grand.volume)),
        ]);
    }
    table
}

fn summarize_by_category(records: &[&EnrichedRecord]) -> Table {
    let mut groups: BTreeMap<&str, Totals> = BTreeMap::new();
    for record in records {
        groups.entry(record.category.as_str()).or_default().add(record);
    }
    groups.retain(|_, totals| totals.count > 0);
    let grand = grand_total(groups.values());

    // Name order first, then a stable sort on count
    let mut ordered: Vec<(&str, Totals)> = groups.into_iter().collect();
    ordered.sort_by(|a, b| b.1.count.cmp(&a.1.count));

    let mut table = Table::new(
        SUMMARY_BY_CATEGORY,
        columns(&[
            CATEGORY_COLUMN,
            KEYWORD_COUNT,
            PCT_OF_CATEGORY,
            SEARCH_VOLUME_SUM,
            PCT_OF_SEARCH_VOLUME,
        ]),
    );
    for (category, totals) in ordered {
        table.push_row(vec![
            Value::from(category),
            Value::from(totals.count),
            percent_cell(percent_of(totals.count as f64, grand.count as f64)),
            number_cell(totals.volume),
            percent_cell(percent_of(totals.volume, grand.volume)),
        ]);
    }
    table
}

fn grand_total<'a>(groups: impl Iterator<Item = &'a Totals>) -> Totals {
    groups.fold(Totals::default(), |mut acc, totals| {
        acc.merge(totals);
        acc
    })
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// `100 * part / whole`; 0 when the whole is 0
fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        100.0 * part / whole
    }
}

fn percent_cell(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KeywordRecord;
    use serde_json::json;

    fn enriched(
        keyword: &str,
        status: RankStatus,
        category: &str,
        label: &str,
        volume: Option<f64>,
    ) -> EnrichedRecord {
        EnrichedRecord {
            record: KeywordRecord {
                ordinal: 0,
                source: "a.csv".to_string(),
                keyword: keyword.to_string(),
                rank: None,
                search_volume: volume,
                cells: Vec::new(),
            },
            category: category.to_string(),
            pattern_label: label.to_string(),
            status,
        }
    }

    fn sample() -> Vec<EnrichedRecord> {
        vec![
            enriched("a", RankStatus::Top3, "Shop", "Brand", Some(100.0)),
            enriched("b", RankStatus::Top3, "Shop", "non brand", Some(50.0)),
            enriched("c", RankStatus::Top10, "Shop", "non brand", Some(50.0)),
            enriched("d", RankStatus::Top10, "Blog", "non brand", Some(30.0)),
            enriched("e", RankStatus::Missing, "Blog", "non brand", None),
            enriched("f", RankStatus::Top3, "Other", "Brand", Some(999.0)),
        ]
    }

    fn column_f64(table: &Table, column: &str) -> Vec<f64> {
        table
            .column_values(column)
            .unwrap()
            .map(|v| v.as_f64().unwrap())
            .collect()
    }

    #[test]
    fn test_other_category_excluded() {
        let summaries = summarize(&sample());
        let categories: Vec<_> = summaries
            .by_category
            .column_values("Category")
            .unwrap()
            .cloned()
            .collect();
        assert!(!categories.contains(&json!("Other")));
        let total: f64 = column_f64(&summaries.by_status, "keyword_count").iter().sum();
        assert_eq!(total, 5.0);
    }

    #[test]
    fn test_triple_rows_ordered_by_status_then_category() {
        let table = summarize(&sample()).by_status_category_pattern;
        let keys: Vec<(String, String, String)> = table
            .rows
            .iter()
            .map(|r| {
                (
                    r[0].as_str().unwrap().to_string(),
                    r[1].as_str().unwrap().to_string(),
                    r[2].as_str().unwrap().to_string(),
                )
            })
            .collect();
        assert_eq!(
            keys,
            vec![
                ("1-3".into(), "Shop".into(), "Brand".into()),
                ("1-3".into(), "Shop".into(), "non brand".into()),
                ("4-10".into(), "Blog".into(), "non brand".into()),
                ("4-10".into(), "Shop".into(), "non brand".into()),
                ("missing".into(), "Blog".into(), "non brand".into()),
            ]
        );
    }

    #[test]
    fn test_percent_of_zero_whole() {
        assert_eq!(percent_of(1.0, 4.0), 25.0);
        assert_eq!(percent_of(0.0, 0.0), 0.0);
        assert_eq!(percent_of(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_percent_of_category_closes_per_category() {
        let table = summarize(&sample()).by_status_category_pattern;
        let mut per_category: BTreeMap<String, f64> = BTreeMap::new();
        for row in &table.rows {
            *per_category.entry(row[1].as_str().unwrap().to_string()).or_default() +=
                row[4].as_f64().unwrap();
        }
        for (category, total) in per_category {
            assert!((total - 100.0).abs() < 1e-9, "{category}: {total}");
        }
    }

    #[test]
    fn test_percent_of_search_volume_within_category() {
        let table = summarize(&sample()).by_status_category_pattern;
        // Shop volume: 100 + 50 + 50 = 200; (1-3, Shop, Brand) has 100
        assert_eq!(table.rows[0][5], json!(100));
        assert!((table.rows[0][6].as_f64().unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_by_status_percentages_are_global() {
        let table = summarize(&sample()).by_status;
        let statuses: Vec<_> = table.column_values("Status").unwrap().cloned().collect();
        assert_eq!(statuses, vec![json!("1-3"), json!("4-10"), json!("missing")]);
        assert_eq!(column_f64(&table, "keyword_count"), vec![2.0, 2.0, 1.0]);
        let pct = column_f64(&table, "% of status");
        assert!((pct[0] - 40.0).abs() < 1e-9);
        assert!((pct.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        // Volume: 150 + 80 + 0 = 230
        let volume_pct = column_f64(&table, "% of search volume");
        assert!((volume_pct[2]).abs() < 1e-9);
    }

    #[test]
    fn test_by_category_descending_by_count() {
        let table = summarize(&sample()).by_category;
        let categories: Vec<_> = table.column_values("Category").unwrap().cloned().collect();
        assert_eq!(categories, vec![json!("Shop"), json!("Blog")]);
        let pct = column_f64(&table, "% of category");
        assert!((pct.iter().sum::<f64>() - 100.0).abs() < 1e-9);
        assert!((pct[0] - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_count_ties_keep_name_order() {
        let records = vec![
            enriched("a", RankStatus::Top3, "Zoo", "x", Some(1.0)),
            enriched("b", RankStatus::Top3, "Alpha", "x", Some(1.0)),
        ];
        let table = summarize(&records).by_category;
        let categories: Vec<_> = table.column_values("Category").unwrap().cloned().collect();
        assert_eq!(categories, vec![json!("Alpha"), json!("Zoo")]);
    }

    #[test]
    fn test_zero_volume_group_has_zero_percent() {
        let records = vec![enriched("a", RankStatus::Top3, "Shop", "x", None)];
        let table = summarize(&records).by_status;
        assert_eq!(table.rows[0][3], json!(0));
        assert_eq!(table.rows[0][4], json!(0.0));
    }

    #[test]
    fn test_empty_input_yields_empty_tables() {
        let summaries = summarize(&[]);
        assert!(summaries.by_status_category_pattern.is_empty());
        assert!(summaries.by_status.is_empty());
        assert!(summaries.by_category.is_empty());
        assert_eq!(summaries.by_status.columns.len(), 5);
    }
}
