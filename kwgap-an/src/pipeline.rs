//! Keyword gap analysis pipeline
//!
//! Single entry point for one run. All inputs are already in memory; every
//! stage hands a new structure to the next one and nothing is emitted unless
//! every stage succeeded.

use kwgap_common::{AnalysisConfig, Error, Result, Table};
use serde::Serialize;
use tracing::info;

use crate::models::{CoercionWarning, EnrichedRecord};
use crate::services::aggregator::summarize;
use crate::services::projector::{is_position_export, sort_by_search_volume, ProjectionLayout};
use crate::services::{bucket, categorize, deduplicate, label_keyword, merge_tables, RankStatus};

pub const OVERALL: &str = "overall";
pub const POSITIONS_4_TO_10: &str = "pos4to10";
pub const POSITIONS_11_TO_30: &str = "pos11to30";

/// Output of one analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Full enriched table
    pub overall: Table,
    /// Status 4-10 rows with a known category
    pub pos4to10: Table,
    /// Status 11-30 rows with a known category
    pub pos11to30: Table,
    pub summary_by_status_category_keyword_pattern: Table,
    pub summary_by_status: Table,
    pub summary_by_category: Table,
    /// Non-numeric rank/volume cells treated as missing
    pub warnings: Vec<CoercionWarning>,
}

impl AnalysisReport {
    /// Output tables in emission order; each table's `name` is its artifact name
    pub fn tables(&self) -> [&Table; 6] {
        [
            &self.overall,
            &self.pos4to10,
            &self.pos11to30,
            &self.summary_by_status_category_keyword_pattern,
            &self.summary_by_status,
            &self.summary_by_category,
        ]
    }
}

/// Run the pipeline over parsed source tables
///
/// # Errors
/// `Error::Schema` when a required column is absent.
pub fn run(config: &AnalysisConfig, tables: &[Table]) -> Result<AnalysisReport> {
    info!(
        "Analyzing {} tables for domain '{}'",
        tables.len(),
        config.domain()
    );

    let merged = merge_tables(tables, config.domain())?;
    let deduped = deduplicate(merged);

    let pages_column = config.pages_column();
    let pages_index = deduped
        .column_index(&pages_column)
        .ok_or_else(|| Error::missing_column(pages_column.as_str()))?;

    let layout = ProjectionLayout::new(&deduped, config.domain());
    let warnings = deduped.warnings;

    let mut enriched: Vec<EnrichedRecord> = deduped
        .records
        .into_iter()
        .map(|record| {
            let category = categorize(record.text(pages_index), config.categories());
            let pattern_label = label_keyword(&record.keyword, config.patterns());
            let status = bucket(record.rank);
            EnrichedRecord {
                record,
                category,
                pattern_label,
                status,
            }
        })
        .collect();

    sort_by_search_volume(&mut enriched);

    let overall = layout.project(OVERALL, &enriched);
    let pos4to10 = layout.project(
        POSITIONS_4_TO_10,
        enriched.iter().filter(|r| is_position_export(r, RankStatus::Top10)),
    );
    let pos11to30 = layout.project(
        POSITIONS_11_TO_30,
        enriched.iter().filter(|r| is_position_export(r, RankStatus::Top30)),
    );

    let summaries = summarize(&enriched);

    info!(
        "Analysis complete: {} keywords, {} in 4-10, {} in 11-30",
        overall.len(),
        pos4to10.len(),
        pos11to30.len()
    );

    Ok(AnalysisReport {
        overall,
        pos4to10,
        pos11to30,
        summary_by_status_category_keyword_pattern: summaries.by_status_category_pattern,
        summary_by_status: summaries.by_status,
        summary_by_category: summaries.by_category,
        warnings,
    })
}
