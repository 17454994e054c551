//! Row records flowing between pipeline stages

use serde::Serialize;
use serde_json::Value;

use crate::services::rank_bucketer::RankStatus;

/// Required keyword column
pub const KEYWORD_COLUMN: &str = "Keyword";
/// Required search volume column
pub const SEARCH_VOLUME_COLUMN: &str = "Search Volume";
/// Source file tag added by the merger
pub const SOURCE_COLUMN: &str = "File_Name";

pub const CATEGORY_COLUMN: &str = "Category";
pub const PATTERN_LABEL_COLUMN: &str = "Pattern Label";
pub const STATUS_COLUMN: &str = "Status";

/// Category fallback for unmatched or absent URLs
pub const OTHER_CATEGORY: &str = "Other";
/// Pattern label fallback
pub const NON_BRAND_LABEL: &str = "non brand";

/// One keyword observation from a source table
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRecord {
    /// Position in merge order (source order, then row order)
    pub ordinal: usize,
    /// Name of the source table
    pub source: String,
    pub keyword: String,
    /// Coerced `<domain>` rank
    pub rank: Option<f64>,
    /// Coerced search volume
    pub search_volume: Option<f64>,
    /// Cells aligned with `MergedTable::columns`
    pub cells: Vec<Value>,
}

impl KeywordRecord {
    /// Text of the cell at `index`, `None` for null or out of range
    pub fn text(&self, index: usize) -> Option<&str> {
        match self.cells.get(index)? {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// A cell that could not be read as a number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoercionWarning {
    pub source: String,
    /// 1-based data row within the source table
    pub row: usize,
    pub column: String,
    pub value: String,
}

/// Union of all source tables
#[derive(Debug, Clone, Default)]
pub struct MergedTable {
    pub columns: Vec<String>,
    pub records: Vec<KeywordRecord>,
    pub warnings: Vec<CoercionWarning>,
}

impl MergedTable {
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

/// A deduplicated record with its classification
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub record: KeywordRecord,
    pub category: String,
    pub pattern_label: String,
    pub status: RankStatus,
}

impl EnrichedRecord {
    /// Rows with an "Other" category carry no signal for summaries
    pub fn has_known_category(&self) -> bool {
        self.category != OTHER_CATEGORY
    }
}
