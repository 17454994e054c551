//! Table Merger
//!
//! Concatenates the source tables into one `MergedTable`:
//! - rows keep source order, then row order within each source
//! - the column set is the union of all sources in first-seen order, plus
//!   the `File_Name` source tag; cells a source lacks are null
//! - the `<domain>` rank column is coerced to a number in place
//! - search volume is coerced alongside, the cell itself is left verbatim
//!
//! Non-numeric rank and volume cells never fail the run; each one is
//! recorded as a `CoercionWarning` and treated as missing.

use kwgap_common::table::{cell_text, coerce_number, optional_number_cell, Coerced};
use kwgap_common::{Error, Result, Table};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::models::{
    CoercionWarning, KeywordRecord, MergedTable, KEYWORD_COLUMN, SEARCH_VOLUME_COLUMN,
    SOURCE_COLUMN,
};

/// Merge source tables for `domain`
///
/// # Errors
/// `Error::Schema` when a source lacks the `<domain>` column (checked per
/// table before anything is merged) or when no source has `Keyword` or
/// `Search Volume`.
pub fn merge_tables(tables: &[Table], domain: &str) -> Result<MergedTable> {
    for table in tables {
        if !table.has_column(domain) {
            return Err(Error::missing_column_in(domain, &table.name));
        }
    }

    let columns = union_columns(tables);
    for required in [KEYWORD_COLUMN, SEARCH_VOLUME_COLUMN] {
        if !columns.iter().any(|c| c == required) {
            return Err(Error::missing_column(required));
        }
    }

    let mut merged = MergedTable {
        columns,
        records: Vec::with_capacity(tables.iter().map(Table::len).sum()),
        warnings: Vec::new(),
    };

    let rank_index = index_of(&merged.columns, domain)?;
    let source_index = index_of(&merged.columns, SOURCE_COLUMN)?;

    for table in tables {
        // Position of each merged column within this source, if present
        let mapping: Vec<Option<usize>> = merged
            .columns
            .iter()
            .map(|c| table.column_index(c))
            .collect();
        let keyword_at = table.column_index(KEYWORD_COLUMN);
        let volume_at = table.column_index(SEARCH_VOLUME_COLUMN);
        let rank_at = table.column_index(domain);
        let tag_source = !table.has_column(SOURCE_COLUMN);

        for (row_number, row) in table.rows.iter().enumerate() {
            let mut cells: Vec<Value> = mapping
                .iter()
                .map(|at| at.and_then(|i| row.get(i)).cloned().unwrap_or(Value::Null))
                .collect();

            let rank = coerce_cell(
                rank_at.and_then(|i| row.get(i)),
                &table.name,
                row_number + 1,
                domain,
                &mut merged.warnings,
            );
            cells[rank_index] = optional_number_cell(rank);

            let search_volume = coerce_cell(
                volume_at.and_then(|i| row.get(i)),
                &table.name,
                row_number + 1,
                SEARCH_VOLUME_COLUMN,
                &mut merged.warnings,
            );

            if tag_source {
                cells[source_index] = Value::String(table.name.clone());
            }

            let keyword = keyword_at
                .and_then(|i| row.get(i))
                .and_then(cell_text)
                .unwrap_or_default();

            merged.records.push(KeywordRecord {
                ordinal: merged.records.len(),
                source: table.name.clone(),
                keyword,
                rank,
                search_volume,
                cells,
            });
        }

        debug!(source = %table.name, rows = table.len(), "Merged source table");
    }

    if !merged.warnings.is_empty() {
        warn!(
            "{} non-numeric rank/search volume cells treated as missing",
            merged.warnings.len()
        );
    }
    info!(
        "Merged {} rows from {} tables ({} columns)",
        merged.records.len(),
        tables.len(),
        merged.columns.len()
    );

    Ok(merged)
}

/// Union of column names in first-seen order, source tag last
fn union_columns(tables: &[Table]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for table in tables {
        for column in &table.columns {
            if !columns.contains(column) {
                columns.push(column.clone());
            }
        }
    }
    if !columns.iter().any(|c| c == SOURCE_COLUMN) {
        columns.push(SOURCE_COLUMN.to_string());
    }
    columns
}

fn index_of(columns: &[String], column: &str) -> Result<usize> {
    columns
        .iter()
        .position(|c| c == column)
        .ok_or_else(|| Error::missing_column(column))
}

fn coerce_cell(
    cell: Option<&Value>,
    source: &str,
    row: usize,
    column: &str,
    warnings: &mut Vec<CoercionWarning>,
) -> Option<f64> {
    let cell = cell?;
    match coerce_number(cell) {
        Coerced::Number(n) => Some(n),
        Coerced::Empty => None,
        Coerced::Invalid => {
            let value = cell_text(cell).unwrap_or_default();
            debug!(source, row, column, value = %value, "Non-numeric cell treated as missing");
            warnings.push(CoercionWarning {
                source: source.to_string(),
                row,
                column: column.to_string(),
                value,
            });
            None
        }
    }
}
