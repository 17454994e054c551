//! CSV reading and writing
//!
//! Input exports are read with headers; empty cells become null and every
//! other cell is kept as text. Outputs are written one file per table, each
//! through a temp file renamed into place.

use kwgap_common::Table;
use serde_json::Value;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::AnalyzerResult;
use crate::pipeline::AnalysisReport;

const BOM: char = '\u{feff}';

/// Read one CSV export; the table is named after the file
pub fn read_table(path: &Path) -> AnalyzerResult<Table> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, header)| {
            if i == 0 {
                header.trim_start_matches(BOM).to_string()
            } else {
                header.to_string()
            }
        })
        .collect();

    let mut table = Table::new(name, columns);
    for record in reader.records() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    Value::Null
                } else {
                    Value::String(field.to_string())
                }
            })
            .collect();
        table.push_row(row);
    }

    debug!(
        table = %table.name,
        rows = table.len(),
        columns = table.columns.len(),
        "Read CSV export"
    );
    Ok(table)
}

/// Read several exports in the given order
pub fn read_tables<P: AsRef<Path>>(paths: &[P]) -> AnalyzerResult<Vec<Table>> {
    paths.iter().map(|p| read_table(p.as_ref())).collect()
}

/// Text written for a cell
pub fn render_cell(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Write a table as CSV, atomically
///
/// On failure the temp file is removed and `path` is left untouched.
pub fn write_table(table: &Table, path: &Path) -> AnalyzerResult<()> {
    let temp_path = path.with_extension("csv.tmp");
    let result = write_records(table, &temp_path)
        .and_then(|()| std::fs::rename(&temp_path, path).map_err(Into::into));
    if let Err(e) = &result {
        warn!("Writing {} failed: {}", path.display(), e);
        if let Err(cleanup) = std::fs::remove_file(&temp_path) {
            debug!("Temp file {} not removed: {}", temp_path.display(), cleanup);
        }
    }
    result
}

fn write_records(table: &Table, path: &Path) -> AnalyzerResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new().from_writer(file);
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(render_cell))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write every report table to `<dir>/<name>.csv`
///
/// Returns the written paths in emission order.
pub fn write_report(report: &AnalysisReport, dir: &Path) -> AnalyzerResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;

    let mut written = Vec::new();
    for table in report.tables() {
        let path = dir.join(format!("{}.csv", table.name));
        write_table(table, &path)?;
        info!("Wrote {} rows to {}", table.len(), path.display());
        written.push(path);
    }
    Ok(written)
}
