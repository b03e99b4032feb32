//! FILENAME: core/pivot-engine/src/drill.rs
//! Drill-down Resolver - source rows behind one summary cell.
//!
//! Lookups read the retained index of a PivotResult and never modify it.
//! A cell with no contributors resolves to an empty list, not an error.

use serde::{Deserialize, Serialize};
use model::{Dataset, RowIndex, SourceRow};

use crate::view::PivotResult;

/// Default cap on returned row indices for `drill_down`.
pub const DEFAULT_MAX_RECORDS: usize = 1000;

/// The source rows that contributed to a cell.
/// Indices that no longer resolve against `dataset` are skipped.
pub fn source_rows_for<'d>(
    row_key: &str,
    col_key: &str,
    result: &PivotResult,
    dataset: &'d Dataset,
) -> Vec<&'d SourceRow> {
    result
        .cell_source_indices(row_key, col_key)
        .iter()
        .filter_map(|&idx| {
            let row = dataset.row(idx);
            if row.is_none() {
                log::warn!(
                    "drill-down index {} out of range for dataset of {} rows",
                    idx,
                    dataset.row_count()
                );
            }
            row
        })
        .collect()
}

/// Drill-down detail for a detail-view collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillDownResult {
    pub row_key: String,
    pub col_key: String,

    /// Column headers from the source data.
    pub headers: Vec<String>,

    /// The detail records (source row indices).
    pub source_rows: Vec<RowIndex>,

    /// Total count of contributing records.
    pub total_count: usize,

    /// Whether `source_rows` was cut at `max_records`.
    pub is_truncated: bool,

    /// Maximum records that were fetched.
    pub max_records: usize,
}

impl DrillDownResult {
    pub fn new(row_key: &str, col_key: &str) -> Self {
        DrillDownResult {
            row_key: row_key.to_string(),
            col_key: col_key.to_string(),
            headers: Vec::new(),
            source_rows: Vec::new(),
            total_count: 0,
            is_truncated: false,
            max_records: DEFAULT_MAX_RECORDS,
        }
    }

    /// Resolves the fetched indices against the dataset.
    pub fn rows<'d>(&self, dataset: &'d Dataset) -> Vec<&'d SourceRow> {
        self.source_rows
            .iter()
            .filter_map(|&idx| dataset.row(idx))
            .collect()
    }
}

/// Performs a drill-down operation to get source records for a cell.
pub fn drill_down(
    result: &PivotResult,
    dataset: &Dataset,
    row_key: &str,
    col_key: &str,
    max_records: usize,
) -> DrillDownResult {
    let mut drill = DrillDownResult::new(row_key, col_key);
    drill.max_records = max_records;
    drill.headers = dataset.fields.clone();

    let indices = result.cell_source_indices(row_key, col_key);
    drill.total_count = indices.len();
    drill.is_truncated = indices.len() > max_records;
    drill.source_rows = indices.iter().take(max_records).copied().collect();
    drill
}
