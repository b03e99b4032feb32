//! FILENAME: core/pivot-engine/src/view.rs
//! Pivot Result - the aggregated grid produced by one computation.
//!
//! A result is owned by exactly one computation and is superseded wholesale
//! on reconfiguration; nothing here mutates after construction.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use model::RowIndex;

use crate::definition::AggregationType;
use crate::error::PivotError;

/// Contributing source rows of one cell.
pub type SourceIndices = SmallVec<[RowIndex; 4]>;

/// Statistics about the computation that produced a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotStats {
    /// Rows in the source dataset.
    pub source_rows: usize,
    /// Rows that contributed a numeric sample.
    pub contributing_rows: usize,
    /// Distinct (row, column) keys observed.
    pub buckets: usize,
}

/// The aggregated grid plus its totals and drill-down index.
/// Deserialization checks the grid shape and rebuilds the key lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPivotResult")]
pub struct PivotResult {
    /// The aggregation that produced every value in this result.
    pub aggregation: AggregationType,

    /// Row headers in display order.
    pub row_keys: Vec<String>,

    /// Column headers in display order.
    pub col_keys: Vec<String>,

    /// Row-major cell values (row_keys.len() x col_keys.len()).
    cells: Vec<Option<f64>>,

    row_totals: Vec<Option<f64>>,
    col_totals: Vec<Option<f64>>,
    grand_total: Option<f64>,

    /// Row-major source row indices, parallel to `cells`.
    source_rows: Vec<SourceIndices>,

    #[serde(skip)]
    row_lookup: FxHashMap<String, usize>,
    #[serde(skip)]
    col_lookup: FxHashMap<String, usize>,

    pub stats: PivotStats,
}

/// Wire form of a PivotResult, before shape checks.
#[derive(Deserialize)]
struct RawPivotResult {
    aggregation: AggregationType,
    row_keys: Vec<String>,
    col_keys: Vec<String>,
    cells: Vec<Option<f64>>,
    row_totals: Vec<Option<f64>>,
    col_totals: Vec<Option<f64>>,
    grand_total: Option<f64>,
    source_rows: Vec<SourceIndices>,
    #[serde(default)]
    stats: PivotStats,
}

fn build_lookup(keys: &[String], axis: &str) -> Result<FxHashMap<String, usize>, PivotError> {
    let mut lookup = FxHashMap::default();
    for (i, key) in keys.iter().enumerate() {
        if lookup.insert(key.clone(), i).is_some() {
            return Err(PivotError::MalformedResult(format!(
                "duplicate {} key {:?}",
                axis, key
            )));
        }
    }
    Ok(lookup)
}

impl TryFrom<RawPivotResult> for PivotResult {
    type Error = PivotError;

    fn try_from(raw: RawPivotResult) -> Result<Self, Self::Error> {
        let expected = raw.row_keys.len() * raw.col_keys.len();
        let check = |what: &str, len: usize, want: usize| {
            if len == want {
                Ok(())
            } else {
                Err(PivotError::MalformedResult(format!(
                    "{} has {} entries, expected {}",
                    what, len, want
                )))
            }
        };
        check("cells", raw.cells.len(), expected)?;
        check("source_rows", raw.source_rows.len(), expected)?;
        check("row_totals", raw.row_totals.len(), raw.row_keys.len())?;
        check("col_totals", raw.col_totals.len(), raw.col_keys.len())?;

        let row_lookup = build_lookup(&raw.row_keys, "row")?;
        let col_lookup = build_lookup(&raw.col_keys, "column")?;

        Ok(PivotResult {
            aggregation: raw.aggregation,
            row_keys: raw.row_keys,
            col_keys: raw.col_keys,
            cells: raw.cells,
            row_totals: raw.row_totals,
            col_totals: raw.col_totals,
            grand_total: raw.grand_total,
            source_rows: raw.source_rows,
            row_lookup,
            col_lookup,
            stats: raw.stats,
        })
    }
}

impl PivotResult {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        aggregation: AggregationType,
        row_keys: Vec<String>,
        col_keys: Vec<String>,
        cells: Vec<Option<f64>>,
        source_rows: Vec<SourceIndices>,
        row_totals: Vec<Option<f64>>,
        col_totals: Vec<Option<f64>>,
        grand_total: Option<f64>,
        stats: PivotStats,
    ) -> Self {
        debug_assert_eq!(cells.len(), row_keys.len() * col_keys.len());
        debug_assert_eq!(source_rows.len(), cells.len());

        let row_lookup = row_keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i))
            .collect();
        let col_lookup = col_keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i))
            .collect();

        PivotResult {
            aggregation,
            row_keys,
            col_keys,
            cells,
            row_totals,
            col_totals,
            grand_total,
            source_rows,
            row_lookup,
            col_lookup,
            stats,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_keys.len()
    }

    pub fn col_count(&self) -> usize {
        self.col_keys.len()
    }

    pub fn row_index(&self, row_key: &str) -> Option<usize> {
        self.row_lookup.get(row_key).copied()
    }

    pub fn col_index(&self, col_key: &str) -> Option<usize> {
        self.col_lookup.get(col_key).copied()
    }

    fn offset(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.row_keys.len() && col < self.col_keys.len() {
            Some(row * self.col_keys.len() + col)
        } else {
            None
        }
    }

    // ------------------------------------------------------------------------
    // Lookups by position
    // ------------------------------------------------------------------------

    pub fn cell_at(&self, row: usize, col: usize) -> Option<f64> {
        self.offset(row, col)
            .and_then(|i| self.cells.get(i).copied().flatten())
    }

    pub fn row_total_at(&self, row: usize) -> Option<f64> {
        self.row_totals.get(row).copied().flatten()
    }

    pub fn col_total_at(&self, col: usize) -> Option<f64> {
        self.col_totals.get(col).copied().flatten()
    }

    pub fn source_indices_at(&self, row: usize, col: usize) -> &[RowIndex] {
        match self.offset(row, col).and_then(|i| self.source_rows.get(i)) {
            Some(rows) => rows.as_slice(),
            None => &[],
        }
    }

    // ------------------------------------------------------------------------
    // Lookups by key
    // ------------------------------------------------------------------------

    /// The aggregated value of a cell; None when no sample contributed.
    pub fn cell(&self, row_key: &str, col_key: &str) -> Option<f64> {
        let row = self.row_index(row_key)?;
        let col = self.col_index(col_key)?;
        self.cell_at(row, col)
    }

    pub fn row_total(&self, row_key: &str) -> Option<f64> {
        self.row_index(row_key).and_then(|r| self.row_total_at(r))
    }

    pub fn col_total(&self, col_key: &str) -> Option<f64> {
        self.col_index(col_key).and_then(|c| self.col_total_at(c))
    }

    pub fn grand_total(&self) -> Option<f64> {
        self.grand_total
    }

    /// Source rows that contributed to a cell; empty for unknown keys.
    pub fn cell_source_indices(&self, row_key: &str, col_key: &str) -> &[RowIndex] {
        match (self.row_index(row_key), self.col_index(col_key)) {
            (Some(row), Some(col)) => self.source_indices_at(row, col),
            _ => &[],
        }
    }

    // ------------------------------------------------------------------------
    // Whole-grid helpers
    // ------------------------------------------------------------------------

    /// One row of cell values, in column order.
    pub fn row_cells(&self, row: usize) -> &[Option<f64>] {
        if row >= self.row_keys.len() {
            return &[];
        }
        let width = self.col_keys.len();
        self.cells.get(row * width..(row + 1) * width).unwrap_or(&[])
    }

    /// Every non-null cell value in row-major order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().filter_map(|v| *v)
    }

    /// True when no cell holds a value (the "no data" result).
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Observed (min, max) over non-null cells.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values().fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_result() -> PivotResult {
        PivotResult::new(
            AggregationType::Sum,
            vec!["a".to_string(), "b".to_string()],
            vec!["x".to_string(), "y".to_string()],
            vec![Some(-4.0), None, Some(9.0), Some(0.5)],
            vec![
                SmallVec::from_slice(&[0]),
                SourceIndices::new(),
                SmallVec::from_slice(&[1, 2]),
                SmallVec::from_slice(&[3]),
            ],
            vec![Some(-4.0), Some(9.5)],
            vec![Some(5.0), Some(0.5)],
            Some(5.5),
            PivotStats::default(),
        )
    }

    #[test]
    fn test_value_range_mixed_signs() {
        let result = create_test_result();
        assert_eq!(result.value_range(), Some((-4.0, 9.0)));
    }

    #[test]
    fn test_value_range_all_null() {
        let result = PivotResult::new(
            AggregationType::Average,
            vec!["a".to_string()],
            vec!["Total".to_string()],
            vec![None],
            vec![SourceIndices::new()],
            vec![None],
            vec![None],
            None,
            PivotStats::default(),
        );
        assert!(result.is_empty());
        assert_eq!(result.value_range(), None);
    }

    #[test]
    fn test_json_round_trip_rebuilds_lookups() {
        let result = create_test_result();
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("row_lookup"));

        let back: PivotResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
        assert_eq!(back.cell("b", "x"), Some(9.0));
        assert_eq!(back.cell_source_indices("b", "x"), &[1, 2]);
    }

    #[test]
    fn test_json_with_wrong_cell_count_is_rejected() {
        let json = serde_json::to_string(&create_test_result()).unwrap();
        let broken = json.replace("\"cells\":[-4.0,null,9.0,0.5]", "\"cells\":[]");
        assert_ne!(broken, json);

        let err = serde_json::from_str::<PivotResult>(&broken).unwrap_err();
        assert!(err.to_string().contains("cells has 0 entries, expected 4"));
    }

    #[test]
    fn test_json_with_duplicate_keys_is_rejected() {
        let json = serde_json::to_string(&create_test_result()).unwrap();
        let broken = json.replace("\"row_keys\":[\"a\",\"b\"]", "\"row_keys\":[\"a\",\"a\"]");
        assert_ne!(broken, json);
        assert!(serde_json::from_str::<PivotResult>(&broken).is_err());
    }
}
