//! FILENAME: core/pivot-engine/src/engine.rs
//! Pivot Engine - The calculation core that turns a dataset into a grid.
//!
//! This module takes a PivotConfiguration and a Dataset and produces a
//! PivotResult.
//!
//! Algorithm:
//! 1. Validate the configuration against the dataset's field list
//! 2. Build the grouping index (one scan: labels, samples, source rows)
//! 3. Order row and column keys lexicographically
//! 4. Aggregate every (row, column) bucket; empty buckets stay None
//! 5. Derive row/column totals from the aggregated cells, then the grand
//!    total from the row totals
//! 6. Optionally reorder rows by their total

use model::Dataset;

use crate::aggregate::aggregate_iter;
use crate::cache::{GroupingIndex, IndexFields, ValueId};
use crate::definition::{AggregationType, PivotConfiguration, TotalSort};
use crate::error::Result;
use crate::view::{PivotResult, PivotStats, SourceIndices};

// ============================================================================
// PIVOT CALCULATOR
// ============================================================================

/// The main calculation engine for one crosstab pass.
pub struct PivotCalculator<'a> {
    config: &'a PivotConfiguration,
    index: GroupingIndex,

    /// Row ValueIds in display order.
    row_order: Vec<ValueId>,

    /// Column ValueIds in display order.
    col_order: Vec<ValueId>,

    /// Row-major aggregated cells, aligned with row_order x col_order.
    cells: Vec<Option<f64>>,

    /// Row-major contributing source rows, parallel to `cells`.
    sources: Vec<SourceIndices>,

    row_totals: Vec<Option<f64>>,
    col_totals: Vec<Option<f64>>,
}

impl<'a> PivotCalculator<'a> {
    /// Validates the configuration and builds the grouping index.
    pub fn new(config: &'a PivotConfiguration, dataset: &Dataset) -> Result<Self> {
        let fields = resolve_fields(config, dataset)?;
        let index = GroupingIndex::build(dataset, fields);

        Ok(PivotCalculator {
            config,
            index,
            row_order: Vec::new(),
            col_order: Vec::new(),
            cells: Vec::new(),
            sources: Vec::new(),
            row_totals: Vec::new(),
            col_totals: Vec::new(),
        })
    }

    /// Executes the full calculation and returns the result.
    pub fn calculate(mut self) -> PivotResult {
        // Step 1: Order axis keys
        self.row_order = self.index.row_keys.sorted_ids();
        self.col_order = self.index.col_keys.sorted_ids();

        // Step 2: Aggregate every intersection
        self.aggregate_cells();

        // Step 3: Totals from aggregated cells
        self.compute_row_totals();
        self.compute_col_totals();

        // Step 4: Reorder rows by total
        self.apply_total_sort();

        self.finish()
    }

    fn aggregation(&self) -> AggregationType {
        self.config.aggregation
    }

    /// Aggregates each (row, column) bucket in display order.
    fn aggregate_cells(&mut self) {
        let size = self.row_order.len() * self.col_order.len();
        self.cells = Vec::with_capacity(size);
        self.sources = Vec::with_capacity(size);

        for &row in &self.row_order {
            for &col in &self.col_order {
                match self.index.bucket(row, col) {
                    Some(bucket) if bucket.has_samples() => {
                        self.cells.push(aggregate_iter(
                            self.config.aggregation,
                            bucket.samples.iter().copied(),
                        ));
                        self.sources.push(bucket.source_rows.clone());
                    }
                    _ => {
                        self.cells.push(None);
                        self.sources.push(SourceIndices::new());
                    }
                }
            }
        }
    }

    /// Row total = aggregation reapplied over the row's non-null cells.
    fn compute_row_totals(&mut self) {
        let width = self.col_order.len();
        let aggregation = self.aggregation();
        self.row_totals = (0..self.row_order.len())
            .map(|r| {
                let row = &self.cells[r * width..(r + 1) * width];
                aggregate_iter(aggregation, row.iter().filter_map(|v| *v))
            })
            .collect();
    }

    /// Column total = aggregation reapplied over the column's non-null cells.
    fn compute_col_totals(&mut self) {
        let width = self.col_order.len();
        let aggregation = self.aggregation();
        self.col_totals = (0..width)
            .map(|c| {
                let column = self.cells.iter().skip(c).step_by(width.max(1));
                aggregate_iter(aggregation, column.filter_map(|v| *v))
            })
            .collect();
    }

    /// Stable reorder of rows by row total.
    /// Rows without a total sort after every row that has one.
    fn apply_total_sort(&mut self) {
        let descending = match self.config.sort_by_total {
            TotalSort::None => return,
            TotalSort::Ascending => false,
            TotalSort::Descending => true,
        };

        let mut permutation: Vec<usize> = (0..self.row_order.len()).collect();
        permutation.sort_by(|&a, &b| {
            use std::cmp::Ordering;
            match (self.row_totals[a], self.row_totals[b]) {
                (Some(ta), Some(tb)) => {
                    let ord = ta.partial_cmp(&tb).unwrap_or(Ordering::Equal);
                    if descending { ord.reverse() } else { ord }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });

        let width = self.col_order.len();
        let mut cells = Vec::with_capacity(self.cells.len());
        let mut sources = Vec::with_capacity(self.sources.len());
        for &r in &permutation {
            cells.extend_from_slice(&self.cells[r * width..(r + 1) * width]);
            sources.extend(self.sources[r * width..(r + 1) * width].iter().cloned());
        }

        self.row_order = permutation.iter().map(|&r| self.row_order[r]).collect();
        self.row_totals = permutation.iter().map(|&r| self.row_totals[r]).collect();
        self.cells = cells;
        self.sources = sources;
    }

    /// Grand total = aggregate-of-aggregates over the row totals.
    fn grand_total(&self) -> Option<f64> {
        aggregate_iter(
            self.aggregation().grand_total_reducer(),
            self.row_totals.iter().filter_map(|v| *v),
        )
    }

    fn finish(self) -> PivotResult {
        let grand_total = self.grand_total();
        let labels = |keys: &crate::cache::KeyInterner, order: &[ValueId]| -> Vec<String> {
            order
                .iter()
                .map(|&id| keys.get(id).unwrap_or_default().to_string())
                .collect()
        };
        let row_keys = labels(&self.index.row_keys, &self.row_order);
        let col_keys = labels(&self.index.col_keys, &self.col_order);

        let stats = PivotStats {
            source_rows: self.index.stats.total_records,
            contributing_rows: self.index.stats.sample_count,
            buckets: self.index.stats.bucket_count,
        };

        log::debug!(
            "pivot computed: {} rows x {} cols, {}/{} rows contributed ({:?} of {})",
            row_keys.len(),
            col_keys.len(),
            stats.contributing_rows,
            stats.source_rows,
            self.config.aggregation,
            self.config.value_field,
        );

        PivotResult::new(
            self.config.aggregation,
            row_keys,
            col_keys,
            self.cells,
            self.sources,
            self.row_totals,
            self.col_totals,
            grand_total,
            stats,
        )
    }
}

/// Validates the configuration and maps field names to column positions.
fn resolve_fields(config: &PivotConfiguration, dataset: &Dataset) -> Result<IndexFields> {
    config.validate(dataset).map_err(|err| {
        log::warn!("rejected pivot configuration: {}", err);
        err
    })
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Computes a crosstab from a dataset and configuration.
/// This is the main entry point for the calculation engine.
pub fn compute_pivot(dataset: &Dataset, config: &PivotConfiguration) -> Result<PivotResult> {
    Ok(PivotCalculator::new(config, dataset)?.calculate())
}
