//! FILENAME: core/pivot-engine/src/session.rs
//! Pivot Session - holds the dataset, active configuration and current result.
//!
//! Every reconfiguration runs one full synchronous recomputation and then
//! swaps the current result wholesale. Readers holding the previous
//! `Arc<PivotResult>` keep a consistent snapshot; a rejected configuration
//! leaves the previous result in place.

use std::sync::Arc;

use model::{Dataset, SourceRow};

use crate::definition::{PivotConfiguration, ShowValuesAs};
use crate::display::{display_grid, DisplayGrid};
use crate::drill::{drill_down, source_rows_for, DrillDownResult};
use crate::engine::compute_pivot;
use crate::error::Result;
use crate::heatmap::HeatmapRange;
use crate::view::PivotResult;

pub struct PivotSession {
    dataset: Arc<Dataset>,
    config: PivotConfiguration,
    result: Arc<PivotResult>,
    /// Bumped on every successful recomputation.
    version: u64,
}

impl PivotSession {
    /// Validates and computes the first result.
    pub fn new(dataset: Arc<Dataset>, config: PivotConfiguration) -> Result<Self> {
        let result = Arc::new(compute_pivot(&dataset, &config)?);
        Ok(PivotSession {
            dataset,
            config,
            result,
            version: 1,
        })
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn config(&self) -> &PivotConfiguration {
        &self.config
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// The current result snapshot.
    pub fn result(&self) -> Arc<PivotResult> {
        Arc::clone(&self.result)
    }

    /// Applies a new configuration and recomputes.
    pub fn reconfigure(&mut self, config: PivotConfiguration) -> Result<Arc<PivotResult>> {
        let result = compute_pivot(&self.dataset, &config)?;
        self.config = config;
        Ok(self.swap(result))
    }

    /// Replaces the dataset and recomputes with the active configuration.
    pub fn replace_dataset(&mut self, dataset: Arc<Dataset>) -> Result<Arc<PivotResult>> {
        let result = compute_pivot(&dataset, &self.config)?;
        self.dataset = dataset;
        Ok(self.swap(result))
    }

    fn swap(&mut self, result: PivotResult) -> Arc<PivotResult> {
        self.result = Arc::new(result);
        self.version += 1;
        log::debug!("pivot session now at version {}", self.version);
        Arc::clone(&self.result)
    }

    /// Display values plus the heatmap range for `mode`.
    pub fn display(&self, mode: ShowValuesAs) -> (DisplayGrid, Option<HeatmapRange>) {
        let grid = display_grid(&self.result, mode);
        let range = HeatmapRange::for_display(grid.values(), mode);
        (grid, range)
    }

    pub fn source_rows(&self, row_key: &str, col_key: &str) -> Vec<&SourceRow> {
        source_rows_for(row_key, col_key, &self.result, &self.dataset)
    }

    pub fn drill_down(&self, row_key: &str, col_key: &str, max_records: usize) -> DrillDownResult {
        drill_down(&self.result, &self.dataset, row_key, col_key, max_records)
    }
}
