//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Definition - The serializable configuration.
//!
//! This module contains all the types needed to DESCRIBE a crosstab.
//! These structures are designed to be:
//! - Serializable (so hosts can persist or ship them as JSON)
//! - Passed explicitly into the engine (no ambient UI state)
//! - Immutable snapshots of user intent

use serde::{Deserialize, Serialize};
use model::Dataset;

use crate::cache::IndexFields;
use crate::error::{PivotError, Result};

/// Label of the synthetic column used when no column field is configured.
pub const TOTAL_COLUMN_LABEL: &str = "Total";

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation functions for the value field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationType {
    Sum,
    Average,
    Count,
    Max,
    Min,
}

impl AggregationType {
    pub const ALL: [AggregationType; 5] = [
        AggregationType::Sum,
        AggregationType::Average,
        AggregationType::Count,
        AggregationType::Max,
        AggregationType::Min,
    ];

    /// The reducer applied over row totals to form the grand total.
    /// Counts are summed; every other kind reapplies itself.
    pub fn grand_total_reducer(self) -> AggregationType {
        match self {
            AggregationType::Count => AggregationType::Sum,
            other => other,
        }
    }

    /// Short label used in headers ("Sum of Sales").
    pub fn label(self) -> &'static str {
        match self {
            AggregationType::Sum => "Sum",
            AggregationType::Average => "Average",
            AggregationType::Count => "Count",
            AggregationType::Max => "Max",
            AggregationType::Min => "Min",
        }
    }
}

impl Default for AggregationType {
    fn default() -> Self {
        AggregationType::Sum
    }
}

// ============================================================================
// ORDERING AND DISPLAY
// ============================================================================

/// Optional reordering of row keys by their row total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TotalSort {
    None,
    Ascending,
    Descending,
}

impl Default for TotalSort {
    fn default() -> Self {
        TotalSort::None
    }
}

/// How to display calculated values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShowValuesAs {
    Normal,
    PercentOfGrandTotal,
    PercentOfRowTotal,
    PercentOfColumnTotal,
}

impl ShowValuesAs {
    pub fn is_percentage(self) -> bool {
        !matches!(self, ShowValuesAs::Normal)
    }
}

impl Default for ShowValuesAs {
    fn default() -> Self {
        ShowValuesAs::Normal
    }
}

// ============================================================================
// MAIN CONFIGURATION STRUCT
// ============================================================================

/// The complete, serializable configuration of one crosstab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotConfiguration {
    /// Field whose values become row headers.
    pub row_field: String,

    /// Field whose values become column headers.
    /// None (or blank) yields a single synthetic "Total" column.
    #[serde(default)]
    pub col_field: Option<String>,

    /// Numeric field summarized into each cell.
    pub value_field: String,

    #[serde(default)]
    pub aggregation: AggregationType,

    #[serde(default)]
    pub sort_by_total: TotalSort,
}

impl PivotConfiguration {
    /// Creates a configuration with no column field, Sum and no sorting.
    pub fn new(row_field: impl Into<String>, value_field: impl Into<String>) -> Self {
        PivotConfiguration {
            row_field: row_field.into(),
            col_field: None,
            value_field: value_field.into(),
            aggregation: AggregationType::Sum,
            sort_by_total: TotalSort::None,
        }
    }

    pub fn with_column(mut self, col_field: impl Into<String>) -> Self {
        self.col_field = Some(col_field.into());
        self
    }

    pub fn with_aggregation(mut self, aggregation: AggregationType) -> Self {
        self.aggregation = aggregation;
        self
    }

    pub fn with_sort(mut self, sort_by_total: TotalSort) -> Self {
        self.sort_by_total = sort_by_total;
        self
    }

    /// The configured column field, treating blank names as unset.
    pub fn column_field(&self) -> Option<&str> {
        self.col_field
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    /// Header for the value area (e.g., "Sum of Sales").
    pub fn value_caption(&self) -> String {
        format!("{} of {}", self.aggregation.label(), self.value_field)
    }

    /// Checks every referenced field against the dataset's field list.
    /// Checks the configuration against the dataset and resolves each
    /// configured field name to its column position.
    pub fn validate(&self, dataset: &Dataset) -> Result<IndexFields> {
        if self.row_field.trim().is_empty() {
            return Err(PivotError::EmptyRowField);
        }
        if self.value_field.trim().is_empty() {
            return Err(PivotError::EmptyValueField);
        }
        let row = dataset
            .field_index(&self.row_field)
            .ok_or_else(|| PivotError::UnknownRowField(self.row_field.clone()))?;
        let value = dataset
            .field_index(&self.value_field)
            .ok_or_else(|| PivotError::UnknownValueField(self.value_field.clone()))?;
        let col = match self.column_field() {
            Some(name) => Some(
                dataset
                    .field_index(name)
                    .ok_or_else(|| PivotError::UnknownColumnField(name.to_string()))?,
            ),
            None => None,
        };
        Ok(IndexFields { row, col, value })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
