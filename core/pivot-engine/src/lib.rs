//! FILENAME: core/pivot-engine/src/lib.rs
//! Crosstab (pivot) engine.
//!
//! This crate turns a flat dataset into a two-dimensional summary grid. It
//! depends on `model` only for shared types (CellValue, Dataset, Color).
//!
//! Layers:
//! - `definition`: Serializable configuration (what the crosstab IS)
//! - `aggregate`: Reduction of numeric samples per aggregation kind
//! - `cache`: Per-pass grouping index (HOW we group)
//! - `engine`: Calculation engine (HOW we calculate)
//! - `view`: The aggregated grid and totals (WHAT we computed)
//! - `display`: Percentage re-expression of computed values
//! - `heatmap`: Gradient colors and text contrast
//! - `drill`: Source rows behind a cell
//! - `session`: Current-result holder for hosts

pub mod aggregate;
pub mod cache;
pub mod definition;
pub mod display;
pub mod drill;
pub mod engine;
pub mod error;
pub mod heatmap;
pub mod session;
pub mod view;

pub use aggregate::{aggregate, AggregateAccumulator};
pub use definition::*;
pub use display::{display_grid, percent_of, to_display_value, DisplayGrid};
pub use drill::{drill_down, source_rows_for, DrillDownResult, DEFAULT_MAX_RECORDS};
pub use engine::{compute_pivot, PivotCalculator};
pub use error::{PivotError, Result};
pub use heatmap::{
    color_for, contrast_text_color, contrast_text_color_hex, CellPaint, ColorScheme,
    ContrastPreset, GradientStops, HeatmapOptions, HeatmapRange,
};
pub use session::PivotSession;
pub use view::{PivotResult, PivotStats, SourceIndices};
