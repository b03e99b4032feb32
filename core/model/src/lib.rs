//! FILENAME: core/model/src/lib.rs
//! PURPOSE: Shared types for the crosstab engine and its collaborators.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod cell;
pub mod dataset;
pub mod style;

// Re-export commonly used types at the crate root
pub use cell::{CellValue, MISSING_LABEL};
pub use dataset::{Dataset, RowIndex, SourceRow};
pub use style::Color;
