//! FILENAME: core/pivot-engine/src/display.rs
//! Display Transform - re-expresses raw cell values as percentages.
//!
//! Pure functions of a PivotResult; the result itself is never modified.
//! A null or zero denominator yields None, never NaN or infinity. No
//! clamping is applied, so shares above 100 or below 0 pass through.

use serde::{Deserialize, Serialize};

use crate::definition::ShowValuesAs;
use crate::view::PivotResult;

/// `part / whole * 100`, guarded against null and zero denominators.
pub fn percent_of(part: Option<f64>, whole: Option<f64>) -> Option<f64> {
    let part = part?;
    let whole = whole?;
    if whole == 0.0 {
        return None;
    }
    let pct = part / whole * 100.0;
    if pct.is_finite() {
        Some(pct)
    } else {
        None
    }
}

/// Maps a raw cell value to its display value under `mode`.
pub fn to_display_value(
    raw: Option<f64>,
    row_key: &str,
    col_key: &str,
    mode: ShowValuesAs,
    result: &PivotResult,
) -> Option<f64> {
    match mode {
        ShowValuesAs::Normal => raw,
        ShowValuesAs::PercentOfGrandTotal => percent_of(raw, result.grand_total()),
        ShowValuesAs::PercentOfRowTotal => percent_of(raw, result.row_total(row_key)),
        ShowValuesAs::PercentOfColumnTotal => percent_of(raw, result.col_total(col_key)),
    }
}

/// Display values for a whole result: cells plus every total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayGrid {
    pub mode: ShowValuesAs,
    /// Row-major, aligned with the result's row and column keys.
    pub cells: Vec<Vec<Option<f64>>>,
    pub row_totals: Vec<Option<f64>>,
    pub col_totals: Vec<Option<f64>>,
    pub grand_total: Option<f64>,
}

impl DisplayGrid {
    /// Every non-null display cell (totals excluded), row-major.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.cells.iter().flatten().filter_map(|v| *v)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<f64> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }
}

/// Builds the display grid for `mode`.
///
/// Totals are re-expressed against the next enclosing total: a row total
/// under PercentOfColumnTotal is taken relative to the grand total (the
/// total column's own total), a column total under PercentOfRowTotal
/// likewise, and the grand total itself reads 100 in every percent mode.
pub fn display_grid(result: &PivotResult, mode: ShowValuesAs) -> DisplayGrid {
    let grand = result.grand_total();

    let cells = (0..result.row_count())
        .map(|r| {
            let row_key = &result.row_keys[r];
            result
                .row_cells(r)
                .iter()
                .zip(&result.col_keys)
                .map(|(&raw, col_key)| to_display_value(raw, row_key, col_key, mode, result))
                .collect()
        })
        .collect();

    let row_totals = (0..result.row_count())
        .map(|r| {
            let raw = result.row_total_at(r);
            match mode {
                ShowValuesAs::Normal => raw,
                ShowValuesAs::PercentOfRowTotal => percent_of(raw, raw),
                ShowValuesAs::PercentOfGrandTotal | ShowValuesAs::PercentOfColumnTotal => {
                    percent_of(raw, grand)
                }
            }
        })
        .collect();

    let col_totals = (0..result.col_count())
        .map(|c| {
            let raw = result.col_total_at(c);
            match mode {
                ShowValuesAs::Normal => raw,
                ShowValuesAs::PercentOfColumnTotal => percent_of(raw, raw),
                ShowValuesAs::PercentOfGrandTotal | ShowValuesAs::PercentOfRowTotal => {
                    percent_of(raw, grand)
                }
            }
        })
        .collect();

    let grand_total = match mode {
        ShowValuesAs::Normal => grand,
        _ => percent_of(grand, grand),
    };

    DisplayGrid {
        mode,
        cells,
        row_totals,
        col_totals,
        grand_total,
    }
}
