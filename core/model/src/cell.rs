//! FILENAME: core/model/src/cell.rs
//! PURPOSE: Defines the scalar value held by one field of a source row.
//! CONTEXT: Loaders (CSV, JSON, spreadsheet import) produce these values;
//! the pivot engine only reads them, either as a grouping label or as a
//! numeric sample.

use serde::{Deserialize, Serialize};

/// Label used when a grouping field has no value.
pub const MISSING_LABEL: &str = "N/A";

/// Represents the raw data within one field of a source row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl CellValue {
    /// Returns true for a missing value (Empty, or text with only whitespace).
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Returns the value as a grouping label.
    /// Missing values collapse onto `MISSING_LABEL`.
    pub fn as_label(&self) -> String {
        if self.is_missing() {
            return MISSING_LABEL.to_string();
        }
        match self {
            CellValue::Number(n) => format_number_label(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(true) => "TRUE".to_string(),
            CellValue::Boolean(false) => "FALSE".to_string(),
            CellValue::Empty => MISSING_LABEL.to_string(),
        }
    }

    /// Parses the value as a numeric sample.
    /// Text is parsed after trimming; booleans, blanks and non-finite
    /// numbers are not samples.
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Empty | CellValue::Boolean(_) => return None,
        };
        if n.is_finite() {
            Some(n)
        } else {
            None
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

// Format without unnecessary decimal places
fn format_number_label(n: f64) -> String {
    // -0.0 groups with 0.0
    let n = if n == 0.0 { 0.0 } else { n };
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}
