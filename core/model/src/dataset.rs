//! FILENAME: core/model/src/dataset.rs
//! PURPOSE: In-memory tabular dataset handed to the pivot engine.
//! CONTEXT: A dataset is a list of named fields plus ordered rows. A row is
//! identified only by its position, which is what drill-down returns.

use serde::{Deserialize, Serialize};
use crate::cell::CellValue;

/// Index of a row within its dataset (0-based).
pub type RowIndex = u32;

/// One record of the source data. Values are aligned with the dataset's
/// field list; a row shorter than the field list reads as Empty past its end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceRow {
    pub values: Vec<CellValue>,
}

impl SourceRow {
    pub fn new(values: Vec<CellValue>) -> Self {
        SourceRow { values }
    }

    /// Gets the value at a field index, or Empty when absent.
    pub fn get(&self, field_index: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.values.get(field_index).unwrap_or(&EMPTY)
    }
}

impl<V: Into<CellValue>> FromIterator<V> for SourceRow {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        SourceRow {
            values: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered collection of rows sharing one field list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Field names in column order.
    pub fields: Vec<String>,
    pub rows: Vec<SourceRow>,
}

impl Dataset {
    pub fn new(fields: Vec<String>) -> Self {
        Dataset {
            fields,
            rows: Vec::new(),
        }
    }

    /// Creates a dataset from field names and pre-built rows.
    pub fn with_rows(fields: Vec<String>, rows: Vec<SourceRow>) -> Self {
        Dataset { fields, rows }
    }

    /// Appends a row and returns its index.
    pub fn push_row(&mut self, row: SourceRow) -> RowIndex {
        self.rows.push(row);
        (self.rows.len() - 1) as RowIndex
    }

    /// Returns the column index of a field by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_index(name).is_some()
    }

    pub fn row(&self, index: RowIndex) -> Option<&SourceRow> {
        self.rows.get(index as usize)
    }

    /// Gets one value by row index and field name.
    pub fn value(&self, index: RowIndex, field: &str) -> Option<&CellValue> {
        let field_index = self.field_index(field)?;
        self.row(index).map(|r| r.get(field_index))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
