//! FILENAME: core/pivot-engine/src/cache.rs
//! Grouping Index - the per-pass accumulation state.
//!
//! The index is designed for:
//! - A single O(n) scan over the source rows
//! - Memory-efficient storage via label interning (each distinct row or
//!   column label is stored once and referenced by a ValueId)
//! - O(1) lookup of a cell bucket by (row id, column id)
//!
//! An index lives for exactly one pivot computation; nothing is reused
//! across passes.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use model::{Dataset, RowIndex};

use crate::definition::TOTAL_COLUMN_LABEL;

// ============================================================================
// LABEL INTERNING
// ============================================================================

/// A reference to an interned label within one axis.
pub type ValueId = u32;

/// Unique label store for one axis (rows or columns).
#[derive(Debug, Clone, Default)]
pub struct KeyInterner {
    /// Map from label to its unique ID (for deduplication during build).
    value_to_id: FxHashMap<String, ValueId>,

    /// Labels in order of first appearance (indexed by ValueId).
    id_to_value: Vec<String>,
}

impl KeyInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a label and returns its ValueId.
    /// If the label already exists, returns the existing ID.
    pub fn intern(&mut self, label: String) -> ValueId {
        if let Some(&id) = self.value_to_id.get(&label) {
            return id;
        }

        let id = self.id_to_value.len() as ValueId;
        self.id_to_value.push(label.clone());
        self.value_to_id.insert(label, id);
        id
    }

    pub fn get(&self, id: ValueId) -> Option<&str> {
        self.id_to_value.get(id as usize).map(String::as_str)
    }

    pub fn id_of(&self, label: &str) -> Option<ValueId> {
        self.value_to_id.get(label).copied()
    }

    /// Returns the number of unique labels.
    pub fn len(&self) -> usize {
        self.id_to_value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_value.is_empty()
    }

    /// Returns all ValueIds ordered lexicographically by label.
    pub fn sorted_ids(&self) -> Vec<ValueId> {
        let mut ids: Vec<ValueId> = (0..self.id_to_value.len() as ValueId).collect();
        ids.sort_by(|&a, &b| self.id_to_value[a as usize].cmp(&self.id_to_value[b as usize]));
        ids
    }
}

// ============================================================================
// CELL KEY / BUCKET
// ============================================================================

/// The (row label, column label) pair identifying one summary cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub row: ValueId,
    pub col: ValueId,
}

impl CellKey {
    pub fn new(row: ValueId, col: ValueId) -> Self {
        CellKey { row, col }
    }
}

/// Accumulation state for one CellKey.
/// A source row index is recorded only alongside a numeric sample, so the
/// two lists always have the same length.
#[derive(Debug, Clone, Default)]
pub struct CellBucket {
    pub samples: SmallVec<[f64; 4]>,
    pub source_rows: SmallVec<[RowIndex; 4]>,
}

impl CellBucket {
    pub fn push(&mut self, sample: f64, source_row: RowIndex) {
        self.samples.push(sample);
        self.source_rows.push(source_row);
    }

    pub fn has_samples(&self) -> bool {
        !self.samples.is_empty()
    }
}

// ============================================================================
// MAIN INDEX STRUCT
// ============================================================================

/// Field positions the index groups and samples on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexFields {
    pub row: usize,
    /// None groups every row under the synthetic "Total" column.
    pub col: Option<usize>,
    pub value: usize,
}

/// Statistics about one index build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub total_records: usize,
    pub sample_count: usize,
    pub bucket_count: usize,
}

/// Samples and contributing source rows for every CellKey in a dataset.
#[derive(Debug, Clone, Default)]
pub struct GroupingIndex {
    pub row_keys: KeyInterner,
    pub col_keys: KeyInterner,
    buckets: FxHashMap<CellKey, CellBucket>,
    pub stats: IndexStats,
}

impl GroupingIndex {
    /// Scans the dataset once, grouping every row by its CellKey.
    pub fn build(dataset: &Dataset, fields: IndexFields) -> Self {
        let mut index = GroupingIndex::default();

        // The synthetic column exists even when there are no rows.
        if fields.col.is_none() {
            index.col_keys.intern(TOTAL_COLUMN_LABEL.to_string());
        }

        for (record_idx, record) in dataset.rows.iter().enumerate() {
            let row_id = index.row_keys.intern(record.get(fields.row).as_label());
            let col_id = match fields.col {
                Some(col) => index.col_keys.intern(record.get(col).as_label()),
                None => 0,
            };

            let bucket = index.buckets.entry(CellKey::new(row_id, col_id)).or_default();
            if let Some(sample) = record.get(fields.value).as_number() {
                bucket.push(sample, record_idx as RowIndex);
                index.stats.sample_count += 1;
            }
        }

        index.stats.total_records = dataset.rows.len();
        index.stats.bucket_count = index.buckets.len();
        index
    }

    pub fn bucket(&self, row: ValueId, col: ValueId) -> Option<&CellBucket> {
        self.buckets.get(&CellKey::new(row, col))
    }

    /// Looks up a bucket by its labels.
    pub fn bucket_for(&self, row_label: &str, col_label: &str) -> Option<&CellBucket> {
        let row = self.row_keys.id_of(row_label)?;
        let col = self.col_keys.id_of(col_label)?;
        self.bucket(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{CellValue, SourceRow};

    fn dataset() -> Dataset {
        let mut ds = Dataset::new(vec![
            "Region".to_string(),
            "Product".to_string(),
            "Sales".to_string(),
        ]);
        ds.push_row(SourceRow::new(vec!["North".into(), "Apples".into(), 100.0.into()]));
        ds.push_row(SourceRow::new(vec!["North".into(), "Apples".into(), "n/a".into()]));
        ds.push_row(SourceRow::new(vec!["South".into(), "Oranges".into(), 250.0.into()]));
        ds.push_row(SourceRow::new(vec![CellValue::Empty, "Apples".into(), "7".into()]));
        ds
    }

    #[test]
    fn test_intern_dedup() {
        let mut keys = KeyInterner::new();
        let a = keys.intern("b".to_string());
        let b = keys.intern("a".to_string());
        assert_eq!(keys.intern("b".to_string()), a);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.sorted_ids(), vec![b, a]);
    }

    #[test]
    fn test_build_groups_rows() {
        let fields = IndexFields { row: 0, col: Some(1), value: 2 };
        let index = GroupingIndex::build(&dataset(), fields);

        assert_eq!(index.row_keys.len(), 3);
        assert_eq!(index.col_keys.len(), 2);
        assert_eq!(index.stats.total_records, 4);
        assert_eq!(index.stats.sample_count, 3);

        let north = index.bucket_for("North", "Apples").unwrap();
        assert_eq!(north.samples.as_slice(), &[100.0]);
        assert_eq!(north.source_rows.as_slice(), &[0]);

        let missing = index.bucket_for("N/A", "Apples").unwrap();
        assert_eq!(missing.samples.as_slice(), &[7.0]);
        assert_eq!(missing.source_rows.as_slice(), &[3]);

        assert!(index.bucket_for("South", "Apples").is_none());
    }

    #[test]
    fn test_synthetic_total_column() {
        let fields = IndexFields { row: 0, col: None, value: 2 };
        let index = GroupingIndex::build(&Dataset::new(vec!["Region".to_string()]), fields);
        assert_eq!(index.col_keys.len(), 1);
        assert_eq!(index.col_keys.get(0), Some(TOTAL_COLUMN_LABEL));
        assert!(index.row_keys.is_empty());
    }
}
