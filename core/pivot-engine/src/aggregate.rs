//! FILENAME: core/pivot-engine/src/aggregate.rs
//! Aggregator - reduces a set of numeric samples to one scalar.
//!
//! Every aggregation kind is total over non-empty input. An empty sample
//! set has no value at all (None), never zero.

use crate::definition::AggregationType;

/// Accumulator for computing aggregates incrementally.
/// Stores the intermediate state needed for every aggregation type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateAccumulator {
    pub sum: f64,
    pub count: u64,
    pub min: f64,
    pub max: f64,
}

impl AggregateAccumulator {
    pub fn new() -> Self {
        AggregateAccumulator {
            sum: 0.0,
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Adds a numeric sample to the accumulator.
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Computes the final aggregate value; None when no sample was added.
    pub fn compute(&self, aggregation: AggregationType) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        let value = match aggregation {
            AggregationType::Sum => self.sum,
            AggregationType::Average => self.sum / (self.count as f64),
            AggregationType::Count => self.count as f64,
            AggregationType::Max => self.max,
            AggregationType::Min => self.min,
        };
        Some(value)
    }
}

impl Default for AggregateAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<f64> for AggregateAccumulator {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

/// Aggregates a sample set. Returns None for an empty set.
pub fn aggregate(aggregation: AggregationType, samples: &[f64]) -> Option<f64> {
    aggregate_iter(aggregation, samples.iter().copied())
}

/// Aggregates the present values of an iterator, skipping nothing else.
pub fn aggregate_iter<I>(aggregation: AggregationType, samples: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut acc = AggregateAccumulator::new();
    acc.extend(samples);
    acc.compute(aggregation)
}
