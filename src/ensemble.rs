// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! Median-of-sketches aggregation.
//!
//! A single Flajolet–Martin sketch has high variance and an asymmetric error, so
//! averaging raw estimates is distorted by outliers. [`MedianEstimator`] runs one
//! sketch per hash function and reports the median estimate instead.

use crate::hash::{HashFunction, HashFunctionFamily, TableFill};
use crate::sketch::{BitScanPolicy, Sketch, DEFAULT_WIDTH};
use crate::traits::{CardinalityEstimator, EstimatorError, StreamHasher};
use std::hash::Hash;
use tracing::{debug, trace, warn};

/// Returns the element at ascending sorted index `len / 2`.
///
/// For an even count this is the upper-middle element; values are never averaged.
/// Returns `None` for an empty input.
///
/// ```
/// use fm_cardinality::ensemble::median_estimate;
///
/// assert_eq!(median_estimate(vec![32, 2, 16, 8]), Some(16));
/// assert_eq!(median_estimate(vec![5]), Some(5));
/// assert_eq!(median_estimate(Vec::new()), None);
/// ```
pub fn median_estimate(mut estimates: Vec<u64>) -> Option<u64> {
    estimates.sort_unstable();
    estimates.get(estimates.len() / 2).copied()
}

/// MedianEstimator - ensemble of independent sketches
///
/// Owns one [`Sketch`] per hash function, in family order. Every observed value is
/// forwarded to every sketch, so all sketches see the same stream prefix.
///
/// # Example
///
/// ```
/// use fm_cardinality::{HashFunctionFamily, MedianEstimator, TableFill};
///
/// let family = HashFunctionFamily::from_seed(16, 1024, TableFill::Unconstrained, 1327).unwrap();
/// let mut estimator = MedianEstimator::new(family);
/// for i in 0..1000u32 {
///     estimator.add(&i);
/// }
/// assert_eq!(estimator.len(), 16);
/// assert!(estimator.cardinality() > 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedianEstimator<H = HashFunction> {
    sketches: Vec<Sketch<H>>,
}

impl MedianEstimator {
    /// Builds one default-width, default-policy sketch per function of `family`.
    pub fn new(family: HashFunctionFamily) -> Self {
        let fill = family.fill();
        let policy = BitScanPolicy::default();
        warn_if_degenerate(fill, policy);
        debug!(sketches = family.len(), width = DEFAULT_WIDTH, %policy, "building median estimator");
        Self {
            sketches: family.into_iter().map(Sketch::new).collect(),
        }
    }

    /// Builds one sketch per function of `family` with an explicit width and policy.
    ///
    /// # Errors
    /// Returns [`EstimatorError::InvalidConfig`] when `width` is outside `1..=64`.
    pub fn with_options(
        family: HashFunctionFamily,
        width: usize,
        policy: BitScanPolicy,
    ) -> Result<Self, EstimatorError> {
        warn_if_degenerate(family.fill(), policy);
        debug!(sketches = family.len(), width, %policy, "building median estimator");
        let sketches = family
            .into_iter()
            .map(|f| Sketch::with_options(f, width, policy))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { sketches })
    }
}

impl<H: StreamHasher> MedianEstimator<H> {
    /// Wraps pre-built sketches.
    ///
    /// # Errors
    /// Returns [`EstimatorError::InvalidConfig`] when `sketches` is empty.
    pub fn from_sketches(sketches: Vec<Sketch<H>>) -> Result<Self, EstimatorError> {
        if sketches.is_empty() {
            return Err(EstimatorError::InvalidConfig(
                "median estimator needs at least one sketch".into(),
            ));
        }
        Ok(Self { sketches })
    }

    /// Forwards a value to every sketch.
    pub fn add<T: Hash + ?Sized>(&mut self, value: &T) {
        for sketch in &mut self.sketches {
            sketch.add(value);
        }
    }

    /// Per-sketch estimates, in family order.
    pub fn estimates(&self) -> Vec<u64> {
        self.sketches.iter().map(Sketch::cardinality).collect()
    }

    /// Median of the per-sketch estimates (upper-middle for an even count).
    pub fn cardinality(&self) -> u64 {
        let estimates = self.estimates();
        trace!(?estimates, "per-sketch estimates");
        // Construction guarantees at least one sketch.
        median_estimate(estimates).unwrap_or_default()
    }

    pub fn sketches(&self) -> &[Sketch<H>] {
        &self.sketches
    }

    pub fn len(&self) -> usize {
        self.sketches.len()
    }

    /// Always false: an estimator holds at least one sketch.
    pub fn is_empty(&self) -> bool {
        self.sketches.is_empty()
    }
}

impl<H: StreamHasher, T: Hash + ?Sized> CardinalityEstimator<T> for MedianEstimator<H> {
    fn add(&mut self, value: &T) {
        MedianEstimator::add(self, value);
    }

    fn cardinality(&self) -> u64 {
        MedianEstimator::cardinality(self)
    }
}

fn warn_if_degenerate(fill: TableFill, policy: BitScanPolicy) {
    if fill == TableFill::OddConstrained && policy == BitScanPolicy::DiscardLowBit {
        warn!(
            %fill,
            %policy,
            "every hash value is odd and will be discarded; estimates stay at the empty-sketch value"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::estimate_for_index;

    fn sketch_at(index: u32) -> Sketch<HashFunction> {
        // ShiftFirst records `index` for the hash `1 << (index + 1)`.
        let f = HashFunction::from_table(vec![1u64 << (index + 1)]).unwrap();
        let mut sketch = Sketch::with_options(f, 64, BitScanPolicy::ShiftFirst).unwrap();
        sketch.add("seed");
        sketch
    }

    #[test]
    fn test_median_upper_middle() {
        assert_eq!(median_estimate(vec![2, 8, 16, 32]), Some(16));
        assert_eq!(median_estimate(vec![3, 1, 2]), Some(2));
    }

    #[test]
    fn test_from_sketches_median() {
        let estimator =
            MedianEstimator::from_sketches(vec![sketch_at(4), sketch_at(0), sketch_at(2), sketch_at(1)])
                .unwrap();
        assert_eq!(
            estimator.estimates(),
            vec![
                estimate_for_index(4),
                estimate_for_index(0),
                estimate_for_index(2),
                estimate_for_index(1)
            ]
        );
        // Sorted: [2, 3, 6, 21] -> index 2.
        assert_eq!(estimator.cardinality(), estimate_for_index(2));
    }

    #[test]
    fn test_from_sketches_rejects_empty() {
        assert!(matches!(
            MedianEstimator::<HashFunction>::from_sketches(Vec::new()),
            Err(EstimatorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_with_options_rejects_wide_bitmaps() {
        let family = HashFunctionFamily::from_seed(2, 8, TableFill::Unconstrained, 1).unwrap();
        assert!(MedianEstimator::with_options(family, 65, BitScanPolicy::ShiftFirst).is_err());
    }

    #[test]
    fn test_odd_tables_with_discard_policy_stay_empty() {
        let family = HashFunctionFamily::from_seed(5, 64, TableFill::OddConstrained, 1327).unwrap();
        let mut estimator =
            MedianEstimator::with_options(family, 64, BitScanPolicy::DiscardLowBit).unwrap();
        for i in 0..500u32 {
            estimator.add(&i);
        }
        assert!(estimator.sketches().iter().all(|s| s.bitmap().is_empty()));
        assert_eq!(estimator.cardinality(), 2);
    }
}
