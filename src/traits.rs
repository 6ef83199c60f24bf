// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use std::hash::Hash;
use thiserror::Error;

/// Error type for estimator construction and configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstimatorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Config parse error: {0}")]
    Config(String),
}

/// Stream hasher trait - maps a stream element to a 64-bit hash value.
///
/// Implementations must be pure: the same value always hashes to the same
/// result for the lifetime of the hasher, and across process runs.
pub trait StreamHasher {
    /// Hashes a single stream element.
    fn hash_value<T: Hash + ?Sized>(&self, value: &T) -> u64;
}

/// Core estimator trait - anything that observes a stream and reports how many
/// distinct values it has seen.
///
/// All solvers in this crate (the exact baseline included) implement this trait,
/// so a token stream can be fed to any mix of them.
///
/// # Requirements
///
/// - **Idempotence**: `add(x); add(x)` leaves the estimator as `add(x)` does.
/// - **Order independence**: the reported cardinality depends only on the set of
///   values added, never on their order.
pub trait CardinalityEstimator<T: ?Sized> {
    /// Observes one value from the stream.
    fn add(&mut self, value: &T);

    /// Reports the (estimated) number of distinct values observed so far.
    ///
    /// Pure read: calling it never changes the estimator.
    fn cardinality(&self) -> u64;
}
