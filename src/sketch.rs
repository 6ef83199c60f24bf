// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::bitmap::Bitmap;
use crate::hash::HashFunction;
use crate::traits::{CardinalityEstimator, EstimatorError, StreamHasher};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Flajolet–Martin bias-correction constant.
pub const PHI: f64 = 0.77351;

/// Default bitmap width. Wide enough that no practical stream overflows it.
pub const DEFAULT_WIDTH: usize = 64;

/// Widest supported bitmap; hash values are 64 bits.
pub const MAX_WIDTH: usize = u64::BITS as usize;

/// How a hash value is turned into a bit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitScanPolicy {
    /// Scan from bit 0; an observation whose lowest set bit is bit 0 is dropped.
    DiscardLowBit,
    /// Drop bit 0 of the hash, scan the rest; every observation is recorded.
    #[default]
    ShiftFirst,
}

impl BitScanPolicy {
    /// Bit position recorded for hash `h` in a bitmap of `width` bits,
    /// or `None` if the observation is discarded.
    pub fn position(self, h: u64, width: usize) -> Option<usize> {
        let last = width.saturating_sub(1);
        match self {
            BitScanPolicy::DiscardLowBit => {
                let pos = (h.trailing_zeros() as usize).min(last);
                (pos != 0).then_some(pos)
            }
            BitScanPolicy::ShiftFirst => Some(((h >> 1).trailing_zeros() as usize).min(last)),
        }
    }
}

impl fmt::Display for BitScanPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitScanPolicy::DiscardLowBit => write!(f, "discard_low_bit"),
            BitScanPolicy::ShiftFirst => write!(f, "shift_first"),
        }
    }
}

impl FromStr for BitScanPolicy {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace(['_', '-'], "").to_lowercase().as_str() {
            "discardlowbit" | "discard" => Ok(BitScanPolicy::DiscardLowBit),
            "shiftfirst" | "shift" => Ok(BitScanPolicy::ShiftFirst),
            _ => Err(EstimatorError::Config(format!("Unknown bit-scan policy: {}", s))),
        }
    }
}

/// Estimate for a sketch whose highest set bit is `index`: `ceil(2^index / PHI)`.
pub fn estimate_for_index(index: usize) -> u64 {
    (2f64.powi(index as i32) / PHI).ceil() as u64
}

/// Sketch - single Flajolet–Martin cardinality estimator
///
/// Hashes every observed value with its own hasher and records the position of the
/// lowest set bit of the hash in a fixed-width bitmap. The estimate is derived from
/// the highest recorded position.
///
/// # Key Properties
///
/// - **Fixed Memory**: one bitmap of `width` bits, regardless of stream length.
/// - **Monotonic**: bits are set, never cleared.
/// - **Idempotent**: adding the same value again never changes the bitmap.
/// - **High Variance**: a single sketch is a rough estimate; see [`crate::MedianEstimator`].
///
/// # Example
///
/// ```
/// use fm_cardinality::{BaseHasher, Sketch};
///
/// let mut sketch = Sketch::new(BaseHasher::new());
/// assert_eq!(sketch.cardinality(), 2); // empty: ceil(1 / PHI)
///
/// for word in "the quick brown fox jumps over the lazy dog".split_whitespace() {
///     sketch.add(word);
/// }
/// assert!(sketch.cardinality() >= 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sketch<H = HashFunction> {
    bitmap: Bitmap,
    hasher: H,
    policy: BitScanPolicy,
}

impl<H: StreamHasher> Sketch<H> {
    /// Creates a sketch with the default width and bit-scan policy.
    pub fn new(hasher: H) -> Self {
        Self {
            bitmap: Bitmap::zeroed(DEFAULT_WIDTH),
            hasher,
            policy: BitScanPolicy::default(),
        }
    }

    /// Creates a sketch with an explicit width and bit-scan policy.
    ///
    /// # Errors
    /// Returns [`EstimatorError::InvalidConfig`] when `width` is outside `1..=64`.
    pub fn with_options(
        hasher: H,
        width: usize,
        policy: BitScanPolicy,
    ) -> Result<Self, EstimatorError> {
        if width > MAX_WIDTH {
            return Err(EstimatorError::InvalidConfig(format!(
                "sketch width must be at most {}, got {}",
                MAX_WIDTH, width
            )));
        }
        Ok(Self {
            bitmap: Bitmap::new(width)?,
            hasher,
            policy,
        })
    }

    /// Observes a value.
    ///
    /// Returns `true` if the bitmap changed.
    pub fn add<T: Hash + ?Sized>(&mut self, value: &T) -> bool {
        let h = self.hasher.hash_value(value);
        match self.policy.position(h, self.bitmap.width()) {
            Some(pos) => self.bitmap.set(pos),
            None => false,
        }
    }

    /// Estimated number of distinct values observed so far.
    pub fn cardinality(&self) -> u64 {
        estimate_for_index(self.highest_bit().unwrap_or(0))
    }

    /// Highest recorded bit position, if any.
    pub fn highest_bit(&self) -> Option<usize> {
        self.bitmap.highest_set()
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    pub fn policy(&self) -> BitScanPolicy {
        self.policy
    }

    pub fn width(&self) -> usize {
        self.bitmap.width()
    }
}

impl<H: StreamHasher, T: Hash + ?Sized> CardinalityEstimator<T> for Sketch<H> {
    fn add(&mut self, value: &T) {
        Sketch::add(self, value);
    }

    fn cardinality(&self) -> u64 {
        Sketch::cardinality(self)
    }
}
