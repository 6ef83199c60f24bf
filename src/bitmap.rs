// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! Fixed-width monotonic bit array.
//!
//! The width is chosen at construction and never changes. Bits can be set but
//! never cleared, which is exactly the state a Flajolet–Martin sketch needs.

use crate::traits::EstimatorError;

const WORD_BITS: usize = u64::BITS as usize;

/// A bounded bit array of `width` bits, initially all zero.
///
/// # Example
///
/// ```
/// use fm_cardinality::Bitmap;
///
/// let mut bits = Bitmap::new(64).unwrap();
/// assert!(bits.set(3));
/// assert!(!bits.set(3)); // already set
/// assert_eq!(bits.highest_set(), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    words: Vec<u64>,
}

impl Bitmap {
    /// Creates an all-zero bitmap with `width` bits.
    pub fn new(width: usize) -> Result<Self, EstimatorError> {
        if width == 0 {
            return Err(EstimatorError::InvalidConfig(
                "bitmap width must be at least 1".into(),
            ));
        }
        Ok(Self::zeroed(width))
    }

    /// Callers guarantee `width >= 1`.
    pub(crate) fn zeroed(width: usize) -> Self {
        Self {
            width,
            words: vec![0; width.div_ceil(WORD_BITS)],
        }
    }

    /// Number of addressable bits.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Sets bit `index`, clamped to the last bit when out of range.
    ///
    /// Returns `true` if the bit was previously clear.
    pub fn set(&mut self, index: usize) -> bool {
        let index = index.min(self.width - 1);
        let word = &mut self.words[index / WORD_BITS];
        let mask = 1u64 << (index % WORD_BITS);
        let was_clear = *word & mask == 0;
        *word |= mask;
        was_clear
    }

    /// Returns whether bit `index` is set. Out-of-range indices read as clear.
    pub fn get(&self, index: usize) -> bool {
        if index >= self.width {
            return false;
        }
        self.words[index / WORD_BITS] & (1u64 << (index % WORD_BITS)) != 0
    }

    /// Index of the highest set bit, or `None` if no bit was ever set.
    pub fn highest_set(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .rev()
            .find(|(_, w)| **w != 0)
            .map(|(i, w)| i * WORD_BITS + (WORD_BITS - 1 - w.leading_zeros() as usize))
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }
}
