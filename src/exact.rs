// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::traits::CardinalityEstimator;
use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;

/// ExactCounter - ground-truth distinct counter
///
/// Stores every distinct value it sees. Only used as a baseline to compare the
/// sketches against.
///
/// # Example
///
/// ```
/// use fm_cardinality::ExactCounter;
///
/// let mut exact = ExactCounter::<String>::new();
/// for token in "a b c a b c d".split_whitespace() {
///     exact.add(token);
/// }
/// assert_eq!(exact.cardinality(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactCounter<T: Eq + Hash> {
    seen: HashSet<T>,
}

impl<T: Eq + Hash> Default for ExactCounter<T> {
    fn default() -> Self {
        Self {
            seen: HashSet::new(),
        }
    }
}

impl<T: Eq + Hash> ExactCounter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a value, cloning it into the set only if it is new.
    ///
    /// Returns `true` if the value had not been seen before.
    pub fn add<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = T> + ?Sized,
    {
        if self.seen.contains(value) {
            return false;
        }
        self.seen.insert(value.to_owned())
    }

    pub fn cardinality(&self) -> u64 {
        self.seen.len() as u64
    }
}

impl<T, Q> CardinalityEstimator<Q> for ExactCounter<T>
where
    T: Eq + Hash + Borrow<Q>,
    Q: Hash + Eq + ToOwned<Owned = T> + ?Sized,
{
    fn add(&mut self, value: &Q) {
        ExactCounter::add(self, value);
    }

    fn cardinality(&self) -> u64 {
        ExactCounter::cardinality(self)
    }
}
