// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! Hash functions for feeding sketches.
//!
//! [`BaseHasher`] is a fixed-key SipHash-1-3, stable across runs. A [`HashFunction`]
//! layers a pseudo-random lookup table over it: `table[base(value) % radix]`.
//! A [`HashFunctionFamily`] is a batch of such functions drawn from one seeded
//! generator, so the whole family is reproducible from its seed.

use crate::traits::{EstimatorError, StreamHasher};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use siphasher::sip::SipHasher13;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use tracing::debug;

const BASE_KEY_0: u64 = 0x736f_6d65_7073_6575;
const BASE_KEY_1: u64 = 0x646f_7261_6e64_6f6d;

/// Deterministic base hash for stream elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseHasher {
    k0: u64,
    k1: u64,
}

impl Default for BaseHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseHasher {
    pub fn new() -> Self {
        Self {
            k0: BASE_KEY_0,
            k1: BASE_KEY_1,
        }
    }
}

impl StreamHasher for BaseHasher {
    fn hash_value<T: Hash + ?Sized>(&self, value: &T) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(self.k0, self.k1);
        value.hash(&mut hasher);
        hasher.finish()
    }
}

/// Table-filling policy for generated hash functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableFill {
    /// Each entry is an arbitrary pseudo-random integer.
    #[default]
    Unconstrained,
    /// Each entry is resampled until it is odd.
    OddConstrained,
}

impl fmt::Display for TableFill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableFill::Unconstrained => write!(f, "unconstrained"),
            TableFill::OddConstrained => write!(f, "odd_constrained"),
        }
    }
}

impl FromStr for TableFill {
    type Err = EstimatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace(['_', '-'], "").to_lowercase().as_str() {
            "unconstrained" => Ok(TableFill::Unconstrained),
            "oddconstrained" | "odd" => Ok(TableFill::OddConstrained),
            _ => Err(EstimatorError::Config(format!("Unknown table fill: {}", s))),
        }
    }
}

/// A table-driven hash function.
///
/// Owns its lookup table outright; the table is never modified after construction.
///
/// # Example
///
/// ```
/// use fm_cardinality::{HashFunction, StreamHasher};
///
/// let f = HashFunction::from_table(vec![10, 20, 30]).unwrap();
/// assert!([10, 20, 30].contains(&f.hash_value("token")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashFunction {
    base: BaseHasher,
    table: Box<[u64]>,
}

impl HashFunction {
    /// Builds a function from an explicit table. The radix is the table length.
    pub fn from_table(table: Vec<u64>) -> Result<Self, EstimatorError> {
        if table.is_empty() {
            return Err(EstimatorError::InvalidConfig(
                "hash table radix must be at least 1".into(),
            ));
        }
        Ok(Self {
            base: BaseHasher::new(),
            table: table.into_boxed_slice(),
        })
    }

    fn generate<R: RngCore + ?Sized>(radix: usize, fill: TableFill, rng: &mut R) -> Self {
        let table = (0..radix)
            .map(|_| match fill {
                TableFill::Unconstrained => rng.next_u64(),
                TableFill::OddConstrained => loop {
                    let v = rng.next_u64();
                    if v & 1 == 1 {
                        break v;
                    }
                },
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            base: BaseHasher::new(),
            table,
        }
    }

    /// Size of the lookup table.
    pub fn radix(&self) -> usize {
        self.table.len()
    }

    pub fn table(&self) -> &[u64] {
        &self.table
    }
}

impl StreamHasher for HashFunction {
    fn hash_value<T: Hash + ?Sized>(&self, value: &T) -> u64 {
        let slot = self.base.hash_value(value) % self.table.len() as u64;
        self.table[slot as usize]
    }
}

/// An ordered, fixed-size family of independent hash functions.
///
/// # Example
///
/// ```
/// use fm_cardinality::{HashFunctionFamily, TableFill};
///
/// let a = HashFunctionFamily::from_seed(8, 64, TableFill::Unconstrained, 1327).unwrap();
/// let b = HashFunctionFamily::from_seed(8, 64, TableFill::Unconstrained, 1327).unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashFunctionFamily {
    fill: TableFill,
    functions: Vec<HashFunction>,
}

impl HashFunctionFamily {
    /// Generates `count` functions with `radix`-entry tables, drawing from `rng`.
    ///
    /// # Errors
    /// Returns [`EstimatorError::InvalidConfig`] when `count` or `radix` is zero.
    pub fn generate<R: RngCore + ?Sized>(
        count: usize,
        radix: usize,
        fill: TableFill,
        rng: &mut R,
    ) -> Result<Self, EstimatorError> {
        if count == 0 {
            return Err(EstimatorError::InvalidConfig(
                "hash family size must be at least 1".into(),
            ));
        }
        if radix == 0 {
            return Err(EstimatorError::InvalidConfig(
                "hash table radix must be at least 1".into(),
            ));
        }

        debug!(count, radix, %fill, "generating hash function family");
        let functions = (0..count)
            .map(|_| HashFunction::generate(radix, fill, &mut *rng))
            .collect();
        Ok(Self { fill, functions })
    }

    /// Generates a family from a fresh `StdRng` seeded with `seed`.
    pub fn from_seed(
        count: usize,
        radix: usize,
        fill: TableFill,
        seed: u64,
    ) -> Result<Self, EstimatorError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::generate(count, radix, fill, &mut rng)
    }

    pub fn fill(&self) -> TableFill {
        self.fill
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Always false: a family holds at least one function.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn functions(&self) -> &[HashFunction] {
        &self.functions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HashFunction> {
        self.functions.iter()
    }
}

impl IntoIterator for HashFunctionFamily {
    type Item = HashFunction;
    type IntoIter = std::vec::IntoIter<HashFunction>;

    fn into_iter(self) -> Self::IntoIter {
        self.functions.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_hasher_is_stable() {
        let h = BaseHasher::new();
        assert_eq!(h.hash_value("apple"), h.hash_value("apple"));
        assert_eq!(h.hash_value("apple"), BaseHasher::default().hash_value("apple"));
        assert_ne!(h.hash_value("apple"), h.hash_value("banana"));
    }

    #[test]
    fn test_rejects_zero_sizes() {
        assert!(matches!(
            HashFunctionFamily::from_seed(0, 16, TableFill::Unconstrained, 1),
            Err(EstimatorError::InvalidConfig(_))
        ));
        assert!(matches!(
            HashFunctionFamily::from_seed(4, 0, TableFill::Unconstrained, 1),
            Err(EstimatorError::InvalidConfig(_))
        ));
        assert!(HashFunction::from_table(Vec::new()).is_err());
    }

    #[test]
    fn test_family_shape() {
        let family = HashFunctionFamily::from_seed(5, 33, TableFill::Unconstrained, 7).unwrap();
        assert_eq!(family.len(), 5);
        assert!(!family.is_empty());
        assert!(family.iter().all(|f| f.radix() == 33));
        // Independent draws: no two tables coincide.
        let tables: Vec<_> = family.iter().map(|f| f.table().to_vec()).collect();
        for i in 0..tables.len() {
            for j in (i + 1)..tables.len() {
                assert_ne!(tables[i], tables[j]);
            }
        }
    }

    #[test]
    fn test_seed_changes_family() {
        let a = HashFunctionFamily::from_seed(3, 16, TableFill::Unconstrained, 1).unwrap();
        let b = HashFunctionFamily::from_seed(3, 16, TableFill::Unconstrained, 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_odd_constrained_tables() {
        let family = HashFunctionFamily::from_seed(4, 256, TableFill::OddConstrained, 1327).unwrap();
        assert_eq!(family.fill(), TableFill::OddConstrained);
        assert!(family.iter().flat_map(|f| f.table()).all(|v| v & 1 == 1));
    }

    #[test]
    fn test_generate_with_caller_rng() {
        let mut rng = StdRng::seed_from_u64(99);
        let a = HashFunctionFamily::generate(2, 8, TableFill::Unconstrained, &mut rng).unwrap();
        // Continuing the same generator yields a different family.
        let b = HashFunctionFamily::generate(2, 8, TableFill::Unconstrained, &mut rng).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, HashFunctionFamily::from_seed(2, 8, TableFill::Unconstrained, 99).unwrap());
    }

    #[test]
    fn test_hash_reads_table() {
        let f = HashFunction::from_table(vec![42]).unwrap();
        assert_eq!(f.radix(), 1);
        assert_eq!(f.hash_value("anything"), 42);
        assert_eq!(f.hash_value(&17u32), 42);
    }

    #[test]
    fn test_table_fill_parse() {
        assert_eq!("odd-constrained".parse::<TableFill>().unwrap(), TableFill::OddConstrained);
        assert_eq!("Unconstrained".parse::<TableFill>().unwrap(), TableFill::Unconstrained);
        assert_eq!(TableFill::OddConstrained.to_string(), "odd_constrained");
        assert!("even".parse::<TableFill>().is_err());
    }
}
