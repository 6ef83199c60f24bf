// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

use crate::hash::{HashFunctionFamily, TableFill};
use crate::sketch::{BitScanPolicy, DEFAULT_WIDTH, MAX_WIDTH};
use crate::traits::EstimatorError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SEED: u64 = 1327;
pub const DEFAULT_FUNCTIONS: usize = 100;
pub const DEFAULT_RADIX: usize = 100_000;

/// Estimator configuration.
///
/// Missing fields take their defaults, so `{}` is a valid config document.
///
/// # Example
///
/// ```
/// use fm_cardinality::{BitScanPolicy, EstimatorConfig};
///
/// let config = EstimatorConfig::from_json_str(r#"{"functions": 9, "policy": "discard_low_bit"}"#).unwrap();
/// assert_eq!(config.functions, 9);
/// assert_eq!(config.policy, BitScanPolicy::DiscardLowBit);
/// assert_eq!(config.seed, 1327);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Seed for the hash family generator.
    pub seed: u64,
    /// Number of hash functions (and sketches) in the ensemble.
    pub functions: usize,
    /// Lookup table size of each hash function.
    pub radix: usize,
    /// Bitmap width of every sketch.
    pub width: usize,
    pub policy: BitScanPolicy,
    pub fill: TableFill,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            functions: DEFAULT_FUNCTIONS,
            radix: DEFAULT_RADIX,
            width: DEFAULT_WIDTH,
            policy: BitScanPolicy::default(),
            fill: TableFill::default(),
        }
    }
}

impl EstimatorConfig {
    pub fn from_json_str(s: &str) -> Result<Self, EstimatorError> {
        serde_json::from_str(s).map_err(|e| EstimatorError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), EstimatorError> {
        if self.functions == 0 {
            return Err(EstimatorError::InvalidConfig(
                "functions must be at least 1".into(),
            ));
        }
        if self.radix == 0 {
            return Err(EstimatorError::InvalidConfig("radix must be at least 1".into()));
        }
        if self.width == 0 || self.width > MAX_WIDTH {
            return Err(EstimatorError::InvalidConfig(format!(
                "width must be in 1..={}, got {}",
                MAX_WIDTH, self.width
            )));
        }
        Ok(())
    }

    /// Generates the hash family this config describes.
    pub fn family(&self) -> Result<HashFunctionFamily, EstimatorError> {
        self.validate()?;
        HashFunctionFamily::from_seed(self.functions, self.radix, self.fill, self.seed)
    }
}
