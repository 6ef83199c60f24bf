// Copyright (c) 2026 Adrian Robinson. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.

//! End-to-end estimation over a token stream.
//!
//! One pass feeds every token to the exact baseline, a single base-hash sketch and
//! the median ensemble, then collects their three answers.
//!
//! # Example
//!
//! ```
//! use fm_cardinality::{report::estimate_reader, EstimatorConfig};
//!
//! let config = EstimatorConfig { functions: 8, radix: 64, ..Default::default() };
//! let report = estimate_reader(&config, "a b c a b c d".as_bytes()).unwrap();
//! assert_eq!(report.exact, 4);
//! assert_eq!(report.tokens, 7);
//! ```

use crate::config::EstimatorConfig;
use crate::ensemble::MedianEstimator;
use crate::exact::ExactCounter;
use crate::hash::BaseHasher;
use crate::sketch::Sketch;
use crate::stream;
use crate::traits::{CardinalityEstimator, EstimatorError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info};

/// The three cardinality answers for one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardinalityReport {
    /// Number of tokens read (duplicates included).
    pub tokens: u64,
    /// Exact distinct count.
    pub exact: u64,
    /// Estimate of one sketch fed by the base hash.
    pub single_sketch: u64,
    /// Median estimate of the seeded ensemble.
    pub ensemble: u64,
}

impl fmt::Display for CardinalityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "exact {}", self.exact)?;
        writeln!(f, "flajolet {}", self.single_sketch)?;
        write!(f, "median flajolet {}", self.ensemble)
    }
}

struct Solvers {
    exact: ExactCounter<Vec<u8>>,
    single: Sketch<BaseHasher>,
    ensemble: MedianEstimator,
}

impl Solvers {
    fn new(config: &EstimatorConfig) -> Result<Self, EstimatorError> {
        let family = config.family()?;
        Ok(Self {
            exact: ExactCounter::new(),
            single: Sketch::with_options(BaseHasher::new(), config.width, config.policy)?,
            ensemble: MedianEstimator::with_options(family, config.width, config.policy)?,
        })
    }

    fn feed(&mut self, feed: impl FnOnce(&mut [&mut dyn CardinalityEstimator<[u8]>]) -> u64) -> u64 {
        let mut estimators: [&mut dyn CardinalityEstimator<[u8]>; 3] =
            [&mut self.exact, &mut self.single, &mut self.ensemble];
        feed(&mut estimators)
    }

    fn finish(self, tokens: u64) -> CardinalityReport {
        debug!(
            single_bits_set = self.single.bitmap().count_ones(),
            ensemble_bits_set = self
                .ensemble
                .sketches()
                .iter()
                .map(|s| s.bitmap().count_ones())
                .sum::<usize>(),
            "sketch fill"
        );
        let report = CardinalityReport {
            tokens,
            exact: self.exact.cardinality(),
            single_sketch: self.single.cardinality(),
            ensemble: self.ensemble.cardinality(),
        };
        info!(
            tokens = report.tokens,
            exact = report.exact,
            single_sketch = report.single_sketch,
            ensemble = report.ensemble,
            "cardinality estimated"
        );
        report
    }
}

/// Estimates the cardinality of the tokens read from `reader`.
///
/// # Errors
/// Returns [`EstimatorError::InvalidConfig`] when `config` fails validation.
pub fn estimate_reader<R: BufRead>(
    config: &EstimatorConfig,
    reader: R,
) -> Result<CardinalityReport, EstimatorError> {
    let mut solvers = Solvers::new(config)?;
    let tokens = solvers.feed(|estimators| stream::feed_reader(reader, estimators));
    Ok(solvers.finish(tokens))
}

/// Estimates the cardinality of the tokens in the file at `path`.
///
/// An unreadable file yields the empty-stream report, not an error.
pub fn estimate_path<P: AsRef<Path>>(
    config: &EstimatorConfig,
    path: P,
) -> Result<CardinalityReport, EstimatorError> {
    let mut solvers = Solvers::new(config)?;
    let tokens = solvers.feed(|estimators| stream::feed_path(path, estimators));
    Ok(solvers.finish(tokens))
}
