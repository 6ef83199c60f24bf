//! # fm-cardinality
//!
//! Distinct-count estimation for token streams with Flajolet–Martin sketches,
//! seeded hash-function families and median-of-sketches aggregation, plus an
//! exact baseline to compare against.

pub mod bitmap;
pub mod config;
pub mod ensemble;
pub mod exact;
pub mod hash;
pub mod report;
pub mod sketch;
pub mod stream;
pub mod traits;

// Re-export core traits
pub use traits::{CardinalityEstimator, EstimatorError, StreamHasher};

pub use bitmap::Bitmap;
pub use config::EstimatorConfig;
pub use ensemble::MedianEstimator;
pub use exact::ExactCounter;
pub use hash::{BaseHasher, HashFunction, HashFunctionFamily, TableFill};
pub use report::{estimate_path, estimate_reader, CardinalityReport};
pub use sketch::{BitScanPolicy, Sketch, PHI};
