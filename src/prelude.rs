//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use vecino::prelude::*;
//! ```

pub use crate::classification::{DistanceMetric, Hyperparameter};
pub use crate::dataset::{RecordSchema, SplitStrategy, TrainingData};
pub use crate::error::{Result, VecinoError};
pub use crate::sample::Sample;
