//! Vecino: k-nearest-neighbor classification in pure Rust.
//!
//! Vecino classifies fixed-shape numeric records (four measurements plus
//! an optional label) by majority vote among the `k` nearest training
//! samples under a pluggable distance metric, and scores `(k, metric)`
//! configurations against a held-out testing subset.
//!
//! # Quick Start
//!
//! ```
//! use vecino::prelude::*;
//! use std::collections::HashMap;
//!
//! let record = |m: [f32; 4], species: &str| -> HashMap<String, String> {
//!     let keys = ["sepal_length", "sepal_width", "petal_length", "petal_width"];
//!     let mut row: HashMap<String, String> = keys
//!         .iter()
//!         .zip(m)
//!         .map(|(k, v)| ((*k).to_string(), v.to_string()))
//!         .collect();
//!     row.insert("species".to_string(), species.to_string());
//!     row
//! };
//!
//! // Load and partition labeled records (every 3rd goes to testing)
//! let mut data = TrainingData::new("iris").with_split(SplitStrategy::Stride(3));
//! data.load(vec![
//!     record([5.0, 3.5, 1.3, 0.3], "setosa"),
//!     record([5.1, 3.4, 1.5, 0.2], "setosa"),
//!     record([4.9, 3.1, 1.5, 0.1], "setosa"),
//!     record([6.0, 2.7, 5.1, 1.6], "versicolor"),
//!     record([6.1, 2.8, 4.7, 1.2], "versicolor"),
//!     record([5.9, 3.0, 4.2, 1.5], "versicolor"),
//! ]).unwrap();
//!
//! // Score a configuration against the testing subset
//! let parameter = Hyperparameter::new(1, &data).unwrap();
//! let quality = data.test(parameter).unwrap();
//! assert_eq!(quality, 1.0);
//!
//! // Production inference on an unknown sample
//! let parameter = Hyperparameter::new(1, &data)
//!     .unwrap()
//!     .with_metric(DistanceMetric::Manhattan);
//! let query = Sample::unknown([5.1, 3.4, 1.4, 0.3]);
//! let classified = data.classify(&parameter, query).unwrap();
//! assert_eq!(classified.assigned_label(), Some("setosa"));
//! ```
//!
//! # Modules
//!
//! - [`sample`]: the measured-record type
//! - [`classification`]: distance metrics and the k-NN hyperparameter core
//! - [`dataset`]: train/test partitioning, ingestion, and tuning history
//! - [`error`]: crate error type

pub mod classification;
pub mod dataset;
pub mod error;
pub mod prelude;
pub mod sample;

pub use classification::{DistanceMetric, Hyperparameter};
pub use dataset::{RecordSchema, SplitStrategy, TrainingData};
pub use error::{Result, VecinoError};
pub use sample::Sample;
