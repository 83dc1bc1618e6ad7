//! The k-nearest-neighbor classification core.
//!
//! This module implements:
//! - [`DistanceMetric`]: a closed family of stateless dissimilarity
//!   measures over two samples' measurement vectors
//! - [`Hyperparameter`]: one `(k, metric)` configuration under test,
//!   carrying the k-NN rule itself and the evaluation loop that scores it
//!
//! # Example
//!
//! ```
//! use vecino::classification::{DistanceMetric, Hyperparameter};
//! use vecino::dataset::{SplitStrategy, TrainingData};
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
//! let mut data = TrainingData::new("iris").with_split(SplitStrategy::Stride(3));
//! data.load(vec![
//!     record([5.0, 3.5, 1.3, 0.3], "setosa"),
//!     record([5.1, 3.4, 1.5, 0.2], "setosa"),
//!     record([4.9, 3.1, 1.5, 0.1], "setosa"),
//!     record([6.0, 2.7, 5.1, 1.6], "versicolor"),
//!     record([6.1, 2.8, 4.7, 1.2], "versicolor"),
//!     record([5.9, 3.0, 4.2, 1.5], "versicolor"),
//! ]).expect("all records parse");
//!
//! let parameter = Hyperparameter::new(1, &data)
//!     .expect("dataset is loaded")
//!     .with_metric(DistanceMetric::Euclidean);
//! let quality = data.test(parameter).expect("evaluation succeeds");
//! assert!((0.0..=1.0).contains(&quality));
//! ```

use crate::dataset::{Partition, TrainingData};
use crate::error::{Result, VecinoError};
use crate::sample::Sample;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};

/// Distance metric for k-nearest-neighbor classification.
///
/// All four variants are stateless formulas over the ordered measurement
/// vectors of two samples, satisfying non-negativity, symmetry, and
/// `d(x, x) = 0`. Swapping the metric on a [`Hyperparameter`] changes no
/// other component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    /// Euclidean distance: `sqrt(sum((a_i - b_i)^2))`
    Euclidean,
    /// Manhattan distance: `sum(|a_i - b_i|)`
    Manhattan,
    /// Chebyshev distance: `max(|a_i - b_i|)`
    Chebyshev,
    /// Sorensen distance: `sum(|a_i - b_i|) / sum(a_i + b_i)`
    Sorensen,
}

impl DistanceMetric {
    /// Computes the dissimilarity between two samples' measurements.
    ///
    /// # Errors
    ///
    /// [`DistanceMetric::Sorensen`] is undefined when the denominator
    /// `sum(a_i + b_i)` is not positive while the numerator is nonzero;
    /// that case returns [`VecinoError::DegenerateInput`] rather than a
    /// negative distance. Identical vectors yield `0.0` regardless of the
    /// denominator.
    pub fn distance(&self, a: &Sample, b: &Sample) -> Result<f32> {
        let a = a.measurements();
        let b = b.measurements();
        match self {
            DistanceMetric::Euclidean => {
                let sum: f32 = a
                    .iter()
                    .zip(&b)
                    .map(|(x, y)| (x - y) * (x - y))
                    .sum();
                Ok(sum.sqrt())
            }
            DistanceMetric::Manhattan => {
                Ok(a.iter().zip(&b).map(|(x, y)| (x - y).abs()).sum())
            }
            DistanceMetric::Chebyshev => Ok(a
                .iter()
                .zip(&b)
                .map(|(x, y)| (x - y).abs())
                .fold(0.0, f32::max)),
            DistanceMetric::Sorensen => {
                let numerator: f32 = a.iter().zip(&b).map(|(x, y)| (x - y).abs()).sum();
                let denominator: f32 = a.iter().zip(&b).map(|(x, y)| x + y).sum();
                if numerator == 0.0 {
                    Ok(0.0)
                } else if denominator <= 0.0 {
                    // A non-positive denominator would make the ratio
                    // negative or undefined, breaking non-negativity
                    Err(VecinoError::DegenerateInput {
                        message: format!(
                            "Sorensen denominator {denominator} is not positive \
                             for measurements {a:?} and {b:?}"
                        ),
                    })
                } else {
                    Ok(numerator / denominator)
                }
            }
        }
    }
}

/// One hyperparameter configuration under test: a neighbor count `k`, a
/// distance metric, and the quality score from its latest evaluation.
///
/// A `Hyperparameter` holds a non-owning handle to the training data it
/// was built against. Dropping the [`TrainingData`] makes every later
/// [`test`](Hyperparameter::test) or
/// [`classify`](Hyperparameter::classify) call fail with
/// [`VecinoError::ExpiredReference`]; the configuration never keeps the
/// dataset alive on its own.
#[derive(Debug, Clone)]
pub struct Hyperparameter {
    /// Number of neighbors to vote
    k: usize,
    /// Distance metric
    metric: DistanceMetric,
    /// Name of the dataset, for error reporting
    dataset: String,
    /// Non-owning handle to the dataset's partition
    data: Weak<Partition>,
    /// Accuracy from the latest evaluation, in `[0, 1]`
    quality: Option<f32>,
}

impl Hyperparameter {
    /// Creates a configuration with `k` neighbors against a loaded dataset.
    ///
    /// Defaults to [`DistanceMetric::Euclidean`].
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset has not been loaded yet.
    pub fn new(k: usize, data: &TrainingData) -> Result<Self> {
        let partition = data.partition().ok_or_else(|| {
            VecinoError::Other(format!("dataset '{}' has not been loaded", data.name()))
        })?;
        Ok(Self {
            k,
            metric: DistanceMetric::Euclidean,
            dataset: data.name().to_string(),
            data: Arc::downgrade(partition),
            quality: None,
        })
    }

    /// Sets the distance metric.
    #[must_use]
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Returns the neighbor count.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the distance metric.
    #[must_use]
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Returns the name of the dataset this configuration was built against.
    #[must_use]
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Returns the quality from the latest evaluation, if one has run.
    #[must_use]
    pub fn quality(&self) -> Option<f32> {
        self.quality
    }

    /// Classifies one sample by majority vote among its `k` nearest
    /// training samples.
    ///
    /// Distance ties are broken by stable input order (first-seen wins);
    /// a vote tie between labels goes to the label of the nearest tied
    /// candidate.
    ///
    /// # Errors
    ///
    /// - [`VecinoError::ExpiredReference`] if the dataset was dropped
    /// - [`VecinoError::InvalidHyperparameter`] if `k` is zero or exceeds
    ///   the training subset size (checked before any distance work)
    /// - [`VecinoError::DegenerateInput`] from the metric itself
    pub fn classify(&self, sample: &Sample) -> Result<String> {
        let partition = self.upgrade()?;
        self.classify_against(&partition.training, sample)
    }

    /// Evaluates this configuration against the dataset's testing subset.
    ///
    /// Classifies a per-evaluation copy of every testing sample and scores
    /// `quality = pass / (pass + fail)`. Working on a copy keeps
    /// evaluations of different configurations against the same dataset
    /// independent, so sweeps may run them concurrently. Re-running
    /// overwrites the previous quality.
    ///
    /// # Errors
    ///
    /// - [`VecinoError::ExpiredReference`] if the dataset was dropped
    /// - [`VecinoError::InvalidHyperparameter`] if `k` is invalid
    /// - [`VecinoError::DegenerateInput`] if the testing subset is empty
    pub fn test(&mut self) -> Result<f32> {
        let partition = self.upgrade()?;
        self.validate_k(partition.training.len())?;
        if partition.testing.is_empty() {
            return Err(VecinoError::DegenerateInput {
                message: format!(
                    "testing subset of '{}' is empty, quality is undefined",
                    self.dataset
                ),
            });
        }

        let mut pass_count = 0_usize;
        let mut fail_count = 0_usize;
        let mut snapshot = partition.testing.clone();
        for sample in &mut snapshot {
            let label = self.classify_against(&partition.training, sample)?;
            sample.classify(label);
            if sample.matches() {
                pass_count += 1;
            } else {
                fail_count += 1;
            }
        }

        let quality = pass_count as f32 / (pass_count + fail_count) as f32;
        self.quality = Some(quality);
        Ok(quality)
    }

    fn upgrade(&self) -> Result<Arc<Partition>> {
        self.data.upgrade().ok_or_else(|| VecinoError::ExpiredReference {
            dataset: self.dataset.clone(),
        })
    }

    fn validate_k(&self, n_training: usize) -> Result<()> {
        if self.k == 0 {
            return Err(VecinoError::InvalidHyperparameter {
                param: "k".to_string(),
                value: "0".to_string(),
                constraint: "k >= 1".to_string(),
            });
        }
        if self.k > n_training {
            return Err(VecinoError::InvalidHyperparameter {
                param: "k".to_string(),
                value: self.k.to_string(),
                constraint: format!("k <= {n_training} (training subset size)"),
            });
        }
        Ok(())
    }

    /// The k-NN rule against an explicit training slice.
    fn classify_against(&self, training: &[Sample], sample: &Sample) -> Result<String> {
        self.validate_k(training.len())?;

        let mut distances: Vec<(f32, usize)> = Vec::with_capacity(training.len());
        for (index, neighbor) in training.iter().enumerate() {
            distances.push((self.metric.distance(sample, neighbor)?, index));
        }
        // Stable sort on distance alone: equal distances keep input order,
        // so the first-seen neighbor wins ties.
        distances.sort_by(|a, b| a.0.total_cmp(&b.0));
        let k_nearest = &distances[..self.k];

        // Tally in nearest-first order. Strictly-greater comparison keeps
        // the earlier entry on a vote tie, which is the label of the
        // nearest tied candidate.
        let mut tally: Vec<(&str, usize)> = Vec::new();
        for &(_, index) in k_nearest {
            let label = training[index].true_label().ok_or_else(|| {
                VecinoError::Other(format!(
                    "unlabeled sample in training subset of '{}'",
                    self.dataset
                ))
            })?;
            match tally.iter_mut().find(|(seen, _)| *seen == label) {
                Some(entry) => entry.1 += 1,
                None => tally.push((label, 1)),
            }
        }

        let Some((&first, rest)) = tally.split_first() else {
            return Err(VecinoError::Other(format!(
                "no neighbors voted against '{}'",
                self.dataset
            )));
        };
        let mut winner = first;
        for &(label, count) in rest {
            if count > winner.1 {
                winner = (label, count);
            }
        }
        Ok(winner.0.to_string())
    }
}
