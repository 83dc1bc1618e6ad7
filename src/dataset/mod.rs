//! Training data: a named train/test partition with tuning history.
//!
//! [`TrainingData`] owns a dataset split once, at load time, into a
//! training subset and a testing subset of labeled samples. Evaluating a
//! [`Hyperparameter`] against it appends to an append-only tuning history;
//! the partition itself is immutable after [`TrainingData::load`].
//!
//! Ingestion works on the in-memory shape of the data only: an ordered
//! sequence of string-keyed field maps. No file format is mandated.

use crate::classification::Hyperparameter;
use crate::error::{Result, VecinoError};
use crate::sample::Sample;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

/// Field names expected in a raw input record: four measurement keys and
/// one label key.
///
/// The default is the Iris schema (`sepal_length`, `sepal_width`,
/// `petal_length`, `petal_width`, `species`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    measurement_keys: [String; 4],
    label_key: String,
}

impl RecordSchema {
    /// Creates a schema from four measurement keys and a label key.
    #[must_use]
    pub fn new(measurement_keys: [&str; 4], label_key: &str) -> Self {
        Self {
            measurement_keys: measurement_keys.map(str::to_string),
            label_key: label_key.to_string(),
        }
    }

    /// The Iris flower schema used by the default dataset shape.
    #[must_use]
    pub fn iris() -> Self {
        Self::new(
            ["sepal_length", "sepal_width", "petal_length", "petal_width"],
            "species",
        )
    }

    /// Parses one raw record into a labeled sample.
    ///
    /// # Errors
    ///
    /// Returns [`VecinoError::Validation`] if a key is missing, a
    /// measurement is not a finite number, or the label is empty.
    fn parse_record(&self, row: usize, record: &HashMap<String, String>) -> Result<Sample> {
        let mut measurements = [0.0_f32; 4];
        for (slot, key) in measurements.iter_mut().zip(&self.measurement_keys) {
            let raw = record.get(key).ok_or_else(|| VecinoError::Validation {
                row,
                message: format!("missing field '{key}'"),
            })?;
            let value: f32 = raw.trim().parse().map_err(|_| VecinoError::Validation {
                row,
                message: format!("field '{key}' is not numeric: '{raw}'"),
            })?;
            if !value.is_finite() {
                return Err(VecinoError::Validation {
                    row,
                    message: format!("field '{key}' is not finite: '{raw}'"),
                });
            }
            *slot = value;
        }

        let label = record
            .get(&self.label_key)
            .ok_or_else(|| VecinoError::Validation {
                row,
                message: format!("missing field '{}'", self.label_key),
            })?;
        let label = label.trim();
        if label.is_empty() {
            return Err(VecinoError::Validation {
                row,
                message: format!("field '{}' is empty", self.label_key),
            });
        }
        Ok(Sample::known(measurements, label))
    }
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self::iris()
    }
}

/// How parsed records are partitioned into training and testing subsets.
///
/// The split rule is an explicit configuration parameter, never a hidden
/// constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SplitStrategy {
    /// Every n-th record goes to the testing subset, the rest to training.
    Stride(usize),
    /// Seeded shuffle split with the given testing fraction.
    Shuffled {
        /// Proportion of records to hold out for testing (0.0 to 1.0)
        test_fraction: f32,
        /// Random seed for reproducibility; `None` draws from the thread RNG
        seed: Option<u64>,
    },
}

impl Default for SplitStrategy {
    fn default() -> Self {
        SplitStrategy::Stride(5)
    }
}

/// A dataset partitioned into training and testing subsets.
///
/// Immutable once built; hyperparameters hold weak handles to it.
#[derive(Debug)]
pub struct Partition {
    pub(crate) training: Vec<Sample>,
    pub(crate) testing: Vec<Sample>,
}

/// A named set of training and testing samples with methods to load raw
/// records and to test hyperparameter configurations against them.
///
/// # Example
///
/// ```
/// use vecino::dataset::{SplitStrategy, TrainingData};
/// use std::collections::HashMap;
///
/// let record = |m: [f32; 4], species: &str| -> HashMap<String, String> {
///     let keys = ["sepal_length", "sepal_width", "petal_length", "petal_width"];
///     let mut row: HashMap<String, String> = keys
///         .iter()
///         .zip(m)
///         .map(|(k, v)| ((*k).to_string(), v.to_string()))
///         .collect();
///     row.insert("species".to_string(), species.to_string());
///     row
/// };
///
/// let mut data = TrainingData::new("iris").with_split(SplitStrategy::Stride(3));
/// data.load(vec![
///     record([5.0, 3.5, 1.3, 0.3], "setosa"),
///     record([4.9, 3.1, 1.5, 0.1], "setosa"),
///     record([6.0, 2.7, 5.1, 1.6], "versicolor"),
/// ]).expect("all records parse");
///
/// assert_eq!(data.training().len(), 2);
/// assert_eq!(data.testing().len(), 1);
/// ```
#[derive(Debug)]
pub struct TrainingData {
    name: String,
    schema: RecordSchema,
    split: SplitStrategy,
    uploaded_at: Option<SystemTime>,
    last_tested_at: Option<SystemTime>,
    partition: Option<Arc<Partition>>,
    tuning_history: Vec<Hyperparameter>,
}

impl TrainingData {
    /// Creates a named, empty dataset with the default Iris schema and
    /// stride-5 split.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: RecordSchema::default(),
            split: SplitStrategy::default(),
            uploaded_at: None,
            last_tested_at: None,
            partition: None,
            tuning_history: Vec::new(),
        }
    }

    /// Sets the split strategy. Takes effect at [`load`](Self::load) time.
    #[must_use]
    pub fn with_split(mut self, split: SplitStrategy) -> Self {
        self.split = split;
        self
    }

    /// Sets the record schema. Takes effect at [`load`](Self::load) time.
    #[must_use]
    pub fn with_schema(mut self, schema: RecordSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Returns the dataset name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the training subset (empty before load).
    #[must_use]
    pub fn training(&self) -> &[Sample] {
        self.partition.as_deref().map_or(&[], |p| &p.training)
    }

    /// Returns the testing subset (empty before load).
    #[must_use]
    pub fn testing(&self) -> &[Sample] {
        self.partition.as_deref().map_or(&[], |p| &p.testing)
    }

    /// Returns every hyperparameter evaluated against this dataset, in
    /// evaluation order.
    #[must_use]
    pub fn tuning_history(&self) -> &[Hyperparameter] {
        &self.tuning_history
    }

    /// When the dataset was loaded, if it has been.
    #[must_use]
    pub fn uploaded_at(&self) -> Option<SystemTime> {
        self.uploaded_at
    }

    /// When a hyperparameter was last evaluated, if one has been.
    #[must_use]
    pub fn last_tested_at(&self) -> Option<SystemTime> {
        self.last_tested_at
    }

    pub(crate) fn partition(&self) -> Option<&Arc<Partition>> {
        self.partition.as_ref()
    }

    /// Loads and partitions a sequence of raw labeled records.
    ///
    /// Loading is batch-atomic: any record that fails to parse fails the
    /// whole call with [`VecinoError::Validation`] and no partial
    /// partition is retained. On success the partition is fixed and the
    /// upload timestamp is stamped; a second load is rejected.
    ///
    /// # Errors
    ///
    /// - [`VecinoError::Validation`] for a malformed record
    /// - [`VecinoError::InvalidHyperparameter`] for an unusable split
    ///   configuration
    /// - [`VecinoError::DegenerateInput`] for an empty record sequence, or
    ///   a shuffle split that would leave a subset empty
    /// - [`VecinoError::Other`] if the dataset was already loaded
    pub fn load<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = HashMap<String, String>>,
    {
        if self.partition.is_some() {
            return Err(VecinoError::Other(format!(
                "dataset '{}' is already loaded, the partition is immutable",
                self.name
            )));
        }

        let mut samples = Vec::new();
        for (row, record) in records.into_iter().enumerate() {
            samples.push(self.schema.parse_record(row, &record)?);
        }
        if samples.is_empty() {
            return Err(VecinoError::DegenerateInput {
                message: format!("no records to load into '{}'", self.name),
            });
        }

        let (training, testing) = split_samples(samples, self.split)?;
        self.partition = Some(Arc::new(Partition { training, testing }));
        self.uploaded_at = Some(SystemTime::now());
        Ok(())
    }

    /// Evaluates one hyperparameter configuration and records the result.
    ///
    /// Delegates to [`Hyperparameter::test`], appends the evaluated
    /// configuration to the tuning history, and stamps the last-tested
    /// timestamp. A failed evaluation leaves the history and timestamp
    /// untouched.
    ///
    /// # Errors
    ///
    /// Propagates whatever [`Hyperparameter::test`] returns.
    pub fn test(&mut self, mut parameter: Hyperparameter) -> Result<f32> {
        let quality = parameter.test()?;
        self.tuning_history.push(parameter);
        self.last_tested_at = Some(SystemTime::now());
        Ok(quality)
    }

    /// Classifies one externally supplied sample with the given
    /// configuration's rule.
    ///
    /// This is the production inference entry point, distinct from
    /// [`test`](Self::test) which is evaluation-only. The sample comes
    /// back with its assigned label set; its true label, if any, is
    /// untouched.
    ///
    /// # Errors
    ///
    /// Propagates whatever [`Hyperparameter::classify`] returns.
    pub fn classify(&self, parameter: &Hyperparameter, mut sample: Sample) -> Result<Sample> {
        let label = parameter.classify(&sample)?;
        sample.classify(label);
        Ok(sample)
    }

    /// Evaluates a batch of configurations, in parallel, and records the
    /// outcomes.
    ///
    /// Returns one result per configuration in input order, so a sweep can
    /// skip failed configurations (an oversized `k`, say) without losing
    /// the rest. Successfully evaluated configurations are appended to the
    /// tuning history. Each evaluation scores its own copy of the testing
    /// samples, so running them concurrently is safe.
    pub fn tune(&mut self, mut parameters: Vec<Hyperparameter>) -> Vec<Result<f32>> {
        let outcomes: Vec<Result<f32>> = parameters
            .par_iter_mut()
            .map(Hyperparameter::test)
            .collect();

        let mut evaluated_any = false;
        for (parameter, outcome) in parameters.into_iter().zip(&outcomes) {
            if outcome.is_ok() {
                self.tuning_history.push(parameter);
                evaluated_any = true;
            }
        }
        if evaluated_any {
            self.last_tested_at = Some(SystemTime::now());
        }
        outcomes
    }
}

/// Partitions parsed samples per the configured strategy.
fn split_samples(
    samples: Vec<Sample>,
    split: SplitStrategy,
) -> Result<(Vec<Sample>, Vec<Sample>)> {
    match split {
        SplitStrategy::Stride(stride) => {
            if stride == 0 {
                return Err(VecinoError::InvalidHyperparameter {
                    param: "split.stride".to_string(),
                    value: "0".to_string(),
                    constraint: "stride >= 1".to_string(),
                });
            }
            let mut training = Vec::new();
            let mut testing = Vec::new();
            for (index, sample) in samples.into_iter().enumerate() {
                if (index + 1) % stride == 0 {
                    testing.push(sample);
                } else {
                    training.push(sample);
                }
            }
            Ok((training, testing))
        }
        SplitStrategy::Shuffled {
            test_fraction,
            seed,
        } => {
            if !(test_fraction > 0.0 && test_fraction < 1.0) {
                return Err(VecinoError::InvalidHyperparameter {
                    param: "split.test_fraction".to_string(),
                    value: test_fraction.to_string(),
                    constraint: "0 < test_fraction < 1".to_string(),
                });
            }
            let n_samples = samples.len();
            let n_test = (n_samples as f32 * test_fraction).round() as usize;
            let n_train = n_samples - n_test;
            if n_test == 0 || n_train == 0 {
                return Err(VecinoError::DegenerateInput {
                    message: format!(
                        "shuffle split would leave an empty subset \
                         (n_train={n_train}, n_test={n_test})"
                    ),
                });
            }

            let indices = shuffle_indices(n_samples, seed);
            let mut in_testing = vec![false; n_samples];
            for &index in &indices[n_train..] {
                in_testing[index] = true;
            }

            let mut training = Vec::with_capacity(n_train);
            let mut testing = Vec::with_capacity(n_test);
            for (index, sample) in samples.into_iter().enumerate() {
                if in_testing[index] {
                    testing.push(sample);
                } else {
                    training.push(sample);
                }
            }
            Ok((training, testing))
        }
    }
}

/// Shuffles indices with an optional random seed.
fn shuffle_indices(n_samples: usize, seed: Option<u64>) -> Vec<usize> {
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    let mut indices: Vec<usize> = (0..n_samples).collect();

    if let Some(seed) = seed {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);
    } else {
        let mut rng = rand::thread_rng();
        indices.shuffle(&mut rng);
    }

    indices
}
