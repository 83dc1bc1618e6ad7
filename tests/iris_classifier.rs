//! End-to-end workflow: load a labeled dataset, sweep a hyperparameter
//! grid, and run production inference with the best configuration.

use std::collections::HashMap;
use vecino::prelude::*;

fn record(measurements: [f32; 4], species: &str) -> HashMap<String, String> {
    let keys = ["sepal_length", "sepal_width", "petal_length", "petal_width"];
    let mut row: HashMap<String, String> = keys
        .iter()
        .zip(measurements)
        .map(|(key, value)| ((*key).to_string(), value.to_string()))
        .collect();
    row.insert("species".to_string(), species.to_string());
    row
}

fn iris_records() -> Vec<HashMap<String, String>> {
    [
        ([5.0, 3.5, 1.4, 0.2], "setosa"),
        ([4.9, 3.0, 1.4, 0.2], "setosa"),
        ([5.1, 3.8, 1.5, 0.3], "setosa"),
        ([4.7, 3.2, 1.3, 0.2], "setosa"),
        ([5.2, 3.5, 1.5, 0.2], "setosa"),
        ([6.0, 2.8, 4.5, 1.4], "versicolor"),
        ([6.1, 2.9, 4.7, 1.4], "versicolor"),
        ([5.9, 3.0, 4.2, 1.5], "versicolor"),
        ([6.2, 2.8, 4.8, 1.8], "versicolor"),
        ([6.0, 2.7, 4.4, 1.3], "versicolor"),
        ([6.6, 3.0, 5.8, 2.2], "virginica"),
        ([6.7, 3.1, 5.6, 2.4], "virginica"),
        ([6.5, 3.0, 5.9, 2.1], "virginica"),
        ([6.8, 3.2, 5.7, 2.3], "virginica"),
        ([6.4, 2.8, 5.6, 2.2], "virginica"),
    ]
    .iter()
    .map(|(m, s)| record(*m, s))
    .collect()
}

#[test]
fn full_tuning_and_inference_workflow() {
    let mut data = TrainingData::new("iris").with_split(SplitStrategy::Stride(5));
    data.load(iris_records()).expect("all records parse");

    // Rows 4, 9, 14 went to testing: one sample per species
    assert_eq!(data.training().len(), 12);
    assert_eq!(data.testing().len(), 3);
    assert!(data.uploaded_at().is_some());

    // Sweep every metric at several neighbor counts
    let metrics = [
        DistanceMetric::Euclidean,
        DistanceMetric::Manhattan,
        DistanceMetric::Chebyshev,
        DistanceMetric::Sorensen,
    ];
    let mut grid = Vec::new();
    for k in [1, 3, 5] {
        for metric in metrics {
            grid.push(
                Hyperparameter::new(k, &data)
                    .expect("dataset loaded")
                    .with_metric(metric),
            );
        }
    }

    let outcomes = data.tune(grid);
    assert_eq!(outcomes.len(), 12);
    for outcome in &outcomes {
        let quality = *outcome.as_ref().expect("well-formed configuration");
        assert!((0.0..=1.0).contains(&quality));
    }
    assert_eq!(data.tuning_history().len(), 12);
    assert!(data.last_tested_at().is_some());

    // The clusters are clean, so the best configuration is perfect
    let best = data
        .tuning_history()
        .iter()
        .max_by(|a, b| {
            a.quality()
                .expect("evaluated")
                .total_cmp(&b.quality().expect("evaluated"))
        })
        .expect("history is non-empty")
        .clone();
    assert_eq!(best.quality(), Some(1.0));

    // Production inference on unknown samples
    let query = data
        .classify(&best, Sample::unknown([5.1, 3.4, 1.4, 0.3]))
        .expect("classification succeeds");
    assert_eq!(query.assigned_label(), Some("setosa"));
    assert!(!query.is_known());

    let query = data
        .classify(&best, Sample::unknown([6.6, 3.1, 5.7, 2.2]))
        .expect("classification succeeds");
    assert_eq!(query.assigned_label(), Some("virginica"));
}

#[test]
fn evaluation_is_repeatable() {
    let mut data = TrainingData::new("iris").with_split(SplitStrategy::Stride(5));
    data.load(iris_records()).expect("all records parse");

    let mut parameter = Hyperparameter::new(3, &data).expect("dataset loaded");
    let first = parameter.test().expect("evaluation succeeds");
    let second = parameter.test().expect("evaluation succeeds");
    assert_eq!(first, second);
}

#[test]
fn discarded_dataset_fails_cleanly() {
    let mut data = TrainingData::new("iris").with_split(SplitStrategy::Stride(5));
    data.load(iris_records()).expect("all records parse");
    let mut parameter = Hyperparameter::new(3, &data).expect("dataset loaded");
    drop(data);

    let err = parameter.test().unwrap_err();
    assert!(matches!(err, VecinoError::ExpiredReference { .. }));
}

#[test]
fn oversized_k_is_a_configuration_error() {
    let mut data = TrainingData::new("iris").with_split(SplitStrategy::Stride(5));
    data.load(iris_records()).expect("all records parse");

    let oversized = Hyperparameter::new(50, &data).expect("dataset loaded");
    let err = data.test(oversized).unwrap_err();
    assert!(matches!(err, VecinoError::InvalidHyperparameter { .. }));
    assert!(data.tuning_history().is_empty());
}
