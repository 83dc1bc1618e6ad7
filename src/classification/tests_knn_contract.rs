// =========================================================================
// FALSIFY-KNN: contract tests for the k-NN rule and the metric axioms.
//
// References:
//   - Cover & Hart (1967) "Nearest Neighbor Pattern Classification"
// =========================================================================

use crate::classification::{DistanceMetric, Hyperparameter};
use crate::dataset::{SplitStrategy, TrainingData};
use crate::sample::Sample;
use std::collections::HashMap;

const ALL_METRICS: [DistanceMetric; 4] = [
    DistanceMetric::Euclidean,
    DistanceMetric::Manhattan,
    DistanceMetric::Chebyshev,
    DistanceMetric::Sorensen,
];

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

fn clusters() -> TrainingData {
    let mut data = TrainingData::new("clusters").with_split(SplitStrategy::Stride(4));
    data.load(
        [
            ([0.0, 0.0, 0.0, 0.0], "low"),
            ([0.1, 0.1, 0.0, 0.1], "low"),
            ([0.2, 0.0, 0.1, 0.0], "low"),
            ([0.1, 0.0, 0.1, 0.1], "low"),
            ([9.0, 9.0, 9.0, 9.0], "high"),
            ([9.1, 9.1, 9.0, 9.1], "high"),
            ([9.2, 9.0, 9.1, 9.0], "high"),
            ([9.1, 9.0, 9.1, 9.1], "high"),
        ]
        .iter()
        .map(|(m, s)| record(*m, s)),
    )
    .expect("rows parse");
    data
}

/// FALSIFY-KNN-001: classification is deterministic
#[test]
fn falsify_knn_001_deterministic() {
    let data = clusters();
    let parameter = Hyperparameter::new(3, &data).expect("loaded");
    let query = Sample::unknown([0.15, 0.05, 0.05, 0.05]);

    let first = parameter.classify(&query).expect("classify");
    let second = parameter.classify(&query).expect("classify");
    assert_eq!(
        first, second,
        "FALSIFIED KNN-001: classifications differ on same input"
    );
}

/// FALSIFY-KNN-002: the assigned label comes from the training label set
#[test]
fn falsify_knn_002_label_in_training_set() {
    let data = clusters();
    let parameter = Hyperparameter::new(3, &data).expect("loaded");

    let label = parameter
        .classify(&Sample::unknown([4.0, 4.0, 4.0, 4.0]))
        .expect("classify");
    assert!(
        label == "low" || label == "high",
        "FALSIFIED KNN-002: label {label:?} not in training set"
    );
}

/// FALSIFY-KNN-003: well-separated clusters score perfect quality
#[test]
fn falsify_knn_003_separable_clusters() {
    let mut data = clusters();
    let parameter = Hyperparameter::new(3, &data).expect("loaded");

    let quality = data.test(parameter).expect("evaluation succeeds");
    assert_eq!(
        quality, 1.0,
        "FALSIFIED KNN-003: cannot classify well-separated clusters"
    );
}

/// FALSIFY-KNN-004: every metric agrees on separable data at k=1
#[test]
fn falsify_knn_004_metric_swap_changes_nothing_else() {
    let data = clusters();
    for metric in ALL_METRICS {
        let parameter = Hyperparameter::new(1, &data)
            .expect("loaded")
            .with_metric(metric);
        let label = parameter
            .classify(&Sample::unknown([8.9, 9.0, 9.1, 9.0]))
            .expect("classify");
        assert_eq!(label, "high", "FALSIFIED KNN-004: {metric:?} disagrees");
    }
}

mod proptests {
    use super::{DistanceMetric, Sample, ALL_METRICS};
    use crate::error::VecinoError;
    use proptest::prelude::*;

    fn positive_vec() -> impl Strategy<Value = [f32; 4]> {
        prop::array::uniform4(0.0_f32..100.0)
    }

    fn any_vec() -> impl Strategy<Value = [f32; 4]> {
        prop::array::uniform4(-100.0_f32..100.0)
    }

    proptest! {
        /// d(x, x) = 0 for every metric, whatever the sign of the inputs.
        #[test]
        fn prop_self_distance_zero(m in any_vec()) {
            let x = Sample::unknown(m);
            for metric in ALL_METRICS {
                let d = metric.distance(&x, &x).expect("defined on x == x");
                prop_assert_eq!(d, 0.0, "{:?}", metric);
            }
        }

        /// d(x, y) = d(y, x) for every metric.
        #[test]
        fn prop_symmetry(a in positive_vec(), b in positive_vec()) {
            let x = Sample::unknown(a);
            let y = Sample::unknown(b);
            for metric in ALL_METRICS {
                let xy = metric.distance(&x, &y).expect("defined");
                let yx = metric.distance(&y, &x).expect("defined");
                prop_assert_eq!(xy, yx, "{:?}", metric);
            }
        }

        /// d(x, y) >= 0 for every metric; where a metric is undefined it
        /// must signal rather than go negative.
        #[test]
        fn prop_non_negative(a in any_vec(), b in any_vec()) {
            let x = Sample::unknown(a);
            let y = Sample::unknown(b);
            for metric in ALL_METRICS {
                match metric.distance(&x, &y) {
                    Ok(d) => prop_assert!(d >= 0.0, "{:?}: d = {}", metric, d),
                    Err(e) => prop_assert!(
                        matches!(e, VecinoError::DegenerateInput { .. }),
                        "{:?}: unexpected error {}",
                        metric, e
                    ),
                }
            }
        }

        /// Triangle inequality for the true metrics (small float slack).
        #[test]
        fn prop_triangle_inequality(
            a in any_vec(),
            b in any_vec(),
            c in any_vec(),
        ) {
            let x = Sample::unknown(a);
            let y = Sample::unknown(b);
            let z = Sample::unknown(c);
            for metric in [
                DistanceMetric::Euclidean,
                DistanceMetric::Manhattan,
                DistanceMetric::Chebyshev,
            ] {
                let xz = metric.distance(&x, &z).expect("defined");
                let xy = metric.distance(&x, &y).expect("defined");
                let yz = metric.distance(&y, &z).expect("defined");
                let slack = 1e-3 * (1.0 + xy + yz);
                prop_assert!(
                    xz <= xy + yz + slack,
                    "{:?}: d(x,z)={} > d(x,y)+d(y,z)={}",
                    metric, xz, xy + yz
                );
            }
        }

        /// Sorensen stays in [0, 1] on non-negative measurements.
        #[test]
        fn prop_sorensen_bounded(a in positive_vec(), b in positive_vec()) {
            let x = Sample::unknown(a);
            let y = Sample::unknown(b);
            let d = DistanceMetric::Sorensen.distance(&x, &y).expect("defined");
            prop_assert!((0.0..=1.0 + 1e-6).contains(&d), "d = {}", d);
        }
    }
}
