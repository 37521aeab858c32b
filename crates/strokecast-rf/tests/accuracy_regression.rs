//! Accuracy regression tests for strokecast-rf.
//!
//! These tests verify that algorithmic changes do not degrade ensemble
//! behavior on deterministic synthetic datasets shaped like the stroke
//! records (7 features, imbalanced binary labels).

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use strokecast_rf::{Dataset, RandomForest};

const N_FEATURES: usize = 7;

/// Rows for one class: feature 0 is `base + noise`, the rest pure noise.
fn class_rows(
    n: usize,
    base: f64,
    spread: f64,
    label: f64,
    rng: &mut ChaCha8Rng,
) -> Vec<Vec<f64>> {
    (0..n)
        .map(|_| {
            let mut row: Vec<f64> = (0..N_FEATURES)
                .map(|f| {
                    if f == 0 {
                        base + rng.r#gen::<f64>() * spread
                    } else {
                        rng.r#gen::<f64>() * 0.5
                    }
                })
                .collect();
            row.push(label);
            row
        })
        .collect()
}

/// Fully separated classes, 80/20 imbalance: 150 train rows, 50 test rows.
fn separated_imbalanced() -> (Dataset, Dataset) {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let mut train = class_rows(120, 0.0, 0.5, 0.0, &mut rng);
    train.extend(class_rows(30, 10.0, 0.5, 1.0, &mut rng));
    let mut test = class_rows(40, 0.0, 0.5, 0.0, &mut rng);
    test.extend(class_rows(10, 10.0, 0.5, 1.0, &mut rng));

    (
        Dataset::from_rows(train).unwrap(),
        Dataset::from_rows(test).unwrap(),
    )
}

/// Overlapping class ranges on feature 0, so no single threshold
/// separates the classes and trees must nest imperfect splits.
fn overlapping_classes() -> (Dataset, Dataset) {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let mut train = class_rows(100, 0.0, 10.0, 0.0, &mut rng);
    train.extend(class_rows(25, 5.0, 10.0, 1.0, &mut rng));
    let mut test = class_rows(32, 0.0, 10.0, 0.0, &mut rng);
    test.extend(class_rows(8, 5.0, 10.0, 1.0, &mut rng));

    (
        Dataset::from_rows(train).unwrap(),
        Dataset::from_rows(test).unwrap(),
    )
}

#[test]
fn separated_imbalanced_accuracy_above_threshold() {
    let (train, test) = separated_imbalanced();
    let mut forest = RandomForest::new(50).unwrap().with_seed(42);
    forest.train(&train).unwrap();

    let accuracy = forest.evaluate(&test).unwrap();
    assert!(accuracy > 0.75, "holdout accuracy {accuracy} <= 0.75");
}

#[test]
fn overlapping_classes_accuracy_above_threshold() {
    let (train, test) = overlapping_classes();
    let mut forest = RandomForest::new(50).unwrap().with_seed(42);
    forest.train(&train).unwrap();

    let accuracy = forest.evaluate(&test).unwrap();
    assert!(accuracy > 0.6, "holdout accuracy {accuracy} <= 0.6");
}

#[test]
fn accuracy_is_a_ratio() {
    let (train, test) = overlapping_classes();
    let mut forest = RandomForest::new(20).unwrap().with_seed(42);
    forest.train(&train).unwrap();

    let accuracy = forest.evaluate(&test).unwrap();
    assert!((0.0..=1.0).contains(&accuracy));
}

#[test]
fn deterministic_predictions() {
    let (train, test) = overlapping_classes();

    let mut forest_a = RandomForest::new(30).unwrap().with_seed(42);
    forest_a.train(&train).unwrap();
    let mut forest_b = RandomForest::new(30).unwrap().with_seed(42);
    forest_b.train(&train).unwrap();

    for i in 0..test.len() {
        assert_eq!(
            forest_a.predict(test.features(i)).unwrap(),
            forest_b.predict(test.features(i)).unwrap(),
            "predictions differ across runs with the same seed"
        );
    }
}

#[test]
fn predictions_are_binary_on_unseen_inputs() {
    let (train, _) = overlapping_classes();
    let mut forest = RandomForest::new(10).unwrap().with_seed(42);
    forest.train(&train).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(123);
    for _ in 0..50 {
        let features: Vec<f64> = (0..N_FEATURES)
            .map(|_| (rng.r#gen::<f64>() - 0.5) * 1e4)
            .collect();
        let label = forest.predict(&features).unwrap();
        assert!(label == 0 || label == 1);
    }
}
