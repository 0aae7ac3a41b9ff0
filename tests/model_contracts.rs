//! Contract tests shared by all four classifier families.

use cytoscreen_classifiers::config::{ModelConfig, ModelType};
use cytoscreen_classifiers::evaluation::{positive_scores, roc_auc_score};
use cytoscreen_classifiers::models::classifier_trait::BinaryClassifier;
use cytoscreen_classifiers::models::factory;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Two well-separated noisy clusters, one per class.
fn separable_dataset(n_per_class: usize, n_features: usize, seed: u64) -> (Array2<f32>, Array1<u8>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = 2 * n_per_class;
    let mut values = Vec::with_capacity(n * n_features);
    let mut labels = Vec::with_capacity(n);
    for class in 0..2u8 {
        let center = class as f32 * 2.0;
        for _ in 0..n_per_class {
            for _ in 0..n_features {
                values.push(center + rng.gen_range(-0.5..0.5));
            }
            labels.push(class);
        }
    }
    (
        Array2::from_shape_vec((n, n_features), values).unwrap(),
        Array1::from_vec(labels),
    )
}

fn comparison_configs() -> Vec<ModelConfig> {
    vec![
        ModelConfig::new(ModelType::LogisticRegression {
            max_iterations: 300,
            gradient_tolerance: 1e-6,
        }),
        ModelConfig::new(ModelType::RandomForest {
            n_trees: 30,
            max_depth: Some(10),
            min_samples_leaf: 1,
            criterion: "entropy".to_string(),
            seed: 50,
        }),
        ModelConfig::new(ModelType::Knn { n_neighbors: 3 }),
        ModelConfig::new(ModelType::GaussianNb {
            var_smoothing: 1e-9,
        }),
    ]
}

// ---------------------------------------------------------------------------
// predict_proba rows are probability distributions
// ---------------------------------------------------------------------------

#[test]
fn probability_rows_sum_to_one_for_every_family() {
    let (x, y) = separable_dataset(20, 5, 1);

    for config in comparison_configs() {
        let mut model = factory::build_model(config);
        model.fit(&x, &y).unwrap();
        let proba = model.predict_proba(&x).unwrap();

        assert_eq!(proba.nrows(), x.nrows(), "{}", model.name());
        assert_eq!(proba.ncols(), 2, "{}", model.name());
        for row in proba.outer_iter() {
            let sum = row[0] + row[1];
            assert!(
                (sum - 1.0).abs() < 1e-6,
                "{} produced a row summing to {}",
                model.name(),
                sum
            );
        }
    }
}

// ---------------------------------------------------------------------------
// every family beats the chance baseline on separable data
// ---------------------------------------------------------------------------

#[test]
fn every_family_beats_chance_on_separable_data() {
    let (x, y) = separable_dataset(25, 4, 2);

    for config in comparison_configs() {
        let mut model = factory::build_model(config);
        model.fit(&x, &y).unwrap();
        let proba = model.predict_proba(&x).unwrap();
        let auroc = roc_auc_score(&y, &positive_scores(&proba)).unwrap();
        assert!(
            auroc > 0.5,
            "{} scored AUROC {} on separable data",
            model.name(),
            auroc
        );
    }
}

// ---------------------------------------------------------------------------
// querying before fit is an invalid-state error
// ---------------------------------------------------------------------------

#[test]
fn querying_before_fit_fails_for_every_family() {
    let x = Array2::zeros((3, 4));

    for config in comparison_configs() {
        let model = factory::build_model(config);
        let err = model.predict_proba(&x).unwrap_err();
        assert!(
            err.to_string().contains("invalid state"),
            "{} reported: {}",
            model.name(),
            err
        );
        let err = model.predict(&x).unwrap_err();
        assert!(err.to_string().contains("invalid state"));
    }
}

// ---------------------------------------------------------------------------
// predictions agree with the arg-max of the probabilities
// ---------------------------------------------------------------------------

#[test]
fn predict_is_argmax_of_predict_proba() {
    let (x, y) = separable_dataset(15, 3, 3);

    for config in comparison_configs() {
        let mut model = factory::build_model(config);
        model.fit(&x, &y).unwrap();
        let proba = model.predict_proba(&x).unwrap();
        let preds = model.predict(&x).unwrap();

        for (row, &pred) in proba.outer_iter().zip(preds.iter()) {
            let argmax = if row[1] > row[0] { 1u8 } else { 0u8 };
            assert_eq!(pred, argmax, "{}", model.name());
        }
    }
}
