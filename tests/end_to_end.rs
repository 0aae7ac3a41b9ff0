//! Scaled-down end-to-end run: generated images through load, split, all
//! four families, and evaluation.

use std::fs;
use std::path::Path;

use cytoscreen_classifiers::config::{LoaderConfig, ModelConfig, ModelType, SplitConfig};
use cytoscreen_classifiers::data_handling::TrainTestSplit;
use cytoscreen_classifiers::evaluation::{self, positive_scores};
use cytoscreen_classifiers::io::load_image_dataset;
use cytoscreen_classifiers::models::classifier_trait::BinaryClassifier;
use cytoscreen_classifiers::models::factory;
use image::{Rgb, RgbImage};
use tempfile::tempdir;

fn write_class_images(dir: &Path, count: usize, base: [u8; 3]) {
    fs::create_dir_all(dir).unwrap();
    for i in 0..count {
        let jitter = (i * 11 % 24) as u8;
        let img = RgbImage::from_fn(8, 8, |x, y| {
            let texture = ((x * y) % 8) as u8;
            Rgb([
                base[0].saturating_add(jitter),
                base[1].saturating_add(texture),
                base[2].saturating_add(jitter / 2),
            ])
        });
        img.save(dir.join(format!("cell_{:03}.png", i))).unwrap();
    }
}

fn small_configs() -> Vec<ModelConfig> {
    vec![
        ModelConfig::new(ModelType::LogisticRegression {
            max_iterations: 300,
            gradient_tolerance: 1e-6,
        }),
        ModelConfig::new(ModelType::RandomForest {
            n_trees: 20,
            max_depth: Some(8),
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

#[test]
fn full_run_beats_the_chance_baseline() {
    let root = tempdir().unwrap();
    // Parasitized-style dark stained cells vs bright uninfected ones.
    write_class_images(&root.path().join("parasitized"), 30, [60, 20, 30]);
    write_class_images(&root.path().join("uninfected"), 30, [200, 210, 190]);

    let loader = LoaderConfig {
        root_dir: root.path().to_path_buf(),
        image_width: 8,
        image_height: 8,
        sample_cap: None,
        shuffle_seed: 0,
    };
    let split_config = SplitConfig {
        test_fraction: 0.2,
        seed: 0,
    };

    let dataset = load_image_dataset(&loader).unwrap();
    assert_eq!(dataset.n_samples(), 60);

    let split = TrainTestSplit::new(&dataset, split_config.test_fraction, split_config.seed)
        .unwrap();
    assert_eq!(split.test.n_samples(), 12); // round(0.2 * 60)
    assert_eq!(split.train.n_samples(), 48);

    let baseline = evaluation::random_baseline(&split.test.y, &dataset.class_names).unwrap();
    assert!((baseline.auroc - 0.5).abs() < 1e-6);

    for config in small_configs() {
        let mut model = factory::build_model(config);
        model.fit(&split.train.x, &split.train.y).unwrap();

        let proba = model.predict_proba(&split.test.x).unwrap();
        let predictions = model.predict(&split.test.x).unwrap();
        let result = evaluation::evaluate_predictions(
            model.name(),
            &split.test.y,
            &positive_scores(&proba),
            &predictions,
            &dataset.class_names,
        )
        .unwrap();

        // Regression guard: a broken trainer degenerates to chance level.
        assert!(
            result.auroc > baseline.auroc,
            "{} scored AUROC {:.3}, not better than the {:.3} baseline",
            result.model_name,
            result.auroc,
            baseline.auroc
        );

        let support_sum: usize = result.report.classes.iter().map(|(_, m)| m.support).sum();
        assert_eq!(support_sum, split.test.n_samples());
    }
}
