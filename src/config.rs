use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Central configuration for models in the crate.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ModelConfig {
    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported classifier families and their hyper-parameters.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub enum ModelType {
    LogisticRegression {
        max_iterations: u64,
        gradient_tolerance: f64,
    },
    RandomForest {
        n_trees: usize,
        /// `None` grows trees until leaves are pure.
        max_depth: Option<usize>,
        min_samples_leaf: usize,
        /// "entropy" or "gini".
        criterion: String,
        seed: u64,
    },
    Knn {
        n_neighbors: usize,
    },
    GaussianNb {
        var_smoothing: f64,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::RandomForest {
            n_trees: 500,
            max_depth: None,
            min_samples_leaf: 1,
            criterion: "entropy".to_string(),
            seed: 50,
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "logistic_regression" | "logreg" => Ok(ModelType::LogisticRegression {
                max_iterations: 5000,
                gradient_tolerance: 1e-4,
            }),
            "random_forest" | "rf" => Ok(ModelType::default()),
            "knn" => Ok(ModelType::Knn { n_neighbors: 2 }),
            "naive_bayes" | "gaussian_nb" => Ok(ModelType::GaussianNb {
                var_smoothing: 1e-9,
            }),
            _ => Err(format!(
                "Unknown model type: {}. Valid options are: logistic_regression, random_forest, knn, naive_bayes",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(model_type: ModelType) -> Self {
        Self { model_type }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_type: ModelType::default(),
        }
    }
}

/// Configuration for the image-directory loader.
///
/// `sample_cap` bounds how many images are drawn from the shuffled candidate
/// list. The standard screening run caps at 5000 of the 27558 archive images
/// for speed, and the cap materially affects reported AUROC values, so it is
/// configuration rather than a constant.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoaderConfig {
    pub root_dir: PathBuf,
    pub image_width: u32,
    pub image_height: u32,
    pub sample_cap: Option<usize>,
    pub shuffle_seed: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("cell_images"),
            image_width: 32,
            image_height: 32,
            sample_cap: None,
            shuffle_seed: 0,
        }
    }
}

/// Configuration for the deterministic train/test split.
#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
pub struct SplitConfig {
    /// Fraction of samples assigned to the test subset, in (0, 1).
    pub test_fraction: f32,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 0,
        }
    }
}
