use anyhow::Result;
use ndarray::{Array1, Array2};
use statrs::distribution::{Continuous, Normal};

use crate::config::{ModelConfig, ModelType};
use crate::error::PipelineError;
use crate::models::classifier_trait::BinaryClassifier;

/// Per-class feature densities estimated at fit time.
struct ClassDensity {
    log_prior: f64,
    feature_normals: Vec<Normal>,
}

/// Gaussian naive Bayes classifier.
///
/// Fits one univariate Gaussian per feature and class, with every variance
/// floored by `var_smoothing` times the largest overall feature variance.
/// Posterior probabilities come from the normalized joint log-likelihoods.
pub struct GaussianNbClassifier {
    densities: Option<[ClassDensity; 2]>,
    config: ModelConfig,
}

impl GaussianNbClassifier {
    pub fn new(config: ModelConfig) -> Self {
        GaussianNbClassifier {
            densities: None,
            config,
        }
    }
}

impl BinaryClassifier for GaussianNbClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &Array1<u8>) -> Result<()> {
        let ModelType::GaussianNb { var_smoothing } = &self.config.model_type else {
            return Err(PipelineError::InvalidArgument(format!(
                "expected Gaussian naive Bayes hyperparameters, got {:?}",
                self.config.model_type
            ))
            .into());
        };
        if *var_smoothing < 0.0 {
            return Err(PipelineError::InvalidArgument(format!(
                "var_smoothing must be non-negative, got {}",
                var_smoothing
            ))
            .into());
        }

        let n_samples = x.nrows();
        let n_features = x.ncols();

        // Stabilizing floor, proportional to the widest overall feature spread.
        let all_rows: Vec<usize> = (0..n_samples).collect();
        let max_overall_var = (0..n_features)
            .map(|j| column_variance(x, &all_rows, j))
            .fold(0.0f64, f64::max);
        let epsilon = (var_smoothing * max_overall_var).max(1e-12);

        let mut densities = Vec::with_capacity(2);
        for class in 0..2u8 {
            let members: Vec<usize> = (0..n_samples).filter(|&i| y[i] == class).collect();
            if members.is_empty() {
                return Err(PipelineError::InvalidArgument(format!(
                    "training data contains no samples of class {}",
                    class
                ))
                .into());
            }

            let log_prior = (members.len() as f64 / n_samples as f64).ln();
            let mut feature_normals = Vec::with_capacity(n_features);
            for j in 0..n_features {
                let mean = column_mean(x, &members, j);
                let std = (column_variance(x, &members, j) + epsilon).sqrt();
                let normal = Normal::new(mean, std).map_err(|e| {
                    anyhow::anyhow!("invalid gaussian for feature {}: {}", j, e)
                })?;
                feature_normals.push(normal);
            }
            densities.push(ClassDensity {
                log_prior,
                feature_normals,
            });
        }

        let negative = densities.remove(0);
        let positive = densities.remove(0);
        self.densities = Some([negative, positive]);
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Result<Array2<f32>> {
        let densities = self.densities.as_ref().ok_or(PipelineError::InvalidState(
            "Gaussian naive Bayes queried before fit",
        ))?;

        let mut proba = Array2::zeros((x.nrows(), 2));
        for (i, row) in x.outer_iter().enumerate() {
            let mut log_posterior = [0.0f64; 2];
            for (class, density) in densities.iter().enumerate() {
                let mut acc = density.log_prior;
                for (j, &value) in row.iter().enumerate() {
                    acc += density.feature_normals[j].ln_pdf(value as f64);
                }
                log_posterior[class] = acc;
            }

            // Normalize in log space to keep the row a proper distribution.
            let max = log_posterior[0].max(log_posterior[1]);
            let w0 = (log_posterior[0] - max).exp();
            let w1 = (log_posterior[1] - max).exp();
            let total = w0 + w1;
            proba[(i, 0)] = (w0 / total) as f32;
            proba[(i, 1)] = (w1 / total) as f32;
        }
        Ok(proba)
    }

    fn name(&self) -> &str {
        "Naive Bayes"
    }
}

fn column_mean(x: &Array2<f32>, rows: &[usize], col: usize) -> f64 {
    let sum: f64 = rows.iter().map(|&i| x[(i, col)] as f64).sum();
    sum / rows.len() as f64
}

fn column_variance(x: &Array2<f32>, rows: &[usize], col: usize) -> f64 {
    let mean = column_mean(x, rows, col);
    let ss: f64 = rows
        .iter()
        .map(|&i| {
            let d = x[(i, col)] as f64 - mean;
            d * d
        })
        .sum();
    ss / rows.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn nb_config() -> ModelConfig {
        ModelConfig::new(ModelType::GaussianNb {
            var_smoothing: 1e-9,
        })
    }

    #[test]
    fn separates_well_spread_gaussians() {
        let x = array![
            [0.0f32, 0.2],
            [0.2, 0.0],
            [0.1, 0.1],
            [0.2, 0.2],
            [2.0, 1.8],
            [1.8, 2.0],
            [1.9, 1.9],
            [2.1, 2.0],
        ];
        let y = array![0u8, 0, 0, 0, 1, 1, 1, 1];

        let mut clf = GaussianNbClassifier::new(nb_config());
        clf.fit(&x, &y).unwrap();

        let preds = clf.predict(&x).unwrap();
        assert_eq!(preds, y);

        let proba = clf.predict_proba(&x).unwrap();
        for row in proba.outer_iter() {
            assert!((row[0] + row[1] - 1.0).abs() < 1e-6);
            assert!(row[0] >= 0.0 && row[1] >= 0.0);
        }
    }

    #[test]
    fn rejects_single_class_training_data() {
        let x = array![[0.0f32, 0.0], [0.1, 0.1]];
        let y = array![0u8, 0];
        let mut clf = GaussianNbClassifier::new(nb_config());
        assert!(clf.fit(&x, &y).is_err());
    }

    #[test]
    fn predict_before_fit_is_invalid_state() {
        let clf = GaussianNbClassifier::new(nb_config());
        let x = Array2::zeros((1, 2));
        assert!(clf.predict_proba(&x).is_err());
    }
}
