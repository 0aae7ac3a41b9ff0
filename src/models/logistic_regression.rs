use anyhow::Result;
use linfa::prelude::*;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::{Array1, Array2};

use crate::config::{ModelConfig, ModelType};
use crate::error::PipelineError;
use crate::models::classifier_trait::BinaryClassifier;

/// Logistic regression classifier backed by `linfa-logistic`.
pub struct LogisticRegressionClassifier {
    model: Option<FittedLogisticRegression<f64, usize>>,
    config: ModelConfig,
}

impl LogisticRegressionClassifier {
    pub fn new(config: ModelConfig) -> Self {
        LogisticRegressionClassifier {
            model: None,
            config,
        }
    }
}

impl BinaryClassifier for LogisticRegressionClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &Array1<u8>) -> Result<()> {
        let ModelType::LogisticRegression {
            max_iterations,
            gradient_tolerance,
        } = &self.config.model_type
        else {
            return Err(PipelineError::InvalidArgument(format!(
                "expected logistic-regression hyperparameters, got {:?}",
                self.config.model_type
            ))
            .into());
        };

        // linfa works in f64; the loader produces f32 features.
        let records = x.mapv(|v| v as f64);
        let targets: Array1<usize> = y.mapv(|v| v as usize);
        let dataset = Dataset::new(records, targets);

        let fitted = LogisticRegression::default()
            .max_iterations(*max_iterations)
            .gradient_tolerance(*gradient_tolerance)
            .fit(&dataset)?;

        self.model = Some(fitted);
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Result<Array2<f32>> {
        let model = self
            .model
            .as_ref()
            .ok_or(PipelineError::InvalidState(
                "logistic regression queried before fit",
            ))?;

        let records = x.mapv(|v| v as f64);
        // Probability of the larger class label, i.e. label 1.
        let positive = model.predict_probabilities(&records);

        let mut proba = Array2::zeros((x.nrows(), 2));
        for (i, &p) in positive.iter().enumerate() {
            proba[(i, 1)] = p as f32;
            proba[(i, 0)] = 1.0 - p as f32;
        }
        Ok(proba)
    }

    fn name(&self) -> &str {
        "Logistic Regression"
    }
}
