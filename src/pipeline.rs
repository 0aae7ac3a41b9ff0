//! End-to-end orchestration of the classifier comparison.
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;

use crate::config::{LoaderConfig, ModelConfig, ModelType, SplitConfig};
use crate::data_handling::TrainTestSplit;
use crate::evaluation::{self, EvaluationResult};
use crate::io::load_image_dataset;
use crate::models::classifier_trait::BinaryClassifier;
use crate::models::factory;
use crate::report;

/// Full configuration for one screening run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub loader: LoaderConfig,
    pub split: SplitConfig,
    /// Models to compare; when empty, the four default families are used.
    pub models: Vec<ModelConfig>,
    /// Where to write the chart/report/CSV artifacts; `None` skips writing.
    pub output_dir: Option<PathBuf>,
}

/// All evaluation results of a finished run.
#[derive(Debug, Clone)]
pub struct ScreeningOutcome {
    pub results: Vec<EvaluationResult>,
    pub baseline: EvaluationResult,
}

/// Drives the pipeline: load, split, fit and evaluate every configured
/// model, then report. Stages run strictly in sequence and each consumes
/// only the output of the previous one.
pub struct ScreeningPipeline {
    config: PipelineConfig,
}

impl ScreeningPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        ScreeningPipeline { config }
    }

    /// The four families of the standard comparison, with their default
    /// hyperparameters.
    pub fn default_models() -> Vec<ModelConfig> {
        ["logistic_regression", "random_forest", "knn", "naive_bayes"]
            .iter()
            .map(|name| ModelConfig::new(name.parse::<ModelType>().expect("known model name")))
            .collect()
    }

    pub fn run(&self) -> Result<ScreeningOutcome> {
        let dataset = load_image_dataset(&self.config.loader)?;
        dataset.log_summary();

        let split = TrainTestSplit::new(
            &dataset,
            self.config.split.test_fraction,
            self.config.split.seed,
        )?;
        log::info!(
            "Split {} samples into {} train / {} test (fraction {}, seed {})",
            dataset.n_samples(),
            split.train.n_samples(),
            split.test.n_samples(),
            self.config.split.test_fraction,
            self.config.split.seed
        );

        let baseline = evaluation::random_baseline(&split.test.y, &dataset.class_names)?;

        let model_configs = if self.config.models.is_empty() {
            Self::default_models()
        } else {
            self.config.models.clone()
        };

        let mut results = Vec::with_capacity(model_configs.len());
        for model_config in model_configs {
            let mut model = factory::build_model(model_config);
            let started = Instant::now();
            model.fit(&split.train.x, &split.train.y)?;
            log::info!(
                "Fitted {} on {} samples in {:.2?}",
                model.name(),
                split.train.n_samples(),
                started.elapsed()
            );

            let proba = model.predict_proba(&split.test.x)?;
            let scores = evaluation::positive_scores(&proba);
            let predictions = model.predict(&split.test.x)?;
            let result = evaluation::evaluate_predictions(
                model.name(),
                &split.test.y,
                &scores,
                &predictions,
                &dataset.class_names,
            )?;
            log::info!("{} test AUROC = {:.3}", result.model_name, result.auroc);
            results.push(result);
        }

        report::print_summary(&results, &baseline);
        if let Some(output_dir) = &self.config.output_dir {
            report::write_artifacts(output_dir, &results, &baseline)?;
        }

        Ok(ScreeningOutcome { results, baseline })
    }
}
