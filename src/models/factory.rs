use crate::config::{ModelConfig, ModelType};
use crate::models::classifier_trait::BinaryClassifier;

/// Build a boxed classifier from a `ModelConfig`.
/// Currently this is a thin factory implemented as a single function.
pub fn build_model(config: ModelConfig) -> Box<dyn BinaryClassifier> {
    match config.model_type {
        ModelType::LogisticRegression { .. } => Box::new(
            crate::models::logistic_regression::LogisticRegressionClassifier::new(config),
        ),

        ModelType::RandomForest { .. } => {
            Box::new(crate::models::random_forest::RandomForestClassifier::new(config))
        }

        ModelType::Knn { .. } => Box::new(crate::models::knn::KnnClassifier::new(config)),

        ModelType::GaussianNb { .. } => {
            Box::new(crate::models::naive_bayes::GaussianNbClassifier::new(config))
        }
    }
}
