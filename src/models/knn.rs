use anyhow::Result;
use linfa_nn::distance::L2Dist;
use linfa_nn::{CommonNearestNeighbour, NearestNeighbour};
use ndarray::{Array1, Array2};

use crate::config::{ModelConfig, ModelType};
use crate::error::PipelineError;
use crate::models::classifier_trait::BinaryClassifier;

/// K-nearest-neighbors classifier.
///
/// `fit` stores the training set; prediction runs a K-d tree search
/// (`linfa-nn`) over it and scores each sample by the fraction of its k
/// nearest training neighbors with label 1.
pub struct KnnClassifier {
    train_x: Option<Array2<f64>>,
    train_y: Option<Array1<u8>>,
    config: ModelConfig,
}

impl KnnClassifier {
    pub fn new(config: ModelConfig) -> Self {
        KnnClassifier {
            train_x: None,
            train_y: None,
            config,
        }
    }

    fn n_neighbors(&self) -> Result<usize> {
        let ModelType::Knn { n_neighbors } = &self.config.model_type else {
            return Err(PipelineError::InvalidArgument(format!(
                "expected KNN hyperparameters, got {:?}",
                self.config.model_type
            ))
            .into());
        };
        Ok(*n_neighbors)
    }
}

impl BinaryClassifier for KnnClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &Array1<u8>) -> Result<()> {
        let k = self.n_neighbors()?;
        if k == 0 || k > x.nrows() {
            return Err(PipelineError::InvalidArgument(format!(
                "n_neighbors must lie in 1..={}, got {}",
                x.nrows(),
                k
            ))
            .into());
        }

        self.train_x = Some(x.mapv(|v| v as f64));
        self.train_y = Some(y.clone());
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Result<Array2<f32>> {
        let train_x = self
            .train_x
            .as_ref()
            .ok_or(PipelineError::InvalidState("KNN queried before fit"))?;
        let train_y = self
            .train_y
            .as_ref()
            .ok_or(PipelineError::InvalidState("KNN queried before fit"))?;
        let k = self.n_neighbors()?;

        let index = CommonNearestNeighbour::KdTree
            .from_batch(train_x, L2Dist)
            .map_err(|e| anyhow::anyhow!("failed to build neighbor index: {}", e))?;

        let queries = x.mapv(|v| v as f64);
        let mut proba = Array2::zeros((x.nrows(), 2));
        for (i, row) in queries.outer_iter().enumerate() {
            let neighbors = index
                .k_nearest(row, k)
                .map_err(|e| anyhow::anyhow!("neighbor query failed: {}", e))?;
            let positive = neighbors
                .iter()
                .filter(|(_, idx)| train_y[*idx] == 1)
                .count();
            let p1 = positive as f32 / k as f32;
            proba[(i, 1)] = p1;
            proba[(i, 0)] = 1.0 - p1;
        }
        Ok(proba)
    }

    fn name(&self) -> &str {
        "KNN"
    }
}
