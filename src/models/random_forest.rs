use anyhow::Result;
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::config::{ModelConfig, ModelType};
use crate::error::PipelineError;
use crate::models::classifier_trait::BinaryClassifier;

/// Random forest classifier: bagged CART trees with per-node feature
/// subsampling.
///
/// Each tree is grown on a bootstrap resample of the training set and splits
/// on the best threshold among sqrt(n_features) randomly drawn candidate
/// features. Probabilities are the mean of per-tree leaf class fractions,
/// so `predict_proba` rows always form a distribution.
///
/// Trees are trained in parallel; the parallelism is internal to `fit` and
/// does not change pipeline stage ordering.
pub struct RandomForestClassifier {
    trees: Option<Vec<TreeNode>>,
    config: ModelConfig,
}

enum TreeNode {
    Leaf {
        positive_fraction: f32,
    },
    Split {
        feature: usize,
        threshold: f32,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitCriterion {
    Gini,
    Entropy,
}

impl SplitCriterion {
    fn parse(name: &str) -> Result<Self, PipelineError> {
        match name.to_lowercase().as_str() {
            "gini" => Ok(SplitCriterion::Gini),
            "entropy" => Ok(SplitCriterion::Entropy),
            _ => Err(PipelineError::InvalidArgument(format!(
                "unknown split criterion: {}. Valid options are: gini, entropy",
                name
            ))),
        }
    }

    /// Node impurity from the positive count of `total` samples.
    fn impurity(&self, positives: usize, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let p = positives as f64 / total as f64;
        match self {
            SplitCriterion::Gini => 2.0 * p * (1.0 - p),
            SplitCriterion::Entropy => {
                let mut h = 0.0;
                for q in [p, 1.0 - p] {
                    if q > 0.0 {
                        h -= q * q.log2();
                    }
                }
                h
            }
        }
    }
}

struct TreeSettings {
    max_depth: Option<usize>,
    min_samples_leaf: usize,
    criterion: SplitCriterion,
    n_candidate_features: usize,
}

impl RandomForestClassifier {
    pub fn new(config: ModelConfig) -> Self {
        RandomForestClassifier {
            trees: None,
            config,
        }
    }
}

impl BinaryClassifier for RandomForestClassifier {
    fn fit(&mut self, x: &Array2<f32>, y: &Array1<u8>) -> Result<()> {
        let ModelType::RandomForest {
            n_trees,
            max_depth,
            min_samples_leaf,
            criterion,
            seed,
        } = &self.config.model_type
        else {
            return Err(PipelineError::InvalidArgument(format!(
                "expected random-forest hyperparameters, got {:?}",
                self.config.model_type
            ))
            .into());
        };

        if *n_trees == 0 {
            return Err(
                PipelineError::InvalidArgument("n_trees must be at least 1".to_string()).into(),
            );
        }
        if *min_samples_leaf == 0 {
            return Err(PipelineError::InvalidArgument(
                "min_samples_leaf must be at least 1".to_string(),
            )
            .into());
        }
        let criterion = SplitCriterion::parse(criterion)?;

        let n_samples = x.nrows();
        let n_features = x.ncols();
        let settings = TreeSettings {
            max_depth: *max_depth,
            min_samples_leaf: *min_samples_leaf,
            criterion,
            n_candidate_features: ((n_features as f64).sqrt().floor() as usize).max(1),
        };

        let base_seed = *seed;
        let trees: Vec<TreeNode> = (0..*n_trees)
            .into_par_iter()
            .map(|tree_idx| {
                let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(tree_idx as u64));
                let bootstrap: Vec<usize> =
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect();
                grow_tree(x, y, &bootstrap, 0, &settings, &mut rng)
            })
            .collect();

        log::trace!(
            "Grew {} trees on {} samples ({} candidate features per node)",
            trees.len(),
            n_samples,
            settings.n_candidate_features
        );

        self.trees = Some(trees);
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f32>) -> Result<Array2<f32>> {
        let trees = self
            .trees
            .as_ref()
            .ok_or(PipelineError::InvalidState("random forest queried before fit"))?;

        let mut proba = Array2::zeros((x.nrows(), 2));
        for (i, row) in x.outer_iter().enumerate() {
            let sum: f32 = trees.iter().map(|tree| tree_positive_fraction(tree, row)).sum();
            let p1 = sum / trees.len() as f32;
            proba[(i, 1)] = p1;
            proba[(i, 0)] = 1.0 - p1;
        }
        Ok(proba)
    }

    fn name(&self) -> &str {
        "Random Forest"
    }
}

fn tree_positive_fraction(node: &TreeNode, row: ArrayView1<f32>) -> f32 {
    match node {
        TreeNode::Leaf { positive_fraction } => *positive_fraction,
        TreeNode::Split {
            feature,
            threshold,
            left,
            right,
        } => {
            if row[*feature] <= *threshold {
                tree_positive_fraction(left, row)
            } else {
                tree_positive_fraction(right, row)
            }
        }
    }
}

fn grow_tree(
    x: &Array2<f32>,
    y: &Array1<u8>,
    indices: &[usize],
    depth: usize,
    settings: &TreeSettings,
    rng: &mut StdRng,
) -> TreeNode {
    let total = indices.len();
    let positives = indices.iter().filter(|&&i| y[i] == 1).count();

    let at_max_depth = settings.max_depth.map_or(false, |limit| depth >= limit);
    let too_small = total < 2 * settings.min_samples_leaf;
    if positives == 0 || positives == total || at_max_depth || too_small {
        return TreeNode::Leaf {
            positive_fraction: positives as f32 / total as f32,
        };
    }

    let parent_impurity = settings.criterion.impurity(positives, total);
    let Some(best) = best_split(x, y, indices, parent_impurity, settings, rng) else {
        return TreeNode::Leaf {
            positive_fraction: positives as f32 / total as f32,
        };
    };

    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
        .iter()
        .copied()
        .partition(|&i| x[(i, best.feature)] <= best.threshold);

    TreeNode::Split {
        feature: best.feature,
        threshold: best.threshold,
        left: Box::new(grow_tree(x, y, &left_indices, depth + 1, settings, rng)),
        right: Box::new(grow_tree(x, y, &right_indices, depth + 1, settings, rng)),
    }
}

struct BestSplit {
    feature: usize,
    threshold: f32,
}

/// Search the node's candidate features for the impurity-minimizing
/// threshold. Returns `None` when no split improves on the parent or
/// satisfies the leaf-size floor.
fn best_split(
    x: &Array2<f32>,
    y: &Array1<u8>,
    indices: &[usize],
    parent_impurity: f64,
    settings: &TreeSettings,
    rng: &mut StdRng,
) -> Option<BestSplit> {
    let n_features = x.ncols();
    let candidates = rand::seq::index::sample(
        rng,
        n_features,
        settings.n_candidate_features.min(n_features),
    );

    let total = indices.len();
    let total_positives = indices.iter().filter(|&&i| y[i] == 1).count();

    let mut best: Option<(f64, BestSplit)> = None;

    for feature in candidates.iter() {
        // Sorted (value, label) pairs for a single left-to-right sweep.
        let mut column: Vec<(f32, u8)> = indices
            .iter()
            .map(|&i| (x[(i, feature)], y[i]))
            .collect();
        column.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut left_count = 0usize;
        let mut left_positives = 0usize;

        for i in 0..total - 1 {
            left_count += 1;
            if column[i].1 == 1 {
                left_positives += 1;
            }

            // Thresholds only between distinct consecutive values.
            if column[i].0 == column[i + 1].0 {
                continue;
            }
            let right_count = total - left_count;
            if left_count < settings.min_samples_leaf || right_count < settings.min_samples_leaf {
                continue;
            }

            let right_positives = total_positives - left_positives;
            let weighted = (left_count as f64
                * settings.criterion.impurity(left_positives, left_count)
                + right_count as f64
                    * settings.criterion.impurity(right_positives, right_count))
                / total as f64;
            let gain = parent_impurity - weighted;
            if gain <= 1e-12 {
                continue;
            }

            if best.as_ref().map_or(true, |(g, _)| gain > *g) {
                best = Some((
                    gain,
                    BestSplit {
                        feature,
                        threshold: (column[i].0 + column[i + 1].0) / 2.0,
                    },
                ));
            }
        }
    }

    best.map(|(_, split)| split)
}
