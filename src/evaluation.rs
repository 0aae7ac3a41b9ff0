//! ROC/AUC and classification-report metrics.
//!
//! These are straightforward ports of the scikit-learn metric semantics onto
//! `ndarray`: a threshold-swept ROC curve collapsed at tied scores, the
//! trapezoidal area under it, and the per-class precision/recall/F1 text
//! report.
use std::fmt;

use anyhow::Result;
use ndarray::{Array1, Array2};

use crate::error::PipelineError;

/// A monotonically threshold-swept ROC curve.
///
/// Points are ordered by decreasing classification threshold and anchored at
/// (0, 0); both rate sequences are monotonically non-decreasing. The first
/// threshold sits above every observed score so the curve starts before any
/// sample is classified positive.
#[derive(Debug, Clone)]
pub struct RocCurve {
    pub fpr: Array1<f32>,
    pub tpr: Array1<f32>,
    pub thresholds: Array1<f32>,
}

/// Compute the ROC curve of positive-class scores against true labels.
///
/// Samples are ranked by decreasing score; one curve point is emitted per
/// distinct score value so tied scores collapse into a single point.
///
/// # Arguments
///
/// * `y_true` - True labels, 0 or 1.
/// * `scores` - Predicted positive-class scores, one per sample.
///
/// # Returns
///
/// The swept `RocCurve`. Fails when lengths differ or either class is
/// absent (the rates would be undefined).
pub fn roc_curve(y_true: &Array1<u8>, scores: &Array1<f32>) -> Result<RocCurve> {
    if y_true.len() != scores.len() {
        return Err(PipelineError::InvalidArgument(format!(
            "labels ({}) and scores ({}) must have equal length",
            y_true.len(),
            scores.len()
        ))
        .into());
    }
    let positives = y_true.iter().filter(|&&v| v == 1).count();
    let negatives = y_true.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(PipelineError::InvalidArgument(
            "ROC curve requires both classes in the label set".to_string(),
        )
        .into());
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_unstable_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let max_score = scores[order[0]];
    let mut fpr = vec![0.0f32];
    let mut tpr = vec![0.0f32];
    let mut thresholds = vec![max_score + 1.0];

    let mut true_positives = 0usize;
    let mut false_positives = 0usize;
    for (rank, &idx) in order.iter().enumerate() {
        if y_true[idx] == 1 {
            true_positives += 1;
        } else {
            false_positives += 1;
        }

        // Emit a point only at the end of each tied-score block.
        let block_ends =
            rank + 1 == order.len() || scores[order[rank + 1]] != scores[idx];
        if block_ends {
            fpr.push(false_positives as f32 / negatives as f32);
            tpr.push(true_positives as f32 / positives as f32);
            thresholds.push(scores[idx]);
        }
    }

    Ok(RocCurve {
        fpr: Array1::from_vec(fpr),
        tpr: Array1::from_vec(tpr),
        thresholds: Array1::from_vec(thresholds),
    })
}

/// Area under the curve via trapezoidal integration.
pub fn auc(curve: &RocCurve) -> f32 {
    let mut area = 0.0f32;
    for i in 1..curve.fpr.len() {
        let width = curve.fpr[i] - curve.fpr[i - 1];
        area += width * (curve.tpr[i] + curve.tpr[i - 1]) / 2.0;
    }
    area
}

/// Convenience composition of `roc_curve` and `auc`.
pub fn roc_auc_score(y_true: &Array1<u8>, scores: &Array1<f32>) -> Result<f32> {
    Ok(auc(&roc_curve(y_true, scores)?))
}

/// Per-class precision/recall/F1 and support.
#[derive(Debug, Clone, Copy)]
pub struct ClassMetrics {
    pub precision: f32,
    pub recall: f32,
    pub f1: f32,
    pub support: usize,
}

/// Two-class precision/recall/F1 summary with macro and weighted averages.
#[derive(Debug, Clone)]
pub struct ClassificationReport {
    pub classes: Vec<(String, ClassMetrics)>,
    pub accuracy: f32,
    pub macro_avg: ClassMetrics,
    pub weighted_avg: ClassMetrics,
    pub total_support: usize,
}

/// Build a classification report from true and predicted labels.
pub fn classification_report(
    y_true: &Array1<u8>,
    y_pred: &Array1<u8>,
    class_names: &[String],
) -> Result<ClassificationReport> {
    if y_true.len() != y_pred.len() {
        return Err(PipelineError::InvalidArgument(format!(
            "labels ({}) and predictions ({}) must have equal length",
            y_true.len(),
            y_pred.len()
        ))
        .into());
    }
    if y_true.is_empty() {
        return Err(
            PipelineError::InvalidArgument("empty label set".to_string()).into(),
        );
    }
    if class_names.len() != 2 {
        return Err(PipelineError::InvalidArgument(format!(
            "expected 2 class names, got {}",
            class_names.len()
        ))
        .into());
    }

    let mut classes = Vec::with_capacity(2);
    let mut correct = 0usize;
    for class in 0..2u8 {
        let support = y_true.iter().filter(|&&v| v == class).count();
        let predicted = y_pred.iter().filter(|&&v| v == class).count();
        let hits = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(&t, &p)| t == class && p == class)
            .count();
        correct += hits;

        let precision = ratio(hits, predicted);
        let recall = ratio(hits, support);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        classes.push((
            class_names[class as usize].clone(),
            ClassMetrics {
                precision,
                recall,
                f1,
                support,
            },
        ));
    }

    let total_support = y_true.len();
    let macro_avg = ClassMetrics {
        precision: (classes[0].1.precision + classes[1].1.precision) / 2.0,
        recall: (classes[0].1.recall + classes[1].1.recall) / 2.0,
        f1: (classes[0].1.f1 + classes[1].1.f1) / 2.0,
        support: total_support,
    };
    let weight = |m: &ClassMetrics| m.support as f32 / total_support as f32;
    let weighted_avg = ClassMetrics {
        precision: classes[0].1.precision * weight(&classes[0].1)
            + classes[1].1.precision * weight(&classes[1].1),
        recall: classes[0].1.recall * weight(&classes[0].1)
            + classes[1].1.recall * weight(&classes[1].1),
        f1: classes[0].1.f1 * weight(&classes[0].1) + classes[1].1.f1 * weight(&classes[1].1),
        support: total_support,
    };

    Ok(ClassificationReport {
        classes,
        accuracy: correct as f32 / total_support as f32,
        macro_avg,
        weighted_avg,
        total_support,
    })
}

fn ratio(numerator: usize, denominator: usize) -> f32 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f32 / denominator as f32
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>14} {:>10} {:>8} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (name, m) in &self.classes {
            writeln!(
                f,
                "{:>14} {:>10.2} {:>8.2} {:>9.2} {:>9}",
                name, m.precision, m.recall, m.f1, m.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>14} {:>10} {:>8} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.total_support
        )?;
        writeln!(
            f,
            "{:>14} {:>10.2} {:>8.2} {:>9.2} {:>9}",
            "macro avg",
            self.macro_avg.precision,
            self.macro_avg.recall,
            self.macro_avg.f1,
            self.total_support
        )?;
        writeln!(
            f,
            "{:>14} {:>10.2} {:>8.2} {:>9.2} {:>9}",
            "weighted avg",
            self.weighted_avg.precision,
            self.weighted_avg.recall,
            self.weighted_avg.f1,
            self.total_support
        )
    }
}

/// Everything the reporter needs about one evaluated model.
#[derive(Debug, Clone)]
pub struct EvaluationResult {
    pub model_name: String,
    pub roc: RocCurve,
    pub auroc: f32,
    pub report: ClassificationReport,
}

/// Evaluate one model's test-set predictions.
pub fn evaluate_predictions(
    model_name: &str,
    y_true: &Array1<u8>,
    positive_scores: &Array1<f32>,
    y_pred: &Array1<u8>,
    class_names: &[String],
) -> Result<EvaluationResult> {
    let roc = roc_curve(y_true, positive_scores)?;
    let auroc = auc(&roc);
    let report = classification_report(y_true, y_pred, class_names)?;
    Ok(EvaluationResult {
        model_name: model_name.to_string(),
        roc,
        auroc,
        report,
    })
}

/// Evaluate the degenerate random baseline: constant zero probability for the
/// positive class, so every sample is predicted negative. All scores tie, the
/// curve collapses to the (0,0)-(1,1) diagonal, and its AUROC is 0.5.
pub fn random_baseline(y_true: &Array1<u8>, class_names: &[String]) -> Result<EvaluationResult> {
    let scores = Array1::zeros(y_true.len());
    let predictions = Array1::zeros(y_true.len());
    evaluate_predictions(
        "Random (chance) Prediction",
        y_true,
        &scores,
        &predictions,
        class_names,
    )
}

/// Extract the positive-class column of a (n, 2) probability matrix.
pub fn positive_scores(proba: &Array2<f32>) -> Array1<f32> {
    proba.column(1).to_owned()
}
