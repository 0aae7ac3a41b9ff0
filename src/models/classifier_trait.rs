use anyhow::Result;
use ndarray::{Array1, Array2};

/// The shared contract for all classifier families in the comparison.
///
/// This is the one polymorphism point in the pipeline: the evaluator and
/// reporter stay agnostic to which family produced a given prediction.
pub trait BinaryClassifier {
    /// Fit the model on features `x` (one row per sample) and labels `y`
    /// (0 or 1). Fitting an already-fitted model retrains from scratch,
    /// exactly as if `fit` had been called on a fresh instance.
    fn fit(&mut self, x: &Array2<f32>, y: &Array1<u8>) -> Result<()>;

    /// Per-sample probability distribution over {0, 1}, shape (n, 2).
    /// Each row sums to 1 within numerical tolerance. Fails with an
    /// invalid-state error when called before `fit` has completed.
    fn predict_proba(&self, x: &Array2<f32>) -> Result<Array2<f32>>;

    /// Arg-max label per sample, derived from `predict_proba`.
    fn predict(&self, x: &Array2<f32>) -> Result<Array1<u8>> {
        let proba = self.predict_proba(x)?;
        Ok(proba
            .outer_iter()
            .map(|row| if row[1] > row[0] { 1u8 } else { 0u8 })
            .collect())
    }

    /// Human readable name for the model, used in summaries and plots.
    fn name(&self) -> &str;
}
