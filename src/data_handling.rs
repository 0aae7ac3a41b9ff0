//! Data structures for loaded image datasets and train/test partitioning.
//!
//! This module defines `Dataset` and `TrainTestSplit` and contains the
//! helpers for selecting row subsets and producing the deterministic
//! partition consumed by the classifier comparison.
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::PipelineError;

/// An in-memory labeled dataset of flattened image features.
///
/// Invariants: `x.nrows() == y.len()`, every row has the same length
/// (`image_shape` width x height x channels), labels are 0 or 1, and the
/// contents are immutable once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub x: Array2<f32>,
    pub y: Array1<u8>,
    /// Class names in label order (index 0 is label 0).
    pub class_names: Vec<String>,
    /// (width, height, channels) of the source images.
    pub image_shape: (u32, u32, u32),
}

impl Dataset {
    pub fn new(
        x: Array2<f32>,
        y: Array1<u8>,
        class_names: Vec<String>,
        image_shape: (u32, u32, u32),
    ) -> Result<Self, PipelineError> {
        if x.nrows() != y.len() {
            return Err(PipelineError::InvalidArgument(format!(
                "feature matrix has {} rows but label vector has {} entries",
                x.nrows(),
                y.len()
            )));
        }
        let (w, h, c) = image_shape;
        if x.ncols() != (w * h * c) as usize {
            return Err(PipelineError::InvalidArgument(format!(
                "feature length {} does not match image shape {}x{}x{}",
                x.ncols(),
                w,
                h,
                c
            )));
        }
        if let Some(&bad) = y.iter().find(|&&v| v > 1) {
            return Err(PipelineError::InvalidArgument(format!(
                "labels must be 0 or 1, found {}",
                bad
            )));
        }
        Ok(Dataset {
            x,
            y,
            class_names,
            image_shape,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    /// Per-class sample counts, indexed by label.
    pub fn class_counts(&self) -> [usize; 2] {
        let positives = self.y.iter().filter(|&&v| v == 1).count();
        [self.y.len() - positives, positives]
    }

    /// New dataset containing only the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        Dataset {
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
            class_names: self.class_names.clone(),
            image_shape: self.image_shape,
        }
    }

    pub fn log_summary(&self) {
        let counts = self.class_counts();
        println!("----- Input Data Summary -----");
        println!(
            "Info: {} '{}' and {} '{}' samples",
            counts[0], self.class_names[0], counts[1], self.class_names[1]
        );
        println!("Info: {} pixel features (columns)", self.n_features());
        println!("-------------------------------");
    }
}

/// Disjoint train/test partition of a `Dataset`.
///
/// The partition is a reproducibility oracle: the same seed and fraction on
/// the same dataset always yield identical subsets. Test size is
/// `round(test_fraction * n)` and the two subsets cover the dataset.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: Dataset,
    pub test: Dataset,
    pub test_fraction: f32,
    pub seed: u64,
}

impl TrainTestSplit {
    pub fn new(dataset: &Dataset, test_fraction: f32, seed: u64) -> Result<Self, PipelineError> {
        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            return Err(PipelineError::InvalidArgument(format!(
                "test fraction must lie in (0, 1), got {}",
                test_fraction
            )));
        }
        let n_samples = dataset.n_samples();
        if n_samples < 2 {
            return Err(PipelineError::InvalidArgument(format!(
                "need at least 2 samples to split, got {}",
                n_samples
            )));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut indices: Vec<usize> = (0..n_samples).collect();
        indices.shuffle(&mut rng);

        let n_test = (test_fraction * n_samples as f32).round() as usize;
        let (test_indices, train_indices) = indices.split_at(n_test);

        Ok(TrainTestSplit {
            train: dataset.select(train_indices),
            test: dataset.select(test_indices),
            test_fraction,
            seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_dataset(n: usize) -> Dataset {
        let x = Array2::from_shape_fn((n, 3), |(r, c)| (r * 3 + c) as f32);
        let y = Array1::from_shape_fn(n, |r| (r % 2) as u8);
        Dataset::new(
            x,
            y,
            vec!["Parasitized".to_string(), "Uninfected".to_string()],
            (1, 1, 3),
        )
        .unwrap()
    }

    #[test]
    fn split_sizes_follow_rounded_fraction() {
        let ds = toy_dataset(10);
        let split = TrainTestSplit::new(&ds, 0.25, 7).unwrap();
        assert_eq!(split.test.n_samples(), 3); // round(0.25 * 10)
        assert_eq!(split.train.n_samples(), 7);
    }

    #[test]
    fn split_is_deterministic_per_seed() {
        let ds = toy_dataset(20);
        let a = TrainTestSplit::new(&ds, 0.2, 42).unwrap();
        let b = TrainTestSplit::new(&ds, 0.2, 42).unwrap();
        assert_eq!(a.test.x, b.test.x);
        assert_eq!(a.test.y, b.test.y);
        assert_eq!(a.train.x, b.train.x);

        let c = TrainTestSplit::new(&ds, 0.2, 43).unwrap();
        assert_ne!(a.test.x, c.test.x);
    }

    #[test]
    fn split_partition_is_disjoint_and_covering() {
        let ds = toy_dataset(12);
        let split = TrainTestSplit::new(&ds, 0.5, 3).unwrap();
        // Every original row value appears exactly once across both subsets.
        let mut seen: Vec<f32> = split
            .train
            .x
            .column(0)
            .iter()
            .chain(split.test.x.column(0).iter())
            .copied()
            .collect();
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected: Vec<f32> = (0..12).map(|r| (r * 3) as f32).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn split_rejects_bad_fraction_and_tiny_dataset() {
        let ds = toy_dataset(10);
        assert!(TrainTestSplit::new(&ds, 0.0, 0).is_err());
        assert!(TrainTestSplit::new(&ds, 1.0, 0).is_err());
        assert!(TrainTestSplit::new(&ds, -0.3, 0).is_err());

        let tiny = toy_dataset(1);
        assert!(TrainTestSplit::new(&tiny, 0.5, 0).is_err());
    }

    #[test]
    fn dataset_rejects_mismatched_shapes() {
        let x = Array2::zeros((4, 3));
        let y = Array1::zeros(3);
        assert!(Dataset::new(
            x,
            y,
            vec!["a".to_string(), "b".to_string()],
            (1, 1, 3)
        )
        .is_err());
    }
}
