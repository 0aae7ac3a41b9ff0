//! Two-class image directory reader.
//!
//! Expects a root directory with exactly two class subdirectories of raster
//! images. Class directories are visited in lexicographic order and the
//! first one is assigned label 0, which reproduces the usual
//! `Parasitized`/`Uninfected` layout (Parasitized -> 0).
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::imageops::FilterType;
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::LoaderConfig;
use crate::data_handling::Dataset;
use crate::error::PipelineError;

/// Load a `Dataset` from a two-class image directory.
///
/// Every image is resized to exactly `image_width x image_height` RGB and
/// flattened row-major into `width * height * 3` features rescaled to
/// [0, 1]. Candidate files are shuffled with the configured seed before the
/// sample cap is applied so a capped subset mixes both classes.
pub fn load_image_dataset(config: &LoaderConfig) -> Result<Dataset> {
    let (class_names, mut candidates) = scan_class_directories(&config.root_dir)?;

    let mut rng = StdRng::seed_from_u64(config.shuffle_seed);
    candidates.shuffle(&mut rng);

    if let Some(cap) = config.sample_cap {
        if candidates.len() < cap {
            return Err(PipelineError::InvalidArgument(format!(
                "sample cap {} exceeds the {} available images under {}",
                cap,
                candidates.len(),
                config.root_dir.display()
            ))
            .into());
        }
        candidates.truncate(cap);
    }

    let n_samples = candidates.len();
    let n_features = (config.image_width * config.image_height * 3) as usize;
    let mut features = Vec::with_capacity(n_samples * n_features);
    let mut labels = Vec::with_capacity(n_samples);

    for (path, label) in &candidates {
        let pixels = load_pixel_row(path, config.image_width, config.image_height)?;
        features.extend_from_slice(&pixels);
        labels.push(*label);
    }

    log::info!(
        "Loaded {} samples ({} features each) from {}",
        n_samples,
        n_features,
        config.root_dir.display()
    );

    let x = Array2::from_shape_vec((n_samples, n_features), features)
        .context("image rows do not form a rectangular feature matrix")?;
    let y = Array1::from_vec(labels);
    let shape = (config.image_width, config.image_height, 3);
    Ok(Dataset::new(x, y, class_names, shape)?)
}

/// Enumerate the two class subdirectories and their image files.
///
/// Returns class names in label order plus (path, label) candidates. File
/// lists are sorted before the caller shuffles them so runs are reproducible
/// regardless of filesystem enumeration order.
fn scan_class_directories(root: &Path) -> Result<(Vec<String>, Vec<(PathBuf, u8)>)> {
    let entries = fs::read_dir(root).map_err(|_| {
        PipelineError::ResourceNotFound(format!("dataset directory {}", root.display()))
    })?;

    let mut class_dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    class_dirs.sort();

    if class_dirs.len() < 2 {
        return Err(PipelineError::ResourceNotFound(format!(
            "two class subdirectories under {}, found {}",
            root.display(),
            class_dirs.len()
        ))
        .into());
    }
    if class_dirs.len() > 2 {
        return Err(PipelineError::InvalidArgument(format!(
            "expected exactly two class subdirectories under {}, found {}",
            root.display(),
            class_dirs.len()
        ))
        .into());
    }

    let mut class_names = Vec::with_capacity(2);
    let mut candidates = Vec::new();

    for (label, dir) in class_dirs.iter().enumerate() {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("class_{}", label));

        let mut files: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("failed to read class directory {}", dir.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(PipelineError::ResourceNotFound(format!(
                "images in class directory {}",
                dir.display()
            ))
            .into());
        }

        log::debug!("Class '{}' -> label {} ({} files)", name, label, files.len());
        class_names.push(name);
        candidates.extend(files.into_iter().map(|path| (path, label as u8)));
    }

    Ok((class_names, candidates))
}

/// Decode one image into a flat [0, 1] RGB pixel row.
fn load_pixel_row(path: &Path, width: u32, height: u32) -> Result<Vec<f32>> {
    let img = image::open(path)
        .with_context(|| format!("failed to decode image {}", path.display()))?;
    let resized = img.resize_exact(width, height, FilterType::Triangle).to_rgb8();
    Ok(resized
        .into_raw()
        .into_iter()
        .map(|byte| byte as f32 / 255.0)
        .collect())
}
