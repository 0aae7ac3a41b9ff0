//! Compare the four classifier families on a malaria cell-image dataset.
//!
//! Expects the unpacked `cell_images/` layout: two class subdirectories
//! (`Parasitized/`, `Uninfected/`) of raster images. Pass the dataset root
//! as the first argument.
use std::path::PathBuf;

use cytoscreen_classifiers::config::{LoaderConfig, SplitConfig};
use cytoscreen_classifiers::pipeline::{PipelineConfig, ScreeningPipeline};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let root_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("cell_images"));

    let config = PipelineConfig {
        loader: LoaderConfig {
            root_dir,
            image_width: 32,
            image_height: 32,
            // The full archive holds 27558 images; training every family on
            // all of them is slow, so the standard run caps at 5000.
            sample_cap: Some(5000),
            shuffle_seed: 0,
        },
        split: SplitConfig {
            test_fraction: 0.2,
            seed: 0,
        },
        models: ScreeningPipeline::default_models(),
        output_dir: Some(PathBuf::from("reports")),
    };

    let outcome = ScreeningPipeline::new(config).run()?;
    log::info!(
        "Compared {} models against the {:.2} baseline",
        outcome.results.len(),
        outcome.baseline.auroc
    );
    Ok(())
}
