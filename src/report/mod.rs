//! Console summaries and on-disk artifacts for a finished comparison run.
pub mod plots;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::evaluation::EvaluationResult;

pub use plots::roc_chart;

/// Print the AUROC summary lines and per-model classification reports.
pub fn print_summary(results: &[EvaluationResult], baseline: &EvaluationResult) {
    println!("{} : AUROC = {:.3}", baseline.model_name, baseline.auroc);
    for result in results {
        println!("{} : AUROC = {:.3}", result.model_name, result.auroc);
    }
    for result in results {
        println!();
        println!("{} classification report:", result.model_name);
        println!("{}", result.report);
    }
}

/// Write the comparison artifacts into `output_dir`:
/// the ROC chart as HTML, one classification-report text file per model,
/// and a CSV of every curve's threshold-swept points. Filenames carry the
/// run timestamp so repeated runs never clobber each other.
pub fn write_artifacts(
    output_dir: &Path,
    results: &[EvaluationResult],
    baseline: &EvaluationResult,
) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");

    let chart_path = output_dir.join(format!("roc_curve_{}.html", stamp));
    roc_chart(results, baseline).write_html(&chart_path);
    log::info!("Wrote ROC chart to {}", chart_path.display());

    for result in results {
        let report_path = output_dir.join(format!("{}_report_{}.txt", slug(&result.model_name), stamp));
        fs::write(&report_path, result.report.to_string())
            .with_context(|| format!("failed to write {}", report_path.display()))?;
    }

    let csv_path = output_dir.join(format!("roc_metrics_{}.csv", stamp));
    write_roc_csv(&csv_path, results, baseline)?;
    log::info!("Wrote ROC points to {}", csv_path.display());

    Ok(())
}

fn write_roc_csv(
    path: &Path,
    results: &[EvaluationResult],
    baseline: &EvaluationResult,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    writer.write_record([
        "model",
        "threshold",
        "false_positive_rate",
        "true_positive_rate",
    ])?;

    for result in std::iter::once(baseline).chain(results.iter()) {
        for i in 0..result.roc.fpr.len() {
            writer.write_record(&[
                result.model_name.clone(),
                result.roc.thresholds[i].to_string(),
                result.roc.fpr[i].to_string(),
                result.roc.tpr[i].to_string(),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
