use itertools_num::linspace;
use plotly::common::{DashType, Line, Mode};
use plotly::layout::{Axis, Layout};
use plotly::{Plot, Scatter};

use crate::evaluation::EvaluationResult;

/// Render every model's ROC curve on one shared axis.
///
/// Each model trace is labeled with its AUROC to two decimals; the random
/// baseline is drawn as a dashed diagonal reference line.
pub fn roc_chart(results: &[EvaluationResult], baseline: &EvaluationResult) -> Plot {
    let mut plot = Plot::new();

    let diagonal: Vec<f64> = linspace(0.0f64, 1.0, 50).collect();
    let baseline_label = format!("Random prediction (AUROC = {:.2})", baseline.auroc);
    let baseline_trace = Scatter::new(diagonal.clone(), diagonal)
        .mode(Mode::Lines)
        .name(baseline_label.as_str())
        .line(Line::new().color("grey").dash(DashType::Dash));
    plot.add_trace(baseline_trace);

    for result in results {
        let fpr: Vec<f64> = result.roc.fpr.iter().map(|&v| v as f64).collect();
        let tpr: Vec<f64> = result.roc.tpr.iter().map(|&v| v as f64).collect();
        let label = format!("{} (AUROC = {:.2})", result.model_name, result.auroc);
        let trace = Scatter::new(fpr, tpr).mode(Mode::Lines).name(label.as_str());
        plot.add_trace(trace);
    }

    let layout = Layout::new()
        .title("Receiver Operating Characteristic (ROC) curve")
        .x_axis(Axis::new().title("False Positive Rate"))
        .y_axis(Axis::new().title("True Positive Rate"));
    plot.set_layout(layout);

    plot
}
