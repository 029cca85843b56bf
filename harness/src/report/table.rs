use crate::workflow::runner::WorkflowResult;
use pulsecore::MetricRecord;

fn row(name: &str, metrics: &MetricRecord) -> String {
    format!(
        "{:<16} {:>12.4e} {:>12.3} {:>10.3} {:>12.3} {:>10.4}\n",
        name,
        metrics.mse,
        metrics.psnr_db,
        metrics.snr_db,
        metrics.correlation,
        metrics.elapsed.as_secs_f64()
    )
}

/// Metrics table with the raw noisy row first and filters by SNR, best first.
pub fn render_table(result: &WorkflowResult) -> String {
    let mut out = String::from("Filter Performance Metrics (sorted by SNR descending):\n");
    out.push_str(&format!(
        "{:<16} {:>12} {:>12} {:>10} {:>12} {:>10}\n",
        "Filter", "MSE", "PSNR(dB)", "SNR(dB)", "Correlation", "Time(s)"
    ));
    out.push_str(&row("noisy", &result.noisy_metrics));
    for outcome in result.ranked() {
        out.push_str(&row(outcome.name, &outcome.metrics));
    }
    out
}
