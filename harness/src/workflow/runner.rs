use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use pulsecore::processing::FilterKind;
use pulsecore::telemetry::{LogManager, Stopwatch};
use pulsecore::{MetricRecord, TestSignal};
use std::time::Duration;

/// Output and scores of one filter in the bank.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub name: &'static str,
    pub output: Vec<f64>,
    pub metrics: MetricRecord,
}

pub struct WorkflowResult {
    pub noisy_metrics: MetricRecord,
    pub outcomes: Vec<FilterOutcome>,
}

impl WorkflowResult {
    /// Outcomes ordered by SNR, best first.
    pub fn ranked(&self) -> Vec<&FilterOutcome> {
        let mut ranked: Vec<&FilterOutcome> = self.outcomes.iter().collect();
        ranked.sort_by(|a, b| b.metrics.snr_db.total_cmp(&a.metrics.snr_db));
        ranked
    }
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Applies every configured filter in order and scores it against the clean signal.
    ///
    /// Timing wraps `FilterKind::apply` only. The matched filter's template is
    /// cut before the timer starts and its peak alignment runs after it stops.
    pub fn execute(&self, signal: &TestSignal) -> anyhow::Result<WorkflowResult> {
        let logger = LogManager::new("runner");
        let noisy_metrics = MetricRecord::evaluate(&signal.clean, &signal.noisy, Duration::ZERO)
            .context("scoring the raw noisy signal")?;
        logger.record(&format!(
            "noisy baseline SNR {:.3} dB over {} samples",
            noisy_metrics.snr_db,
            signal.len()
        ));

        let mut outcomes = Vec::with_capacity(self.config.filters.len());
        for filter in &self.config.filters {
            let name = filter.name();
            if matches!(filter, FilterKind::Matched { template: None, .. }) {
                logger.caution("matched filter template is cut from the clean reference");
            }

            let template = filter.template(&signal.clean);
            let (raw, elapsed) =
                Stopwatch::measure(|| filter.apply(&signal.noisy, template.as_deref()));
            let raw = raw.with_context(|| format!("applying {} filter", name))?;
            logger.timing(name, elapsed);

            let output = filter
                .finish(raw, &signal.clean)
                .with_context(|| format!("post-processing {} output", name))?;
            let metrics = MetricRecord::evaluate(&signal.clean, &output, elapsed)
                .with_context(|| format!("scoring {} output", name))?;
            logger.record(&format!(
                "{} -> SNR {:.3} dB, correlation {:.3}",
                name, metrics.snr_db, metrics.correlation
            ));

            outcomes.push(FilterOutcome {
                name,
                output,
                metrics,
            });
        }

        Ok(WorkflowResult {
            noisy_metrics,
            outcomes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{build_test_signal, GeneratorConfig};
    use pulsecore::synthesis::NoiseKind;

    fn demo_config() -> WorkflowConfig {
        WorkflowConfig {
            generator: GeneratorConfig {
                add_sine: false,
                drift_amp: 0.0,
                noise_types: vec![NoiseKind::Gaussian],
                noise_levels: vec![0.15],
                seed: Some(0),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn runner_executes_workflow() {
        let cfg = demo_config();
        let signal = build_test_signal(&cfg.generator).unwrap();
        let result = Runner::new(cfg.clone()).execute(&signal).unwrap();
        assert_eq!(result.outcomes.len(), 5);
        for outcome in &result.outcomes {
            assert_eq!(outcome.output.len(), cfg.generator.length);
            assert!(outcome.metrics.mse.is_finite());
        }
        assert_eq!(result.noisy_metrics.elapsed, Duration::ZERO);
    }

    #[test]
    fn moving_average_beats_raw_observation() {
        let cfg = demo_config();
        let signal = build_test_signal(&cfg.generator).unwrap();
        let result = Runner::new(cfg).execute(&signal).unwrap();
        let moving_average = result
            .outcomes
            .iter()
            .find(|o| o.name == "moving_average")
            .unwrap();
        assert!(moving_average.metrics.correlation > result.noisy_metrics.correlation);
        assert!(moving_average.metrics.snr_db > result.noisy_metrics.snr_db);
    }

    #[test]
    fn ranking_orders_by_snr() {
        let cfg = demo_config();
        let signal = build_test_signal(&cfg.generator).unwrap();
        let result = Runner::new(cfg).execute(&signal).unwrap();
        let ranked = result.ranked();
        for pair in ranked.windows(2) {
            assert!(pair[0].metrics.snr_db >= pair[1].metrics.snr_db);
        }
    }

    #[test]
    fn invalid_filter_parameters_abort_the_run() {
        let mut cfg = demo_config();
        cfg.filters = vec![FilterKind::MovingAverage { window: 0 }];
        let signal = build_test_signal(&cfg.generator).unwrap();
        assert!(Runner::new(cfg).execute(&signal).is_err());
    }

    #[test]
    fn configured_matched_template_is_used() {
        let mut cfg = demo_config();
        let signal = build_test_signal(&cfg.generator).unwrap();
        let template = signal.clean[440..560].to_vec();
        cfg.filters = vec![FilterKind::Matched {
            template: Some(template),
            template_len: 120,
        }];
        let result = Runner::new(cfg.clone()).execute(&signal).unwrap();
        assert_eq!(result.outcomes.len(), 1);
        assert_eq!(result.outcomes[0].name, "matched");
        assert_eq!(result.outcomes[0].output.len(), cfg.generator.length);
    }
}
