use anyhow::Context;
use pulsecore::synthesis::{
    generate_test_signal, noise_components, NoiseKind, NoiseParams, PulseParams,
};
use pulsecore::TestSignal;
use serde::{Deserialize, Serialize};

/// Configuration for generating the synthetic pulse and its noisy observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub length: usize,
    pub peak: f64,
    pub amplitude: f64,
    pub sigma: f64,
    pub tail_tau: f64,
    pub baseline_freq: f64,
    pub baseline_amp: f64,
    pub add_sine: bool,
    pub noise_types: Vec<NoiseKind>,
    pub noise_levels: Vec<f64>,
    pub drift_amp: f64,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            length: 2048,
            peak: 500.0,
            amplitude: 1.0,
            sigma: 20.0,
            tail_tau: 50.0,
            baseline_freq: 3.0,
            baseline_amp: 0.05,
            add_sine: true,
            noise_types: vec![NoiseKind::Gaussian],
            noise_levels: vec![0.15],
            drift_amp: 0.02,
            seed: Some(0),
        }
    }
}

impl GeneratorConfig {
    pub fn pulse_params(&self) -> PulseParams {
        PulseParams {
            length: self.length,
            peak: self.peak,
            amplitude: self.amplitude,
            sigma: self.sigma,
            tail_tau: self.tail_tau,
        }
    }

    pub fn noise_params(&self) -> anyhow::Result<NoiseParams> {
        let components = noise_components(&self.noise_types, &self.noise_levels)
            .context("pairing noise types with noise levels")?;
        Ok(NoiseParams {
            baseline_freq: self.baseline_freq,
            baseline_amp: self.baseline_amp,
            add_sine: self.add_sine,
            components,
            drift_amp: self.drift_amp,
        })
    }
}

pub fn build_test_signal(config: &GeneratorConfig) -> anyhow::Result<TestSignal> {
    let noise = config.noise_params()?;
    generate_test_signal(&config.pulse_params(), &noise, config.seed)
        .context("generating synthetic test signal")
}
