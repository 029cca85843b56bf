//! Reference-based quality metrics.
//!
//! Every function takes the clean reference first and the candidate second
//! and expects both to have the same length. Near-zero denominators are
//! padded with small epsilons so degenerate inputs still produce numbers.

use crate::math::stats::StatsHelper;
use crate::prelude::{ensure_length, require_samples, FilterResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const POWER_EPS: f64 = 1e-15;
const PEAK_EPS: f64 = 1e-12;

pub fn mse(reference: &[f64], candidate: &[f64]) -> f64 {
    let diff: Vec<f64> = reference
        .iter()
        .zip(candidate)
        .map(|(a, b)| a - b)
        .collect();
    StatsHelper::mean_square(&diff)
}

/// Peak signal-to-noise ratio in dB.
pub fn psnr(reference: &[f64], candidate: &[f64]) -> f64 {
    let peak = StatsHelper::max_abs(reference) + PEAK_EPS;
    10.0 * (peak * peak / (mse(reference, candidate) + POWER_EPS)).log10()
}

/// Clean-signal power over error power, in dB.
pub fn snr_db(reference: &[f64], candidate: &[f64]) -> f64 {
    let signal_power = StatsHelper::mean_square(reference) + POWER_EPS;
    let noise_power = mse(reference, candidate) + POWER_EPS;
    10.0 * (signal_power / noise_power).log10()
}

/// Pearson correlation coefficient of the mean-centred sequences.
pub fn correlation(reference: &[f64], candidate: &[f64]) -> f64 {
    let a = StatsHelper::centered(reference);
    let b = StatsHelper::centered(candidate);
    let cross: f64 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
    let energy_a: f64 = a.iter().map(|x| x * x).sum();
    let energy_b: f64 = b.iter().map(|y| y * y).sum();
    cross / ((energy_a * energy_b).sqrt() + POWER_EPS)
}

/// Scores of one filter (or the raw observation) against the clean signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub mse: f64,
    pub psnr_db: f64,
    pub snr_db: f64,
    pub correlation: f64,
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

impl MetricRecord {
    pub fn evaluate(
        reference: &[f64],
        candidate: &[f64],
        elapsed: Duration,
    ) -> FilterResult<Self> {
        require_samples(reference, "reference signal")?;
        ensure_length(candidate, reference.len())?;

        Ok(Self {
            mse: mse(reference, candidate),
            psnr_db: psnr(reference, candidate),
            snr_db: snr_db(reference, candidate),
            correlation: correlation(reference, candidate),
            elapsed,
        })
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
