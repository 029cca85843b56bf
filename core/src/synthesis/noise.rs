use crate::prelude::{require_samples, FilterError, FilterResult, TestSignal};
use crate::synthesis::pulse::{gaussian_exponential_pulse, PulseParams};
use log::debug;
use rand::{rngs::StdRng, seq::index, Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Poisson, Uniform};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Additive perturbations understood by the injector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseKind {
    Gaussian,
    Uniform,
    Poisson,
    SaltPepper,
}

impl NoiseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoiseKind::Gaussian => "gaussian",
            NoiseKind::Uniform => "uniform",
            NoiseKind::Poisson => "poisson",
            NoiseKind::SaltPepper => "salt_pepper",
        }
    }
}

impl fmt::Display for NoiseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoiseKind {
    type Err = FilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "gaussian" => Ok(NoiseKind::Gaussian),
            "uniform" => Ok(NoiseKind::Uniform),
            "poisson" => Ok(NoiseKind::Poisson),
            "salt_pepper" => Ok(NoiseKind::SaltPepper),
            other => Err(FilterError::InvalidParameter(format!(
                "unknown noise type '{}'",
                other
            ))),
        }
    }
}

/// One noise source and its level (std-dev, half-range, mean or fraction).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseComponent {
    pub kind: NoiseKind,
    pub level: f64,
}

/// Pairs parallel type/level lists, failing when they disagree in length.
pub fn noise_components(kinds: &[NoiseKind], levels: &[f64]) -> FilterResult<Vec<NoiseComponent>> {
    if kinds.len() != levels.len() {
        return Err(FilterError::InvalidParameter(format!(
            "{} noise types but {} noise levels",
            kinds.len(),
            levels.len()
        )));
    }
    Ok(kinds
        .iter()
        .zip(levels)
        .map(|(&kind, &level)| NoiseComponent { kind, level })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    pub baseline_freq: f64,
    pub baseline_amp: f64,
    pub add_sine: bool,
    pub components: Vec<NoiseComponent>,
    pub drift_amp: f64,
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            baseline_freq: 3.0,
            baseline_amp: 0.0,
            add_sine: false,
            components: vec![NoiseComponent {
                kind: NoiseKind::Gaussian,
                level: 0.15,
            }],
            drift_amp: 0.0,
        }
    }
}

impl NoiseParams {
    fn validate(&self) -> FilterResult<()> {
        for component in &self.components {
            if !(component.level.is_finite() && component.level >= 0.0) {
                return Err(FilterError::InvalidParameter(format!(
                    "{} noise level must be a non-negative number, got {}",
                    component.kind, component.level
                )));
            }
            if component.kind == NoiseKind::SaltPepper && component.level > 1.0 {
                return Err(FilterError::InvalidParameter(format!(
                    "salt_pepper level is a fraction of samples, got {}",
                    component.level
                )));
            }
        }
        if !self.baseline_freq.is_finite()
            || !self.baseline_amp.is_finite()
            || !self.drift_amp.is_finite()
        {
            return Err(FilterError::InvalidParameter(
                "baseline and drift parameters must be finite".into(),
            ));
        }
        Ok(())
    }
}

fn baseline_component(params: &NoiseParams, length: usize) -> Vec<f64> {
    if !params.add_sine {
        return vec![0.0; length];
    }
    (0..length)
        .map(|t| {
            params.baseline_amp
                * (2.0 * PI * params.baseline_freq * t as f64 / length as f64).sin()
        })
        .collect()
}

/// Adds baseline, noise components (in list order) and drift to `clean`.
///
/// Every random draw comes from `rng`, so seeding it once makes the whole
/// observation reproducible.
pub fn inject_noise<R: Rng + ?Sized>(
    clean: &[f64],
    params: &NoiseParams,
    rng: &mut R,
) -> FilterResult<TestSignal> {
    require_samples(clean, "clean signal")?;
    params.validate()?;

    let length = clean.len();
    let baseline = baseline_component(params, length);
    let mut noisy: Vec<f64> = clean.iter().zip(&baseline).map(|(c, b)| c + b).collect();

    for component in &params.components {
        let level = component.level;
        match component.kind {
            NoiseKind::Gaussian => {
                let dist = Normal::new(0.0, level)
                    .map_err(|err| FilterError::InvalidParameter(err.to_string()))?;
                for value in noisy.iter_mut() {
                    *value += dist.sample(rng);
                }
            }
            NoiseKind::Uniform => {
                let dist = Uniform::new_inclusive(-level, level);
                for value in noisy.iter_mut() {
                    *value += dist.sample(rng);
                }
            }
            NoiseKind::Poisson => {
                if level > 0.0 {
                    let dist = Poisson::new(level)
                        .map_err(|err| FilterError::InvalidParameter(err.to_string()))?;
                    for value in noisy.iter_mut() {
                        *value += dist.sample(rng) - level;
                    }
                }
            }
            NoiseKind::SaltPepper => {
                let count = ((length as f64) * level).floor() as usize;
                let peak = clean.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let indices = index::sample(rng, length, count.min(length)).into_vec();
                for idx in indices {
                    noisy[idx] = if rng.gen_bool(0.5) { peak } else { 0.0 };
                }
            }
        }
        debug!("injected {} noise at level {}", component.kind, level);
    }

    if params.drift_amp > 0.0 {
        for (t, value) in noisy.iter_mut().enumerate() {
            *value += params.drift_amp * (2.0 * PI * t as f64 / length as f64 * 3.0).sin();
        }
    }

    Ok(TestSignal {
        clean: clean.to_vec(),
        noisy,
        baseline,
    })
}

/// Builds the clean pulse and its noisy observation from a single seeded stream.
pub fn generate_test_signal(
    pulse: &PulseParams,
    noise: &NoiseParams,
    seed: Option<u64>,
) -> FilterResult<TestSignal> {
    let clean = gaussian_exponential_pulse(pulse)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    inject_noise(&clean, noise, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_pulse() -> PulseParams {
        PulseParams {
            length: 2048,
            peak: 500.0,
            ..Default::default()
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let noise = NoiseParams {
            add_sine: true,
            baseline_amp: 0.05,
            components: vec![
                NoiseComponent {
                    kind: NoiseKind::Gaussian,
                    level: 0.15,
                },
                NoiseComponent {
                    kind: NoiseKind::Uniform,
                    level: 0.05,
                },
                NoiseComponent {
                    kind: NoiseKind::Poisson,
                    level: 0.2,
                },
                NoiseComponent {
                    kind: NoiseKind::SaltPepper,
                    level: 0.01,
                },
            ],
            drift_amp: 0.02,
            ..Default::default()
        };
        let first = generate_test_signal(&demo_pulse(), &noise, Some(7)).unwrap();
        let second = generate_test_signal(&demo_pulse(), &noise, Some(7)).unwrap();
        assert_eq!(first.noisy, second.noisy);
        assert_eq!(first.clean, second.clean);

        let other = generate_test_signal(&demo_pulse(), &noise, Some(8)).unwrap();
        assert_ne!(first.noisy, other.noisy);
    }

    #[test]
    fn outputs_share_the_clean_length() {
        let signal = generate_test_signal(&demo_pulse(), &NoiseParams::default(), Some(0)).unwrap();
        assert_eq!(signal.len(), 2048);
        assert_eq!(signal.noisy.len(), 2048);
        assert_eq!(signal.baseline.len(), 2048);
        assert!(signal.baseline.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn salt_pepper_touches_at_most_floor_n_times_level() {
        let clean: Vec<f64> = (0..1000).map(|i| 0.3 + (i as f64 * 0.01).sin() * 0.1).collect();
        let params = NoiseParams {
            components: vec![NoiseComponent {
                kind: NoiseKind::SaltPepper,
                level: 0.037,
            }],
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let signal = inject_noise(&clean, &params, &mut rng).unwrap();
        let changed = signal
            .noisy
            .iter()
            .zip(&clean)
            .filter(|(n, c)| n != c)
            .count();
        assert!(changed <= 37);
        assert!(changed > 0);
    }

    fn single(kind: NoiseKind, level: f64) -> NoiseParams {
        NoiseParams {
            components: vec![NoiseComponent { kind, level }],
            ..Default::default()
        }
    }

    fn added_noise(clean: &[f64], kind: NoiseKind, level: f64, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let signal = inject_noise(clean, &single(kind, level), &mut rng).unwrap();
        signal.noisy.iter().zip(clean).map(|(n, c)| n - c).collect()
    }

    fn mean_and_std(values: &[f64]) -> (f64, f64) {
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        (mean, var.sqrt())
    }

    #[test]
    fn gaussian_level_is_the_standard_deviation() {
        let noise = added_noise(&vec![0.0; 20_000], NoiseKind::Gaussian, 0.2, 11);
        let (mean, std) = mean_and_std(&noise);
        assert!(mean.abs() < 0.01, "mean {}", mean);
        assert!((std - 0.2).abs() < 0.01, "std {}", std);
    }

    #[test]
    fn uniform_noise_stays_within_level() {
        let noise = added_noise(&vec![0.5; 20_000], NoiseKind::Uniform, 0.3, 12);
        assert!(noise.iter().all(|v| v.abs() <= 0.3 + 1e-12));
        let widest = noise.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
        assert!(widest > 0.29);
        let (mean, std) = mean_and_std(&noise);
        assert!(mean.abs() < 0.01);
        // Uniform on [-a, a] has std a / sqrt(3).
        assert!((std - 0.3 / 3.0_f64.sqrt()).abs() < 0.01);
    }

    #[test]
    fn poisson_noise_is_recentred() {
        let noise = added_noise(&vec![0.0; 20_000], NoiseKind::Poisson, 2.0, 13);
        let (mean, std) = mean_and_std(&noise);
        assert!(mean.abs() < 0.05, "mean {}", mean);
        assert!((std - 2.0_f64.sqrt()).abs() < 0.05, "std {}", std);
        for v in &noise {
            assert!((v + 2.0 - (v + 2.0).round()).abs() < 1e-9);
        }
    }

    #[test]
    fn salt_pepper_writes_zero_or_clean_peak() {
        let length = 20_000;
        let clean: Vec<f64> = (0..length).map(|i| 0.1 + i as f64 / length as f64).collect();
        let peak = clean[length - 1];
        let mut rng = StdRng::seed_from_u64(14);
        let signal =
            inject_noise(&clean, &single(NoiseKind::SaltPepper, 0.05), &mut rng).unwrap();

        let mut zeros = 0;
        let mut peaks = 0;
        for (&n, &c) in signal.noisy.iter().zip(&clean) {
            if n == c {
                continue;
            }
            if n == 0.0 {
                zeros += 1;
            } else {
                assert_eq!(n, peak);
                peaks += 1;
            }
        }
        assert!(zeros + peaks <= 1000);
        assert!(zeros > 400 && peaks > 400, "zeros {} peaks {}", zeros, peaks);
    }

    #[test]
    fn baseline_and_drift_are_deterministic() {
        let clean = vec![0.0; 64];
        let params = NoiseParams {
            add_sine: true,
            baseline_amp: 0.5,
            baseline_freq: 1.0,
            components: Vec::new(),
            drift_amp: 0.0,
        };
        let mut rng = StdRng::seed_from_u64(0);
        let signal = inject_noise(&clean, &params, &mut rng).unwrap();
        assert_eq!(signal.noisy, signal.baseline);
        assert!((signal.baseline[16] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn mismatched_lists_are_rejected() {
        let err = noise_components(&[NoiseKind::Gaussian, NoiseKind::Uniform], &[0.1]).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter(_)));
        let ok = noise_components(&[NoiseKind::Poisson], &[0.3]).unwrap();
        assert_eq!(ok[0].kind, NoiseKind::Poisson);
    }

    #[test]
    fn invalid_levels_are_rejected() {
        let clean = vec![1.0; 16];
        let mut rng = StdRng::seed_from_u64(0);
        let negative = NoiseParams {
            components: vec![NoiseComponent {
                kind: NoiseKind::Gaussian,
                level: -0.1,
            }],
            ..Default::default()
        };
        assert!(inject_noise(&clean, &negative, &mut rng).is_err());

        let too_many = NoiseParams {
            components: vec![NoiseComponent {
                kind: NoiseKind::SaltPepper,
                level: 1.5,
            }],
            ..Default::default()
        };
        assert!(inject_noise(&clean, &too_many, &mut rng).is_err());
        assert!(inject_noise(&[], &NoiseParams::default(), &mut rng).is_err());
    }

    #[test]
    fn noise_kind_parses_snake_case_names() {
        assert_eq!("salt_pepper".parse::<NoiseKind>().unwrap(), NoiseKind::SaltPepper);
        assert!("pink".parse::<NoiseKind>().is_err());
    }
}
