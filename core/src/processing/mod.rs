//! The denoising filter bank.
//!
//! Every filter is a pure function from a noisy sequence to a sequence of the
//! same length. [`FilterKind`] bundles a filter with its parameters so a bank
//! can be described in configuration and run in order.

pub mod fir_bandpass;
pub mod matched;
pub mod moving_average;
pub mod wavelet;
pub mod wiener;

pub use fir_bandpass::{design_bandpass, fir_bandpass};
pub use matched::{align_to_reference, default_template, matched_filter};
pub use moving_average::moving_average;
pub use wavelet::{wavedec, wavelet_denoise, waverec, Wavelet, WaveletCoefficients};
pub use wiener::wiener;

use crate::prelude::{ensure_length, FilterError, FilterResult};
use serde::{Deserialize, Serialize};

/// One entry of the filter bank with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterKind {
    MovingAverage {
        #[serde(default = "default_moving_average_window")]
        window: usize,
    },
    FirBandpass {
        #[serde(default = "default_fir_taps")]
        taps: usize,
        #[serde(default = "default_fir_low_cut")]
        low_cut: f64,
        #[serde(default = "default_fir_high_cut")]
        high_cut: f64,
    },
    Wiener {
        #[serde(default = "default_wiener_window")]
        window: usize,
        #[serde(default)]
        noise: Option<f64>,
    },
    Wavelet {
        #[serde(default)]
        wavelet: Wavelet,
        #[serde(default = "default_wavelet_level")]
        level: Option<usize>,
    },
    Matched {
        #[serde(default)]
        template: Option<Vec<f64>>,
        #[serde(default = "default_template_len")]
        template_len: usize,
    },
}

fn default_moving_average_window() -> usize {
    moving_average::DEFAULT_WINDOW
}

fn default_fir_taps() -> usize {
    fir_bandpass::DEFAULT_TAPS
}

fn default_fir_low_cut() -> f64 {
    fir_bandpass::DEFAULT_LOW_CUT
}

fn default_fir_high_cut() -> f64 {
    fir_bandpass::DEFAULT_HIGH_CUT
}

fn default_wiener_window() -> usize {
    wiener::DEFAULT_WINDOW
}

fn default_wavelet_level() -> Option<usize> {
    Some(wavelet::DEFAULT_LEVEL)
}

fn default_template_len() -> usize {
    matched::DEFAULT_TEMPLATE_LEN
}

impl FilterKind {
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::MovingAverage { .. } => "moving_average",
            FilterKind::FirBandpass { .. } => "fir_bandpass",
            FilterKind::Wiener { .. } => "wiener",
            FilterKind::Wavelet { .. } => "wavelet",
            FilterKind::Matched { .. } => "matched",
        }
    }

    /// The five filters with their bench defaults, in evaluation order.
    pub fn default_bank() -> Vec<FilterKind> {
        vec![
            FilterKind::MovingAverage {
                window: default_moving_average_window(),
            },
            FilterKind::FirBandpass {
                taps: default_fir_taps(),
                low_cut: default_fir_low_cut(),
                high_cut: default_fir_high_cut(),
            },
            FilterKind::Wiener {
                window: default_wiener_window(),
                noise: None,
            },
            FilterKind::Wavelet {
                wavelet: Wavelet::default(),
                level: default_wavelet_level(),
            },
            FilterKind::Matched {
                template: None,
                template_len: default_template_len(),
            },
        ]
    }

    /// Correlation template for the matched filter, `None` for every other kind.
    ///
    /// Without a configured template this cuts one out of `clean`, so call it
    /// before timing [`FilterKind::apply`].
    pub fn template(&self, clean: &[f64]) -> Option<Vec<f64>> {
        match self {
            FilterKind::Matched {
                template: Some(template),
                ..
            } => Some(template.clone()),
            FilterKind::Matched {
                template: None,
                template_len,
            } => Some(default_template(clean, *template_len)),
            _ => None,
        }
    }

    /// Runs the filter on `noisy`. For the matched filter this is the raw
    /// correlation against `template`.
    pub fn apply(&self, noisy: &[f64], template: Option<&[f64]>) -> FilterResult<Vec<f64>> {
        let output = match self {
            FilterKind::MovingAverage { window } => moving_average(noisy, *window)?,
            FilterKind::FirBandpass {
                taps,
                low_cut,
                high_cut,
            } => fir_bandpass(noisy, *taps, *low_cut, *high_cut)?,
            FilterKind::Wiener { window, noise } => wiener(noisy, *window, *noise)?,
            FilterKind::Wavelet { wavelet, level } => wavelet_denoise(noisy, *wavelet, *level)?,
            FilterKind::Matched { .. } => {
                let template = template.ok_or_else(|| {
                    FilterError::InvalidParameter("matched filter needs a template".into())
                })?;
                matched_filter(noisy, template)?
            }
        };
        ensure_length(&output, noisy.len())?;
        Ok(output)
    }

    /// Post-processing needed before the output is comparable with `clean`.
    pub fn finish(&self, raw: Vec<f64>, clean: &[f64]) -> FilterResult<Vec<f64>> {
        if self.needs_alignment() {
            align_to_reference(&raw, clean)
        } else {
            Ok(raw)
        }
    }

    pub fn needs_alignment(&self) -> bool {
        matches!(self, FilterKind::Matched { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::{generate_test_signal, NoiseParams, PulseParams};

    #[test]
    fn every_filter_preserves_length() {
        for &length in &[2048usize, 517, 64, 7] {
            let pulse = PulseParams {
                length,
                peak: (length / 3) as f64,
                ..Default::default()
            };
            let signal = generate_test_signal(&pulse, &NoiseParams::default(), Some(1)).unwrap();
            for filter in FilterKind::default_bank() {
                let template = filter.template(&signal.clean);
                let raw = filter.apply(&signal.noisy, template.as_deref()).unwrap();
                let finished = filter.finish(raw, &signal.clean).unwrap();
                assert_eq!(finished.len(), length, "{} at {}", filter.name(), length);
            }
        }
    }

    #[test]
    fn default_bank_names_are_unique() {
        let names: Vec<_> = FilterKind::default_bank().iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            vec!["moving_average", "fir_bandpass", "wiener", "wavelet", "matched"]
        );
    }

    #[test]
    fn template_is_built_only_for_the_matched_filter() {
        let clean: Vec<f64> = (0..400).map(|i| i as f64).collect();
        let bank = FilterKind::default_bank();
        for filter in &bank[..4] {
            assert!(filter.template(&clean).is_none());
        }
        let template = bank[4].template(&clean).unwrap();
        assert_eq!(template.len(), matched::DEFAULT_TEMPLATE_LEN);
        assert_eq!(template[0], 140.0);

        let configured = FilterKind::Matched {
            template: Some(vec![1.0, 2.0, 1.0]),
            template_len: 120,
        };
        assert_eq!(configured.template(&clean), Some(vec![1.0, 2.0, 1.0]));
    }

    #[test]
    fn matched_filter_without_template_is_rejected() {
        let bank = FilterKind::default_bank();
        let err = bank[4].apply(&[1.0, 2.0, 3.0], None).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameter(_)));
    }

    #[test]
    fn only_matched_needs_alignment() {
        let bank = FilterKind::default_bank();
        assert_eq!(bank.iter().filter(|f| f.needs_alignment()).count(), 1);
        assert!(bank[4].needs_alignment());
    }
}
