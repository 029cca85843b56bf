//! Multilevel discrete wavelet transform and universal-threshold denoising.
//!
//! Decomposition uses half-sample symmetric extension, so each level keeps
//! `floor((n + F - 1) / 2)` coefficients and reconstruction is exact up to
//! floating-point error.

use crate::math::stats::StatsHelper;
use crate::prelude::{fit_to_length, require_samples, FilterError, FilterResult};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_LEVEL: usize = 4;

/// Reconstruction low-pass coefficients, `db1` (Haar) through `db4`.
const DB_REC_LO: [&[f64]; 4] = [
    &[0.7071067811865476, 0.7071067811865476],
    &[
        0.48296291314469025,
        0.836516303737469,
        0.22414386804185735,
        -0.12940952255092145,
    ],
    &[
        0.3326705529509569,
        0.8068915093133388,
        0.4598775021193313,
        -0.13501102001039084,
        -0.08544127388224149,
        0.035226291882100656,
    ],
    &[
        0.23037781330885523,
        0.7148465705525415,
        0.6308807679295904,
        -0.02798376941698385,
        -0.18703481171888114,
        0.030841381835986965,
        0.032883011666982945,
        -0.010597401784997278,
    ],
];

/// Orthogonal Daubechies wavelet, `db1` being the Haar wavelet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Wavelet {
    order: usize,
}

impl Wavelet {
    pub fn daubechies(order: usize) -> FilterResult<Self> {
        if order == 0 || order > DB_REC_LO.len() {
            return Err(FilterError::InvalidParameter(format!(
                "unsupported Daubechies order {} (expected 1..={})",
                order,
                DB_REC_LO.len()
            )));
        }
        Ok(Self { order })
    }

    pub fn haar() -> Self {
        Self { order: 1 }
    }

    pub fn filter_len(&self) -> usize {
        2 * self.order
    }

    /// Largest useful decomposition depth for a signal of `length` samples.
    pub fn max_level(&self, length: usize) -> usize {
        let taps = self.filter_len();
        if length < taps - 1 {
            return 0;
        }
        (length as f64 / (taps - 1) as f64).log2().floor() as usize
    }

    fn bank(&self) -> FilterBank {
        let rec_lo = DB_REC_LO[self.order - 1].to_vec();
        let taps = rec_lo.len();
        let rec_hi: Vec<f64> = (0..taps)
            .map(|k| {
                let mirrored = rec_lo[taps - 1 - k];
                if k % 2 == 0 {
                    mirrored
                } else {
                    -mirrored
                }
            })
            .collect();
        FilterBank {
            dec_lo: rec_lo.iter().rev().copied().collect(),
            dec_hi: rec_hi.iter().rev().copied().collect(),
            rec_lo,
            rec_hi,
        }
    }
}

impl Default for Wavelet {
    fn default() -> Self {
        Self { order: 4 }
    }
}

impl fmt::Display for Wavelet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "db{}", self.order)
    }
}

impl FromStr for Wavelet {
    type Err = FilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "haar" {
            return Ok(Self::haar());
        }
        let order = value
            .strip_prefix("db")
            .and_then(|digits| digits.parse::<usize>().ok())
            .ok_or_else(|| FilterError::InvalidParameter(format!("unknown wavelet '{}'", value)))?;
        Self::daubechies(order)
    }
}

impl TryFrom<String> for Wavelet {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Wavelet> for String {
    fn from(wavelet: Wavelet) -> Self {
        wavelet.to_string()
    }
}

struct FilterBank {
    dec_lo: Vec<f64>,
    dec_hi: Vec<f64>,
    rec_lo: Vec<f64>,
    rec_hi: Vec<f64>,
}

/// Approximation band plus detail bands ordered coarsest first.
#[derive(Debug, Clone)]
pub struct WaveletCoefficients {
    pub approx: Vec<f64>,
    pub details: Vec<Vec<f64>>,
}

/// Maps any index onto the half-sample symmetric extension of `0..len`.
fn symmetric_index(idx: isize, len: usize) -> usize {
    let period = 2 * len as isize;
    let k = idx.rem_euclid(period) as usize;
    if k >= len {
        2 * len - 1 - k
    } else {
        k
    }
}

fn analysis_step(signal: &[f64], filter: &[f64]) -> Vec<f64> {
    let n = signal.len();
    let out_len = (n + filter.len() - 1) / 2;
    (0..out_len)
        .map(|o| {
            let centre = (2 * o + 1) as isize;
            filter
                .iter()
                .enumerate()
                .map(|(j, &f)| f * signal[symmetric_index(centre - j as isize, n)])
                .sum()
        })
        .collect()
}

fn synthesis_step(approx: &[f64], detail: &[f64], bank: &FilterBank) -> Vec<f64> {
    let taps = bank.rec_lo.len();
    let n = approx.len().min(detail.len());
    let out_len = (2 * n + 2).saturating_sub(taps);
    (0..out_len)
        .map(|k| {
            let shifted = k + taps - 2;
            let first = (shifted + 1).saturating_sub(taps).div_ceil(2);
            let last = (shifted / 2).min(n.saturating_sub(1));
            (first..=last)
                .map(|i| {
                    let m = shifted - 2 * i;
                    approx[i] * bank.rec_lo[m] + detail[i] * bank.rec_hi[m]
                })
                .sum()
        })
        .collect()
}

/// Multilevel decomposition down to `level` (must be at least 1).
pub fn wavedec(signal: &[f64], wavelet: Wavelet, level: usize) -> FilterResult<WaveletCoefficients> {
    require_samples(signal, "wavelet input")?;
    if level == 0 {
        return Err(FilterError::InvalidParameter(
            "wavelet level must be at least 1".into(),
        ));
    }

    let bank = wavelet.bank();
    let mut details = Vec::with_capacity(level);
    let mut approx = signal.to_vec();
    for _ in 0..level {
        details.push(analysis_step(&approx, &bank.dec_hi));
        approx = analysis_step(&approx, &bank.dec_lo);
    }
    details.reverse();

    Ok(WaveletCoefficients { approx, details })
}

/// Inverse of [`wavedec`]; may be one sample longer than the decomposed signal for odd lengths.
pub fn waverec(coefficients: &WaveletCoefficients, wavelet: Wavelet) -> Vec<f64> {
    let bank = wavelet.bank();
    let mut approx = coefficients.approx.clone();
    for detail in &coefficients.details {
        if approx.len() == detail.len() + 1 {
            approx.pop();
        }
        approx = synthesis_step(&approx, detail, &bank);
    }
    approx
}

fn soft_threshold(value: f64, threshold: f64) -> f64 {
    value.signum() * (value.abs() - threshold).max(0.0)
}

/// Wavelet shrinkage with Donoho's universal threshold.
///
/// Noise is estimated from the finest detail band as `median(|d|) / 0.6745`.
/// `level = None` decomposes as deep as the signal allows; deeper requests
/// are clamped to that depth.
pub fn wavelet_denoise(
    signal: &[f64],
    wavelet: Wavelet,
    level: Option<usize>,
) -> FilterResult<Vec<f64>> {
    require_samples(signal, "wavelet input")?;

    let max_level = wavelet.max_level(signal.len());
    let level = match level {
        Some(0) => {
            return Err(FilterError::InvalidParameter(
                "wavelet level must be at least 1".into(),
            ))
        }
        Some(requested) if requested > max_level => {
            warn!(
                "wavelet level {} exceeds maximum {} for {} samples with {}; clamping",
                requested,
                max_level,
                signal.len(),
                wavelet
            );
            max_level
        }
        Some(requested) => requested,
        None => max_level,
    };
    if level == 0 {
        return Ok(signal.to_vec());
    }

    let mut coefficients = wavedec(signal, wavelet, level)?;
    let finest = coefficients
        .details
        .last()
        .map(|band| band.iter().map(|v| v.abs()).collect::<Vec<_>>())
        .unwrap_or_default();
    let sigma = StatsHelper::median(&finest) / 0.6745 + 1e-12;
    let threshold = sigma * (2.0 * (signal.len() as f64).ln()).sqrt();

    for band in coefficients.details.iter_mut() {
        for value in band.iter_mut() {
            *value = soft_threshold(*value, threshold);
        }
    }

    let reconstructed = waverec(&coefficients, wavelet);
    Ok(fit_to_length(reconstructed, signal.len()))
}
