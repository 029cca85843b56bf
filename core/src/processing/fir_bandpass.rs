use crate::math::convolution::lfilter;
use crate::math::window::hamming;
use crate::prelude::{require_positive, require_samples, FilterError, FilterResult};
use std::f64::consts::PI;

pub const DEFAULT_TAPS: usize = 101;
pub const DEFAULT_LOW_CUT: f64 = 0.002;
pub const DEFAULT_HIGH_CUT: f64 = 0.05;

fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-12 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

/// Hamming-windowed band-pass taps with cutoffs given as fractions of Nyquist,
/// scaled to unit gain at the centre of the pass band.
pub fn design_bandpass(taps: usize, low_cut: f64, high_cut: f64) -> FilterResult<Vec<f64>> {
    require_positive(taps, "FIR tap count")?;
    if !(low_cut > 0.0 && low_cut < high_cut && high_cut < 1.0) {
        return Err(FilterError::InvalidParameter(format!(
            "FIR cutoffs must satisfy 0 < low < high < 1, got {} and {}",
            low_cut, high_cut
        )));
    }

    let alpha = 0.5 * (taps - 1) as f64;
    let window = hamming(taps);
    let mut h: Vec<f64> = (0..taps)
        .map(|i| {
            let m = i as f64 - alpha;
            (high_cut * sinc(high_cut * m) - low_cut * sinc(low_cut * m)) * window[i]
        })
        .collect();

    let centre = 0.5 * (low_cut + high_cut);
    let gain: f64 = h
        .iter()
        .enumerate()
        .map(|(i, &coef)| coef * (PI * (i as f64 - alpha) * centre).cos())
        .sum();
    if gain.abs() < f64::EPSILON {
        return Err(FilterError::InvalidParameter(
            "FIR design has no gain in its pass band; increase the tap count".into(),
        ));
    }
    for coef in h.iter_mut() {
        *coef /= gain;
    }

    Ok(h)
}

/// Causal band-pass; the output lags the input by `(taps - 1) / 2` samples.
pub fn fir_bandpass(
    signal: &[f64],
    taps: usize,
    low_cut: f64,
    high_cut: f64,
) -> FilterResult<Vec<f64>> {
    require_samples(signal, "FIR input")?;
    let coefficients = design_bandpass(taps, low_cut, high_cut)?;
    Ok(lfilter(&coefficients, signal))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_design_is_symmetric() {
        let taps = design_bandpass(DEFAULT_TAPS, DEFAULT_LOW_CUT, DEFAULT_HIGH_CUT).unwrap();
        assert_eq!(taps.len(), DEFAULT_TAPS);
        for i in 0..taps.len() / 2 {
            assert!((taps[i] - taps[taps.len() - 1 - i]).abs() < 1e-12);
        }
    }

    #[test]
    fn wide_design_blocks_dc() {
        let taps = design_bandpass(201, 0.1, 0.3).unwrap();
        let dc_gain: f64 = taps.iter().sum();
        assert!(dc_gain.abs() < 0.01);
    }

    #[test]
    fn pass_band_centre_has_unit_gain() {
        let taps = design_bandpass(201, 0.1, 0.3).unwrap();
        let centre = 0.2;
        let alpha = 100.0;
        let gain: f64 = taps
            .iter()
            .enumerate()
            .map(|(i, &c)| c * (PI * (i as f64 - alpha) * centre).cos())
            .sum();
        assert!((gain - 1.0).abs() < 1e-9);
    }

    #[test]
    fn output_keeps_length_and_is_causal() {
        let mut signal = vec![0.0; 300];
        signal[100] = 1.0;
        let out = fir_bandpass(&signal, 51, 0.05, 0.4).unwrap();
        assert_eq!(out.len(), signal.len());
        assert!(out[..100].iter().all(|&v| v == 0.0));
        let peak = out
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
            .map(|(idx, _)| idx);
        assert_eq!(peak, Some(125));
    }

    #[test]
    fn invalid_cutoffs_are_rejected() {
        assert!(design_bandpass(11, 0.3, 0.2).is_err());
        assert!(design_bandpass(11, 0.0, 0.2).is_err());
        assert!(design_bandpass(11, 0.1, 1.0).is_err());
        assert!(design_bandpass(0, 0.1, 0.2).is_err());
    }
}
