use crate::math::convolution::convolve_same;
use crate::math::stats::StatsHelper;
use crate::prelude::{require_positive, require_samples, FilterError, FilterResult};

pub const DEFAULT_WINDOW: usize = 11;

/// Local adaptive Wiener filter.
///
/// Local mean and variance come from a zero-padded sliding window. When
/// `noise` is `None` the noise power is the mean of the local variances.
pub fn wiener(signal: &[f64], window: usize, noise: Option<f64>) -> FilterResult<Vec<f64>> {
    require_samples(signal, "Wiener input")?;
    require_positive(window, "Wiener window")?;
    if let Some(power) = noise {
        if !(power.is_finite() && power >= 0.0) {
            return Err(FilterError::InvalidParameter(format!(
                "Wiener noise power must be non-negative, got {}",
                power
            )));
        }
    }

    let kernel = vec![1.0 / window as f64; window];
    let squares: Vec<f64> = signal.iter().map(|&v| v * v).collect();
    let local_mean = convolve_same(signal, &kernel);
    let local_var: Vec<f64> = convolve_same(&squares, &kernel)
        .iter()
        .zip(&local_mean)
        .map(|(&sq, &mean)| sq - mean * mean)
        .collect();

    let noise = noise.unwrap_or_else(|| StatsHelper::mean(&local_var));

    let filtered = signal
        .iter()
        .zip(local_mean.iter().zip(&local_var))
        .map(|(&x, (&mean, &var))| {
            if var < noise || var <= 0.0 {
                mean
            } else {
                mean + (1.0 - noise / var) * (x - mean)
            }
        })
        .collect();

    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_interior_is_preserved() {
        let signal = vec![2.0; 64];
        let out = wiener(&signal, 5, None).unwrap();
        assert_eq!(out.len(), 64);
        for &value in &out[2..62] {
            assert!((value - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_noise_keeps_high_variance_samples() {
        let signal: Vec<f64> = (0..32).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let out = wiener(&signal, 3, Some(0.0)).unwrap();
        for (a, b) in out[1..31].iter().zip(&signal[1..31]) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn all_zero_signal_stays_finite() {
        let out = wiener(&[0.0; 16], 11, None).unwrap();
        assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn default_noise_is_mean_local_variance() {
        // Window 3 over [1, 3, 2, 5, 4]: local variances 14/9, 2/3, 14/9, 14/9, 14/3,
        // so the estimated noise power is exactly 2.
        let signal = [1.0, 3.0, 2.0, 5.0, 4.0];
        let estimated = wiener(&signal, 3, None).unwrap();
        let explicit = wiener(&signal, 3, Some(2.0)).unwrap();
        let expected = [4.0 / 3.0, 2.0, 10.0 / 3.0, 11.0 / 3.0, 3.0 + 4.0 / 7.0];
        for ((a, b), e) in estimated.iter().zip(&explicit).zip(&expected) {
            assert!((a - b).abs() < 1e-9);
            assert!((a - e).abs() < 1e-9, "{} vs {}", a, e);
        }
    }

    #[test]
    fn invalid_arguments_are_rejected() {
        assert!(wiener(&[1.0, 2.0], 0, None).is_err());
        assert!(wiener(&[1.0, 2.0], 3, Some(-1.0)).is_err());
        assert!(wiener(&[], 3, None).is_err());
    }
}
