use crate::prelude::{FilterError, FilterResult};
use serde::{Deserialize, Serialize};

/// Shape of the ground-truth pulse: Gaussian core plus a one-sided exponential tail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseParams {
    pub length: usize,
    pub peak: f64,
    pub amplitude: f64,
    pub sigma: f64,
    pub tail_tau: f64,
}

impl Default for PulseParams {
    fn default() -> Self {
        Self {
            length: 2048,
            peak: 300.0,
            amplitude: 1.0,
            sigma: 20.0,
            tail_tau: 50.0,
        }
    }
}

impl PulseParams {
    fn validate(&self) -> FilterResult<()> {
        if self.length == 0 {
            return Err(FilterError::InvalidParameter(
                "pulse length must be positive".into(),
            ));
        }
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(FilterError::InvalidParameter(format!(
                "pulse sigma must be positive, got {}",
                self.sigma
            )));
        }
        if !(self.tail_tau.is_finite() && self.tail_tau > 0.0) {
            return Err(FilterError::InvalidParameter(format!(
                "pulse tail_tau must be positive, got {}",
                self.tail_tau
            )));
        }
        if !self.peak.is_finite() || !self.amplitude.is_finite() {
            return Err(FilterError::InvalidParameter(
                "pulse peak and amplitude must be finite".into(),
            ));
        }
        Ok(())
    }
}

/// Builds the clean reference pulse. The tail only exists from the peak onwards.
pub fn gaussian_exponential_pulse(params: &PulseParams) -> FilterResult<Vec<f64>> {
    params.validate()?;

    let pulse = (0..params.length)
        .map(|i| {
            let t = i as f64 - params.peak;
            let core = params.amplitude * (-0.5 * (t / params.sigma).powi(2)).exp();
            let tail = if t >= 0.0 {
                params.amplitude * (-t / params.tail_tau).exp()
            } else {
                0.0
            };
            0.85 * core + 0.15 * tail
        })
        .collect();

    Ok(pulse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_peaks_at_requested_position() {
        let params = PulseParams {
            length: 1024,
            peak: 500.0,
            ..Default::default()
        };
        let pulse = gaussian_exponential_pulse(&params).unwrap();
        assert_eq!(pulse.len(), 1024);
        assert!((pulse[500] - 1.0).abs() < 1e-12);
        let argmax = pulse
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(idx, _)| idx);
        assert_eq!(argmax, Some(500));
    }

    #[test]
    fn tail_only_follows_the_peak() {
        let params = PulseParams {
            length: 200,
            peak: 100.0,
            ..Default::default()
        };
        let pulse = gaussian_exponential_pulse(&params).unwrap();
        // Equal distance from the peak: the trailing side carries the tail.
        assert!(pulse[130] > pulse[70]);
        let expected_leading = 0.85 * (-0.5 * (30.0_f64 / 20.0).powi(2)).exp();
        assert!((pulse[70] - expected_leading).abs() < 1e-12);
    }

    #[test]
    fn degenerate_parameters_are_rejected() {
        let zero_sigma = PulseParams {
            sigma: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            gaussian_exponential_pulse(&zero_sigma),
            Err(FilterError::InvalidParameter(_))
        ));

        let empty = PulseParams {
            length: 0,
            ..Default::default()
        };
        assert!(gaussian_exponential_pulse(&empty).is_err());

        let bad_tail = PulseParams {
            tail_tau: -1.0,
            ..Default::default()
        };
        assert!(gaussian_exponential_pulse(&bad_tail).is_err());
    }
}
