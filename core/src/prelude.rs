use serde::{Deserialize, Serialize};

/// Ground truth, observation and injected baseline produced by the generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSignal {
    pub clean: Vec<f64>,
    pub noisy: Vec<f64>,
    pub baseline: Vec<f64>,
}

impl TestSignal {
    pub fn len(&self) -> usize {
        self.clean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clean.is_empty()
    }
}

/// Common error type for synthesis, filtering and scoring.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("length mismatch: expected {expected} samples, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

pub type FilterResult<T> = Result<T, FilterError>;

/// Rejects empty input before any filter touches it.
pub fn require_samples(signal: &[f64], what: &str) -> FilterResult<()> {
    if signal.is_empty() {
        return Err(FilterError::InvalidParameter(format!(
            "{} must contain at least one sample",
            what
        )));
    }
    Ok(())
}

/// Rejects zero-sized windows, kernels and tap counts.
pub fn require_positive(value: usize, what: &str) -> FilterResult<()> {
    if value == 0 {
        return Err(FilterError::InvalidParameter(format!(
            "{} must be positive",
            what
        )));
    }
    Ok(())
}

/// Trims or zero-pads `samples` to exactly `length` entries.
pub fn fit_to_length(mut samples: Vec<f64>, length: usize) -> Vec<f64> {
    samples.resize(length, 0.0);
    samples
}

/// Asserts the per-sample invariant before two sequences are compared.
pub fn ensure_length(samples: &[f64], expected: usize) -> FilterResult<()> {
    if samples.len() != expected {
        return Err(FilterError::LengthMismatch {
            expected,
            actual: samples.len(),
        });
    }
    Ok(())
}
