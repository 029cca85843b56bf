use crate::math::convolution::convolve_same;
use crate::prelude::{require_positive, require_samples, FilterResult};

pub const DEFAULT_WINDOW: usize = 11;

/// Zero-phase box average with "same" output length and zero-padded edges.
pub fn moving_average(signal: &[f64], window: usize) -> FilterResult<Vec<f64>> {
    require_samples(signal, "moving average input")?;
    require_positive(window, "moving average window")?;

    let kernel = vec![1.0 / window as f64; window];
    Ok(convolve_same(signal, &kernel))
}
