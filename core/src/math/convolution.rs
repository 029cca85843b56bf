//! Direct-form 1-D convolution primitives shared by the filter bank.
//!
//! Signals in this bench are a few thousand samples long and kernels are
//! short, so everything here is evaluated in the time domain.

/// "Same" convolution: output has the length of `signal` and is centred on
/// the full convolution, with zeros assumed outside the signal.
pub fn convolve_same(signal: &[f64], kernel: &[f64]) -> Vec<f64> {
    if kernel.is_empty() {
        return vec![0.0; signal.len()];
    }
    let offset = (kernel.len() - 1) / 2;
    let n = signal.len() as isize;

    (0..signal.len())
        .map(|i| {
            let centre = (i + offset) as isize;
            kernel
                .iter()
                .enumerate()
                .filter_map(|(j, &k)| {
                    let idx = centre - j as isize;
                    (idx >= 0 && idx < n).then(|| k * signal[idx as usize])
                })
                .sum()
        })
        .collect()
}

/// "Same" cross-correlation of `signal` against `template`.
///
/// Output sample `i` is `sum_n signal[i - lag + n] * template[n]` where
/// `lag = len(template) - 1 - (len(template) - 1) / 2`.
pub fn correlate_same(signal: &[f64], template: &[f64]) -> Vec<f64> {
    if template.is_empty() {
        return vec![0.0; signal.len()];
    }
    let m = template.len();
    let lag = (m - 1 - (m - 1) / 2) as isize;
    let n = signal.len() as isize;

    (0..signal.len())
        .map(|i| {
            let start = i as isize - lag;
            template
                .iter()
                .enumerate()
                .filter_map(|(j, &t)| {
                    let idx = start + j as isize;
                    (idx >= 0 && idx < n).then(|| t * signal[idx as usize])
                })
                .sum()
        })
        .collect()
}

/// Causal FIR filtering with zero initial state (`a = [1.0]`).
pub fn lfilter(taps: &[f64], signal: &[f64]) -> Vec<f64> {
    (0..signal.len())
        .map(|n| {
            taps.iter()
                .take(n + 1)
                .enumerate()
                .map(|(k, &b)| b * signal[n - k])
                .sum()
        })
        .collect()
}
