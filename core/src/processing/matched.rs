use crate::math::convolution::correlate_same;
use crate::math::stats::StatsHelper;
use crate::prelude::{ensure_length, require_samples, FilterResult};

pub const DEFAULT_TEMPLATE_LEN: usize = 120;

/// Zero-mean "same"-length cross-correlation of `signal` against `template`.
pub fn matched_filter(signal: &[f64], template: &[f64]) -> FilterResult<Vec<f64>> {
    require_samples(signal, "matched filter input")?;
    require_samples(template, "matched filter template")?;

    let signal = StatsHelper::centered(signal);
    let template = StatsHelper::centered(template);
    Ok(correlate_same(&signal, &template))
}

/// Template cut from the middle of the clean pulse, or all of it when shorter
/// than `template_len`.
///
/// This reads the ground truth and is only meaningful when scoring filters
/// against a known clean signal.
pub fn default_template(clean: &[f64], template_len: usize) -> Vec<f64> {
    if clean.len() < template_len {
        return clean.to_vec();
    }
    let half = template_len / 2;
    let centre = clean.len() / 2;
    let start = centre.saturating_sub(half);
    let end = (start + template_len).min(clean.len());
    clean[start..end].to_vec()
}

/// Rescales `raw` to the clean peak magnitude and rotates it so both peaks
/// share an index.
pub fn align_to_reference(raw: &[f64], clean: &[f64]) -> FilterResult<Vec<f64>> {
    require_samples(raw, "matched filter output")?;
    ensure_length(raw, clean.len())?;

    let n = raw.len();
    let clean_peak = StatsHelper::argmax_abs(clean).unwrap_or(0);
    let raw_peak = StatsHelper::argmax_abs(raw).unwrap_or(0);
    let scale = StatsHelper::max_abs(clean) / (StatsHelper::max_abs(raw) + 1e-12);

    let shift = (raw_peak as isize - clean_peak as isize).rem_euclid(n as isize) as usize;
    let aligned = (0..n).map(|i| raw[(i + shift) % n] * scale).collect();
    Ok(aligned)
}
