//! Frequency-domain views used by the report: amplitude spectrum, Welch PSD
//! and spectrogram.

use crate::math::fft::FftHelper;
use crate::math::stats::StatsHelper;
use crate::math::window::hann_periodic;
use crate::prelude::{require_positive, require_samples, FilterError, FilterResult};
use ndarray::Array2;

pub const DEFAULT_SAMPLE_RATE: f64 = 1e6;
pub const DEFAULT_PSD_NPERSEG: usize = 512;
pub const DEFAULT_SPECTROGRAM_NPERSEG: usize = 256;

/// Values over a one-sided frequency axis in Hz.
#[derive(Debug, Clone)]
pub struct Spectrum {
    pub freqs: Vec<f64>,
    pub values: Vec<f64>,
}

/// Power density per (frequency, segment) cell.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    pub freqs: Vec<f64>,
    pub times: Vec<f64>,
    pub power: Array2<f64>,
}

fn require_rate(sample_rate: f64) -> FilterResult<()> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(FilterError::InvalidParameter(format!(
            "sample rate must be positive, got {}",
            sample_rate
        )));
    }
    Ok(())
}

fn one_sided_freqs(nfft: usize, sample_rate: f64) -> Vec<f64> {
    (0..=nfft / 2)
        .map(|k| k as f64 * sample_rate / nfft as f64)
        .collect()
}

/// Single-sided amplitude spectrum `|X| / N * 2`, zero-padded to `nfft`
/// (next power of two by default).
pub fn amplitude_spectrum(
    signal: &[f64],
    sample_rate: f64,
    nfft: Option<usize>,
) -> FilterResult<Spectrum> {
    require_samples(signal, "spectrum input")?;
    require_rate(sample_rate)?;
    let nfft = nfft.unwrap_or_else(|| signal.len().next_power_of_two());
    require_positive(nfft, "FFT length")?;

    let mut fft = FftHelper::new(nfft);
    let scale = 2.0 / signal.len() as f64;
    let values = fft
        .forward_real(signal)
        .iter()
        .map(|bin| bin.norm() * scale)
        .collect();

    Ok(Spectrum {
        freqs: one_sided_freqs(nfft, sample_rate),
        values,
    })
}

/// Hann-windowed, mean-detrended one-sided density estimates of every segment.
struct SegmentEstimator {
    window: Vec<f64>,
    fft: FftHelper,
    scale: f64,
}

impl SegmentEstimator {
    fn new(nperseg: usize, sample_rate: f64) -> Self {
        let window = hann_periodic(nperseg);
        let energy: f64 = window.iter().map(|w| w * w).sum();
        Self {
            fft: FftHelper::new(nperseg),
            scale: 1.0 / (sample_rate * energy),
            window,
        }
    }

    fn density(&mut self, segment: &[f64]) -> Vec<f64> {
        let mean = StatsHelper::mean(segment);
        let tapered: Vec<f64> = segment
            .iter()
            .zip(&self.window)
            .map(|(x, w)| (x - mean) * w)
            .collect();
        let nperseg = self.window.len();
        let last = nperseg / 2;
        self.fft
            .forward_real(&tapered)
            .iter()
            .enumerate()
            .map(|(k, bin)| {
                let power = bin.norm_sqr() * self.scale;
                let nyquist = nperseg % 2 == 0 && k == last;
                if k == 0 || nyquist {
                    power
                } else {
                    2.0 * power
                }
            })
            .collect()
    }
}

fn segment_starts(length: usize, nperseg: usize, noverlap: usize) -> Vec<usize> {
    let step = nperseg - noverlap;
    let count = (length - noverlap) / step;
    (0..count).map(|i| i * step).collect()
}

/// Welch power spectral density with 50 % overlapping Hann segments.
pub fn welch_psd(signal: &[f64], sample_rate: f64, nperseg: usize) -> FilterResult<Spectrum> {
    require_samples(signal, "PSD input")?;
    require_rate(sample_rate)?;
    require_positive(nperseg, "PSD segment length")?;

    let nperseg = nperseg.min(signal.len());
    let noverlap = nperseg / 2;
    let mut estimator = SegmentEstimator::new(nperseg, sample_rate);
    let starts = segment_starts(signal.len(), nperseg, noverlap);

    let mut accumulated = vec![0.0; nperseg / 2 + 1];
    for &start in &starts {
        let density = estimator.density(&signal[start..start + nperseg]);
        for (acc, value) in accumulated.iter_mut().zip(density) {
            *acc += value;
        }
    }
    let segments = starts.len().max(1) as f64;
    for value in accumulated.iter_mut() {
        *value /= segments;
    }

    Ok(Spectrum {
        freqs: one_sided_freqs(nperseg, sample_rate),
        values: accumulated,
    })
}

/// Short-time density estimate; `noverlap` defaults to half a segment.
pub fn spectrogram(
    signal: &[f64],
    sample_rate: f64,
    nperseg: usize,
    noverlap: Option<usize>,
) -> FilterResult<Spectrogram> {
    require_samples(signal, "spectrogram input")?;
    require_rate(sample_rate)?;
    require_positive(nperseg, "spectrogram segment length")?;

    let nperseg = nperseg.min(signal.len());
    let noverlap = noverlap.unwrap_or(nperseg / 2);
    if noverlap >= nperseg {
        return Err(FilterError::InvalidParameter(format!(
            "spectrogram overlap {} must be smaller than the segment length {}",
            noverlap, nperseg
        )));
    }

    let mut estimator = SegmentEstimator::new(nperseg, sample_rate);
    let starts = segment_starts(signal.len(), nperseg, noverlap);
    let bins = nperseg / 2 + 1;

    let mut power = Array2::<f64>::zeros((bins, starts.len()));
    for (column, &start) in starts.iter().enumerate() {
        let density = estimator.density(&signal[start..start + nperseg]);
        for (row, value) in density.into_iter().enumerate() {
            power[[row, column]] = value;
        }
    }

    let times = starts
        .iter()
        .map(|&start| (start as f64 + nperseg as f64 / 2.0) / sample_rate)
        .collect();

    Ok(Spectrogram {
        freqs: one_sided_freqs(nperseg, sample_rate),
        times,
        power,
    })
}
