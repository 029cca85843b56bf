pub mod quality;
pub mod spectral;

pub use quality::{correlation, mse, psnr, snr_db, MetricRecord};
pub use spectral::{amplitude_spectrum, spectrogram, welch_psd, Spectrogram, Spectrum};
