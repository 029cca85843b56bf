//! Synthetic ground truth and noisy observations.

pub mod noise;
pub mod pulse;

pub use noise::{
    generate_test_signal, inject_noise, noise_components, NoiseComponent, NoiseKind, NoiseParams,
};
pub use pulse::{gaussian_exponential_pulse, PulseParams};
