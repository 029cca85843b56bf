//! Synthetic pulse generation, denoising filters and quality metrics for the
//! pulse denoising bench.
//!
//! The crate is a set of pure functions: [`synthesis`] builds the clean and
//! noisy signals, [`processing`] holds the filter bank, and [`analysis`]
//! scores filter outputs and computes the spectra used in reports.

pub mod analysis;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod synthesis;
pub mod telemetry;

pub use analysis::MetricRecord;
pub use prelude::{FilterError, FilterResult, TestSignal};
pub use processing::FilterKind;
