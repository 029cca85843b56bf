use crate::generator::profile::GeneratorConfig;
use anyhow::Context;
use pulsecore::analysis::spectral::{
    DEFAULT_PSD_NPERSEG, DEFAULT_SAMPLE_RATE, DEFAULT_SPECTROGRAM_NPERSEG,
};
use pulsecore::FilterKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Frequency-analysis settings; the sample rate only labels axes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub sample_rate: f64,
    pub psd_nperseg: usize,
    pub spectrogram_nperseg: usize,
    pub spectrogram_noverlap: Option<usize>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            psd_nperseg: DEFAULT_PSD_NPERSEG,
            spectrogram_nperseg: DEFAULT_SPECTROGRAM_NPERSEG,
            spectrogram_noverlap: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub plots: bool,
    pub figure: PathBuf,
    pub spectrum_figure: PathBuf,
    pub report: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            plots: true,
            figure: PathBuf::from("filters_comparison_fixed.png"),
            spectrum_figure: PathBuf::from("frequency_analysis.png"),
            report: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub generator: GeneratorConfig,
    pub filters: Vec<FilterKind>,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            filters: FilterKind::default_bank(),
            analysis: AnalysisConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(length: Option<usize>, seed: Option<u64>, noise_level: Option<f64>) -> Self {
        Self::default().with_overrides(length, seed, noise_level)
    }

    /// Applies command-line overrides; a noise level replaces every configured level.
    pub fn with_overrides(
        mut self,
        length: Option<usize>,
        seed: Option<u64>,
        noise_level: Option<f64>,
    ) -> Self {
        if let Some(length) = length {
            self.generator.length = length;
        }
        if let Some(seed) = seed {
            self.generator.seed = Some(seed);
        }
        if let Some(level) = noise_level {
            self.generator.noise_levels = vec![level; self.generator.noise_types.len()];
        }
        self
    }
}
