use crate::generator::profile::GeneratorConfig;
use crate::workflow::runner::WorkflowResult;
use anyhow::Context;
use pulsecore::MetricRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterScore {
    pub name: String,
    pub metrics: MetricRecord,
}

/// Machine-readable summary of one bench run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub generator: GeneratorConfig,
    pub noisy: MetricRecord,
    pub filters: Vec<FilterScore>,
}

impl RunReport {
    pub fn new(generator: &GeneratorConfig, result: &WorkflowResult) -> Self {
        Self {
            generator: generator.clone(),
            noisy: result.noisy_metrics.clone(),
            filters: result
                .ranked()
                .into_iter()
                .map(|outcome| FilterScore {
                    name: outcome.name.to_string(),
                    metrics: outcome.metrics.clone(),
                })
                .collect(),
        }
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating report directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("serializing run report")?;
        fs::write(path_ref, json)
            .with_context(|| format!("writing run report {}", path_ref.display()))?;
        Ok(())
    }
}
