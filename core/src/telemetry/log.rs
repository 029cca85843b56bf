use log::{debug, info, warn};
use std::time::Duration;

/// Thin wrapper around the `log` facade that tags each line with its origin.
pub struct LogManager {
    scope: &'static str,
}

impl LogManager {
    pub fn new(scope: &'static str) -> Self {
        Self { scope }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.scope, message);
    }

    pub fn caution(&self, message: &str) {
        warn!("[{}] {}", self.scope, message);
    }

    pub fn timing(&self, label: &str, elapsed: Duration) {
        debug!(
            "[{}] {} took {:.6}s",
            self.scope,
            label,
            elapsed.as_secs_f64()
        );
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("pulsecore")
    }
}
