use std::time::{Duration, Instant};

/// Wall-clock timer around a single filter invocation.
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Runs `work` and returns its result with the time it took.
    pub fn measure<T>(work: impl FnOnce() -> T) -> (T, Duration) {
        let watch = Self::start();
        let value = work();
        (value, watch.elapsed())
    }
}
