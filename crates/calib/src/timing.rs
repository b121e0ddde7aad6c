use std::time::{Duration, Instant};

/// Wall-clock timer owned by whoever is timing a pass.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
    last_lap: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_lap: now,
        }
    }

    /// Time since `start`.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time since the previous lap (or `start`), then reset the lap mark.
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let lap = now - self.last_lap;
        self.last_lap = now;
        lap
    }

    /// Log the lap time for a finished step at debug level.
    pub fn log_lap(&mut self, step: &str) {
        let lap = self.lap();
        log::debug!("{step}: {:.3}s", lap.as_secs_f64());
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start()
    }
}
