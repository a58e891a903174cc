use std::time::{Duration, Instant};
use tracing::info;

/// Timer for measuring wall-clock duration of a phase
pub struct LatencyTimer {
    start: Instant,
}

impl LatencyTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return elapsed duration
    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and log the elapsed duration under `phase`
    pub fn log(self, phase: &str) -> Duration {
        let elapsed = self.stop();
        info!("Time taken for {}: {:.6} seconds", phase, elapsed.as_secs_f64());
        elapsed
    }
}

/// Run `f`, log how long it took under `phase`, return its output with the
/// elapsed time
pub fn time_phase<F, R>(phase: &str, f: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    let timer = LatencyTimer::start();
    let result = f();
    (result, timer.log(phase))
}
