//! Per-pass wall-clock timing for the fps feedback loop

use std::time::Instant;

/// Times one full frame pass; the reciprocal of the elapsed time is the
/// fps estimate fed back before the next pass.
///
/// The estimate is live and jittery by design: duration accounting tracks
/// measured processing time, not a fixed nominal rate. Degenerate (zero)
/// elapsed times yield a non-finite value which the engine rejects.
#[derive(Debug)]
pub struct PassTimer {
    started: Instant,
}

impl PassTimer {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Frames per second implied by the time since `start`
    pub fn fps(&self) -> f64 {
        1.0 / self.started.elapsed().as_secs_f64()
    }
}
