//! Linear value transition for animated dashboard counters.
//!
//! Cosmetic only: the transition never feeds back into stored state.

use std::time::Duration;

/// Default length of a counter transition.
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueTransition {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
}

impl ValueTransition {
    pub fn new(from: f64, to: f64) -> Self {
        Self {
            from,
            to,
            duration: DEFAULT_TRANSITION,
        }
    }

    /// Progress in `0.0..=1.0` after `elapsed`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Interpolated value after `elapsed`; exactly `to` once finished.
    pub fn value_at(&self, elapsed: Duration) -> f64 {
        let progress = self.progress(elapsed);
        if progress >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * progress
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        self.progress(elapsed) >= 1.0
    }
}
