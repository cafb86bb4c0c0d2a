//! Tick-driven timers
//!
//! Timers are plain values advanced by the (already time-scaled) tick delta.
//! They are owned by the entity they affect, usually as `Option<Timer>`;
//! cancelling is dropping the value, so cancelling a timer that never started
//! is a no-op. A zero delta leaves every timer exactly where it was, which is
//! how pausing freezes them.

use serde::{Deserialize, Serialize};

use crate::consts::TIME_EPSILON;

/// One-shot countdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delay {
    duration: f32,
    elapsed: f32,
    fired: bool,
}

impl Delay {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
            fired: false,
        }
    }

    /// Advance by `dt`. Returns true on the single tick the deadline passes.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.fired {
            return false;
        }
        self.elapsed += dt.max(0.0);
        if self.elapsed + TIME_EPSILON >= self.duration {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

    pub fn is_finished(&self) -> bool {
        self.fired
    }
}

/// Repeating timer that fires once per elapsed period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    period: f32,
    elapsed: f32,
}

impl Interval {
    pub fn new(period: f32) -> Self {
        Self {
            period: period.max(TIME_EPSILON),
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` and return how many periods completed. Non-finite
    /// deltas are ignored.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.elapsed += dt;
        let periods = ((self.elapsed + TIME_EPSILON) / self.period).floor();
        if periods < 1.0 {
            return 0;
        }
        // Epsilon-early fires must not leave a negative remainder
        self.elapsed = (self.elapsed - periods * self.period).max(0.0);
        // Saturating cast
        periods as u32
    }
}

/// Linear 1 -> 0 opacity fade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fade {
    duration: f32,
    elapsed: f32,
}

impl Fade {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(TIME_EPSILON),
            elapsed: 0.0,
        }
    }

    /// Advance by `dt`. Returns true once fully faded.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.is_finished()
    }

    /// Current opacity
    pub fn opacity(&self) -> f32 {
        (1.0 - self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed + TIME_EPSILON >= self.duration
    }

    /// Back to fully opaque
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }
}
