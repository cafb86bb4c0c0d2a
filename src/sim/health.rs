//! Clamped health with a one-way death transition
//!
//! `Health::apply_delta` is the only way to change a combatant's health during
//! play. Callers get back a `Transition` telling them whether this particular
//! change killed the combatant, so death side effects are driven by return
//! values rather than hidden inside a setter.

use serde::{Deserialize, Serialize};

/// Outcome of a single health change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transition {
    /// True only for the delta that took health to zero
    pub died_now: bool,
}

/// Health of one combatant (player or enemy)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: f32,
    max: f32,
    dead: bool,
}

impl Health {
    /// Full health. Negative or non-finite maxima are treated as zero.
    pub fn new(max: f32) -> Self {
        let max = if max.is_finite() { max.max(0.0) } else { 0.0 };
        Self {
            current: max,
            max,
            dead: false,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Fill fraction in [0, 1] for health bars
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    /// Add `amount` (negative for damage) and clamp to [0, max].
    ///
    /// Healing a dead combatant does nothing. Further damage to a dead
    /// combatant is accepted but never reports a second death.
    pub fn apply_delta(&mut self, amount: f32) -> Transition {
        if !amount.is_finite() {
            return Transition::default();
        }
        if self.dead && amount > 0.0 {
            return Transition::default();
        }

        self.current = (self.current + amount).clamp(0.0, self.max);

        if self.current <= 0.0 && !self.dead {
            self.dead = true;
            return Transition { died_now: true };
        }
        Transition::default()
    }

    /// Restore to full and revive (game restart only)
    pub fn reset(&mut self) {
        self.current = self.max;
        self.dead = false;
    }
}
