//! Data-driven game balance
//!
//! Every gameplay number that a designer might want to tweak lives here so
//! it can be overridden from the settings JSON.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Player character balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerTuning {
    pub max_health: f32,
    /// Walking speed (units per second)
    pub walk_speed: f32,
    /// Upward velocity change applied at jump start
    pub jump_impulse: f32,
    /// Height above the take-off point at which the arc is cut
    pub max_jump_height: f32,
    /// Fraction of the jump impulse applied downward at the apex
    pub fall_factor: f32,
    pub min_damage: f32,
    pub max_damage: f32,
    /// Probability of a critical hit, clamped to [0, 1] when resolved
    pub crit_probability: f32,
    pub attack_range: f32,
    /// Health restored per heal tick
    pub heal_per_second: f32,
    /// Body radius registered with the collision world
    pub body_radius: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            walk_speed: 4.0,
            jump_impulse: 8.0,
            max_jump_height: 3.0,
            fall_factor: 0.9,
            min_damage: 10.0,
            max_damage: 40.0,
            crit_probability: 0.1,
            attack_range: PLAYER_ATTACK_RANGE,
            heal_per_second: 0.5,
            body_radius: 0.5,
        }
    }
}

/// Zombie balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnemyTuning {
    pub max_health: f32,
    /// Chase speed (units per second)
    pub walk_speed: f32,
    pub min_damage: f32,
    pub max_damage: f32,
    /// Seconds between strikes while in attack distance
    pub attack_interval: f32,
    pub attack_distance: f32,
    pub focus_distance: f32,
    pub body_radius: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            walk_speed: 1.5,
            min_damage: 1.0,
            max_damage: 5.0,
            attack_interval: 1.0,
            attack_distance: ENEMY_ATTACK_DISTANCE,
            focus_distance: ENEMY_FOCUS_DISTANCE,
            body_radius: 0.5,
        }
    }
}

/// Wave size progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WaveTuning {
    /// Enemies in wave 1
    pub initial_count: u32,
    /// Extra enemies per subsequent wave
    pub increment: u32,
    /// Rejection sampling budget per enemy
    pub max_spawn_attempts: u32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            initial_count: 10,
            increment: 10,
            max_spawn_attempts: MAX_SPAWN_ATTEMPTS,
        }
    }
}

impl WaveTuning {
    /// Number of enemies targeted for a 1-based wave number
    pub fn target_count(&self, wave_number: u32) -> u32 {
        let extra = wave_number.saturating_sub(1).saturating_mul(self.increment);
        self.initial_count.saturating_add(extra)
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub wave: WaveTuning,
}
