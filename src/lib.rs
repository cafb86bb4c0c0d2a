//! Horde Arena - wave-based zombie survival simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (health, combat, waves, timers, game state)
//! - `settings`: JSON session configuration
//! - `tuning`: Data-driven game balance

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{Settings, SettingsError};
pub use tuning::Tuning;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Seconds a dead enemy lingers before it is removed
    pub const REMOVAL_DELAY: f32 = 5.0;
    /// Seconds between heal ticks
    pub const HEAL_INTERVAL: f32 = 1.0;
    /// Seconds for the crit indicator to fade out
    pub const CRIT_FADE_DURATION: f32 = 3.0;

    /// Rejection sampling budget per spawn slot
    pub const MAX_SPAWN_ATTEMPTS: u32 = 100;
    /// Clearance radius that must be free of obstacles at a spawn point
    pub const SPAWN_CLEARANCE_RADIUS: f32 = 1.0;

    /// Max ray distance below the player that still counts as standing
    pub const GROUND_CHECK_DISTANCE: f32 = 0.100001;

    /// Player melee reach along the aim ray
    pub const PLAYER_ATTACK_RANGE: f32 = 1.4;
    /// Enemies closer than this stop and strike
    pub const ENEMY_ATTACK_DISTANCE: f32 = 1.2;
    /// Enemies closer than this walk toward the player
    pub const ENEMY_FOCUS_DISTANCE: f32 = 100.0;

    /// Slack for float accumulation when comparing elapsed time to a deadline
    pub const TIME_EPSILON: f32 = 1e-4;
}

/// Project a vector onto the ground plane (zero the vertical component)
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Unit direction on the ground plane from `from` toward `to`, or zero if
/// the two points share the same column
#[inline]
pub fn ground_direction(from: Vec3, to: Vec3) -> Vec3 {
    flatten(to - from).normalize_or_zero()
}
