//! Melee attack resolution
//!
//! An attack is a ray along the attacker's facing. If the nearest thing it
//! hits is a living target within reach, damage is rolled (with a chance to
//! crit for double) and applied through the target's `Health`.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{BodyHandle, Physics, Tag};
use super::health::Health;
use crate::tuning::{EnemyTuning, PlayerTuning};

/// Critical hit probability, clamped to [0, 1] on construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CritChance(f32);

impl CritChance {
    pub const NEVER: Self = Self(0.0);
    pub const ALWAYS: Self = Self(1.0);

    pub fn new(probability: f32) -> Self {
        if probability.is_nan() {
            return Self::NEVER;
        }
        Self(probability.clamp(0.0, 1.0))
    }

    pub fn probability(self) -> f32 {
        self.0
    }

    /// Uniform draw in [0, 1) compared against the probability
    pub fn roll<R: Rng>(self, rng: &mut R) -> bool {
        rng.random::<f32>() < self.0
    }
}

/// Reach and damage of one kind of attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackProfile {
    pub range: f32,
    pub min_damage: f32,
    pub max_damage: f32,
    pub crit: CritChance,
    /// Only colliders with this tag can be struck
    pub target: Tag,
}

impl AttackProfile {
    /// Damage bounds are ordered and floored at zero; non-finite bounds
    /// count as zero.
    pub fn new(range: f32, min_damage: f32, max_damage: f32, crit_probability: f32) -> Self {
        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
        let (min_damage, max_damage) = (finite(min_damage), finite(max_damage));
        let (min_damage, max_damage) = if min_damage <= max_damage {
            (min_damage, max_damage)
        } else {
            (max_damage, min_damage)
        };
        Self {
            range,
            min_damage: min_damage.max(0.0),
            max_damage: max_damage.max(0.0),
            crit: CritChance::new(crit_probability),
            target: Tag::Zombie,
        }
    }

    /// The player's melee swing
    pub fn player(tuning: &PlayerTuning) -> Self {
        Self::new(
            tuning.attack_range,
            tuning.min_damage,
            tuning.max_damage,
            tuning.crit_probability,
        )
    }

    /// A zombie strike: lands on the player, never crits
    pub fn enemy(tuning: &EnemyTuning) -> Self {
        Self {
            target: Tag::Player,
            ..Self::new(
                tuning.attack_distance,
                tuning.min_damage,
                tuning.max_damage,
                0.0,
            )
        }
    }
}

/// Damage rolled for one successful hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    pub base_amount: f32,
    pub is_critical: bool,
    pub final_amount: f32,
}

/// Roll base damage uniformly in [min, max] and apply the crit roll
pub fn roll_damage<R: Rng>(rng: &mut R, profile: &AttackProfile) -> DamageEvent {
    let base_amount = rng.random_range(profile.min_damage..=profile.max_damage);
    let is_critical = profile.crit.roll(rng);
    let final_amount = if is_critical {
        base_amount * 2.0
    } else {
        base_amount
    };
    DamageEvent {
        base_amount,
        is_critical,
        final_amount,
    }
}

/// Maps a struck body back to the health of the entity that owns it
pub trait TargetLookup {
    fn health_of(&mut self, body: BodyHandle) -> Option<&mut Health>;
}

/// A landed hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackOutcome {
    pub target: BodyHandle,
    pub damage: DamageEvent,
    /// This hit was the killing blow
    pub died_now: bool,
}

/// Resolve one melee attack from `origin` along `forward`.
///
/// Returns `None` when nothing valid is in reach or the target is already
/// dead; in that case no health is touched. The caller is responsible for
/// only letting living attackers swing.
pub fn resolve_attack<R, P, T>(
    rng: &mut R,
    physics: &P,
    targets: &mut T,
    origin: Vec3,
    forward: Vec3,
    profile: &AttackProfile,
) -> Option<AttackOutcome>
where
    R: Rng,
    P: Physics + ?Sized,
    T: TargetLookup + ?Sized,
{
    let hit = physics.raycast(origin, forward)?;
    if hit.tag != profile.target || hit.distance > profile.range {
        return None;
    }
    let target = hit.body?;
    let health = targets.health_of(target)?;
    if health.is_dead() {
        return None;
    }

    let damage = roll_damage(rng, profile);
    let transition = health.apply_delta(-damage.final_amount);
    log::debug!(
        "Hit {:?} for {:.1}{} at {:.2}m, health now {:.1}",
        target,
        damage.final_amount,
        if damage.is_critical { " (crit)" } else { "" },
        hit.distance,
        health.current()
    );

    Some(AttackOutcome {
        target,
        damage,
        died_now: transition.died_now,
    })
}
