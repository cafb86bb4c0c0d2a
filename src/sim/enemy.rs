//! Zombies: chase the player, stop and strike when close

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{BodyDesc, BodyHandle, Layer, Physics, Tag};
use super::combat::{AttackProfile, DamageEvent, TargetLookup, roll_damage};
use super::health::{Health, Transition};
use super::lifecycle::removal_delay;
use super::player::Player;
use super::timer::{Delay, Interval};
use crate::ground_direction;
use crate::tuning::EnemyTuning;

/// Stable id of a spawned enemy, never reused within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// What the enemy is currently doing (drives animation on the host side)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyBehavior {
    Idle,
    Walking,
    Attacking,
    Dying,
}

/// A landed zombie strike on the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub damage: DamageEvent,
    pub died_now: bool,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    id: EnemyId,
    body: BodyHandle,
    health: Health,
    behavior: EnemyBehavior,
    facing: Vec3,
    /// Strike cadence, running only while in attack distance
    attack: Option<Interval>,
    /// Countdown to removal, started on death
    pub(crate) removal: Option<Delay>,
}

impl Enemy {
    pub fn new(id: EnemyId, body: BodyHandle, tuning: &EnemyTuning) -> Self {
        Self {
            id,
            body,
            health: Health::new(tuning.max_health),
            behavior: EnemyBehavior::Idle,
            facing: Vec3::Z,
            attack: None,
            removal: None,
        }
    }

    /// Collider registered for every zombie
    pub fn body_desc(tuning: &EnemyTuning) -> BodyDesc {
        BodyDesc {
            tag: Tag::Zombie,
            layer: Layer::Default,
            radius: tuning.body_radius,
            dynamic: false,
        }
    }

    pub fn id(&self) -> EnemyId {
        self.id
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn behavior(&self) -> EnemyBehavior {
        self.behavior
    }

    pub fn facing(&self) -> Vec3 {
        self.facing
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    /// Seconds until a dead enemy is removed
    pub fn removal_remaining(&self) -> Option<f32> {
        self.removal.as_ref().map(Delay::remaining)
    }

    pub fn apply_delta(&mut self, amount: f32) -> Transition {
        self.health.apply_delta(amount)
    }

    /// Death side effects: stop striking, start the removal countdown
    pub fn die(&mut self) {
        debug_assert!(self.removal.is_none(), "removal already scheduled");
        if self.removal.is_some() {
            return;
        }
        self.behavior = EnemyBehavior::Dying;
        self.attack = None;
        self.removal = Some(removal_delay());
    }

    /// One step of chase/strike behaviour against the player
    pub fn think<P, R>(
        &mut self,
        physics: &mut P,
        rng: &mut R,
        player: &mut Player,
        tuning: &EnemyTuning,
        dt: f32,
    ) -> Option<Strike>
    where
        P: Physics + ?Sized,
        R: Rng,
    {
        if self.is_dead() {
            return None;
        }
        let (Some(position), Some(target)) =
            (physics.position(self.body), physics.position(player.body()))
        else {
            return None;
        };
        if player.is_dead() {
            self.behavior = EnemyBehavior::Idle;
            self.attack = None;
            return None;
        }

        let distance = position.distance(target);
        let toward = ground_direction(position, target);
        if toward != Vec3::ZERO {
            self.facing = toward;
        }

        if distance < tuning.attack_distance {
            self.behavior = EnemyBehavior::Attacking;
            let swings = self
                .attack
                .get_or_insert_with(|| Interval::new(tuning.attack_interval))
                .advance(dt);
            let profile = AttackProfile::enemy(tuning);
            // Swings stop at the killing blow, so the last strike carries it
            let mut landed = None;
            for _ in 0..swings {
                if player.is_dead() {
                    break;
                }
                let damage = roll_damage(rng, &profile);
                let died_now = player.apply_delta(-damage.final_amount).died_now;
                landed = Some(Strike { damage, died_now });
            }
            landed
        } else if distance < tuning.focus_distance {
            self.behavior = EnemyBehavior::Walking;
            self.attack = None;
            let horizontal = Vec3::new(target.x - position.x, 0.0, target.z - position.z).length();
            let step = (tuning.walk_speed * dt).min(horizontal);
            physics.set_position(self.body, position + toward * step);
            None
        } else {
            self.behavior = EnemyBehavior::Idle;
            self.attack = None;
            None
        }
    }
}

impl TargetLookup for Vec<Enemy> {
    fn health_of(&mut self, body: BodyHandle) -> Option<&mut Health> {
        self.iter_mut()
            .find(|e| e.body == body)
            .map(|e| &mut e.health)
    }
}
