//! Entity-owned timed behaviour
//!
//! - death -> delayed removal of enemies
//! - heal over time
//! - jump arc (impulse up, poll height, impulse down)
//!
//! Each of these lives in an `Option` on the entity it affects and is dropped
//! when that entity dies or is removed.

use serde::{Deserialize, Serialize};

use super::collision::{BodyHandle, Physics};
use super::enemy::Enemy;
use super::health::Health;
use super::timer::{Delay, Interval};
use crate::consts::{HEAL_INTERVAL, REMOVAL_DELAY};
use crate::tuning::PlayerTuning;

/// Countdown between an enemy's death and its removal from the world
pub fn removal_delay() -> Delay {
    Delay::new(REMOVAL_DELAY)
}

/// Advance every pending removal and pull out the enemies whose delay
/// expired, in roster order.
pub fn take_expired_removals(enemies: &mut Vec<Enemy>, dt: f32) -> Vec<Enemy> {
    let mut expired = Vec::new();
    let mut i = 0;
    while i < enemies.len() {
        let due = enemies[i]
            .removal
            .as_mut()
            .is_some_and(|delay| delay.advance(dt));
        if due {
            expired.push(enemies.remove(i));
        } else {
            i += 1;
        }
    }
    expired
}

/// Periodic heal applied through `Health`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealOverTime {
    interval: Interval,
    amount: f32,
}

impl HealOverTime {
    pub fn new(amount: f32) -> Self {
        Self {
            interval: Interval::new(HEAL_INTERVAL),
            amount,
        }
    }

    /// Advance and heal once per completed interval while alive and hurt.
    /// Returns the health actually restored.
    pub fn tick(&mut self, health: &mut Health, dt: f32) -> f32 {
        let before = health.current();
        for _ in 0..self.interval.advance(dt) {
            if health.is_dead() || health.is_full() {
                break;
            }
            health.apply_delta(self.amount);
        }
        health.current() - before
    }
}

/// Where a jump arc is after a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcStep {
    Rising,
    /// Target height reached; the downward impulse has been applied
    Apex,
    /// Touched ground again before the apex
    Landed,
}

/// An in-flight jump
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpArc {
    target_height: f32,
    fall_impulse: f32,
    airborne: bool,
}

impl JumpArc {
    /// Kick the body upward and remember the height at which to cut the arc
    pub fn launch<P: Physics + ?Sized>(
        physics: &mut P,
        body: BodyHandle,
        start_height: f32,
        tuning: &PlayerTuning,
    ) -> Self {
        physics.apply_impulse(body, glam::Vec3::Y * tuning.jump_impulse);
        Self {
            target_height: start_height + tuning.max_jump_height,
            fall_impulse: tuning.jump_impulse * tuning.fall_factor,
            airborne: false,
        }
    }

    pub fn target_height(&self) -> f32 {
        self.target_height
    }

    /// Check the body's height once per simulation step
    pub fn poll<P: Physics + ?Sized>(
        &mut self,
        physics: &mut P,
        body: BodyHandle,
        on_ground: bool,
    ) -> ArcStep {
        let Some(position) = physics.position(body) else {
            return ArcStep::Landed;
        };
        if position.y >= self.target_height {
            physics.apply_impulse(body, glam::Vec3::NEG_Y * self.fall_impulse);
            return ArcStep::Apex;
        }
        if !on_ground {
            self.airborne = true;
        } else if self.airborne {
            return ArcStep::Landed;
        }
        ArcStep::Rising
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::{ArenaWorld, BodyDesc, Layer, Tag};
    use crate::sim::enemy::EnemyId;
    use crate::tuning::EnemyTuning;
    use glam::Vec3;

    fn player_body(world: &mut ArenaWorld) -> BodyHandle {
        world.add_body(
            BodyDesc {
                tag: Tag::Player,
                layer: Layer::Default,
                radius: 0.5,
                dynamic: true,
            },
            Vec3::ZERO,
        )
    }

    #[test]
    fn test_heal_over_time_rate() {
        let mut health = Health::new(100.0);
        health.apply_delta(-50.0);
        let mut heal = HealOverTime::new(0.5);
        for _ in 0..10 {
            heal.tick(&mut health, 1.0);
        }
        assert_eq!(health.current(), 55.0);
    }

    #[test]
    fn test_heal_stops_at_max_and_on_death() {
        let mut health = Health::new(100.0);
        health.apply_delta(-1.0);
        let mut heal = HealOverTime::new(0.5);
        for _ in 0..10 {
            heal.tick(&mut health, 1.0);
        }
        assert_eq!(health.current(), 100.0);

        health.apply_delta(-100.0);
        assert_eq!(heal.tick(&mut health, 5.0), 0.0);
        assert!(health.is_dead());
    }

    #[test]
    fn test_jump_arc_reaches_apex() {
        let mut world = ArenaWorld::new(0.0);
        let body = player_body(&mut world);
        let tuning = PlayerTuning::default();

        let mut arc = JumpArc::launch(&mut world, body, 0.0, &tuning);
        assert_eq!(arc.target_height(), tuning.max_jump_height);

        let mut step = ArcStep::Rising;
        for _ in 0..120 {
            world.step(1.0 / 60.0);
            step = arc.poll(&mut world, body, false);
            if step != ArcStep::Rising {
                break;
            }
        }
        assert_eq!(step, ArcStep::Apex);
        // Compensating impulse has us heading down
        assert!(world.velocity(body).unwrap().y < 0.0);
    }

    #[test]
    fn test_jump_arc_lands_short() {
        let mut world = ArenaWorld::new(0.0);
        let body = player_body(&mut world);
        let tuning = PlayerTuning {
            jump_impulse: 2.0,
            max_jump_height: 5.0,
            ..Default::default()
        };

        let mut arc = JumpArc::launch(&mut world, body, 0.0, &tuning);
        let mut step = ArcStep::Rising;
        for _ in 0..600 {
            world.step(1.0 / 60.0);
            let on_ground = world.position(body).unwrap().y <= 0.0;
            step = arc.poll(&mut world, body, on_ground);
            if step != ArcStep::Rising {
                break;
            }
        }
        assert_eq!(step, ArcStep::Landed);
    }

    #[test]
    fn test_expired_removals_leave_the_roster() {
        let tuning = EnemyTuning::default();
        let mut enemies: Vec<Enemy> = (1..=3)
            .map(|i| Enemy::new(EnemyId(i), BodyHandle(i), &tuning))
            .collect();
        enemies[1].die();

        for _ in 0..4 {
            assert!(take_expired_removals(&mut enemies, 1.0).is_empty());
        }
        let expired = take_expired_removals(&mut enemies, 1.0);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id().0, 2);
        assert_eq!(enemies.len(), 2);
    }
}
