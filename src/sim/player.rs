//! The player character and the timers it owns

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::{BodyDesc, BodyHandle, Layer, Physics, Tag};
use super::health::{Health, Transition};
use super::lifecycle::{ArcStep, HealOverTime, JumpArc};
use super::spawn::Arena;
use super::timer::Fade;
use crate::consts::{CRIT_FADE_DURATION, GROUND_CHECK_DISTANCE};
use crate::flatten;
use crate::tuning::PlayerTuning;

/// Player state that survives between ticks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    body: BodyHandle,
    health: Health,
    spawn_point: Vec3,
    facing: Vec3,
    heal_per_second: f32,
    auto_heal: bool,
    on_ground: bool,
    in_heal_zone: bool,
    jump: Option<JumpArc>,
    heal: Option<HealOverTime>,
    crit_fade: Option<Fade>,
}

impl Player {
    /// Register the player's body at `spawn_point` and arm the heal timer if
    /// auto-heal is on
    pub fn new<P: Physics + ?Sized>(
        physics: &mut P,
        spawn_point: Vec3,
        tuning: &PlayerTuning,
        auto_heal: bool,
    ) -> Self {
        let body = physics.add_body(
            BodyDesc {
                tag: Tag::Player,
                layer: Layer::Default,
                radius: tuning.body_radius,
                dynamic: true,
            },
            spawn_point,
        );
        let mut player = Self {
            body,
            health: Health::new(tuning.max_health),
            spawn_point,
            facing: Vec3::Z,
            heal_per_second: tuning.heal_per_second,
            auto_heal,
            on_ground: false,
            in_heal_zone: false,
            jump: None,
            heal: None,
            crit_fade: None,
        };
        player.refresh_heal_timer();
        player
    }

    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn health(&self) -> &Health {
        &self.health
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    pub fn facing(&self) -> Vec3 {
        self.facing
    }

    pub fn spawn_point(&self) -> Vec3 {
        self.spawn_point
    }

    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn is_jumping(&self) -> bool {
        self.jump.is_some()
    }

    pub fn is_healing(&self) -> bool {
        self.heal.is_some()
    }

    /// Opacity of the crit indicator, `None` when hidden
    pub fn crit_indicator_opacity(&self) -> Option<f32> {
        self.crit_fade.as_ref().map(Fade::opacity)
    }

    pub fn position<P: Physics + ?Sized>(&self, physics: &P) -> Vec3 {
        physics.position(self.body).unwrap_or(self.spawn_point)
    }

    pub fn apply_delta(&mut self, amount: f32) -> Transition {
        self.health.apply_delta(amount)
    }

    /// Heal timer runs while alive and either auto-heal is on or the player
    /// stands in the heal zone
    fn refresh_heal_timer(&mut self) {
        let wanted = !self.is_dead() && (self.auto_heal || self.in_heal_zone);
        match (wanted, self.heal.is_some()) {
            (true, false) => self.heal = Some(HealOverTime::new(self.heal_per_second)),
            (false, true) => self.heal = None,
            _ => {}
        }
    }

    /// Feed the host's heal-zone trigger state; enter/exit edges start and
    /// stop the heal timer
    pub fn set_in_heal_zone(&mut self, inside: bool) {
        if self.in_heal_zone != inside {
            log::debug!("Player {} heal zone", if inside { "entered" } else { "left" });
            self.in_heal_zone = inside;
            self.refresh_heal_timer();
        }
    }

    pub fn tick_heal(&mut self, dt: f32) -> f32 {
        match self.heal.as_mut() {
            Some(heal) => heal.tick(&mut self.health, dt),
            None => 0.0,
        }
    }

    /// Downward ray: standing if it meets ground or solid scenery within
    /// tolerance
    pub fn check_ground<P: Physics + ?Sized>(&mut self, physics: &P) -> bool {
        let origin = self.position(physics);
        self.on_ground = physics
            .raycast(origin, Vec3::NEG_Y)
            .is_some_and(|hit| {
                (hit.tag == Tag::Ground || hit.layer == Layer::Object)
                    && hit.distance <= GROUND_CHECK_DISTANCE
            });
        self.on_ground
    }

    /// Start a jump if standing and not already mid-arc
    pub fn try_jump<P: Physics + ?Sized>(&mut self, physics: &mut P, tuning: &PlayerTuning) -> bool {
        if self.is_dead() || self.jump.is_some() || !self.on_ground {
            return false;
        }
        let height = self.position(physics).y;
        self.jump = Some(JumpArc::launch(physics, self.body, height, tuning));
        true
    }

    /// Poll the jump arc; drops it once it reaches the apex or lands
    pub fn poll_jump<P: Physics + ?Sized>(&mut self, physics: &mut P) {
        let Some(arc) = self.jump.as_mut() else {
            return;
        };
        match arc.poll(physics, self.body, self.on_ground) {
            ArcStep::Rising => {}
            ArcStep::Apex | ArcStep::Landed => self.jump = None,
        }
    }

    /// Walk along a host-resolved direction, staying inside the arena
    pub fn walk<P: Physics + ?Sized>(
        &mut self,
        physics: &mut P,
        arena: &Arena,
        direction: Vec3,
        speed: f32,
        dt: f32,
    ) {
        if self.is_dead() {
            return;
        }
        let dir = flatten(direction).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        self.facing = dir;
        let current = self.position(physics);
        let mut next = current + dir * speed * dt;
        next.x = next.x.clamp(arena.bounds_min().x, arena.bounds_max().x);
        next.z = next.z.clamp(arena.bounds_min().z, arena.bounds_max().z);
        physics.set_position(self.body, next);
    }

    /// Turn without moving
    pub fn face(&mut self, direction: Vec3) {
        let dir = flatten(direction).normalize_or_zero();
        if dir != Vec3::ZERO {
            self.facing = dir;
        }
    }

    /// Show (or restart) the crit indicator fade
    pub fn show_crit(&mut self) {
        match self.crit_fade.as_mut() {
            Some(fade) => fade.restart(),
            None => self.crit_fade = Some(Fade::new(CRIT_FADE_DURATION)),
        }
    }

    pub fn tick_crit_fade(&mut self, dt: f32) {
        if let Some(fade) = self.crit_fade.as_mut() {
            if fade.advance(dt) {
                self.crit_fade = None;
            }
        }
    }

    /// Death side effects: every timer the player owns stops
    pub fn die(&mut self) {
        self.heal = None;
        self.jump = None;
        self.crit_fade = None;
    }

    /// Back to the spawn point at rest, any jump abandoned
    pub fn return_to_spawn<P: Physics + ?Sized>(&mut self, physics: &mut P) {
        self.jump = None;
        self.facing = Vec3::Z;
        physics.set_position(self.body, self.spawn_point);
        physics.stop(self.body);
    }

    /// Full restore for a new session
    pub fn reset<P: Physics + ?Sized>(&mut self, physics: &mut P) {
        self.die();
        self.health.reset();
        self.in_heal_zone = false;
        self.on_ground = false;
        self.return_to_spawn(physics);
        self.refresh_heal_timer();
    }
}
