//! Game state and session transitions
//!
//! `GameState` owns the player, the enemy roster, the wave scheduler and the
//! RNG. The host owns the physics collaborator and passes it into every
//! operation that touches bodies.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::{LayerMask, Physics};
use super::enemy::{Enemy, EnemyId};
use super::player::Player;
use super::spawn::Arena;
use super::wave::{SpawnReport, WaveCleared, WaveScheduler};
use crate::consts::SPAWN_CLEARANCE_RADIUS;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Where the session is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start screen, nothing simulates
    Idle,
    /// Enemies of the current wave are alive or awaiting removal
    InWave,
    /// Wave beaten, waiting for the player to continue
    WaveCleared,
    /// Player died
    Ended,
}

/// Session-wide counters exposed to the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub wave_number: u32,
    pub paused: bool,
}

/// Read-only wave counters for the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveView {
    pub number: u32,
    pub target_count: u32,
    pub live_count: u32,
}

/// Discrete things that happened, for animation/UI/audio triggers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WaveStarted {
        wave_number: u32,
        target_count: u32,
        spawned: u32,
    },
    /// Spawn sampling gave up; the wave runs short-handed
    SpawnShortfall {
        wave_number: u32,
        spawned: u32,
        target_count: u32,
    },
    EnemySpawned {
        id: EnemyId,
        position: Vec3,
    },
    EnemyHit {
        id: EnemyId,
        amount: f32,
    },
    CriticalHit {
        id: EnemyId,
        amount: f32,
    },
    EnemyDied {
        id: EnemyId,
    },
    EnemyRemoved {
        id: EnemyId,
    },
    PlayerHit {
        amount: f32,
    },
    PlayerDied,
    WaveCleared {
        wave_number: u32,
    },
    Paused,
    Resumed,
    QuitRequested,
}

/// A session request that doesn't apply in the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot {action} while {phase:?}")]
    InvalidPhase {
        action: &'static str,
        phase: GamePhase,
    },
}

/// RNG seed record, kept for replaying a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) rng_state: RngState,
    pub(crate) rng: Pcg32,
    pub(crate) tuning: Tuning,
    pub(crate) arena: Arena,
    pub(crate) phase: GamePhase,
    pub(crate) paused: bool,
    pub(crate) wave_number: u32,
    pub(crate) scheduler: WaveScheduler,
    pub(crate) player: Player,
    /// Living and dying enemies, in spawn order
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) events: Vec<GameEvent>,
    /// Simulation tick counter (unpaused ticks only)
    pub(crate) time_ticks: u64,
    next_enemy_id: u32,
    quit_requested: bool,
}

impl GameState {
    /// New session on the start screen. Registers the player's body.
    pub fn new<P: Physics + ?Sized>(
        settings: &Settings,
        seed: u64,
        arena: Arena,
        player_spawn: Vec3,
        physics: &mut P,
    ) -> Self {
        let tuning = settings.tuning.clone();
        let player = Player::new(physics, player_spawn, &tuning.player, settings.auto_heal);
        let rng_state = RngState::new(seed);
        Self {
            rng_state,
            rng: rng_state.to_rng(),
            scheduler: WaveScheduler::new(tuning.wave),
            tuning,
            arena,
            phase: GamePhase::Idle,
            paused: false,
            wave_number: 1,
            player,
            enemies: Vec::new(),
            events: Vec::new(),
            time_ticks: 0,
            next_enemy_id: 1,
            quit_requested: false,
        }
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn session(&self) -> SessionState {
        SessionState {
            wave_number: self.wave_number,
            paused: self.paused,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Multiplier on the tick delta: 0 while paused
    pub fn time_scale(&self) -> f32 {
        if self.paused { 0.0 } else { 1.0 }
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id() == id)
    }

    pub fn wave_view(&self) -> Option<WaveView> {
        self.scheduler.wave().map(|w| WaveView {
            number: w.number,
            target_count: w.target_count,
            live_count: w.live_count,
        })
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Events raised since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Idle -> InWave with wave 1
    pub fn start<P: Physics + ?Sized>(&mut self, physics: &mut P) -> Result<(), TransitionError> {
        if self.phase != GamePhase::Idle {
            return Err(TransitionError::InvalidPhase {
                action: "start",
                phase: self.phase,
            });
        }
        log::info!("Starting session (seed {})", self.rng_state.seed);
        self.wave_number = 1;
        self.phase = GamePhase::InWave;
        self.spawn_wave(physics);
        Ok(())
    }

    /// WaveCleared -> InWave with the next wave
    pub fn continue_game<P: Physics + ?Sized>(
        &mut self,
        physics: &mut P,
    ) -> Result<(), TransitionError> {
        if self.phase != GamePhase::WaveCleared {
            return Err(TransitionError::InvalidPhase {
                action: "continue",
                phase: self.phase,
            });
        }
        self.wave_number += 1;
        self.player.return_to_spawn(physics);
        self.phase = GamePhase::InWave;
        self.spawn_wave(physics);
        Ok(())
    }

    /// Any phase -> Idle: wave 1, no enemies, player restored
    pub fn back_to_start<P: Physics + ?Sized>(&mut self, physics: &mut P) {
        log::info!("Back to start from {:?} (wave {})", self.phase, self.wave_number);
        for enemy in self.enemies.drain(..) {
            physics.remove_body(enemy.body());
        }
        self.scheduler.clear();
        self.wave_number = 1;
        self.player.reset(physics);
        self.paused = false;
        self.phase = GamePhase::Idle;
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Paused");
            self.events.push(GameEvent::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            log::info!("Resumed");
            self.events.push(GameEvent::Resumed);
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Terminal request for the host process
    pub fn quit(&mut self) {
        if !self.quit_requested {
            log::info!("Quit requested");
            self.quit_requested = true;
            self.events.push(GameEvent::QuitRequested);
        }
    }

    fn spawn_wave<P: Physics + ?Sized>(&mut self, physics: &mut P) {
        let report: SpawnReport = {
            let probe: &P = physics;
            self.scheduler
                .start_wave(self.wave_number, &mut self.rng, &self.arena, |point| {
                    probe.overlap_sphere(point, SPAWN_CLEARANCE_RADIUS, LayerMask::OBJECT)
                })
        };

        self.events.push(GameEvent::WaveStarted {
            wave_number: report.wave_number,
            target_count: report.target_count,
            spawned: report.spawned(),
        });
        let desc = Enemy::body_desc(&self.tuning.enemy);
        for &position in &report.positions {
            let id = EnemyId(self.next_enemy_id);
            self.next_enemy_id += 1;
            let body = physics.add_body(desc, position);
            self.enemies.push(Enemy::new(id, body, &self.tuning.enemy));
            self.events.push(GameEvent::EnemySpawned { id, position });
        }

        if report.failed {
            self.events.push(GameEvent::SpawnShortfall {
                wave_number: report.wave_number,
                spawned: report.spawned(),
                target_count: report.target_count,
            });
        }

        // Nobody to fight: the wave is over as soon as it starts
        if report.spawned() == 0 {
            log::warn!("Wave {} has no enemies, clearing immediately", report.wave_number);
            self.clear_wave(physics, report.wave_number);
        }
    }

    /// Apply the scheduler's cleared signal
    pub(crate) fn on_wave_cleared<P: Physics + ?Sized>(
        &mut self,
        physics: &mut P,
        cleared: WaveCleared,
    ) {
        if self.phase == GamePhase::InWave {
            self.clear_wave(physics, cleared.wave_number);
        }
    }

    fn clear_wave<P: Physics + ?Sized>(&mut self, physics: &mut P, wave_number: u32) {
        self.phase = GamePhase::WaveCleared;
        self.player.return_to_spawn(physics);
        self.events.push(GameEvent::WaveCleared { wave_number });
    }
}
