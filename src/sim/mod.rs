//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Seeded RNG only
//! - Stable iteration order (spawn order for enemies, handle order for bodies)
//! - Physics only through the `Physics` collaborator
//! - No rendering, input devices or platform dependencies

pub mod collision;
pub mod combat;
pub mod enemy;
pub mod health;
pub mod lifecycle;
pub mod player;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;
pub mod wave;

pub use collision::{ArenaWorld, BodyDesc, BodyHandle, Layer, LayerMask, Physics, RayHit, Tag};
pub use combat::{AttackOutcome, AttackProfile, CritChance, DamageEvent, resolve_attack};
pub use enemy::{Enemy, EnemyBehavior, EnemyId};
pub use health::{Health, Transition};
pub use player::Player;
pub use spawn::{Arena, sample_spawn_position};
pub use state::{GameEvent, GamePhase, GameState, SessionState, TransitionError, WaveView};
pub use tick::{TickInput, tick};
pub use wave::{SpawnReport, Wave, WaveScheduler};
