//! Wave sizing, spawning and population tracking

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::spawn::{Arena, sample_spawn_position};
use crate::tuning::WaveTuning;

/// The wave currently in play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wave {
    pub number: u32,
    pub target_count: u32,
    pub live_count: u32,
}

/// Result of spawning a wave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnReport {
    pub wave_number: u32,
    pub target_count: u32,
    /// Accepted spawn points, one per enemy to create
    pub positions: Vec<Vec3>,
    /// Sampling ran out of attempts and the remaining slots were skipped
    pub failed: bool,
}

impl SpawnReport {
    pub fn spawned(&self) -> u32 {
        self.positions.len() as u32
    }
}

/// Signal that the last enemy of a wave has been removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveCleared {
    pub wave_number: u32,
}

/// Spawns waves and counts enemies down to zero
#[derive(Debug, Clone)]
pub struct WaveScheduler {
    tuning: WaveTuning,
    wave: Option<Wave>,
}

impl WaveScheduler {
    pub fn new(tuning: WaveTuning) -> Self {
        Self { tuning, wave: None }
    }

    pub fn tuning(&self) -> &WaveTuning {
        &self.tuning
    }

    pub fn wave(&self) -> Option<&Wave> {
        self.wave.as_ref()
    }

    pub fn live_count(&self) -> u32 {
        self.wave.map(|w| w.live_count).unwrap_or(0)
    }

    /// Pick spawn points for wave `number`.
    ///
    /// Stops at the first slot that cannot be placed; the wave then runs with
    /// however many enemies were placed before it.
    pub fn start_wave<R, F>(
        &mut self,
        number: u32,
        rng: &mut R,
        arena: &Arena,
        mut occupied: F,
    ) -> SpawnReport
    where
        R: Rng,
        F: FnMut(Vec3) -> bool,
    {
        let number = number.max(1);
        let target_count = self.tuning.target_count(number);
        let mut positions = Vec::with_capacity(target_count as usize);
        let mut failed = false;

        for _ in 0..target_count {
            match sample_spawn_position(rng, arena, self.tuning.max_spawn_attempts, &mut occupied)
            {
                Some(position) => positions.push(position),
                None => {
                    failed = true;
                    break;
                }
            }
        }

        let live_count = positions.len() as u32;
        self.wave = Some(Wave {
            number,
            target_count,
            live_count,
        });

        if failed {
            log::warn!(
                "Wave {}: couldn't find a valid spawn position, placed {}/{}",
                number,
                live_count,
                target_count
            );
        } else {
            log::info!("Wave {}: spawning {} enemies", number, target_count);
        }

        SpawnReport {
            wave_number: number,
            target_count,
            positions,
            failed,
        }
    }

    /// Count one enemy as gone. Returns the cleared signal on the removal
    /// that empties the wave.
    pub fn on_enemy_removed(&mut self) -> Option<WaveCleared> {
        let wave = self.wave.as_mut()?;
        debug_assert!(wave.live_count > 0, "enemy removed from an empty wave");
        if wave.live_count == 0 {
            return None;
        }
        wave.live_count -= 1;
        if wave.live_count == 0 && wave.target_count > 0 {
            log::info!("Wave {} cleared", wave.number);
            return Some(WaveCleared {
                wave_number: wave.number,
            });
        }
        None
    }

    /// Forget the current wave (back to start)
    pub fn clear(&mut self) {
        self.wave = None;
    }
}
