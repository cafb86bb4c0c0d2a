//! Simulation tick
//!
//! One call advances the session by `dt` scaled by the pause time scale.
//! Order within a tick:
//! 1. pause toggle
//! 2. removal delays (may clear the wave)
//! 3. player upkeep: ground check, jump arc, heal, crit fade
//! 4. player input: walk, jump, attack
//! 5. enemy behaviour
//! 6. death side effects for everything that died this tick

use glam::Vec3;

use super::collision::Physics;
use super::combat::{AttackProfile, resolve_attack};
use super::enemy::EnemyId;
use super::lifecycle::take_expired_removals;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Host-resolved walk direction (camera-relative already); `None` stands
    pub move_dir: Option<Vec3>,
    /// Aim direction; turns the player without moving
    pub look_dir: Option<Vec3>,
    pub jump: bool,
    pub attack: bool,
    /// Pause toggle
    pub pause: bool,
    /// Host trigger state for the heal zone
    pub in_heal_zone: bool,
}

/// Advance the game state by one step
pub fn tick<P: Physics + ?Sized>(
    state: &mut GameState,
    physics: &mut P,
    input: &TickInput,
    dt: f32,
) {
    if input.pause {
        state.toggle_pause();
    }

    if matches!(state.phase, GamePhase::Idle | GamePhase::Ended) {
        return;
    }
    let dt = dt * state.time_scale();
    if !dt.is_finite() || dt <= 0.0 {
        return;
    }
    state.time_ticks += 1;

    // Delayed removals
    for enemy in take_expired_removals(&mut state.enemies, dt) {
        physics.remove_body(enemy.body());
        log::debug!("Removed enemy {:?}", enemy.id());
        state.events.push(GameEvent::EnemyRemoved { id: enemy.id() });
        if let Some(cleared) = state.scheduler.on_enemy_removed() {
            state.on_wave_cleared(physics, cleared);
        }
    }

    // Player upkeep
    let player = &mut state.player;
    player.check_ground(&*physics);
    player.poll_jump(physics);
    player.set_in_heal_zone(input.in_heal_zone);
    let healed = player.tick_heal(dt);
    if healed > 0.0 {
        log::trace!("Healed {:.1}, now {:.1}", healed, player.health().current());
    }
    player.tick_crit_fade(dt);

    // Player input
    if let Some(dir) = input.look_dir {
        player.face(dir);
    }
    if let Some(dir) = input.move_dir {
        player.walk(
            physics,
            &state.arena,
            dir,
            state.tuning.player.walk_speed,
            dt,
        );
    }
    if input.jump {
        player.try_jump(physics, &state.tuning.player);
    }

    let mut enemy_deaths: Vec<EnemyId> = Vec::new();
    if input.attack && !state.player.is_dead() {
        let origin = state.player.position(&*physics);
        let forward = state.player.facing();
        let profile = AttackProfile::player(&state.tuning.player);
        let outcome = resolve_attack(
            &mut state.rng,
            &*physics,
            &mut state.enemies,
            origin,
            forward,
            &profile,
        );
        if let Some(outcome) = outcome {
            let id = state
                .enemies
                .iter()
                .find(|e| e.body() == outcome.target)
                .map(|e| e.id());
            if let Some(id) = id {
                let amount = outcome.damage.final_amount;
                state.events.push(GameEvent::EnemyHit { id, amount });
                if outcome.damage.is_critical {
                    state.player.show_crit();
                    state.events.push(GameEvent::CriticalHit { id, amount });
                }
                if outcome.died_now {
                    enemy_deaths.push(id);
                }
            }
        }
    }

    // Enemy behaviour
    let mut player_died = false;
    for enemy in state.enemies.iter_mut() {
        let strike = enemy.think(
            physics,
            &mut state.rng,
            &mut state.player,
            &state.tuning.enemy,
            dt,
        );
        if let Some(strike) = strike {
            state.events.push(GameEvent::PlayerHit {
                amount: strike.damage.final_amount,
            });
            player_died |= strike.died_now;
        }
    }

    // Death side effects
    for id in enemy_deaths {
        if let Some(enemy) = state.enemies.iter_mut().find(|e| e.id() == id) {
            enemy.die();
            log::debug!("Enemy {:?} died", id);
            state.events.push(GameEvent::EnemyDied { id });
        }
    }
    if player_died {
        state.player.die();
        state.phase = GamePhase::Ended;
        log::info!("Player died on wave {}", state.wave_number);
        state.events.push(GameEvent::PlayerDied);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::collision::ArenaWorld;
    use crate::sim::spawn::Arena;
    use crate::tuning::WaveTuning;

    /// One zombie spawned one unit in front of the player, hit for 40 every
    /// swing, never critting
    fn duel_settings() -> Settings {
        let mut settings = Settings::default();
        settings.tuning.wave = WaveTuning {
            initial_count: 1,
            increment: 0,
            ..Default::default()
        };
        settings.tuning.player.min_damage = 40.0;
        settings.tuning.player.max_damage = 40.0;
        settings.tuning.player.crit_probability = 0.0;
        settings
    }

    fn duel(settings: &Settings) -> (ArenaWorld, GameState) {
        let mut world = ArenaWorld::new(0.0);
        let point = Vec3::new(0.0, 0.0, 1.0);
        let arena = Arena::new(point, point, 0.0);
        let mut state = GameState::new(settings, 9, arena, Vec3::ZERO, &mut world);
        state.start(&mut world).unwrap();
        (world, state)
    }

    fn attack() -> TickInput {
        TickInput {
            attack: true,
            ..Default::default()
        }
    }

    fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
        events.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn test_kill_remove_and_clear() {
        let (mut world, mut state) = duel(&duel_settings());
        let id = state.enemies()[0].id();
        state.drain_events();

        let mut health = Vec::new();
        for _ in 0..3 {
            tick(&mut state, &mut world, &attack(), 1.0);
            health.push(state.enemy(id).unwrap().health().current());
        }
        assert_eq!(health, vec![60.0, 20.0, 0.0]);
        let events = state.drain_events();
        assert_eq!(count(&events, |e| *e == GameEvent::EnemyDied { id }), 1);
        assert_eq!(state.wave_view().unwrap().live_count, 1);

        // Swinging at a corpse does nothing
        for _ in 0..4 {
            tick(&mut state, &mut world, &attack(), 1.0);
            assert!(state.enemy(id).is_some());
        }
        assert_eq!(state.phase(), GamePhase::InWave);

        tick(&mut state, &mut world, &attack(), 1.0);
        assert!(state.enemy(id).is_none());
        assert_eq!(state.wave_view().unwrap().live_count, 0);
        assert_eq!(state.phase(), GamePhase::WaveCleared);

        let events = state.drain_events();
        assert_eq!(count(&events, |e| matches!(e, GameEvent::EnemyHit { .. })), 0);
        assert_eq!(count(&events, |e| *e == GameEvent::EnemyRemoved { id }), 1);
        assert_eq!(
            count(&events, |e| matches!(e, GameEvent::WaveCleared { .. })),
            1
        );
        // Player and no zombies
        assert_eq!(world.body_count(), 1);

        for _ in 0..5 {
            tick(&mut state, &mut world, &TickInput::default(), 1.0);
        }
        let events = state.drain_events();
        assert_eq!(
            count(&events, |e| matches!(e, GameEvent::WaveCleared { .. })),
            0
        );
    }

    #[test]
    fn test_crit_shows_indicator() {
        let mut settings = duel_settings();
        settings.tuning.player.crit_probability = 1.0;
        let (mut world, mut state) = duel(&settings);
        let id = state.enemies()[0].id();

        tick(&mut state, &mut world, &attack(), 1.0);
        assert_eq!(state.enemy(id).unwrap().health().current(), 20.0);
        assert_eq!(state.player().crit_indicator_opacity(), Some(1.0));
        assert!(
            state
                .events()
                .contains(&GameEvent::CriticalHit { id, amount: 80.0 })
        );
    }

    #[test]
    fn test_pause_freezes_everything() {
        let (mut world, mut state) = duel(&duel_settings());
        let id = state.enemies()[0].id();
        for _ in 0..3 {
            tick(&mut state, &mut world, &attack(), 1.0);
        }
        let remaining = state.enemy(id).unwrap().removal_remaining().unwrap();
        let player_health = state.player().health().current();
        let ticks = state.time_ticks();

        let pause = TickInput {
            pause: true,
            attack: true,
            ..Default::default()
        };
        tick(&mut state, &mut world, &pause, 1.0);
        assert!(state.is_paused());
        for _ in 0..20 {
            tick(&mut state, &mut world, &attack(), 1.0);
        }
        assert_eq!(state.enemy(id).unwrap().removal_remaining(), Some(remaining));
        assert_eq!(state.player().health().current(), player_health);
        assert_eq!(state.time_ticks(), ticks);
        assert_eq!(state.phase(), GamePhase::InWave);

        state.resume();
        for _ in 0..5 {
            tick(&mut state, &mut world, &TickInput::default(), 1.0);
        }
        assert!(state.enemy(id).is_none());
    }

    #[test]
    fn test_zombie_kills_player() {
        let mut settings = duel_settings();
        settings.tuning.enemy.min_damage = 100.0;
        settings.tuning.enemy.max_damage = 100.0;
        let (mut world, mut state) = duel(&settings);

        tick(&mut state, &mut world, &TickInput::default(), 1.0);
        assert_eq!(state.phase(), GamePhase::Ended);
        assert!(state.player().is_dead());
        let events = state.drain_events();
        assert_eq!(count(&events, |e| *e == GameEvent::PlayerDied), 1);

        // Frozen until back to start
        tick(&mut state, &mut world, &attack(), 1.0);
        assert!(state.events().is_empty());

        state.back_to_start(&mut world);
        assert_eq!(state.phase(), GamePhase::Idle);
        assert!(!state.player().is_dead());
    }

    #[test]
    fn test_inverted_enemy_damage_from_json() {
        let settings = Settings::from_json(
            r#"{"tuning":{"wave":{"initialCount":1,"increment":0},"enemy":{"minDamage":10.0}}}"#,
        )
        .unwrap();
        let (mut world, mut state) = duel(&settings);

        tick(&mut state, &mut world, &TickInput::default(), 1.0);
        let health = state.player().health().current();
        assert!((90.0..=95.0).contains(&health));
    }

    #[test]
    fn test_long_stall_finishes() {
        let (mut world, mut state) = duel(&duel_settings());
        tick(&mut state, &mut world, &TickInput::default(), 3.0e7);
        assert_eq!(state.phase(), GamePhase::Ended);
        assert!(state.player().is_dead());
    }

    #[test]
    fn test_non_finite_dt_is_ignored() {
        let (mut world, mut state) = duel(&duel_settings());
        state.drain_events();
        for dt in [f32::INFINITY, f32::NAN, f32::NEG_INFINITY] {
            tick(&mut state, &mut world, &attack(), dt);
        }
        assert_eq!(state.time_ticks(), 0);
        assert!(state.events().is_empty());
        assert_eq!(state.player().health().current(), 100.0);
    }

    #[test]
    fn test_zombie_strikes_on_cadence() {
        let mut settings = duel_settings();
        settings.tuning.enemy.min_damage = 2.0;
        settings.tuning.enemy.max_damage = 2.0;
        let (mut world, mut state) = duel(&settings);

        for _ in 0..4 {
            tick(&mut state, &mut world, &TickInput::default(), 0.5);
        }
        assert_eq!(state.player().health().current(), 96.0);
        let hits = count(state.events(), |e| matches!(e, GameEvent::PlayerHit { .. }));
        assert_eq!(hits, 2);
    }

    #[test]
    fn test_auto_heal_between_waves() {
        let mut settings = Settings::default();
        settings.auto_heal = true;
        settings.tuning.wave.initial_count = 0;
        let mut world = ArenaWorld::new(0.0);
        let arena = Arena::new(Vec3::splat(-10.0), Vec3::splat(10.0), 0.0);
        let mut state = GameState::new(&settings, 1, arena, Vec3::ZERO, &mut world);
        state.start(&mut world).unwrap();
        assert_eq!(state.phase(), GamePhase::WaveCleared);

        state.player.apply_delta(-50.0);
        for _ in 0..10 {
            tick(&mut state, &mut world, &TickInput::default(), 1.0);
        }
        assert_eq!(state.player().health().current(), 55.0);
    }

    #[test]
    fn test_heal_zone_from_input() {
        let mut settings = Settings::default();
        settings.tuning.wave.initial_count = 0;
        let mut world = ArenaWorld::new(0.0);
        let arena = Arena::new(Vec3::splat(-10.0), Vec3::splat(10.0), 0.0);
        let mut state = GameState::new(&settings, 1, arena, Vec3::ZERO, &mut world);
        state.start(&mut world).unwrap();
        state.player.apply_delta(-10.0);

        let inside = TickInput {
            in_heal_zone: true,
            ..Default::default()
        };
        for _ in 0..4 {
            tick(&mut state, &mut world, &inside, 1.0);
        }
        // Heals once per elapsed second inside
        assert_eq!(state.player().health().current(), 92.0);

        for _ in 0..4 {
            tick(&mut state, &mut world, &TickInput::default(), 1.0);
        }
        assert_eq!(state.player().health().current(), 92.0);
    }

    #[test]
    fn test_walk_moves_player() {
        let mut settings = Settings::default();
        settings.tuning.wave.initial_count = 0;
        let mut world = ArenaWorld::new(0.0);
        let arena = Arena::new(Vec3::splat(-10.0), Vec3::splat(10.0), 0.0);
        let mut state = GameState::new(&settings, 1, arena, Vec3::ZERO, &mut world);
        state.start(&mut world).unwrap();

        let walk = TickInput {
            move_dir: Some(Vec3::X),
            ..Default::default()
        };
        tick(&mut state, &mut world, &walk, 0.5);
        let pos = state.player().position(&world);
        assert!((pos.x - 2.0).abs() < 1e-5);
        assert_eq!(state.player().facing(), Vec3::X);

        let look = TickInput {
            look_dir: Some(Vec3::new(0.0, 0.5, -3.0)),
            ..Default::default()
        };
        tick(&mut state, &mut world, &look, 0.5);
        assert_eq!(state.player().facing(), Vec3::NEG_Z);
        assert!((state.player().position(&world).x - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_idle_does_not_simulate() {
        let mut world = ArenaWorld::new(0.0);
        let arena = Arena::new(Vec3::splat(-10.0), Vec3::splat(10.0), 0.0);
        let mut state = GameState::new(&Settings::default(), 1, arena, Vec3::ZERO, &mut world);
        tick(&mut state, &mut world, &attack(), SIM_DT);
        assert_eq!(state.time_ticks(), 0);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_continue_grows_wave() {
        let mut settings = duel_settings();
        settings.tuning.wave.increment = 1;
        let (mut world, mut state) = duel(&settings);
        for _ in 0..8 {
            tick(&mut state, &mut world, &attack(), 1.0);
        }
        assert_eq!(state.phase(), GamePhase::WaveCleared);

        state.continue_game(&mut world).unwrap();
        assert_eq!(state.session().wave_number, 2);
        let view = state.wave_view().unwrap();
        assert_eq!(view.target_count, 2);
    }

    #[test]
    fn test_same_seed_same_session() {
        let run = || {
            let mut settings = Settings::default();
            settings.tuning.wave.initial_count = 4;
            let mut world = ArenaWorld::new(0.0);
            let arena = Arena::new(Vec3::splat(-5.0), Vec3::splat(5.0), 0.0);
            let mut state = GameState::new(&settings, 4242, arena, Vec3::ZERO, &mut world);
            state.start(&mut world).unwrap();
            let input = TickInput {
                attack: true,
                move_dir: Some(Vec3::new(0.3, 0.0, 1.0)),
                ..Default::default()
            };
            for _ in 0..600 {
                world.step(SIM_DT);
                tick(&mut state, &mut world, &input, SIM_DT);
            }
            (state.drain_events(), state.player().health().current())
        };
        assert_eq!(run(), run());
    }
}
