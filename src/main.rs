//! Horde Arena headless entry point
//!
//! Runs the simulation against the reference `ArenaWorld` with an autopilot
//! standing in for player input, logging events as they happen.
//!
//! Usage: `horde-arena [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec3;

    use horde_arena::Settings;
    use horde_arena::consts::*;
    use horde_arena::ground_direction;
    use horde_arena::sim::{
        Arena, ArenaWorld, GameEvent, GamePhase, GameState, Physics, TickInput, tick,
    };

    /// Frame time fed to the accumulator, as a host at 30 fps would
    const FRAME_DT: f32 = 1.0 / 30.0;
    /// Stop after this many cleared waves
    const MAX_WAVES: u32 = 3;
    /// Hard stop, in frames (10 minutes of game time)
    const MAX_FRAMES: u32 = 30 * 60 * 10;
    /// Seconds between autopilot swings
    const SWING_COOLDOWN: f32 = 0.5;
    /// Radius of the heal zone around the player spawn
    const HEAL_ZONE_RADIUS: f32 = 2.0;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        world: ArenaWorld,
        accumulator: f32,
        swing_cooldown: f32,
        input: TickInput,
    }

    impl Game {
        fn new(settings: &Settings, seed: u64) -> Self {
            let mut world = ArenaWorld::new(0.0);
            world.add_obstacle(Vec3::new(6.0, 0.0, 6.0), 1.5);
            world.add_obstacle(Vec3::new(-8.0, 0.0, 3.0), 2.0);
            world.add_obstacle(Vec3::new(2.0, 0.0, -9.0), 1.0);

            let arena = Arena::new(Vec3::new(-15.0, 0.0, -15.0), Vec3::new(15.0, 0.0, 15.0), 0.0);
            let state = GameState::new(settings, seed, arena, Vec3::ZERO, &mut world);
            Self {
                state,
                world,
                accumulator: 0.0,
                swing_cooldown: 0.0,
                input: TickInput::default(),
            }
        }

        /// Pick inputs: close in on the nearest living zombie and swing at it
        fn autopilot(&mut self) {
            let player_pos = self.state.player().position(&self.world);
            let spawn = self.state.player().spawn_point();
            self.input.in_heal_zone = player_pos.distance(spawn) < HEAL_ZONE_RADIUS;
            self.input.move_dir = None;
            self.input.look_dir = None;
            self.input.attack = false;

            let nearest = self
                .state
                .enemies()
                .iter()
                .filter(|e| !e.is_dead())
                .filter_map(|e| self.world.position(e.body()))
                .min_by(|a, b| a.distance(player_pos).total_cmp(&b.distance(player_pos)));
            let Some(target) = nearest else {
                return;
            };

            let dir = ground_direction(player_pos, target);
            self.input.look_dir = Some(dir);
            if player_pos.distance(target) > PLAYER_ATTACK_RANGE {
                self.input.move_dir = Some(dir);
            } else if self.swing_cooldown <= 0.0 {
                self.input.attack = true;
                self.swing_cooldown = SWING_COOLDOWN;
            }
        }

        /// Run simulation ticks for one frame
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.autopilot();
                self.world.step(SIM_DT * self.state.time_scale());
                tick(&mut self.state, &mut self.world, &self.input, SIM_DT);
                self.swing_cooldown -= SIM_DT * self.state.time_scale();
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.attack = false;
                self.input.jump = false;
                self.input.pause = false;
            }
        }

        fn log_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::WaveStarted {
                        wave_number,
                        target_count,
                        spawned,
                    } => log::info!(
                        "Wave {} started: {}/{} zombies",
                        wave_number,
                        spawned,
                        target_count
                    ),
                    GameEvent::SpawnShortfall {
                        wave_number,
                        spawned,
                        target_count,
                    } => log::warn!(
                        "Wave {} short-handed: {}/{}",
                        wave_number,
                        spawned,
                        target_count
                    ),
                    GameEvent::CriticalHit { id, amount } => {
                        log::info!("Critical hit on {:?} for {:.1}", id, amount)
                    }
                    GameEvent::EnemyDied { id } => log::info!("Zombie {:?} down", id),
                    GameEvent::PlayerHit { amount } => log::debug!(
                        "Player hit for {:.1}, health {:.1}",
                        amount,
                        self.state.player().health().current()
                    ),
                    GameEvent::PlayerDied => log::info!("Player died"),
                    GameEvent::WaveCleared { wave_number } => {
                        log::info!("Wave {} cleared", wave_number)
                    }
                    other => log::trace!("{:?}", other),
                }
            }
        }
    }

    pub fn run() {
        let settings = match std::env::args().nth(1) {
            Some(path) => Settings::load(&path).unwrap_or_else(|e| {
                log::warn!("Falling back to default settings: {}", e);
                Settings::default()
            }),
            None => Settings::default(),
        };
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Horde Arena (headless) starting, seed {}", seed);

        let mut game = Game::new(&settings, seed);
        if let Err(e) = game.state.start(&mut game.world) {
            log::error!("Could not start session: {}", e);
            return;
        }

        for _ in 0..MAX_FRAMES {
            game.update(FRAME_DT);
            game.log_events();

            match game.state.phase() {
                GamePhase::Ended => break,
                GamePhase::WaveCleared if game.state.session().wave_number >= MAX_WAVES => {
                    game.state.quit();
                }
                GamePhase::WaveCleared => {
                    if let Err(e) = game.state.continue_game(&mut game.world) {
                        log::error!("Could not continue: {}", e);
                        break;
                    }
                }
                GamePhase::Idle | GamePhase::InWave => {}
            }
            if game.state.quit_requested() {
                game.log_events();
                break;
            }
        }

        let session = game.state.session();
        log::info!(
            "Session over: wave {}, {:?}, health {:.1}, {} ticks",
            session.wave_number,
            game.state.phase(),
            game.state.player().health().current(),
            game.state.time_ticks()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host on the web; there is no standalone binary
}
