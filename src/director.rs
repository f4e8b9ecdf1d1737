//! The game director: owns the world and advances it one tick at a time.
//!
//! All mutation of ship, bullets, enemies and explosions happens here, in a
//! fixed order per tick. Outcomes of a tick are expressed as [`GameEvent`]s
//! which the director applies to itself (score, difficulty, lives, state) and
//! hands back to the caller.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::clock::FrameClock;
use crate::collision;
use crate::config::{GameConfig, LifeLossPolicy};
use crate::entities::{
    Bullet, Enemy, Explosion, GameState, Screen, Ship, Star, generate_starfield,
};
use crate::input::InputState;
use crate::spawner;

/// Points per destroyed enemy
pub const POINTS_PER_KILL: u64 = 10;
/// Difficulty gained per destroyed enemy
pub const DIFFICULTY_PER_KILL: f32 = 0.5;

pub const MAX_BULLETS: usize = 256;
pub const MAX_ENEMIES: usize = 256;
pub const MAX_EXPLOSIONS: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    ShotFired,
    EnemiesDestroyed { count: u32 },
    /// The ship's health reached zero
    PlayerDestroyed,
    LifeLost { lives_remaining: u32 },
    GameOver { final_score: u64, lives_remaining: u32 },
}

/// What a finished (or abandoned) session reports upward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub score: u64,
    pub starting_lives: u32,
    pub lives_remaining: u32,
}

/// Everything that moves, plus the timers that drive spawning
#[derive(Debug, Clone)]
pub struct World {
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub explosions: Vec<Explosion>,
    pub stars: Vec<Star>,
    /// Only ever increases within a round
    pub difficulty: f32,
    /// Game-clock time: sum of clamped frame deltas while playing
    pub elapsed_ms: f64,
    pub last_spawn_ms: f64,
}

impl World {
    fn new(screen: Screen, stars: Vec<Star>) -> Self {
        Self {
            ship: Ship::spawn(screen),
            bullets: Vec::new(),
            enemies: Vec::new(),
            explosions: Vec::new(),
            stars,
            difficulty: 0.0,
            elapsed_ms: 0.0,
            last_spawn_ms: 0.0,
        }
    }
}

pub struct Director {
    world: World,
    state: GameState,
    score: u64,
    lives: u32,
    starting_lives: u32,
    screen: Screen,
    life_loss: LifeLossPolicy,
    star_count: usize,
    clock: FrameClock,
    rng: StdRng,
}

impl Director {
    /// New session seeded from `config.seed`, or from the OS when unset
    pub fn new(config: &GameConfig, starting_lives: u32) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, starting_lives, rng)
    }

    pub fn with_seed(config: &GameConfig, starting_lives: u32, seed: u64) -> Self {
        Self::with_rng(config, starting_lives, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, starting_lives: u32, mut rng: StdRng) -> Self {
        let screen = config.screen();
        let stars = generate_starfield(&mut rng, screen, config.star_count);
        let state = if starting_lives == 0 {
            GameState::GameOverNoLives
        } else {
            GameState::Playing
        };

        log::info!(
            "session start: {} lives, {:?} on life loss, {}x{} screen",
            starting_lives,
            config.life_loss,
            screen.width,
            screen.height
        );

        Self {
            world: World::new(screen, stars),
            state,
            score: 0,
            lives: starting_lives,
            starting_lives,
            screen,
            life_loss: config.life_loss,
            star_count: config.star_count,
            clock: FrameClock::new(config.max_frame_delta_ms),
            rng,
        }
    }

    /// Advances the simulation for the frame at wall-clock `now_ms`.
    ///
    /// Outside `Playing` the world is frozen and no events are produced.
    pub fn tick(&mut self, now_ms: f64, input: &InputState) -> Vec<GameEvent> {
        let dt = self.clock.advance(now_ms);
        let mut events = Vec::new();
        if self.state != GameState::Playing {
            return events;
        }

        let world = &mut self.world;
        world.elapsed_ms += dt;
        let now = world.elapsed_ms;

        world.ship.update(input, self.screen);

        if input.fire && world.ship.can_fire(now) {
            if world.bullets.len() < MAX_BULLETS {
                world.bullets.push(world.ship.make_bullet());
                events.push(GameEvent::ShotFired);
            } else {
                log::warn!("bullet limit {MAX_BULLETS} reached, shot dropped");
            }
            world.ship.fire(now);
        }

        let screen_height = self.screen.height;
        world.bullets.retain_mut(|bullet| {
            if bullet.active {
                bullet.update(screen_height);
            }
            bullet.active
        });

        if spawner::should_spawn(now, world.last_spawn_ms, world.difficulty) {
            if world.enemies.len() < MAX_ENEMIES {
                let enemy = spawner::spawn_enemy(&mut self.rng, self.screen.width, world.difficulty);
                log::debug!("spawned {} enemy at x={:.0}", enemy.kind.get_name(), enemy.x);
                world.enemies.push(enemy);
            } else {
                log::warn!("enemy limit {MAX_ENEMIES} reached, spawn skipped");
            }
            world.last_spawn_ms = now;
        }

        let player_x = world.ship.x;
        world.enemies.retain_mut(|enemy| {
            if enemy.active {
                enemy.update(player_x, screen_height);
            }
            enemy.active
        });

        world.explosions.retain_mut(|explosion| {
            if explosion.active {
                explosion.update();
            }
            explosion.active
        });

        let report = collision::resolve(
            &mut world.bullets,
            &mut world.enemies,
            &mut world.ship,
            &mut world.explosions,
        );
        if world.explosions.len() > MAX_EXPLOSIONS {
            let excess = world.explosions.len() - MAX_EXPLOSIONS;
            world.explosions.drain(..excess);
            log::warn!("explosion limit {MAX_EXPLOSIONS} reached, dropped {excess} oldest");
        }

        if report.enemies_destroyed > 0 {
            self.apply(
                GameEvent::EnemiesDestroyed {
                    count: report.enemies_destroyed,
                },
                &mut events,
            );
        }
        if report.player_hit {
            self.apply(GameEvent::PlayerDestroyed, &mut events);
        }

        for star in self.world.stars.iter_mut() {
            star.advance(&mut self.rng, self.screen);
        }

        let ship = &self.world.ship;
        debug_assert!((0..=ship.max_health).contains(&ship.health));
        debug_assert!(
            ship.x >= ship.width / 2.0
                && ship.x <= self.screen.width - ship.width / 2.0
                && ship.y >= ship.height / 2.0
                && ship.y <= self.screen.height - ship.height / 2.0,
            "ship left the screen at ({}, {})",
            ship.x,
            ship.y
        );
        events
    }

    /// Transition table. Records `event` and any follow-up events in `events`.
    fn apply(&mut self, event: GameEvent, events: &mut Vec<GameEvent>) {
        events.push(event);
        match event {
            GameEvent::EnemiesDestroyed { count } => {
                self.score += POINTS_PER_KILL * u64::from(count);
                self.world.difficulty += DIFFICULTY_PER_KILL * count as f32;
                log::debug!(
                    "{} destroyed, score {}, difficulty {:.1}",
                    count,
                    self.score,
                    self.world.difficulty
                );
            }
            GameEvent::PlayerDestroyed => {
                if self.lives <= 1 {
                    self.lives = 0;
                    self.state = GameState::GameOverNoLives;
                    log::info!("game over: out of lives, final score {}", self.score);
                    events.push(GameEvent::GameOver {
                        final_score: self.score,
                        lives_remaining: 0,
                    });
                    return;
                }

                self.lives -= 1;
                events.push(GameEvent::LifeLost {
                    lives_remaining: self.lives,
                });
                match self.life_loss {
                    LifeLossPolicy::Respawn => {
                        log::info!("ship lost, respawning with {} lives left", self.lives);
                        self.world.ship = Ship::spawn(self.screen);
                        self.world.enemies.clear();
                    }
                    LifeLossPolicy::EndRound => {
                        log::info!("ship lost, round over with {} lives left", self.lives);
                        self.state = GameState::GameOverWithLivesRemaining;
                        events.push(GameEvent::GameOver {
                            final_score: self.score,
                            lives_remaining: self.lives,
                        });
                    }
                }
            }
            GameEvent::ShotFired | GameEvent::LifeLost { .. } | GameEvent::GameOver { .. } => {}
        }
    }

    /// Playing and Paused swap; game-over states are left alone
    pub fn toggle_pause(&mut self) -> GameState {
        self.state = match self.state {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            other => other,
        };
        log::info!("state now {:?}", self.state);
        self.state
    }

    /// Starts a new round keeping the lives count. Rejected when no lives are left.
    pub fn restart(&mut self) -> bool {
        if !self.state.can_restart() {
            log::warn!("restart rejected: no lives left");
            return false;
        }

        let stars = generate_starfield(&mut self.rng, self.screen, self.star_count);
        self.world = World::new(self.screen, stars);
        self.score = 0;
        self.state = GameState::Playing;
        log::info!("restart with {} lives", self.lives);
        true
    }

    /// Lives bought or granted from outside the simulation
    pub fn add_lives(&mut self, extra: u32) {
        self.lives = self.lives.saturating_add(extra);
        if self.state == GameState::GameOverNoLives && self.lives > 0 {
            self.state = GameState::GameOverWithLivesRemaining;
        }
        log::info!("{} lives added, now {}", extra, self.lives);
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn difficulty(&self) -> f32 {
        self.world.difficulty
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            score: self.score,
            starting_lives: self.starting_lives,
            lives_remaining: self.lives,
        }
    }

    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{BulletOwner, EnemyKind};

    const FRAME_MS: f64 = 16.0;

    fn config() -> GameConfig {
        GameConfig {
            star_count: 10,
            ..GameConfig::default()
        }
    }

    fn idle() -> InputState {
        InputState::default()
    }

    fn firing() -> InputState {
        InputState {
            fire: true,
            ..InputState::default()
        }
    }

    /// Runs `frames` ticks starting from frame number `start`
    fn run(director: &mut Director, start: u32, frames: u32, input: &InputState) -> Vec<GameEvent> {
        (start..start + frames)
            .flat_map(|frame| director.tick(frame as f64 * FRAME_MS, input))
            .collect()
    }

    /// Parks an enemy right on top of the ship
    fn ram_ship(director: &mut Director) {
        let world = director.world_mut();
        let (x, y) = (world.ship.x, world.ship.y);
        world.enemies.push(Enemy::new(x, y, EnemyKind::Basic, 0.0));
    }

    #[test]
    fn test_initial_state() {
        let director = Director::with_seed(&config(), 3, 1);
        assert_eq!(director.state(), GameState::Playing);
        assert_eq!(director.lives(), 3);
        assert_eq!(director.score(), 0);
        assert_eq!(director.difficulty(), 0.0);
        assert!(director.world().enemies.is_empty());
        assert_eq!(director.world().ship.x, 400.0);
        assert_eq!(director.world().ship.y, 500.0);
    }

    #[test]
    fn test_ship_pinned_in_corners_stays_on_screen() {
        let mut director = Director::with_seed(&config(), 3, 1);
        let up_left = InputState {
            up: true,
            left: true,
            ..InputState::default()
        };
        let down_right = InputState {
            down: true,
            right: true,
            ..InputState::default()
        };
        // Debug builds check the ship's bounds and health at the end of every tick
        run(&mut director, 0, 200, &up_left);
        assert_eq!(director.world().ship.x, 25.0);
        assert_eq!(director.world().ship.y, 25.0);
        run(&mut director, 200, 200, &down_right);
        assert_eq!(director.world().ship.x, 775.0);
        assert_eq!(director.world().ship.y, 575.0);
    }

    #[test]
    fn test_zero_lives_starts_in_game_over() {
        let director = Director::with_seed(&config(), 0, 1);
        assert_eq!(director.state(), GameState::GameOverNoLives);
    }

    #[test]
    fn test_first_enemy_after_spawn_interval() {
        let mut director = Director::with_seed(&config(), 3, 1);
        // Frame 0 only primes the clock; 50 frames of 16ms reach exactly 800ms
        run(&mut director, 0, 50, &idle());
        assert!(director.world().enemies.is_empty());
        run(&mut director, 50, 1, &idle());
        assert_eq!(director.world().enemies.len(), 1);
        assert_eq!(director.world().last_spawn_ms, 800.0);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut director = Director::with_seed(&config(), 3, 1);
        let events = run(&mut director, 0, 13, &firing());
        // Shots at 0ms and 208ms: the cooldown is 200ms on a 16ms frame grid
        let shots = events.iter().filter(|e| **e == GameEvent::ShotFired).count();
        assert_eq!(shots, 1);
        let events = run(&mut director, 13, 1, &firing());
        assert!(events.contains(&GameEvent::ShotFired));
        assert!(
            director
                .world()
                .bullets
                .iter()
                .all(|b| b.owner == BulletOwner::Player)
        );
    }

    #[test]
    fn test_kill_awards_score_and_difficulty() {
        let mut director = Director::with_seed(&config(), 3, 1);
        director.tick(0.0, &idle());
        {
            let world = director.world_mut();
            world.enemies.push(Enemy::new(100.0, 100.0, EnemyKind::Basic, 0.0));
            world.enemies.push(Enemy::new(300.0, 100.0, EnemyKind::Basic, 0.0));
            world.bullets.push(Bullet::new(100.0, 110.0, BulletOwner::Player));
            world.bullets.push(Bullet::new(300.0, 110.0, BulletOwner::Player));
        }

        let events = director.tick(FRAME_MS, &idle());

        assert!(events.contains(&GameEvent::EnemiesDestroyed { count: 2 }));
        assert_eq!(director.score(), 20);
        assert_eq!(director.difficulty(), 1.0);
        assert_eq!(director.world().explosions.len(), 2);
    }

    #[test]
    fn test_hit_bullets_are_pruned_next_tick() {
        let mut director = Director::with_seed(&config(), 3, 1);
        director.tick(0.0, &idle());
        {
            let world = director.world_mut();
            world.enemies.push(Enemy::new(100.0, 100.0, EnemyKind::Basic, 0.0));
            world.bullets.push(Bullet::new(100.0, 110.0, BulletOwner::Player));
        }
        director.tick(FRAME_MS, &idle());
        assert_eq!(director.world().bullets.len(), 1);
        assert!(!director.world().bullets[0].active);

        director.tick(2.0 * FRAME_MS, &idle());
        assert!(director.world().bullets.is_empty());
        assert!(director.world().enemies.is_empty());
    }

    #[test]
    fn test_respawn_on_life_loss() {
        let mut director = Director::with_seed(&config(), 3, 1);
        director.tick(0.0, &idle());
        director.world_mut().ship.health = 20;
        director.world_mut().ship.x = 100.0;
        ram_ship(&mut director);

        let events = director.tick(FRAME_MS, &idle());

        assert!(events.contains(&GameEvent::PlayerDestroyed));
        assert!(events.contains(&GameEvent::LifeLost { lives_remaining: 2 }));
        assert_eq!(director.state(), GameState::Playing);
        assert_eq!(director.lives(), 2);
        assert_eq!(director.world().ship.health, 100);
        assert_eq!(director.world().ship.x, 400.0);
        assert!(director.world().enemies.is_empty());
        // Debris from the crash stays on screen
        assert!(!director.world().explosions.is_empty());
    }

    #[test]
    fn test_end_round_policy_keeps_lives() {
        let config = GameConfig {
            life_loss: LifeLossPolicy::EndRound,
            ..config()
        };
        let mut director = Director::with_seed(&config, 3, 1);
        director.tick(0.0, &idle());
        director.world_mut().ship.health = 20;
        ram_ship(&mut director);

        let events = director.tick(FRAME_MS, &idle());

        assert_eq!(director.state(), GameState::GameOverWithLivesRemaining);
        assert_eq!(director.lives(), 2);
        assert!(events.contains(&GameEvent::GameOver {
            final_score: 0,
            lives_remaining: 2
        }));

        assert!(director.restart());
        assert_eq!(director.state(), GameState::Playing);
        assert_eq!(director.lives(), 2);
    }

    #[test]
    fn test_last_life_ends_session() {
        let mut director = Director::with_seed(&config(), 1, 1);
        director.tick(0.0, &idle());
        director.world_mut().ship.health = 20;
        ram_ship(&mut director);

        let events = director.tick(FRAME_MS, &idle());

        assert!(events.contains(&GameEvent::GameOver {
            final_score: 0,
            lives_remaining: 0
        }));
        assert_eq!(director.lives(), 0);
        assert_eq!(director.state(), GameState::GameOverNoLives);

        // Frozen: nothing moves and no events come out
        let ship_y = director.world().ship.y;
        assert!(run(&mut director, 2, 100, &firing()).is_empty());
        assert_eq!(director.world().ship.y, ship_y);
        assert!(director.world().bullets.is_empty());

        assert!(!director.restart());
        assert_eq!(director.state(), GameState::GameOverNoLives);
    }

    #[test]
    fn test_top_up_makes_session_continuable() {
        let mut director = Director::with_seed(&config(), 0, 1);
        assert!(!director.restart());
        director.add_lives(2);
        assert_eq!(director.state(), GameState::GameOverWithLivesRemaining);
        assert!(director.restart());
        assert_eq!(director.state(), GameState::Playing);
        assert_eq!(director.lives(), 2);
    }

    #[test]
    fn test_pause_freezes_world() {
        let mut director = Director::with_seed(&config(), 3, 1);
        director.tick(0.0, &idle());
        assert_eq!(director.toggle_pause(), GameState::Paused);

        let input = InputState {
            left: true,
            ..InputState::default()
        };
        let x = director.world().ship.x;
        for frame in 1..200 {
            director.tick(frame as f64 * FRAME_MS, &input);
        }
        assert_eq!(director.world().ship.x, x);
        assert_eq!(director.world().elapsed_ms, 0.0);

        assert_eq!(director.toggle_pause(), GameState::Playing);
        director.tick(200.0 * FRAME_MS, &input);
        assert_eq!(director.world().ship.x, x - 5.0);
        // Resuming does not replay the paused time
        assert_eq!(director.world().elapsed_ms, FRAME_MS);
    }

    #[test]
    fn test_pause_ignored_after_game_over() {
        let mut director = Director::with_seed(&config(), 0, 1);
        assert_eq!(director.toggle_pause(), GameState::GameOverNoLives);
    }

    #[test]
    fn test_restart_resets_round_but_not_lives() {
        let mut director = Director::with_seed(&config(), 3, 1);
        run(&mut director, 0, 120, &firing());
        director.world_mut().difficulty = 7.5;

        assert!(director.restart());

        assert_eq!(director.score(), 0);
        assert_eq!(director.difficulty(), 0.0);
        assert_eq!(director.lives(), 3);
        assert!(director.world().bullets.is_empty());
        assert!(director.world().enemies.is_empty());
        assert_eq!(director.world().elapsed_ms, 0.0);
        assert_eq!(director.world().stars.len(), 10);
    }

    #[test]
    fn test_first_frame_delta_is_guarded() {
        let mut director = Director::with_seed(&config(), 3, 1);
        // App uptime of ten minutes on the very first frame
        director.tick(600_000.0, &idle());
        assert_eq!(director.world().elapsed_ms, 0.0);
        assert!(director.world().enemies.is_empty());
    }

    #[test]
    fn test_summary_reports_session() {
        let mut director = Director::with_seed(&config(), 2, 1);
        director.add_lives(1);
        assert_eq!(
            director.summary(),
            SessionSummary {
                score: 0,
                starting_lives: 2,
                lives_remaining: 3
            }
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_input() -> impl Strategy<Value = InputState> {
            (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
                |(left, right, up, down, fire)| InputState {
                    left,
                    right,
                    up,
                    down,
                    fire,
                },
            )
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn test_score_and_difficulty_track_kills(
                seed in any::<u64>(),
                inputs in prop::collection::vec(any_input(), 1..400)
            ) {
                let mut director = Director::with_seed(&config(), 5, seed);
                let mut kills: u64 = 0;
                let mut last_difficulty = 0.0f32;
                for (frame, input) in inputs.iter().enumerate() {
                    let events = director.tick(frame as f64 * FRAME_MS, input);
                    for event in events {
                        if let GameEvent::EnemiesDestroyed { count } = event {
                            kills += u64::from(count);
                        }
                    }
                    prop_assert!(director.difficulty() >= last_difficulty);
                    last_difficulty = director.difficulty();
                    prop_assert_eq!(director.score(), kills * POINTS_PER_KILL);
                    prop_assert_eq!(director.difficulty(), kills as f32 * DIFFICULTY_PER_KILL);
                }
            }

            #[test]
            fn test_world_only_holds_live_or_fresh_entities(
                seed in any::<u64>(),
                inputs in prop::collection::vec(any_input(), 1..400)
            ) {
                let mut director = Director::with_seed(&config(), 5, seed);
                for (frame, input) in inputs.iter().enumerate() {
                    director.tick(frame as f64 * FRAME_MS, input);
                    let world = director.world();
                    prop_assert!(world.bullets.len() <= MAX_BULLETS);
                    prop_assert!(world.enemies.len() <= MAX_ENEMIES);
                    prop_assert!(world.explosions.len() <= MAX_EXPLOSIONS);
                    prop_assert!(world.ship.x >= 25.0 && world.ship.x <= 775.0);
                    prop_assert!(world.ship.y >= 25.0 && world.ship.y <= 575.0);
                }
            }
        }
    }
}
