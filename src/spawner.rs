//! Enemy spawn scheduling.
//!
//! The spawn interval shrinks linearly with difficulty down to a floor, and
//! the pool of enemy kinds grows: basic only at first, zigzag from difficulty
//! 5, aggressive from difficulty 10.

use std::f32::consts::TAU;

use rand::Rng;

use crate::entities::{ENEMY_SIZE, Enemy, EnemyKind};

const BASE_SPAWN_INTERVAL_MS: f64 = 800.0;
const SPAWN_INTERVAL_STEP_MS: f64 = 20.0;
const MIN_SPAWN_INTERVAL_MS: f64 = 300.0;
/// Horizontal margin kept free on both sides of the spawn band
const SPAWN_MARGIN: f32 = 40.0;

/// Candidate pool, basic listed twice so it stays twice as likely
const KIND_POOL: [EnemyKind; 4] = [
    EnemyKind::Basic,
    EnemyKind::Basic,
    EnemyKind::Zigzag,
    EnemyKind::Aggressive,
];

pub fn spawn_interval_ms(difficulty: f32) -> f64 {
    (BASE_SPAWN_INTERVAL_MS - difficulty as f64 * SPAWN_INTERVAL_STEP_MS).max(MIN_SPAWN_INTERVAL_MS)
}

pub fn should_spawn(now_ms: f64, last_spawn_ms: f64, difficulty: f32) -> bool {
    now_ms - last_spawn_ms >= spawn_interval_ms(difficulty)
}

/// Kinds eligible at this difficulty, with their weights given by repetition
pub fn available_kinds(difficulty: f32) -> &'static [EnemyKind] {
    let unlocked = 2 + (difficulty.max(0.0) / 5.0).floor() as usize;
    &KIND_POOL[..unlocked.min(KIND_POOL.len())]
}

/// New enemy just above the top edge at a random column
pub fn spawn_enemy<R: Rng + ?Sized>(rng: &mut R, screen_width: f32, difficulty: f32) -> Enemy {
    let kinds = available_kinds(difficulty);
    let kind = kinds[rng.random_range(0..kinds.len())];

    let band = screen_width - SPAWN_MARGIN * 2.0;
    let x = if band > 0.0 {
        SPAWN_MARGIN + rng.random::<f32>() * band
    } else {
        screen_width / 2.0
    };
    let phase = rng.random::<f32>() * TAU;

    Enemy::new(x, -ENEMY_SIZE, kind, phase)
}
