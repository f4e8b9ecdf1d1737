use super::bounds::{Bounds, Screen};
use super::bullet::{Bullet, BulletOwner};
use crate::input::InputState;

pub const SHIP_SIZE: f32 = 50.0;
pub const SHIP_SPEED: f32 = 5.0;
pub const SHIP_MAX_HEALTH: i32 = 100;
/// Milliseconds between shots
pub const SHIP_FIRE_RATE_MS: f64 = 200.0;
/// Distance above the ship's center where bullets appear
const MUZZLE_OFFSET: f32 = 30.0;
/// Distance of the spawn point from the bottom edge
const SPAWN_MARGIN: f32 = 100.0;

#[derive(Debug, Clone)]
pub struct Ship {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    pub health: i32,
    pub max_health: i32,
    pub fire_rate_ms: f64,
    /// Game-clock time of the last shot, `None` until the first one
    pub last_fire_ms: Option<f64>,
}

impl Ship {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            speed: SHIP_SPEED,
            width: SHIP_SIZE,
            height: SHIP_SIZE,
            health: SHIP_MAX_HEALTH,
            max_health: SHIP_MAX_HEALTH,
            fire_rate_ms: SHIP_FIRE_RATE_MS,
            last_fire_ms: None,
        }
    }

    /// Fresh ship at bottom-center of the screen
    pub fn spawn(screen: Screen) -> Self {
        Self::new(screen.width / 2.0, screen.height - SPAWN_MARGIN)
    }

    /// Applies the held directions and keeps the ship on screen.
    ///
    /// Axes are independent, so a diagonal moves `speed` on both.
    pub fn update(&mut self, input: &InputState, screen: Screen) {
        self.vx = 0.0;
        self.vy = 0.0;

        if input.left {
            self.vx = -self.speed;
        }
        if input.right {
            self.vx = self.speed;
        }
        if input.up {
            self.vy = -self.speed;
        }
        if input.down {
            self.vy = self.speed;
        }

        self.x += self.vx;
        self.y += self.vy;

        // max/min rather than clamp: a screen narrower than the ship must not panic
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        self.x = self.x.min(screen.width - half_w).max(half_w);
        self.y = self.y.min(screen.height - half_h).max(half_h);
    }

    pub fn can_fire(&self, now_ms: f64) -> bool {
        match self.last_fire_ms {
            Some(last) => now_ms - last >= self.fire_rate_ms,
            None => true,
        }
    }

    pub fn fire(&mut self, now_ms: f64) {
        self.last_fire_ms = Some(now_ms);
    }

    /// Bullet leaving the ship's nose
    pub fn make_bullet(&self) -> Bullet {
        Bullet::new(self.x, self.y - MUZZLE_OFFSET, BulletOwner::Player)
    }

    /// Returns true once health has reached zero
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health = (self.health - amount).max(0).min(self.max_health);
        self.health == 0
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }

    pub fn get_bounds(&self) -> Bounds {
        Bounds::centered(self.x, self.y, self.width, self.height)
    }

    pub fn get_sprite_lines(&self) -> Vec<&'static str> {
        vec![" /^\\ ", "<|||>", " ||| "]
    }
}
