use super::bounds::Bounds;

pub const BULLET_WIDTH: f32 = 6.0;
pub const BULLET_HEIGHT: f32 = 15.0;
pub const BULLET_DAMAGE: i32 = 10;
/// Vertical travel per tick of a player bullet (upward)
pub const PLAYER_BULLET_VY: f32 = -8.0;
const ENEMY_BULLET_VY: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

#[derive(Debug, Clone)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vy: f32,
    pub owner: BulletOwner,
    pub damage: i32,
    pub active: bool,
}

impl Bullet {
    pub fn new(x: f32, y: f32, owner: BulletOwner) -> Self {
        let vy = match owner {
            BulletOwner::Player => PLAYER_BULLET_VY,
            BulletOwner::Enemy => ENEMY_BULLET_VY,
        };

        Self {
            x,
            y,
            width: BULLET_WIDTH,
            height: BULLET_HEIGHT,
            vy,
            owner,
            damage: BULLET_DAMAGE,
            active: true,
        }
    }

    /// Moves one tick and deactivates once fully past either screen edge
    pub fn update(&mut self, screen_height: f32) {
        if !self.active {
            return;
        }

        self.y += self.vy;

        if self.y <= -self.height || self.y >= screen_height + self.height {
            self.active = false;
        }
    }

    pub fn get_bounds(&self) -> Bounds {
        Bounds::centered(self.x, self.y, self.width, self.height)
    }
}
