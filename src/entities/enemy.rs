use super::bounds::Bounds;

pub const ENEMY_SIZE: f32 = 40.0;
/// Phase advance per tick for zigzag movers
const ZIGZAG_FREQUENCY: f32 = 0.02;
/// Peak horizontal step of a zigzag mover
const ZIGZAG_STEP: f32 = 2.0;
/// Aggressive enemies descend slower while they chase
const AGGRESSIVE_DESCENT_FACTOR: f32 = 0.8;
/// Largest horizontal step toward the player per tick
const AGGRESSIVE_MAX_DRIFT: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Basic,
    Zigzag,
    Aggressive,
}

impl EnemyKind {
    pub fn get_name(&self) -> &'static str {
        match self {
            EnemyKind::Basic => "basic",
            EnemyKind::Zigzag => "zigzag",
            EnemyKind::Aggressive => "aggressive",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub kind: EnemyKind,
    pub health: i32,
    pub speed: f32,
    /// Wave phase in radians, only advanced by zigzag movers
    pub phase: f32,
    pub active: bool,
}

impl Enemy {
    pub fn new(x: f32, y: f32, kind: EnemyKind, phase: f32) -> Self {
        let (health, speed) = match kind {
            EnemyKind::Aggressive => (30, 2.0),
            EnemyKind::Basic | EnemyKind::Zigzag => (10, 1.5),
        };

        Self {
            x,
            y,
            width: ENEMY_SIZE,
            height: ENEMY_SIZE,
            kind,
            health,
            speed,
            phase,
            active: true,
        }
    }

    pub fn update(&mut self, player_x: f32, screen_height: f32) {
        if !self.active {
            return;
        }

        match self.kind {
            EnemyKind::Basic => {
                self.y += self.speed;
            }
            EnemyKind::Zigzag => {
                self.y += self.speed;
                self.phase += ZIGZAG_FREQUENCY;
                self.x += self.phase.sin() * ZIGZAG_STEP;
            }
            EnemyKind::Aggressive => {
                self.y += self.speed * AGGRESSIVE_DESCENT_FACTOR;
                let dx = player_x - self.x;
                if dx != 0.0 {
                    self.x += dx.signum() * dx.abs().min(AGGRESSIVE_MAX_DRIFT);
                }
            }
        }

        if self.y > screen_height + self.height {
            self.active = false;
        }
    }

    /// Returns true when this hit destroyed the enemy
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health -= amount;
        if self.health <= 0 {
            self.active = false;
            return true;
        }
        false
    }

    pub fn get_bounds(&self) -> Bounds {
        Bounds::centered(self.x, self.y, self.width, self.height)
    }

    pub fn get_sprite_lines(&self) -> Vec<&'static str> {
        match self.kind {
            EnemyKind::Basic => vec!["\\|/", "{=}", "/_\\"],
            EnemyKind::Zigzag => vec!["<*>", "~|~", "<*>"],
            EnemyKind::Aggressive => vec!["[#]", "|#|", "\\V/"],
        }
    }
}
