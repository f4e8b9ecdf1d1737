mod bounds;
mod bullet;
mod enemy;
mod explosion;
mod game_state;
mod ship;
mod star;

// Re-export all public types
pub use bounds::{Bounds, Screen};
pub use bullet::{BULLET_HEIGHT, BULLET_WIDTH, Bullet, BulletOwner};
pub use enemy::{ENEMY_SIZE, Enemy, EnemyKind};
pub use explosion::{EXPLOSION_SIZE, Explosion, Particle, SHIP_EXPLOSION_SIZE};
pub use game_state::GameState;
pub use ship::{SHIP_FIRE_RATE_MS, SHIP_SIZE, Ship};
pub use star::{Star, generate_starfield};
