// Library exports for testing
pub use config::{GameConfig, LifeLossPolicy};
pub use director::{Director, GameEvent, SessionSummary, World};
pub use entities::{Bullet, BulletOwner, Enemy, EnemyKind, Explosion, GameState, Screen, Ship, Star};
pub use input::{InputAction, InputState};
pub use renderer::{EntitySink, draw_world};

pub mod app;
pub mod clock;
pub mod collision;
pub mod config;
pub mod director;
pub mod entities;
pub mod input;
pub mod renderer;
pub mod spawner;
pub mod store;
