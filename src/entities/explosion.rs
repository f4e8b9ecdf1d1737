use std::f32::consts::TAU;

pub const EXPLOSION_SIZE: f32 = 20.0;
/// Explosion left behind by the player's ship
pub const SHIP_EXPLOSION_SIZE: f32 = 40.0;
const GROWTH_PER_TICK: f32 = 2.0;
const FADE_PER_TICK: f32 = 0.05;
const PARTICLE_COUNT: usize = 8;
const PARTICLE_SPEED: f32 = 3.0;

/// Debris point, positioned relative to the explosion center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

#[derive(Debug, Clone)]
pub struct Explosion {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub max_size: f32,
    pub alpha: f32,
    pub particles: [Particle; PARTICLE_COUNT],
    pub active: bool,
}

impl Explosion {
    pub fn new(x: f32, y: f32) -> Self {
        Self::with_size(x, y, EXPLOSION_SIZE)
    }

    pub fn with_size(x: f32, y: f32, size: f32) -> Self {
        // Spread evenly around the circle
        let particles = std::array::from_fn(|i| {
            let angle = TAU * i as f32 / PARTICLE_COUNT as f32;
            Particle {
                x: 0.0,
                y: 0.0,
                vx: angle.cos() * PARTICLE_SPEED,
                vy: angle.sin() * PARTICLE_SPEED,
            }
        });

        Self {
            x,
            y,
            size,
            max_size: size * 3.0,
            alpha: 1.0,
            particles,
            active: true,
        }
    }

    pub fn update(&mut self) {
        if !self.active {
            return;
        }

        self.size += GROWTH_PER_TICK;
        self.alpha -= FADE_PER_TICK;

        for particle in self.particles.iter_mut() {
            particle.x += particle.vx;
            particle.y += particle.vy;
        }

        if self.alpha <= 0.0 || self.size >= self.max_size {
            self.active = false;
        }
    }
}
