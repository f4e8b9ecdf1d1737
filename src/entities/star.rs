use rand::Rng;

use super::bounds::Screen;

/// Background star. Decorative only; never collides.
#[derive(Debug, Clone)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub brightness: f32,
    pub speed: f32,
}

impl Star {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, screen: Screen) -> Self {
        Self {
            x: rng.random::<f32>() * screen.width,
            y: rng.random::<f32>() * screen.height,
            size: rng.random::<f32>() * 2.0 + 1.0,
            brightness: rng.random::<f32>() * 0.5 + 0.5,
            speed: rng.random::<f32>() * 0.5 + 0.2,
        }
    }

    /// Drifts down; past the bottom edge the star re-enters at the top
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, screen: Screen) {
        self.y += self.speed;
        if self.y > screen.height {
            self.y = 0.0;
            self.x = rng.random::<f32>() * screen.width;
        }
    }
}

pub fn generate_starfield<R: Rng + ?Sized>(rng: &mut R, screen: Screen, count: usize) -> Vec<Star> {
    (0..count).map(|_| Star::random(rng, screen)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_starfield_within_screen() {
        let mut rng = StdRng::seed_from_u64(7);
        let screen = Screen::new(800.0, 600.0);
        let stars = generate_starfield(&mut rng, screen, 100);
        assert_eq!(stars.len(), 100);
        for star in stars.iter() {
            assert!(star.x >= 0.0 && star.x < 800.0);
            assert!(star.y >= 0.0 && star.y < 600.0);
            assert!(star.size >= 1.0 && star.size < 3.0);
            assert!(star.speed >= 0.2 && star.speed < 0.7);
        }
    }

    #[test]
    fn test_star_wraps_to_top() {
        let mut rng = StdRng::seed_from_u64(7);
        let screen = Screen::new(800.0, 600.0);
        let mut star = Star {
            x: 10.0,
            y: 599.9,
            size: 1.0,
            brightness: 1.0,
            speed: 0.5,
        };
        star.advance(&mut rng, screen);
        assert_eq!(star.y, 0.0);
        assert!(star.x >= 0.0 && star.x < 800.0);
    }
}
