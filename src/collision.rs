//! Per-tick collision resolution.
//!
//! Pairwise AABB tests: player bullets against enemies, then enemies against
//! the ship. Hits mutate the entities in place and leave explosions behind;
//! the caller turns the returned report into score and life changes.

use crate::entities::{Bullet, BulletOwner, Enemy, Explosion, SHIP_EXPLOSION_SIZE, Ship};

/// Damage the ship takes from ramming an enemy
pub const CONTACT_DAMAGE: i32 = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub enemies_destroyed: u32,
    /// The ship's health reached zero during this pass
    pub player_hit: bool,
}

/// Resolves all overlaps for one tick.
///
/// Bullets are visited in order and each one is spent on the first live enemy
/// it overlaps, so earlier bullets win ties.
pub fn resolve(
    bullets: &mut [Bullet],
    enemies: &mut [Enemy],
    player: &mut Ship,
    explosions: &mut Vec<Explosion>,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    for bullet in bullets.iter_mut() {
        if !bullet.active || bullet.owner != BulletOwner::Player {
            continue;
        }
        let bullet_bounds = bullet.get_bounds();

        for enemy in enemies.iter_mut() {
            if !enemy.active || !bullet_bounds.overlaps(&enemy.get_bounds()) {
                continue;
            }

            bullet.active = false;
            if enemy.take_damage(bullet.damage) {
                report.enemies_destroyed += 1;
                explosions.push(Explosion::new(enemy.x, enemy.y));
            }
            break;
        }
    }

    let player_bounds = player.get_bounds();
    for enemy in enemies.iter_mut() {
        if !enemy.active || !enemy.get_bounds().overlaps(&player_bounds) {
            continue;
        }

        enemy.active = false;
        let player_dead = player.take_damage(CONTACT_DAMAGE);
        explosions.push(Explosion::new(enemy.x, enemy.y));

        if player_dead && !report.player_hit {
            report.player_hit = true;
            explosions.push(Explosion::with_size(player.x, player.y, SHIP_EXPLOSION_SIZE));
        }
    }

    report
}
