//! Straight-line projectiles fired by the player.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use stillwalk_common::{CanvasSize, EntityId};

use crate::config::ProjectileConfig;
use crate::input::Direction;
use crate::physics::Hitbox;

/// A projectile in flight. Position is the centre of its hit volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    id: EntityId,
    position: Vec2,
    direction: Direction,
    speed: f32,
    radius: f32,
}

impl Projectile {
    /// Spawns a projectile travelling in `direction`.
    #[must_use]
    pub fn new(position: Vec2, direction: Direction, config: &ProjectileConfig) -> Self {
        Self {
            id: EntityId::new(),
            position,
            direction,
            speed: config.speed,
            radius: config.radius,
        }
    }

    /// Moves one tick. Returns false once the projectile has left the canvas.
    pub fn advance(&mut self, canvas: CanvasSize) -> bool {
        self.position += self.velocity();
        canvas.contains(self.position)
    }

    /// Transient entity id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Centre point.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Travel direction.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Per-tick displacement.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.direction.to_vec2() * self.speed
    }

    /// Square hit volume around the centre.
    #[must_use]
    pub fn bounds(&self) -> Hitbox {
        Hitbox::centered(self.position, self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projectile_moves_along_axis() {
        let mut shot = Projectile::new(
            Vec2::new(200.0, 300.0),
            Direction::Up,
            &ProjectileConfig::default(),
        );
        assert!(shot.advance(CanvasSize::default()));
        assert_eq!(shot.position(), Vec2::new(200.0, 292.0));
        assert_eq!(shot.bounds(), Hitbox::new(195.0, 287.0, 10.0, 10.0));
    }

    #[test]
    fn test_projectile_leaves_canvas() {
        let mut shot = Projectile::new(
            Vec2::new(790.0, 300.0),
            Direction::Right,
            &ProjectileConfig::default(),
        );
        assert!(shot.advance(CanvasSize::default()));
        assert!(!shot.advance(CanvasSize::default()));
    }
}
