//! Statue enemies.
//!
//! An enemy freezes while it lies in the half-plane the player is facing and
//! closes in on the player otherwise. The state is re-derived every tick.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use stillwalk_common::{CanvasSize, EntityId, SpawnKey};
use tracing::trace;

use crate::config::GameplayConfig;
use crate::grid::CollisionQuery;
use crate::input::Direction;
use crate::physics::{self, Hitbox};

/// Behaviour chosen this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnemyState {
    /// Watched by the player, not moving
    Frozen,
    /// Unwatched, walking toward the player
    Pursuing,
    /// Unwatched and already next to the player
    #[default]
    Idle,
}

/// Discrete animation state handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnemyAnimation {
    /// Walking cycle in a direction
    Walk(Direction),
    /// Standing, animation reset
    #[default]
    Idle,
    /// Stopped mid-stride, holding the current frame
    Frozen(Direction),
}

impl fmt::Display for EnemyAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Walk(dir) => write!(f, "walk_{dir}"),
            Self::Idle => f.write_str("idle"),
            Self::Frozen(dir) => write!(f, "frozen_{dir}"),
        }
    }
}

/// Checks whether an enemy at `offset = enemy - player` lies in the
/// half-plane the player faces. No facing counts as looking down.
#[must_use]
pub fn is_seen(facing: Option<Direction>, offset: Vec2) -> bool {
    match facing.unwrap_or(Direction::Down) {
        Direction::Right => offset.x > 0.0,
        Direction::Left => offset.x < 0.0,
        Direction::Down => offset.y > 0.0,
        Direction::Up => offset.y < 0.0,
    }
}

/// A live enemy.
#[derive(Debug, Clone)]
pub struct Enemy {
    id: EntityId,
    key: SpawnKey,
    position: Vec2,
    size: Vec2,
    velocity: Vec2,
    speed: f32,
    pursue_threshold: f32,
    state: EnemyState,
    facing: Direction,
    animation: EnemyAnimation,
}

impl Enemy {
    /// Spawns an enemy with the tuning from `config`.
    #[must_use]
    pub fn new(key: SpawnKey, position: Vec2, config: &GameplayConfig) -> Self {
        Self {
            id: EntityId::new(),
            key,
            position,
            size: Vec2::new(config.enemy.hitbox_width, config.enemy.hitbox_height),
            velocity: Vec2::ZERO,
            speed: config.enemy_speed(),
            pursue_threshold: config.enemy.pursue_threshold,
            state: EnemyState::Idle,
            facing: Direction::Down,
            animation: EnemyAnimation::Idle,
        }
    }

    /// Advances one tick against the player's position and facing.
    pub fn update<Q: CollisionQuery>(
        &mut self,
        player_position: Vec2,
        player_facing: Option<Direction>,
        grid: &Q,
        canvas: CanvasSize,
    ) {
        let offset = self.position - player_position;

        let desired = if is_seen(player_facing, offset) {
            self.state = EnemyState::Frozen;
            Vec2::ZERO
        } else if offset.length() > self.pursue_threshold {
            self.state = EnemyState::Pursuing;
            -offset.normalize_or_zero() * self.speed
        } else {
            self.state = EnemyState::Idle;
            Vec2::ZERO
        };

        let previous = self.position;
        self.position = physics::step(self.position, self.size, desired, grid, canvas);
        self.velocity = self.position - previous;

        self.animation = if self.state == EnemyState::Frozen {
            EnemyAnimation::Frozen(self.facing)
        } else if let Some(dir) = Direction::from_velocity(self.velocity) {
            self.facing = dir;
            EnemyAnimation::Walk(dir)
        } else {
            EnemyAnimation::Idle
        };

        trace!(
            "Enemy {} {:?} at ({:.1}, {:.1})",
            self.key,
            self.state,
            self.position.x,
            self.position.y
        );
    }

    /// Transient entity id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Stable identity used for the dead-enemy set.
    #[must_use]
    pub const fn key(&self) -> &SpawnKey {
        &self.key
    }

    /// Hitbox top-left.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves the enemy.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Current hitbox.
    #[must_use]
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::at(self.position, self.size)
    }

    /// Displacement applied on the last update.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Behaviour chosen on the last update.
    #[must_use]
    pub const fn state(&self) -> EnemyState {
        self.state
    }

    /// Last direction moved in.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Current animation state.
    #[must_use]
    pub const fn animation(&self) -> EnemyAnimation {
        self.animation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CollisionGrid;
    use proptest::prelude::*;
    use stillwalk_common::RoomId;

    const NO_GRID: Option<&CollisionGrid> = None;

    fn enemy_at(x: f32, y: f32) -> Enemy {
        Enemy::new(
            SpawnKey::new(RoomId::new("HALLSPAWN"), 0),
            Vec2::new(x, y),
            &GameplayConfig::default(),
        )
    }

    #[test]
    fn test_frozen_when_faced() {
        let mut enemy = enemy_at(400.0, 300.0);
        enemy.update(
            Vec2::new(390.0, 300.0),
            Some(Direction::Right),
            &NO_GRID,
            CanvasSize::default(),
        );
        assert_eq!(enemy.state(), EnemyState::Frozen);
        assert_eq!(enemy.velocity(), Vec2::ZERO);
        assert_eq!(enemy.position(), Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_pursues_when_back_turned() {
        let mut enemy = enemy_at(400.0, 300.0);
        enemy.update(
            Vec2::new(300.0, 300.0),
            Some(Direction::Left),
            &NO_GRID,
            CanvasSize::default(),
        );
        assert_eq!(enemy.state(), EnemyState::Pursuing);
        assert!((enemy.position().x - 398.8).abs() < 1e-3);
        assert_eq!(enemy.animation(), EnemyAnimation::Walk(Direction::Left));
        assert_eq!(enemy.animation().to_string(), "walk_left");
    }

    #[test]
    fn test_freeze_keeps_stride_direction() {
        let mut enemy = enemy_at(400.0, 300.0);
        let player = Vec2::new(300.0, 300.0);
        enemy.update(player, Some(Direction::Left), &NO_GRID, CanvasSize::default());
        enemy.update(player, Some(Direction::Right), &NO_GRID, CanvasSize::default());
        assert_eq!(enemy.animation(), EnemyAnimation::Frozen(Direction::Left));
        assert_eq!(enemy.animation().to_string(), "frozen_left");
    }

    #[test]
    fn test_idle_within_threshold() {
        let mut enemy = enemy_at(305.0, 300.0);
        enemy.update(
            Vec2::new(300.0, 300.0),
            Some(Direction::Up),
            &NO_GRID,
            CanvasSize::default(),
        );
        assert_eq!(enemy.state(), EnemyState::Idle);
        assert_eq!(enemy.animation(), EnemyAnimation::Idle);
    }

    #[test]
    fn test_no_facing_looks_down() {
        assert!(is_seen(None, Vec2::new(0.0, 5.0)));
        assert!(!is_seen(None, Vec2::new(0.0, -5.0)));
    }

    #[test]
    fn test_pursuit_slides_along_wall() {
        // Wall column 10 at x in [100, 110) blocks straight approach
        let mut rows = vec![vec![0u8; 40]; 40];
        for row in &mut rows {
            row[10] = 1;
        }
        let grid = CollisionGrid::from_rows(&rows, 10.0).expect("valid grid");
        let mut enemy = enemy_at(109.5, 200.0);
        enemy.update(
            Vec2::new(0.0, 100.0),
            Some(Direction::Left),
            &grid,
            CanvasSize::new(400.0, 400.0),
        );
        // Mostly horizontal pull into the wall: slides on y only
        assert_eq!(enemy.position().x, 109.5);
        assert!(enemy.position().y < 200.0);
        assert_eq!(enemy.animation(), EnemyAnimation::Walk(Direction::Up));
    }

    proptest! {
        #[test]
        fn prop_seen_right_ignores_vertical_offset(dx in 0.1f32..500.0, dy in -500.0f32..500.0) {
            prop_assert!(is_seen(Some(Direction::Right), Vec2::new(dx, dy)));
            prop_assert!(!is_seen(Some(Direction::Left), Vec2::new(dx, dy)));
            prop_assert!(is_seen(Some(Direction::Left), Vec2::new(-dx, dy)));
            prop_assert!(!is_seen(Some(Direction::Right), Vec2::new(-dx, dy)));
        }
    }
}
