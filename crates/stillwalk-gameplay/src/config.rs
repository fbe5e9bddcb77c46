//! Gameplay tuning.
//!
//! Every constant the simulation reads lives here so a host can load it from
//! a file. The defaults are the tuned values of the shipped prototype.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use stillwalk_common::{CanvasSize, RoomId};

/// Default tile grid width in cells.
pub const DEFAULT_MAP_COLS: u32 = 28;
/// Default canvas width in pixels.
pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
/// Default canvas height in pixels.
pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;
/// Room the session starts in.
pub const DEFAULT_START_ROOM: &str = "HALLSPAWN";

/// All gameplay tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Play area size in pixels
    pub canvas: CanvasSize,
    /// Tile grid width in cells
    pub map_cols: u32,
    /// Room entered on start and restart
    pub start_room: RoomId,
    /// Player tuning
    pub player: PlayerConfig,
    /// Enemy tuning
    pub enemy: EnemyConfig,
    /// Projectile tuning
    pub projectile: ProjectileConfig,
    /// Pickup tuning
    pub pickup: PickupConfig,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT),
            map_cols: DEFAULT_MAP_COLS,
            start_room: RoomId::new(DEFAULT_START_ROOM),
            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
            projectile: ProjectileConfig::default(),
            pickup: PickupConfig::default(),
        }
    }
}

impl GameplayConfig {
    /// Side length of one grid cell in pixels.
    #[must_use]
    pub fn tile_size(&self) -> f32 {
        self.canvas.width / self.map_cols.max(1) as f32
    }

    /// Enemy movement speed in pixels per tick.
    #[must_use]
    pub fn enemy_speed(&self) -> f32 {
        self.player.speed * self.enemy.speed_factor
    }

    /// Clamps values into ranges the simulation can work with.
    pub fn validate(&mut self) {
        self.canvas.width = self.canvas.width.max(1.0);
        self.canvas.height = self.canvas.height.max(1.0);
        self.map_cols = self.map_cols.max(1);

        let p = &mut self.player;
        p.speed = p.speed.max(0.0);
        p.sprint_multiplier = p.sprint_multiplier.max(1.0);
        p.stamina_max = p.stamina_max.max(1.0);
        p.stamina_drain = p.stamina_drain.max(0.0);
        p.stamina_regen = p.stamina_regen.max(0.0);
        p.max_health = p.max_health.max(1);
        p.damage = p.damage.max(1);

        self.enemy.speed_factor = self.enemy.speed_factor.max(0.0);
        self.enemy.pursue_threshold = self.enemy.pursue_threshold.max(0.0);
        self.projectile.speed = self.projectile.speed.max(0.1);
        self.projectile.radius = self.projectile.radius.max(0.1);
    }
}

/// Player tuning. Health values are in half-heart units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Base speed in pixels per tick
    pub speed: f32,
    /// Velocity factor while sprinting
    pub sprint_multiplier: f32,
    /// Stamina ceiling
    pub stamina_max: f32,
    /// Stamina spent per sprinting tick
    pub stamina_drain: f32,
    /// Stamina recovered per non-sprinting tick
    pub stamina_regen: f32,
    /// Health ceiling in half hearts
    pub max_health: u8,
    /// Health lost per hit in half hearts
    pub damage: u8,
    /// Ticks of invincibility after a hit
    pub invincibility_ticks: u32,
    /// Ammo ceiling
    pub max_ammo: u32,
    /// Hitbox width in pixels
    pub hitbox_width: f32,
    /// Hitbox height in pixels
    pub hitbox_height: f32,
    /// Position on session start and restart (hitbox top-left)
    pub spawn: Vec2,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        let tile = DEFAULT_CANVAS_WIDTH / DEFAULT_MAP_COLS as f32;
        Self {
            speed: 4.0,
            sprint_multiplier: 1.6,
            stamina_max: 100.0,
            stamina_drain: 1.0,
            stamina_regen: 0.5,
            max_health: 6,
            damage: 2,
            invincibility_ticks: 60,
            max_ammo: 10,
            hitbox_width: 40.0,
            hitbox_height: tile * 2.0,
            spawn: Vec2::new(373.0, 400.0),
        }
    }
}

/// Enemy tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Speed as a fraction of the player's base speed
    pub speed_factor: f32,
    /// Distance under which a pursuing enemy stops
    pub pursue_threshold: f32,
    /// Hitbox width in pixels
    pub hitbox_width: f32,
    /// Hitbox height in pixels
    pub hitbox_height: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            speed_factor: 0.3,
            pursue_threshold: 10.0,
            hitbox_width: 50.0,
            hitbox_height: 30.0,
        }
    }
}

/// Projectile tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Speed in pixels per tick
    pub speed: f32,
    /// Half-extent of the square hit volume
    pub radius: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 8.0,
            radius: 5.0,
        }
    }
}

/// Pickup tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    /// Hitbox width in pixels
    pub width: f32,
    /// Hitbox height in pixels
    pub height: f32,
    /// Half hearts restored by a dropped heart
    pub heal_amount: u8,
    /// Ammo that comes with a weapon pickup
    pub weapon_ammo: u32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 20.0,
            heal_amount: 1,
            weapon_ammo: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameplayConfig::default();
        assert_eq!(config.map_cols, 28);
        assert!((config.tile_size() - 28.571_428).abs() < 1e-4);
        assert!((config.enemy_speed() - 1.2).abs() < 1e-6);
        assert_eq!(config.start_room.as_str(), "HALLSPAWN");
        assert_eq!(config.player.spawn, Vec2::new(373.0, 400.0));
    }

    #[test]
    fn test_config_validation() {
        let mut config = GameplayConfig::default();
        config.map_cols = 0;
        config.player.sprint_multiplier = 0.5;
        config.player.max_health = 0;
        config.projectile.speed = -3.0;

        config.validate();

        assert_eq!(config.map_cols, 1);
        assert!((config.player.sprint_multiplier - 1.0).abs() < f32::EPSILON);
        assert_eq!(config.player.max_health, 1);
        assert!(config.projectile.speed > 0.0);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config: GameplayConfig =
            ron::from_str("(player: (speed: 6.0), start_room: \"CELLAR\")").expect("parse");
        assert!((config.player.speed - 6.0).abs() < f32::EPSILON);
        assert_eq!(config.player.max_ammo, 10);
        assert_eq!(config.start_room.as_str(), "CELLAR");
        assert_eq!(config.enemy, EnemyConfig::default());
    }
}
