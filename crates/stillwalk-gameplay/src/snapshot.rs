//! Read-only frame view for renderers and HUDs.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use stillwalk_common::{RoomId, SpawnKey};

use crate::enemy::EnemyState;
use crate::game_state::{GameState, GameStatus};
use crate::input::Direction;
use crate::pickup::PickupKind;

/// Player as drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Hitbox top-left
    pub position: Vec2,
    /// Facing
    pub facing: Direction,
    /// Animation label, e.g. `walk_right`
    pub animation: String,
    /// Blinking after a hit
    pub invincible: bool,
}

/// Enemy as drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    /// Placement identity
    pub key: SpawnKey,
    /// Hitbox top-left
    pub position: Vec2,
    /// Facing
    pub facing: Direction,
    /// Behaviour this tick
    pub state: EnemyState,
    /// Animation label, e.g. `frozen_left`
    pub animation: String,
}

/// Projectile as drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    /// Centre
    pub position: Vec2,
    /// Travel direction
    pub direction: Direction,
}

/// Pickup as drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupView {
    /// Hitbox top-left
    pub position: Vec2,
    /// Payload
    pub kind: PickupKind,
}

/// Numbers for the HUD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudView {
    /// Health in hearts, in steps of 0.5
    pub hearts: f32,
    /// Maximum hearts
    pub max_hearts: f32,
    /// Stamina in percent
    pub stamina_percent: f32,
    /// Ammo count
    pub ammo: u32,
    /// Weapon equipped
    pub has_weapon: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Ticks simulated so far
    pub tick: u64,
    /// Active room
    pub room: RoomId,
    /// Background asset of the active room
    pub asset: String,
    /// Music track of the active room
    pub music: Option<String>,
    /// Playing or game over
    pub status: GameStatus,
    /// The player
    pub player: PlayerView,
    /// Live enemies
    pub enemies: Vec<EnemyView>,
    /// Projectiles in flight
    pub projectiles: Vec<ProjectileView>,
    /// Items on the floor
    pub pickups: Vec<PickupView>,
    /// HUD numbers
    pub hud: HudView,
}

impl FrameSnapshot {
    /// Captures the current state.
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        let player = state.player();
        let room = state.rooms().active();

        Self {
            tick: state.tick_count(),
            room: room.id().clone(),
            asset: room.asset().to_owned(),
            music: room.music().map(str::to_owned),
            status: state.status(),
            player: PlayerView {
                position: player.position(),
                facing: player.facing(),
                animation: player.animation().to_string(),
                invincible: player.is_invincible(),
            },
            enemies: room
                .enemies
                .iter()
                .map(|enemy| EnemyView {
                    key: enemy.key().clone(),
                    position: enemy.position(),
                    facing: enemy.facing(),
                    state: enemy.state(),
                    animation: enemy.animation().to_string(),
                })
                .collect(),
            projectiles: room
                .projectiles
                .iter()
                .map(|shot| ProjectileView {
                    position: shot.position(),
                    direction: shot.direction(),
                })
                .collect(),
            pickups: room
                .pickups
                .iter()
                .map(|pickup| PickupView {
                    position: pickup.position(),
                    kind: pickup.kind(),
                })
                .collect(),
            hud: HudView {
                hearts: player.hearts(),
                max_hearts: f32::from(player.max_health()) / 2.0,
                stamina_percent: player.stamina().fraction() * 100.0,
                ammo: player.ammo(),
                has_weapon: player.has_weapon(),
            },
        }
    }
}
