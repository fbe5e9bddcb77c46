//! Active room and room transitions.
//!
//! - `Session`: what has been killed or collected since the last restart
//! - `ActiveRoom`: the loaded room and every transient entity in it
//! - `RoomManager`: swaps rooms on door triggers

use ahash::AHashSet;
use glam::Vec2;
use stillwalk_common::{CanvasSize, LevelError, RoomId, SpawnKey, TileCoord};
use tracing::{debug, info, warn};

use crate::config::GameplayConfig;
use crate::enemy::Enemy;
use crate::grid::{Cell, CollisionGrid};
use crate::input::Direction;
use crate::level::{LevelSet, RoomDef, SpawnPoint};
use crate::physics::Hitbox;
use crate::pickup::Pickup;
use crate::player::Player;
use crate::projectile::Projectile;

// ============================================================================
// Session record
// ============================================================================

/// Session-scoped memory of killed enemies and collected items.
///
/// Survives room changes; only a full restart clears it.
#[derive(Debug, Clone, Default)]
pub struct Session {
    dead_enemies: AHashSet<SpawnKey>,
    collected_items: AHashSet<SpawnKey>,
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a killed enemy. Returns false if it was already recorded.
    pub fn mark_dead(&mut self, key: SpawnKey) -> bool {
        self.dead_enemies.insert(key)
    }

    /// Checks if an enemy placement has been killed.
    #[must_use]
    pub fn is_dead(&self, key: &SpawnKey) -> bool {
        self.dead_enemies.contains(key)
    }

    /// Records a collected item placement.
    pub fn mark_collected(&mut self, key: SpawnKey) -> bool {
        self.collected_items.insert(key)
    }

    /// Checks if an item placement has been collected.
    #[must_use]
    pub fn is_collected(&self, key: &SpawnKey) -> bool {
        self.collected_items.contains(key)
    }

    /// Number of enemies killed this session.
    #[must_use]
    pub fn kills(&self) -> usize {
        self.dead_enemies.len()
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.dead_enemies.clear();
        self.collected_items.clear();
    }
}

// ============================================================================
// Active room
// ============================================================================

/// A door trigger resolved to pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    /// Trigger rectangle
    pub hitbox: Hitbox,
    /// Room to switch to
    pub target: RoomId,
    /// Where the player appears in the target room
    pub spawn: SpawnPoint,
}

/// The loaded room plus its live entities.
#[derive(Debug, Clone)]
pub struct ActiveRoom {
    id: RoomId,
    asset: String,
    music: Option<String>,
    grid: Option<CollisionGrid>,
    doors: Vec<Door>,
    /// Live enemies
    pub enemies: Vec<Enemy>,
    /// Projectiles in flight
    pub projectiles: Vec<Projectile>,
    /// Items on the floor
    pub pickups: Vec<Pickup>,
}

impl ActiveRoom {
    /// An empty room with no grid, used before the first load.
    #[must_use]
    pub fn empty(id: RoomId) -> Self {
        Self {
            id,
            asset: String::new(),
            music: None,
            grid: None,
            doors: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
        }
    }

    fn load(id: RoomId, def: &RoomDef, session: &Session, config: &GameplayConfig) -> Self {
        let tile = config.tile_size();

        let grid = def.collision_map.as_ref().and_then(|rows| {
            CollisionGrid::from_rows(rows, tile)
                .map_err(|e| warn!("Room {id}: {e}; ignoring collision map"))
                .ok()
        });

        let doors = def
            .doors
            .iter()
            .map(|door| Door {
                hitbox: door.hitbox(tile),
                target: door.target_map.clone(),
                spawn: door.spawn,
            })
            .collect();

        let enemies = def
            .spawn_enemies
            .iter()
            .enumerate()
            .map(|(index, spawn)| (SpawnKey::new(id.clone(), index), spawn))
            .filter(|(key, _)| !session.is_dead(key))
            .map(|(key, spawn)| Enemy::new(key, spawn.at.resolve(tile), config))
            .collect();

        let pickups = def
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| (SpawnKey::new(id.clone(), index), item))
            .filter(|(key, _)| !session.is_collected(key))
            .map(|(key, item)| {
                Pickup::new(item.kind, item.at.resolve(tile), &config.pickup).with_key(key)
            })
            .collect();

        Self {
            asset: def.asset.clone(),
            music: def.music.clone(),
            grid,
            doors,
            enemies,
            projectiles: Vec::new(),
            pickups,
            id,
        }
    }

    /// Room id.
    #[must_use]
    pub const fn id(&self) -> &RoomId {
        &self.id
    }

    /// Background image reference.
    #[must_use]
    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// Music track reference.
    #[must_use]
    pub fn music(&self) -> Option<&str> {
        self.music.as_deref()
    }

    /// Collision grid; `None` means nothing blocks.
    #[must_use]
    pub const fn grid(&self) -> Option<&CollisionGrid> {
        self.grid.as_ref()
    }

    /// Door triggers in declared order.
    #[must_use]
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// First door, in declared order, overlapping the hitbox.
    #[must_use]
    pub fn door_hit(&self, hitbox: &Hitbox) -> Option<&Door> {
        self.doors.iter().find(|door| door.hitbox.overlaps(hitbox))
    }

    /// Runs every enemy against the room's grid.
    pub fn update_enemies(&mut self, player_position: Vec2, player_facing: Direction, canvas: CanvasSize) {
        let grid = self.grid.as_ref();
        for enemy in &mut self.enemies {
            enemy.update(player_position, Some(player_facing), &grid, canvas);
        }
    }

    /// Moves projectiles and drops those that left the canvas.
    pub fn advance_projectiles(&mut self, canvas: CanvasSize) {
        self.projectiles.retain_mut(|shot| shot.advance(canvas));
    }
}

// ============================================================================
// Room manager
// ============================================================================

/// Owns the level data and the active room.
#[derive(Debug, Clone)]
pub struct RoomManager {
    levels: LevelSet,
    config: GameplayConfig,
    active: ActiveRoom,
}

impl RoomManager {
    /// Creates a manager with no room loaded yet.
    #[must_use]
    pub fn new(levels: LevelSet, config: GameplayConfig) -> Self {
        let active = ActiveRoom::empty(config.start_room.clone());
        Self {
            levels,
            config,
            active,
        }
    }

    /// Switches to `room`.
    ///
    /// Drops all enemies, projectiles and pickups of the current room, spawns
    /// the new room's placements except those recorded in `session`, and moves
    /// the player to `spawn` if given. An unknown room changes nothing.
    pub fn enter(
        &mut self,
        room: &RoomId,
        spawn: Option<SpawnPoint>,
        player: &mut Player,
        session: &Session,
    ) -> Result<(), LevelError> {
        let def = self
            .levels
            .room(room)
            .ok_or_else(|| LevelError::UnknownRoom(room.clone()))?;

        self.active = ActiveRoom::load(room.clone(), def, session, &self.config);
        if let Some(spawn) = spawn {
            player.set_position(spawn.resolve(self.config.tile_size()));
        }

        info!(
            "Entered room {} ({} enemies, {} pickups)",
            room,
            self.active.enemies.len(),
            self.active.pickups.len()
        );
        Ok(())
    }

    /// Flips one collision cell of the active room. Debug tooling only.
    pub fn debug_toggle_tile(&mut self, row: i32, col: i32) -> Option<Cell> {
        let cell = self.active.grid.as_mut()?.toggle(TileCoord::new(row, col));
        debug!("Debug toggle in room {}: ({row}, {col}) -> {cell:?}", self.active.id);
        cell
    }

    /// The active room.
    #[must_use]
    pub const fn active(&self) -> &ActiveRoom {
        &self.active
    }

    /// The active room, mutably.
    pub fn active_mut(&mut self) -> &mut ActiveRoom {
        &mut self.active
    }
}
