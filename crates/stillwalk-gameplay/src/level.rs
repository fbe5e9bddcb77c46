//! Static level data.
//!
//! Rooms are authored as RON and never change during play. Shape:
//!
//! ```ron
//! (
//!     rooms: {
//!         "HALLSPAWN": (
//!             asset: "hall.png",
//!             collision_map: Some([[1, 1, 1], [1, 0, 1]]),
//!             doors: [(row: 0, col: 1, w: 1, h: 1, target_map: "CELLAR",
//!                      spawn: Cell(row: 5, col: 4))],
//!             spawn_enemies: [(at: Pixel(x: 400.0, y: 300.0))],
//!             items: [(at: Cell(row: 3, col: 3), kind: Weapon)],
//!             music: Some("hall.ogg"),
//!         ),
//!     },
//! )
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use stillwalk_common::{LevelError, RoomId, StillwalkResult, TileCoord};
use tracing::{info, warn};

use crate::physics::Hitbox;
use crate::pickup::PickupKind;

/// Where something appears in a room.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnPoint {
    /// Exact pixel position (hitbox top-left)
    Pixel {
        /// X in pixels
        x: f32,
        /// Y in pixels
        y: f32,
    },
    /// Top-left of a grid cell
    Cell {
        /// Row index
        row: i32,
        /// Column index
        col: i32,
    },
}

impl SpawnPoint {
    /// Converts to a pixel position.
    #[must_use]
    pub fn resolve(self, tile_size: f32) -> Vec2 {
        match self {
            Self::Pixel { x, y } => Vec2::new(x, y),
            Self::Cell { row, col } => TileCoord::new(row, col).to_pixel(tile_size),
        }
    }
}

/// A door trigger, in grid cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorDef {
    /// Top row
    pub row: i32,
    /// Left column
    pub col: i32,
    /// Width in cells
    pub w: i32,
    /// Height in cells
    pub h: i32,
    /// Room to switch to
    pub target_map: RoomId,
    /// Where the player appears in the target room
    pub spawn: SpawnPoint,
}

impl DoorDef {
    /// Trigger rectangle in pixels.
    #[must_use]
    pub fn hitbox(&self, tile_size: f32) -> Hitbox {
        Hitbox::new(
            self.col as f32 * tile_size,
            self.row as f32 * tile_size,
            self.w as f32 * tile_size,
            self.h as f32 * tile_size,
        )
    }
}

/// An enemy placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Spawn position
    pub at: SpawnPoint,
    /// Optional variant name, for the renderer
    #[serde(default)]
    pub kind: Option<String>,
}

/// An item placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPlacement {
    /// Position of the item
    pub at: SpawnPoint,
    /// What it gives
    pub kind: PickupKind,
}

/// Static definition of one room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomDef {
    /// Background image reference
    pub asset: String,
    /// Rows of `0` (passable) / non-zero (blocked) cells
    pub collision_map: Option<Vec<Vec<u8>>>,
    /// Door triggers, checked in this order
    pub doors: Vec<DoorDef>,
    /// Enemy placements
    pub spawn_enemies: Vec<EnemySpawn>,
    /// Item placements
    pub items: Vec<ItemPlacement>,
    /// Music track reference
    pub music: Option<String>,
}

/// All rooms of a game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelSet {
    rooms: BTreeMap<RoomId, RoomDef>,
}

impl LevelSet {
    /// Creates an empty level set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a room.
    #[must_use]
    pub fn with_room(mut self, id: impl Into<RoomId>, room: RoomDef) -> Self {
        self.rooms.insert(id.into(), room);
        self
    }

    /// Parses a level set from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, LevelError> {
        let levels: Self = ron::from_str(text).map_err(|e| LevelError::Parse(e.to_string()))?;
        for problem in levels.validate() {
            warn!("{problem}");
        }
        Ok(levels)
    }

    /// Reads and parses a RON level file.
    pub fn load<P: AsRef<Path>>(path: P) -> StillwalkResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let levels = Self::from_ron_str(&text)?;
        info!("Loaded {} rooms from {}", levels.len(), path.display());
        Ok(levels)
    }

    /// Looks up a room.
    #[must_use]
    pub fn room(&self, id: &RoomId) -> Option<&RoomDef> {
        self.rooms.get(id)
    }

    /// Checks if a room exists.
    #[must_use]
    pub fn contains(&self, id: &RoomId) -> bool {
        self.rooms.contains_key(id)
    }

    /// Number of rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Checks if there are no rooms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Lists data problems that play will tolerate: doors to missing rooms
    /// and malformed collision maps.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (id, room) in &self.rooms {
            for (index, door) in room.doors.iter().enumerate() {
                if !self.contains(&door.target_map) {
                    problems.push(format!(
                        "Room {id} door {index} leads to unknown room {}",
                        door.target_map
                    ));
                }
            }
            if let Some(map) = &room.collision_map {
                let cols = map.first().map_or(0, Vec::len);
                if cols == 0 || map.iter().any(|row| row.len() != cols) {
                    problems.push(format!("Room {id} has a malformed collision map"));
                }
            }
        }
        problems
    }

    /// Rejects doors that drop the player onto a door of the room they lead
    /// to. Such a pair would trigger again on the next tick and send the
    /// player straight back. Doors to unknown rooms are left to [`validate`].
    ///
    /// [`validate`]: Self::validate
    pub fn check_door_spawns(&self, tile_size: f32, player_size: Vec2) -> Result<(), LevelError> {
        for (id, room) in &self.rooms {
            for (index, door) in room.doors.iter().enumerate() {
                let Some(target) = self.room(&door.target_map) else {
                    continue;
                };
                let landing = Hitbox::at(door.spawn.resolve(tile_size), player_size);
                if target
                    .doors
                    .iter()
                    .any(|other| other.hitbox(tile_size).overlaps(&landing))
                {
                    return Err(LevelError::SpawnInsideDoor {
                        room: id.clone(),
                        door: index,
                        target: door.target_map.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}
