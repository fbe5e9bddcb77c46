//! Error types for Stillwalk.

use thiserror::Error;

use crate::ids::RoomId;

/// Top-level error type for Stillwalk operations.
#[derive(Debug, Error)]
pub enum StillwalkError {
    /// Level data errors
    #[error("Level error: {0}")]
    Level(#[from] LevelError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors in room and level data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    /// A room id that no level data defines
    #[error("Unknown room: {0}")]
    UnknownRoom(RoomId),

    /// Collision map rows have different lengths
    #[error("Ragged collision map: row {row} has {actual} cells, expected {expected}")]
    RaggedGrid {
        /// Offending row index
        row: usize,
        /// Length of the first row
        expected: usize,
        /// Length of the offending row
        actual: usize,
    },

    /// Collision map without any cells
    #[error("Empty collision map")]
    EmptyGrid,

    /// A door places the player on a door of the room it leads to
    #[error("Room {room} door {door} spawns the player inside a door of {target}")]
    SpawnInsideDoor {
        /// Room holding the door
        room: RoomId,
        /// Index of the door in that room
        door: usize,
        /// Room the door leads to
        target: RoomId,
    },

    /// Level data could not be parsed
    #[error("Failed to parse level data: {0}")]
    Parse(String),
}

/// Result type alias for Stillwalk operations.
pub type StillwalkResult<T> = Result<T, StillwalkError>;
