//! Coordinate types for tile cells and pixel positions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A cell of the room's tile grid.
///
/// Rows grow downward, columns grow to the right. Negative values are legal
/// and always fall outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Row index (y axis)
    pub row: i32,
    /// Column index (x axis)
    pub col: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Returns the cell containing a pixel position.
    #[must_use]
    pub fn from_pixel(pos: Vec2, tile_size: f32) -> Self {
        Self {
            row: (pos.y / tile_size).floor() as i32,
            col: (pos.x / tile_size).floor() as i32,
        }
    }

    /// Returns the top-left pixel of this cell.
    #[must_use]
    pub fn to_pixel(self, tile_size: f32) -> Vec2 {
        Vec2::new(self.col as f32 * tile_size, self.row as f32 * tile_size)
    }
}

/// Pixel dimensions of the play area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl CanvasSize {
    /// Creates a canvas size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Checks whether a point lies inside `[0, width] x [0, height]`.
    #[must_use]
    pub fn contains(self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}
