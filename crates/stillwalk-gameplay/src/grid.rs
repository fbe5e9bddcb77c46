//! Tile collision grid.
//!
//! Each room owns a grid of passable/blocked cells addressed by
//! `row = floor(y / tile)`, `col = floor(x / tile)`. Anything outside the grid
//! counts as blocked.

use serde::{Deserialize, Serialize};
use stillwalk_common::{LevelError, TileCoord};
use tracing::debug;

use crate::physics::Hitbox;

/// Inward margin applied to a hitbox before sampling cells, so a box flush
/// with a tile edge does not touch the neighbouring tile.
pub const OCCUPY_EPSILON: f32 = 1.0;

/// State of a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Entities may stand here
    #[default]
    Passable,
    /// Walls, furniture, water
    Blocked,
}

impl Cell {
    /// Decodes a level-data value: `0` is passable, anything else blocks.
    #[must_use]
    pub const fn from_raw(value: u8) -> Self {
        if value == 0 {
            Self::Passable
        } else {
            Self::Blocked
        }
    }

    /// Returns the opposite state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Passable => Self::Blocked,
            Self::Blocked => Self::Passable,
        }
    }
}

/// Anything that can answer "may this hitbox stand here".
pub trait CollisionQuery {
    /// Returns true if the hitbox overlaps no blocked space.
    fn can_occupy(&self, hitbox: &Hitbox) -> bool;
}

impl<Q: CollisionQuery + ?Sized> CollisionQuery for &Q {
    fn can_occupy(&self, hitbox: &Hitbox) -> bool {
        (**self).can_occupy(hitbox)
    }
}

/// A room without a collision map blocks nothing.
impl<Q: CollisionQuery> CollisionQuery for Option<Q> {
    fn can_occupy(&self, hitbox: &Hitbox) -> bool {
        self.as_ref().map_or(true, |grid| grid.can_occupy(hitbox))
    }
}

/// Row-major grid of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionGrid {
    rows: usize,
    cols: usize,
    tile_size: f32,
    cells: Vec<Cell>,
}

impl CollisionGrid {
    /// Creates a grid where every cell is passable.
    #[must_use]
    pub fn passable(rows: usize, cols: usize, tile_size: f32) -> Self {
        Self {
            rows,
            cols,
            tile_size,
            cells: vec![Cell::Passable; rows * cols],
        }
    }

    /// Builds a grid from level-data rows.
    ///
    /// Rows must all have the same length; an empty map is rejected.
    pub fn from_rows(rows: &[Vec<u8>], tile_size: f32) -> Result<Self, LevelError> {
        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(LevelError::EmptyGrid);
        }

        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(LevelError::RaggedGrid {
                    row: index,
                    expected: cols,
                    actual: row.len(),
                });
            }
            cells.extend(row.iter().copied().map(Cell::from_raw));
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            tile_size,
            cells,
        })
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Cell side length in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        let row = usize::try_from(coord.row).ok()?;
        let col = usize::try_from(coord.col).ok()?;
        (row < self.rows && col < self.cols).then_some(row * self.cols + col)
    }

    /// Returns the cell at `coord`; off-grid cells are blocked.
    #[must_use]
    pub fn cell(&self, coord: TileCoord) -> Cell {
        self.index(coord)
            .map_or(Cell::Blocked, |index| self.cells[index])
    }

    /// Checks if the cell at `coord` blocks movement.
    #[must_use]
    pub fn is_blocked(&self, coord: TileCoord) -> bool {
        self.cell(coord) == Cell::Blocked
    }

    /// Every cell the hitbox covers after shrinking it by [`OCCUPY_EPSILON`].
    pub fn covered_cells(&self, hitbox: &Hitbox) -> impl Iterator<Item = TileCoord> {
        let t = self.tile_size;
        let first_col = ((hitbox.x + OCCUPY_EPSILON) / t).floor() as i32;
        let last_col = ((hitbox.right() - OCCUPY_EPSILON) / t).floor() as i32;
        let first_row = ((hitbox.y + OCCUPY_EPSILON) / t).floor() as i32;
        let last_row = ((hitbox.bottom() - OCCUPY_EPSILON) / t).floor() as i32;

        (first_row..=last_row)
            .flat_map(move |row| (first_col..=last_col).map(move |col| TileCoord::new(row, col)))
    }

    /// Flips a cell between passable and blocked. Debug tooling only.
    ///
    /// Returns the new state, or `None` if the cell is off-grid.
    pub fn toggle(&mut self, coord: TileCoord) -> Option<Cell> {
        let index = self.index(coord)?;
        let cell = self.cells[index].toggled();
        self.cells[index] = cell;
        debug!("Toggled tile ({}, {}) to {:?}", coord.row, coord.col, cell);
        Some(cell)
    }}

impl CollisionQuery for CollisionGrid {
    fn can_occupy(&self, hitbox: &Hitbox) -> bool {
        self.covered_cells(hitbox).all(|coord| !self.is_blocked(coord))
    }
}
