//! # Stillwalk Common
//!
//! Common types shared by the Stillwalk crates:
//! - ID types (EntityId, RoomId, SpawnKey)
//! - Tile and canvas coordinates
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn test_tile_coord_from_pixel() {
        let tile = 800.0 / 28.0;
        assert_eq!(TileCoord::from_pixel(Vec2::new(0.0, 0.0), tile), TileCoord::new(0, 0));
        assert_eq!(TileCoord::from_pixel(Vec2::new(29.0, 58.0), tile), TileCoord::new(2, 1));
        assert_eq!(TileCoord::from_pixel(Vec2::new(-1.0, 5.0), tile), TileCoord::new(0, -1));
    }

    #[test]
    fn test_tile_coord_round_trip_cell() {
        let tile = 800.0 / 28.0;
        let cell = TileCoord::new(7, 12);
        let center = cell.to_pixel(tile) + Vec2::splat(tile / 2.0);
        assert_eq!(TileCoord::from_pixel(center, tile), cell);
    }

    #[test]
    fn test_entity_id_generation() {
        let id1 = EntityId::new();
        let id2 = EntityId::new();
        assert_ne!(id1, id2);
        assert_ne!(EntityId::default(), id2);
    }

    #[test]
    fn test_spawn_key_identity() {
        let a = SpawnKey::new(RoomId::new("HALLSPAWN"), 0);
        let b = SpawnKey::new(RoomId::from("HALLSPAWN"), 0);
        let c = SpawnKey::new(RoomId::new("HALLSPAWN"), 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "HALLSPAWN#0");
    }

    #[test]
    fn test_canvas_contains_edges() {
        let canvas = CanvasSize::default();
        assert!(canvas.contains(Vec2::new(0.0, 0.0)));
        assert!(canvas.contains(Vec2::new(800.0, 600.0)));
        assert!(!canvas.contains(Vec2::new(800.5, 10.0)));
        assert!(!canvas.contains(Vec2::new(10.0, -0.5)));
    }
}
