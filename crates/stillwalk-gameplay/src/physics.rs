//! Entity kinematics shared by the player and enemies.
//!
//! Positions are the top-left corner of the hitbox; the bottom edge is the
//! ground-contact line. Movement is continuous: a desired velocity is applied
//! against the collision grid with axis-sliding when the full step is blocked,
//! then clamped to the canvas.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use stillwalk_common::CanvasSize;

use crate::grid::CollisionQuery;

/// Axis-aligned rectangle used for collision and combat overlap.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hitbox {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Hitbox {
    /// Creates a new hitbox.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a hitbox from its top-left corner and size.
    #[must_use]
    pub fn at(position: Vec2, size: Vec2) -> Self {
        Self::new(position.x, position.y, size.x, size.y)
    }

    /// Creates a square hitbox centred on a point.
    #[must_use]
    pub fn centered(center: Vec2, half_extent: f32) -> Self {
        Self::new(
            center.x - half_extent,
            center.y - half_extent,
            half_extent * 2.0,
            half_extent * 2.0,
        )
    }

    /// Top-left corner.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (ground contact).
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Checks if this hitbox overlaps another. Touching edges do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }}

/// Resolves a desired step against the collision grid.
///
/// The full step is taken if it is free. Otherwise the entity slides along
/// one axis: the vertical component alone when `|vx| > |vy|`, else the
/// horizontal component alone. If that is blocked too it stays put.
#[must_use]
pub fn resolve_move<Q: CollisionQuery>(
    position: Vec2,
    size: Vec2,
    velocity: Vec2,
    grid: &Q,
) -> Vec2 {
    if velocity == Vec2::ZERO {
        return position;
    }

    let target = position + velocity;
    if grid.can_occupy(&Hitbox::at(target, size)) {
        return target;
    }

    let slide = if velocity.x.abs() > velocity.y.abs() {
        Vec2::new(position.x, position.y + velocity.y)
    } else {
        Vec2::new(position.x + velocity.x, position.y)
    };

    if slide != position && grid.can_occupy(&Hitbox::at(slide, size)) {
        slide
    } else {
        position
    }
}

/// Keeps the whole hitbox inside the canvas.
#[must_use]
pub fn clamp_to_canvas(position: Vec2, size: Vec2, canvas: CanvasSize) -> Vec2 {
    let max_x = (canvas.width - size.x).max(0.0);
    let max_y = (canvas.height - size.y).max(0.0);
    Vec2::new(position.x.clamp(0.0, max_x), position.y.clamp(0.0, max_y))
}

/// Applies [`resolve_move`] followed by [`clamp_to_canvas`].
#[must_use]
pub fn step<Q: CollisionQuery>(
    position: Vec2,
    size: Vec2,
    velocity: Vec2,
    grid: &Q,
    canvas: CanvasSize,
) -> Vec2 {
    clamp_to_canvas(resolve_move(position, size, velocity, grid), size, canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CollisionGrid;
    use proptest::prelude::*;

    fn open() -> Option<&'static CollisionGrid> {
        None
    }

    /// 10px tiles, a vertical wall in column 3 and a horizontal one in row 3.
    fn walls() -> CollisionGrid {
        let mut rows = vec![vec![0u8; 8]; 8];
        for (r, row) in rows.iter_mut().enumerate() {
            row[3] = 1;
            if r == 3 {
                row.fill(1);
            }
        }
        CollisionGrid::from_rows(&rows, 10.0).expect("valid grid")
    }

    #[test]
    fn test_hitbox_overlap() {
        let a = Hitbox::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Hitbox::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Hitbox::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Hitbox::new(0.0, 10.0, 10.0, 10.0)));
        assert!(Hitbox::new(2.0, 2.0, 1.0, 1.0).overlaps(&a));
    }

    #[test]
    fn test_hitbox_centered() {
        let b = Hitbox::centered(Vec2::new(200.0, 300.0), 5.0);
        assert_eq!(b, Hitbox::new(195.0, 295.0, 10.0, 10.0));
        assert_eq!(b.center(), Vec2::new(200.0, 300.0));
    }

    #[test]
    fn test_free_move_taken_whole() {
        let size = Vec2::new(40.0, 57.0);
        let pos = resolve_move(Vec2::new(100.0, 400.0), size, Vec2::new(4.0, 0.0), &open());
        assert_eq!(pos, Vec2::new(104.0, 400.0));
    }

    #[test]
    fn test_diagonal_into_wall_slides_vertically() {
        let grid = walls();
        // Box in columns 1-2, moving right into the column-3 wall and down
        let start = Vec2::new(18.0, 41.0);
        let size = Vec2::new(10.0, 10.0);
        let pos = resolve_move(start, size, Vec2::new(3.0, 2.0), &grid);
        assert_eq!(pos, Vec2::new(18.0, 43.0));
    }

    #[test]
    fn test_diagonal_into_floor_slides_horizontally() {
        let grid = walls();
        // Below the row-3 wall, moving up into it and left
        let start = Vec2::new(50.0, 40.0);
        let size = Vec2::new(10.0, 10.0);
        let pos = resolve_move(start, size, Vec2::new(-2.0, -3.0), &grid);
        assert_eq!(pos, Vec2::new(48.0, 40.0));
    }

    #[test]
    fn test_fully_blocked_stays_put() {
        let grid = walls();
        let start = Vec2::new(20.0, 20.0);
        let pos = resolve_move(start, Vec2::new(10.0, 10.0), Vec2::new(4.0, 4.0), &grid);
        assert_eq!(pos, start);
    }

    #[test]
    fn test_axis_move_into_wall_does_not_slide() {
        let grid = walls();
        let start = Vec2::new(18.0, 41.0);
        let pos = resolve_move(start, Vec2::new(10.0, 10.0), Vec2::new(3.0, 0.0), &grid);
        assert_eq!(pos, start);
    }

    #[test]
    fn test_clamp_to_canvas() {
        let canvas = CanvasSize::new(800.0, 600.0);
        let size = Vec2::new(40.0, 57.0);
        assert_eq!(clamp_to_canvas(Vec2::new(-3.0, 10.0), size, canvas), Vec2::new(0.0, 10.0));
        assert_eq!(clamp_to_canvas(Vec2::new(790.0, 580.0), size, canvas), Vec2::new(760.0, 543.0));
    }

    proptest! {
        #[test]
        fn prop_slide_never_enters_blocked_axis(
            x in 0.0f32..70.0,
            y in 0.0f32..70.0,
            vx in -6.0f32..6.0,
            vy in -6.0f32..6.0,
        ) {
            let grid = walls();
            let size = Vec2::new(5.0, 5.0);
            let start = Vec2::new(x, y);
            prop_assume!(grid.can_occupy(&Hitbox::at(start, size)));

            let velocity = Vec2::new(vx, vy);
            let end = resolve_move(start, size, velocity, &grid);

            // Wherever it ends up is free space
            prop_assert!(grid.can_occupy(&Hitbox::at(end, size)));

            let full = start + velocity;
            if end != full && end != start {
                // Slid: exactly one axis changed, and it is the permitted one
                if vx.abs() > vy.abs() {
                    prop_assert_eq!(end, Vec2::new(start.x, start.y + vy));
                } else {
                    prop_assert_eq!(end, Vec2::new(start.x + vx, start.y));
                }
            }
        }
    }
}
