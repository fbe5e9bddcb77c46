//! # Stillwalk Gameplay
//!
//! Simulation core for Stillwalk, a top-down action game in which enemies
//! freeze while the player looks at them.
//!
//! This crate provides everything below the renderer:
//! - Collision grid and axis-sliding movement
//! - Input hub with key bindings and per-tick snapshots
//! - Player controller with stamina, health and ammo
//! - Statue enemies that move only while unseen
//! - Projectiles, pickups and overlap resolution
//! - Room loading, doors and the session record
//! - Event bus and frame snapshots

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod combat;
pub mod config;
pub mod enemy;
pub mod events;
pub mod game_state;
pub mod grid;
pub mod input;
pub mod level;
pub mod physics;
pub mod pickup;
pub mod player;
pub mod projectile;
pub mod room;
pub mod snapshot;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::combat::*;
    pub use crate::config::*;
    pub use crate::enemy::*;
    pub use crate::events::*;
    pub use crate::game_state::*;
    pub use crate::grid::*;
    pub use crate::input::*;
    pub use crate::level::*;
    pub use crate::physics::*;
    pub use crate::pickup::*;
    pub use crate::player::*;
    pub use crate::projectile::*;
    pub use crate::room::*;
    pub use crate::snapshot::*;
}

pub use prelude::*;
