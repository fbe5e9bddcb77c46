//! Player controller.
//!
//! Turns an input snapshot into movement, drives the stamina-gated sprint,
//! and owns health, invincibility, weapon and ammo state.

use std::f32::consts::FRAC_1_SQRT_2;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use stillwalk_common::CanvasSize;
use tracing::debug;

use crate::config::PlayerConfig;
use crate::grid::CollisionQuery;
use crate::input::{Direction, InputSnapshot};
use crate::physics::{self, Hitbox};

/// How the player is moving this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlayerMotion {
    /// Standing still
    #[default]
    Idle,
    /// Walking at base speed
    Walk,
    /// Sprinting
    Run,
}

/// Discrete animation state handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PlayerAnimation {
    /// Motion kind
    pub motion: PlayerMotion,
    /// Facing direction
    pub facing: Direction,
}

impl fmt::Display for PlayerAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let motion = match self.motion {
            PlayerMotion::Idle => "idle",
            PlayerMotion::Walk => "walk",
            PlayerMotion::Run => "run",
        };
        write!(f, "{motion}_{}", self.facing)
    }
}

// ============================================================================
// Stamina
// ============================================================================

/// Sprint resource.
///
/// Draining to zero latches exhaustion. The latch clears only once stamina
/// has recovered above zero and the sprint modifier has been let go, so a
/// held sprint key does not resume sprinting by itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stamina {
    current: f32,
    max: f32,
    exhausted: bool,
}

/// Result of one stamina update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StaminaTick {
    /// Sprint boost applies this tick
    pub boosted: bool,
    /// Stamina ran out this tick
    pub exhausted_now: bool,
}

impl Stamina {
    /// Creates a full stamina pool.
    #[must_use]
    pub fn full(max: f32) -> Self {
        Self {
            current: max,
            max,
            exhausted: false,
        }
    }

    /// Current value.
    #[must_use]
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Fill level in `0.0..=1.0`.
    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    /// Whether sprint is locked out.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Sets the current value, clamped to the pool.
    pub fn set(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }

    /// Advances one tick.
    pub fn update(&mut self, sprint_held: bool, moving: bool, drain: f32, regen: f32) -> StaminaTick {
        if self.exhausted && !sprint_held && self.current > 0.0 {
            self.exhausted = false;
        }

        let mut tick = StaminaTick::default();
        if sprint_held && moving && !self.exhausted && self.current > 0.0 {
            self.current = (self.current - drain).max(0.0);
            if self.current <= 0.0 {
                self.exhausted = true;
                tick.exhausted_now = true;
            } else {
                tick.boosted = true;
            }
        } else {
            self.current = (self.current + regen).min(self.max);
        }
        tick
    }
}

// ============================================================================
// Player
// ============================================================================

/// Outcome of a damage event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invincible or already dead, nothing happened
    Ignored,
    /// Took the hit and survived
    Hurt {
        /// Health left in half hearts
        remaining: u8,
    },
    /// Took the hit and died
    Died,
}

/// A projectile the player wants spawned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotRequest {
    /// Spawn point (hitbox centre)
    pub origin: Vec2,
    /// Travel direction
    pub direction: Direction,
}

/// Side effects of one player update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerTick {
    /// Projectile to spawn, if the player fired
    pub shot: Option<ShotRequest>,
    /// Stamina ran out this tick
    pub sprint_exhausted: bool,
}

/// The player character.
#[derive(Debug, Clone)]
pub struct Player {
    config: PlayerConfig,
    position: Vec2,
    velocity: Vec2,
    health: u8,
    stamina: Stamina,
    invincible_ticks: u32,
    has_weapon: bool,
    ammo: u32,
    animation: PlayerAnimation,
}

impl Player {
    /// Creates a player at the configured spawn point.
    #[must_use]
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            position: config.spawn,
            velocity: Vec2::ZERO,
            health: config.max_health,
            stamina: Stamina::full(config.stamina_max),
            invincible_ticks: 0,
            has_weapon: false,
            ammo: 0,
            animation: PlayerAnimation::default(),
            config,
        }
    }

    /// Restores every stat to its initial value and moves to the spawn point.
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    /// Advances the player one tick.
    pub fn update<Q: CollisionQuery>(
        &mut self,
        input: &InputSnapshot,
        grid: &Q,
        canvas: CanvasSize,
    ) -> PlayerTick {
        let mut tick = PlayerTick::default();
        self.invincible_ticks = self.invincible_ticks.saturating_sub(1);

        let axis = input.held.axis();
        let mut velocity = axis * self.config.speed;
        if axis.x != 0.0 && axis.y != 0.0 {
            velocity *= FRAC_1_SQRT_2;
        }
        let moving = velocity != Vec2::ZERO;

        let stamina = self.stamina.update(
            input.sprint,
            moving,
            self.config.stamina_drain,
            self.config.stamina_regen,
        );
        if stamina.exhausted_now {
            debug!("Player stamina exhausted");
            tick.sprint_exhausted = true;
        }
        if stamina.boosted {
            velocity *= self.config.sprint_multiplier;
        }

        self.animation = match Direction::from_velocity(velocity) {
            Some(facing) => PlayerAnimation {
                motion: if stamina.boosted {
                    PlayerMotion::Run
                } else {
                    PlayerMotion::Walk
                },
                facing,
            },
            None => PlayerAnimation {
                motion: PlayerMotion::Idle,
                facing: self.animation.facing,
            },
        };

        self.velocity = velocity;
        self.position = physics::step(self.position, self.size(), velocity, grid, canvas);

        if input.attack {
            tick.shot = self.try_fire();
        }
        tick
    }

    fn try_fire(&mut self) -> Option<ShotRequest> {
        if !self.has_weapon || self.ammo == 0 {
            return None;
        }
        self.ammo -= 1;
        Some(ShotRequest {
            origin: self.hitbox().center(),
            direction: self.animation.facing,
        })
    }

    /// Applies one hit unless invincible.
    pub fn take_damage(&mut self) -> DamageOutcome {
        if self.is_invincible() || self.is_dead() {
            return DamageOutcome::Ignored;
        }

        self.health = self.health.saturating_sub(self.config.damage);
        self.invincible_ticks = self.config.invincibility_ticks;
        if self.health == 0 {
            debug!("Player died");
            DamageOutcome::Died
        } else {
            debug!("Player hurt, {} half hearts left", self.health);
            DamageOutcome::Hurt {
                remaining: self.health,
            }
        }
    }

    /// Restores health in half hearts, capped at the maximum. Returns the amount gained.
    pub fn heal(&mut self, amount: u8) -> u8 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.config.max_health);
        self.health - before
    }

    /// Adds ammo, capped at the maximum. Returns the amount gained.
    pub fn grant_ammo(&mut self, amount: u32) -> u32 {
        let before = self.ammo;
        self.ammo = self.ammo.saturating_add(amount).min(self.config.max_ammo);
        self.ammo - before
    }

    /// Equips the weapon.
    pub fn equip_weapon(&mut self) {
        self.has_weapon = true;
    }

    /// Hitbox top-left.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves the player (room transitions, tests).
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Hitbox dimensions.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.config.hitbox_width, self.config.hitbox_height)
    }

    /// Current hitbox.
    #[must_use]
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::at(self.position, self.size())
    }

    /// Velocity applied on the last update.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Last faced direction.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.animation.facing
    }

    /// Turns the player without moving.
    pub fn set_facing(&mut self, facing: Direction) {
        self.animation.facing = facing;
    }

    /// Current animation state.
    #[must_use]
    pub const fn animation(&self) -> PlayerAnimation {
        self.animation
    }

    /// Health in half hearts.
    #[must_use]
    pub const fn health(&self) -> u8 {
        self.health
    }

    /// Health in hearts.
    #[must_use]
    pub fn hearts(&self) -> f32 {
        f32::from(self.health) / 2.0
    }

    /// Sets health in half hearts, capped at the maximum.
    pub fn set_health(&mut self, health: u8) {
        self.health = health.min(self.config.max_health);
    }

    /// Maximum health in half hearts.
    #[must_use]
    pub const fn max_health(&self) -> u8 {
        self.config.max_health
    }

    /// Checks if health has run out.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Stamina pool.
    #[must_use]
    pub const fn stamina(&self) -> &Stamina {
        &self.stamina
    }

    /// Mutable stamina pool.
    pub fn stamina_mut(&mut self) -> &mut Stamina {
        &mut self.stamina
    }

    /// Checks if damage is currently ignored.
    #[must_use]
    pub const fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    /// Whether the weapon is equipped.
    #[must_use]
    pub const fn has_weapon(&self) -> bool {
        self.has_weapon
    }

    /// Ammo count.
    #[must_use]
    pub const fn ammo(&self) -> u32 {
        self.ammo
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}
