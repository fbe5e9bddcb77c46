//! Central game state management.
//!
//! `GameState` owns the player, the room manager and the session record,
//! and runs one simulation step per tick:
//! player, enemies, projectiles, then overlap resolution and at most one
//! room transition.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use stillwalk_common::StillwalkResult;
use tracing::{info, warn};

use crate::combat;
use crate::config::GameplayConfig;
use crate::events::{EventBus, GameEvent};
use crate::grid::Cell;
use crate::input::InputSnapshot;
use crate::level::LevelSet;
use crate::player::Player;
use crate::projectile::Projectile;
use crate::room::{Door, RoomManager, Session};
use crate::snapshot::FrameSnapshot;

/// Fixed timestep for simulation updates (60 ticks per second).
pub const FIXED_TIMESTEP: f64 = 1.0 / 60.0;

/// Whether the session is still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Normal play
    #[default]
    Playing,
    /// Player died; waiting for a restart
    GameOver,
}

/// Central game state containing all gameplay data.
#[derive(Debug)]
pub struct GameState {
    config: GameplayConfig,
    player: Player,
    rooms: RoomManager,
    session: Session,
    events: EventBus,
    status: GameStatus,
    paused: bool,
    tick_count: u64,
    /// Accumulated time for fixed timestep updates
    accumulator: f64,
    /// Attack press not yet seen by a tick
    pending_attack: bool,
    /// Restart press not yet seen by a tick
    pending_restart: bool,
}

impl GameState {
    /// Creates a game in the configured start room.
    ///
    /// Fails if the start room is not part of `levels`, or if a door would
    /// place the player on a door of the room it leads to.
    pub fn new(mut config: GameplayConfig, levels: LevelSet) -> StillwalkResult<Self> {
        config.validate();
        let player_size = Vec2::new(config.player.hitbox_width, config.player.hitbox_height);
        levels.check_door_spawns(config.tile_size(), player_size)?;
        let mut player = Player::new(config.player.clone());
        let session = Session::new();
        let mut rooms = RoomManager::new(levels, config.clone());
        rooms.enter(&config.start_room, None, &mut player, &session)?;

        Ok(Self {
            config,
            player,
            rooms,
            session,
            events: EventBus::default(),
            status: GameStatus::Playing,
            paused: false,
            tick_count: 0,
            accumulator: 0.0,
            pending_attack: false,
            pending_restart: false,
        })
    }

    /// Advances by wall-clock time, running as many fixed ticks as fit.
    ///
    /// Edge inputs (attack, restart) are delivered to the first tick only.
    /// When `dt` is too short for a tick they are held until the next tick
    /// runs, so a press on a fast frame is never lost.
    pub fn update(&mut self, dt: f32, input: &InputSnapshot) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.paused {
            return events;
        }

        self.pending_attack |= input.attack;
        self.pending_restart |= input.restart;

        self.accumulator += f64::from(dt);
        while self.accumulator >= FIXED_TIMESTEP {
            let step = InputSnapshot {
                attack: std::mem::take(&mut self.pending_attack),
                restart: std::mem::take(&mut self.pending_restart),
                ..*input
            };
            events.extend(self.tick(&step));
            self.accumulator -= FIXED_TIMESTEP;
        }
        events
    }

    /// Runs one simulation step and returns the events it produced.
    pub fn tick(&mut self, input: &InputSnapshot) -> Vec<GameEvent> {
        if self.paused {
            return Vec::new();
        }

        if self.status == GameStatus::GameOver {
            if input.restart {
                self.restart();
            }
            return self.events.drain();
        }

        let canvas = self.config.canvas;

        let tick = {
            let grid = self.rooms.active().grid();
            self.player.update(input, &grid, canvas)
        };
        if tick.sprint_exhausted {
            self.events.publish(GameEvent::SprintExhausted);
        }
        if let Some(shot) = tick.shot {
            let projectile = Projectile::new(shot.origin, shot.direction, &self.config.projectile);
            self.events.publish(GameEvent::ProjectileFired {
                entity_id: projectile.id(),
                direction: shot.direction,
                ammo_left: self.player.ammo(),
            });
            self.rooms.active_mut().projectiles.push(projectile);
        }

        let room = self.rooms.active_mut();
        room.update_enemies(self.player.position(), self.player.facing(), canvas);
        room.advance_projectiles(canvas);

        let door = combat::resolve_overlaps(
            room,
            &mut self.player,
            &mut self.session,
            &self.config,
            &self.events,
        );

        if self.player.is_dead() {
            info!("Game over after {} ticks", self.tick_count);
            self.status = GameStatus::GameOver;
        } else if let Some(door) = door {
            self.walk_through(&door);
        }

        self.tick_count += 1;
        self.events.drain()
    }

    fn walk_through(&mut self, door: &Door) {
        let from = self.rooms.active().id().clone();
        match self
            .rooms
            .enter(&door.target, Some(door.spawn), &mut self.player, &self.session)
        {
            Ok(()) => self.events.publish(GameEvent::RoomChanged {
                from,
                to: door.target.clone(),
            }),
            Err(e) => {
                warn!("Door in room {from} ignored: {e}");
                self.events.publish(GameEvent::RoomTransitionFailed {
                    target: door.target.clone(),
                });
            },
        }
    }

    /// Resets the player, forgets the session record and reloads the start room.
    pub fn restart(&mut self) {
        self.player.reset();
        self.session.clear();
        self.status = GameStatus::Playing;

        let start = self.config.start_room.clone();
        if let Err(e) = self
            .rooms
            .enter(&start, None, &mut self.player, &self.session)
        {
            warn!("Restart could not reload {start}: {e}");
        }
        info!("Game restarted");
        self.events.publish(GameEvent::GameRestarted);
    }

    /// Flips a collision cell of the active room. Debug tooling only.
    pub fn debug_toggle_tile(&mut self, row: i32, col: i32) -> Option<Cell> {
        self.rooms.debug_toggle_tile(row, col)
    }

    /// Captures the current frame for rendering.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::from_state(self)
    }

    /// Toggles the pause state.
    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.paused);
    }

    /// Sets the pause state. Presses still waiting for a tick are dropped.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        self.pending_attack = false;
        self.pending_restart = false;
    }

    /// Checks if the game is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Playing or game over.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Ticks simulated since creation.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// The player, mutably.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Room manager.
    #[must_use]
    pub const fn rooms(&self) -> &RoomManager {
        &self.rooms
    }

    /// Session record.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Tuning in effect.
    #[must_use]
    pub const fn config(&self) -> &GameplayConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Direction;
    use crate::level::RoomDef;

    fn state() -> GameState {
        GameState::new(
            GameplayConfig::default(),
            LevelSet::new().with_room("HALLSPAWN", RoomDef::default()),
        )
        .expect("start room exists")
    }

    #[test]
    fn test_missing_start_room() {
        let result = GameState::new(GameplayConfig::default(), LevelSet::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_update_runs_fixed_ticks() {
        let mut game = state();
        game.update(0.05, &InputSnapshot::idle());
        assert_eq!(game.tick_count(), 3);
        game.update(0.01, &InputSnapshot::idle());
        assert_eq!(game.tick_count(), 3);
    }

    #[test]
    fn test_update_when_paused() {
        let mut game = state();
        game.set_paused(true);
        game.update(1.0, &InputSnapshot::holding(&[Direction::Right]));
        assert_eq!(game.tick_count(), 0);
        assert_eq!(game.player().position().x, 373.0);

        game.toggle_pause();
        assert!(!game.is_paused());
    }

    #[test]
    fn test_attack_edge_only_on_first_substep() {
        let mut game = state();
        game.player_mut().equip_weapon();
        game.player_mut().grant_ammo(5);
        let events = game.update(0.05, &InputSnapshot::idle().attacking());
        let shots = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ProjectileFired { .. }))
            .count();
        assert_eq!(shots, 1);
        assert_eq!(game.player().ammo(), 4);
    }

    #[test]
    fn test_game_over_waits_for_restart() {
        let mut game = state();
        game.player_mut().set_health(2);
        game.player_mut().take_damage();
        game.tick(&InputSnapshot::idle());
        assert_eq!(game.status(), GameStatus::GameOver);

        let before = game.tick_count();
        game.tick(&InputSnapshot::holding(&[Direction::Left]));
        assert_eq!(game.tick_count(), before);

        let events = game.tick(&InputSnapshot {
            restart: true,
            ..InputSnapshot::idle()
        });
        assert_eq!(events, vec![GameEvent::GameRestarted]);
        assert_eq!(game.status(), GameStatus::Playing);
        assert_eq!(game.player().health(), 6);
    }

    fn shots(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::ProjectileFired { .. }))
            .count()
    }

    #[test]
    fn test_attack_on_short_frame_fires_on_next_tick() {
        let mut game = state();
        game.player_mut().equip_weapon();
        game.player_mut().grant_ammo(5);

        let first = game.update(1.0 / 120.0, &InputSnapshot::idle().attacking());
        assert_eq!(game.tick_count(), 0);
        assert_eq!(shots(&first), 0);

        let second = game.update(1.0 / 120.0, &InputSnapshot::idle());
        assert_eq!(game.tick_count(), 1);
        assert_eq!(shots(&second), 1);
        assert_eq!(game.player().ammo(), 4);

        // Consumed: later ticks do not fire again
        let later = game.update(0.05, &InputSnapshot::idle());
        assert_eq!(shots(&later), 0);
        assert_eq!(game.player().ammo(), 4);
    }

    #[test]
    fn test_restart_on_short_frame_is_kept() {
        let mut game = state();
        game.player_mut().set_health(2);
        game.player_mut().take_damage();
        game.tick(&InputSnapshot::idle());
        assert_eq!(game.status(), GameStatus::GameOver);

        let restart = InputSnapshot {
            restart: true,
            ..InputSnapshot::idle()
        };
        game.update(1.0 / 144.0, &restart);
        game.update(1.0 / 144.0, &InputSnapshot::idle());
        let events = game.update(1.0 / 144.0, &InputSnapshot::idle());
        assert_eq!(events, vec![GameEvent::GameRestarted]);
        assert_eq!(game.status(), GameStatus::Playing);
    }

    #[test]
    fn test_pause_drops_waiting_presses() {
        let mut game = state();
        game.player_mut().equip_weapon();
        game.player_mut().grant_ammo(5);

        game.update(0.005, &InputSnapshot::idle().attacking());
        game.set_paused(true);
        game.set_paused(false);
        let events = game.update(0.05, &InputSnapshot::idle());
        assert_eq!(shots(&events), 0);
        assert_eq!(game.player().ammo(), 5);
    }
}
