//! Event bus for the HUD, dialogs and screen transitions.

use crossbeam_channel::{bounded, Receiver, Sender};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use stillwalk_common::{EntityId, RoomId, SpawnKey};

use crate::input::Direction;
use crate::pickup::PickupKind;

/// Things that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player walked through a door
    RoomChanged {
        /// Room left
        from: RoomId,
        /// Room entered
        to: RoomId,
    },
    /// A door pointed at a room that does not exist; nothing changed
    RoomTransitionFailed {
        /// Missing room
        target: RoomId,
    },
    /// The player lost health
    PlayerDamaged {
        /// Health left in half hearts
        remaining: u8,
    },
    /// The player's health reached zero
    PlayerDied,
    /// A projectile was spawned
    ProjectileFired {
        /// Projectile entity
        entity_id: EntityId,
        /// Travel direction
        direction: Direction,
        /// Ammo left
        ammo_left: u32,
    },
    /// An enemy was destroyed
    EnemyKilled {
        /// Placement identity
        key: SpawnKey,
        /// Where it stood
        position: Vec2,
    },
    /// An item appeared on the floor
    PickupSpawned {
        /// Pickup entity
        entity_id: EntityId,
        /// Payload
        kind: PickupKind,
        /// Hitbox top-left
        position: Vec2,
    },
    /// The player collected an item
    PickupCollected {
        /// Pickup entity
        entity_id: EntityId,
        /// Payload
        kind: PickupKind,
    },
    /// Sprint stamina ran out
    SprintExhausted,
    /// The session was reset
    GameRestarted,
}

/// Event bus for broadcasting events to subscribers.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<GameEvent>,
    /// Receiver for collecting events
    receiver: Receiver<GameEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Publishes an event to the bus.
    pub fn publish(&self, event: GameEvent) {
        // Non-blocking send - if full, event is dropped
        let _ = self.sender.try_send(event);
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<GameEvent> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain() {
        let bus = EventBus::new(8);
        bus.publish(GameEvent::SprintExhausted);
        bus.publish(GameEvent::PlayerDamaged { remaining: 4 });
        let events = bus.drain();
        assert_eq!(
            events,
            vec![
                GameEvent::SprintExhausted,
                GameEvent::PlayerDamaged { remaining: 4 }
            ]
        );
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_full_bus_drops() {
        let bus = EventBus::new(1);
        bus.publish(GameEvent::PlayerDied);
        bus.publish(GameEvent::GameRestarted);
        assert_eq!(bus.drain(), vec![GameEvent::PlayerDied]);
    }
}
