//! Per-tick overlap resolution.
//!
//! Runs after every entity has moved. Order:
//! 1. player vs enemies (damage)
//! 2. projectiles vs enemies (kill, loot drop)
//! 3. player vs pickups
//! 4. player vs doors
//!
//! Anything resolved is removed on the spot so it cannot resolve again in
//! the same tick.

use tracing::debug;

use crate::config::GameplayConfig;
use crate::events::{EventBus, GameEvent};
use crate::pickup::{Pickup, PickupKind};
use crate::player::{DamageOutcome, Player};
use crate::room::{ActiveRoom, Door, Session};

/// Resolves all overlaps in the active room.
///
/// Returns the door to walk through, if any. Only the first door in declared
/// order is reported.
pub fn resolve_overlaps(
    room: &mut ActiveRoom,
    player: &mut Player,
    session: &mut Session,
    config: &GameplayConfig,
    events: &EventBus,
) -> Option<Door> {
    resolve_enemy_contact(room, player, events);
    resolve_projectile_hits(room, session, config, events);

    if player.is_dead() {
        return None;
    }

    resolve_pickups(room, player, session, config, events);
    room.door_hit(&player.hitbox()).cloned()
}

fn resolve_enemy_contact(room: &ActiveRoom, player: &mut Player, events: &EventBus) {
    let hitbox = player.hitbox();
    if !room.enemies.iter().any(|enemy| enemy.hitbox().overlaps(&hitbox)) {
        return;
    }

    match player.take_damage() {
        DamageOutcome::Ignored => {},
        DamageOutcome::Hurt { remaining } => {
            events.publish(GameEvent::PlayerDamaged { remaining });
        },
        DamageOutcome::Died => {
            events.publish(GameEvent::PlayerDamaged { remaining: 0 });
            events.publish(GameEvent::PlayerDied);
        },
    }
}

fn resolve_projectile_hits(
    room: &mut ActiveRoom,
    session: &mut Session,
    config: &GameplayConfig,
    events: &EventBus,
) {
    let mut i = 0;
    while i < room.projectiles.len() {
        let bounds = room.projectiles[i].bounds();
        let Some(target) = room
            .enemies
            .iter()
            .position(|enemy| enemy.hitbox().overlaps(&bounds))
        else {
            i += 1;
            continue;
        };

        room.projectiles.remove(i);
        let enemy = room.enemies.remove(target);
        debug!("Enemy {} destroyed", enemy.key());
        session.mark_dead(enemy.key().clone());
        events.publish(GameEvent::EnemyKilled {
            key: enemy.key().clone(),
            position: enemy.position(),
        });

        let drop = Pickup::new(
            PickupKind::Heal(config.pickup.heal_amount),
            enemy.position(),
            &config.pickup,
        );
        events.publish(GameEvent::PickupSpawned {
            entity_id: drop.id(),
            kind: drop.kind(),
            position: drop.position(),
        });
        room.pickups.push(drop);
    }
}

fn resolve_pickups(
    room: &mut ActiveRoom,
    player: &mut Player,
    session: &mut Session,
    config: &GameplayConfig,
    events: &EventBus,
) {
    let hitbox = player.hitbox();
    room.pickups.retain(|pickup| {
        if !pickup.hitbox().overlaps(&hitbox) {
            return true;
        }
        pickup.apply(player, &config.pickup);
        if let Some(key) = pickup.key() {
            session.mark_collected(key.clone());
        }
        events.publish(GameEvent::PickupCollected {
            entity_id: pickup.id(),
            kind: pickup.kind(),
        });
        false
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::Enemy;
    use crate::input::Direction;
    use crate::projectile::Projectile;
    use glam::Vec2;
    use stillwalk_common::{CanvasSize, RoomId, SpawnKey};

    fn room_with_enemy_at(x: f32, y: f32) -> (ActiveRoom, GameplayConfig) {
        let config = GameplayConfig::default();
        let mut room = ActiveRoom::empty(RoomId::new("HALLSPAWN"));
        room.enemies.push(Enemy::new(
            SpawnKey::new(RoomId::new("HALLSPAWN"), 0),
            Vec2::new(x, y),
            &config,
        ));
        (room, config)
    }

    #[test]
    fn test_contact_damage_once_per_tick() {
        let (mut room, config) = room_with_enemy_at(100.0, 100.0);
        room.enemies.push(Enemy::new(
            SpawnKey::new(RoomId::new("HALLSPAWN"), 1),
            Vec2::new(110.0, 110.0),
            &config,
        ));
        let mut player = Player::default();
        player.set_position(Vec2::new(100.0, 90.0));
        let bus = EventBus::default();

        resolve_overlaps(&mut room, &mut player, &mut Session::new(), &config, &bus);
        assert_eq!(player.health(), 4);
        assert_eq!(bus.drain(), vec![GameEvent::PlayerDamaged { remaining: 4 }]);

        // Invincible on the next tick
        resolve_overlaps(&mut room, &mut player, &mut Session::new(), &config, &bus);
        assert_eq!(player.health(), 4);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_lethal_contact() {
        let (mut room, config) = room_with_enemy_at(100.0, 100.0);
        let mut player = Player::default();
        player.set_position(Vec2::new(100.0, 90.0));
        player.set_health(2);
        let bus = EventBus::default();

        let door = resolve_overlaps(&mut room, &mut player, &mut Session::new(), &config, &bus);
        assert!(door.is_none());
        assert_eq!(player.health(), 0);
        assert!(bus.drain().contains(&GameEvent::PlayerDied));
    }

    #[test]
    fn test_projectile_kills_enemy_and_drops_heart() {
        let (mut room, config) = room_with_enemy_at(230.0, 290.0);
        let mut shot = Projectile::new(Vec2::new(200.0, 300.0), Direction::Right, &config.projectile);
        let mut session = Session::new();
        let mut player = Player::default();
        let bus = EventBus::default();

        let mut ticks = 0;
        while !room.enemies.is_empty() && ticks < 4 {
            assert!(shot.advance(CanvasSize::default()));
            room.projectiles = vec![shot.clone()];
            resolve_overlaps(&mut room, &mut player, &mut session, &config, &bus);
            ticks += 1;
        }

        assert_eq!(ticks, 4);
        assert!(room.enemies.is_empty());
        assert!(room.projectiles.is_empty());
        assert!(session.is_dead(&SpawnKey::new(RoomId::new("HALLSPAWN"), 0)));
        assert_eq!(room.pickups.len(), 1);
        assert_eq!(room.pickups[0].position(), Vec2::new(230.0, 290.0));
        assert_eq!(room.pickups[0].kind(), PickupKind::Heal(1));

        let events = bus.drain();
        assert!(matches!(events[0], GameEvent::EnemyKilled { .. }));
        assert!(matches!(events[1], GameEvent::PickupSpawned { .. }));
    }

    #[test]
    fn test_one_projectile_one_kill() {
        let (mut room, config) = room_with_enemy_at(100.0, 100.0);
        room.enemies.push(Enemy::new(
            SpawnKey::new(RoomId::new("HALLSPAWN"), 1),
            Vec2::new(100.0, 100.0),
            &config,
        ));
        room.projectiles
            .push(Projectile::new(Vec2::new(120.0, 110.0), Direction::Up, &config.projectile));

        let mut session = Session::new();
        resolve_overlaps(
            &mut room,
            &mut Player::default(),
            &mut session,
            &config,
            &EventBus::default(),
        );
        assert_eq!(room.enemies.len(), 1);
        assert_eq!(session.kills(), 1);
        assert!(session.is_dead(&SpawnKey::new(RoomId::new("HALLSPAWN"), 0)));
    }

    #[test]
    fn test_pickup_collected_and_recorded() {
        let config = GameplayConfig::default();
        let mut room = ActiveRoom::empty(RoomId::new("HALLSPAWN"));
        let key = SpawnKey::new(RoomId::new("HALLSPAWN"), 3);
        room.pickups.push(
            Pickup::new(PickupKind::Weapon, Vec2::new(380.0, 410.0), &config.pickup)
                .with_key(key.clone()),
        );
        room.pickups
            .push(Pickup::new(PickupKind::Ammo(2), Vec2::new(10.0, 10.0), &config.pickup));

        let mut player = Player::default();
        let mut session = Session::new();
        resolve_overlaps(&mut room, &mut player, &mut session, &config, &EventBus::default());

        assert!(player.has_weapon());
        assert_eq!(player.ammo(), 5);
        assert!(session.is_collected(&key));
        assert_eq!(room.pickups.len(), 1);
        assert_eq!(room.pickups[0].kind(), PickupKind::Ammo(2));
    }
}
