//! Items lying on the floor.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use stillwalk_common::{EntityId, SpawnKey};

use crate::config::PickupConfig;
use crate::physics::Hitbox;
use crate::player::Player;

/// What a pickup does when collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restores health in half hearts
    Heal(u8),
    /// Adds ammo
    Ammo(u32),
    /// Equips the weapon and grants starting ammo
    Weapon,
}

/// A collectable item. Placed items carry the key of their level-data
/// placement; drops from enemies have none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    id: EntityId,
    key: Option<SpawnKey>,
    kind: PickupKind,
    hitbox: Hitbox,
}

impl Pickup {
    /// Creates a pickup with its hitbox top-left at `position`.
    #[must_use]
    pub fn new(kind: PickupKind, position: Vec2, config: &PickupConfig) -> Self {
        Self {
            id: EntityId::new(),
            key: None,
            kind,
            hitbox: Hitbox::at(position, Vec2::new(config.width, config.height)),
        }
    }

    /// Tags the pickup with its level-data placement.
    #[must_use]
    pub fn with_key(mut self, key: SpawnKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Applies the payload to the player.
    pub fn apply(&self, player: &mut Player, config: &PickupConfig) {
        match self.kind {
            PickupKind::Heal(amount) => {
                player.heal(amount);
            },
            PickupKind::Ammo(amount) => {
                player.grant_ammo(amount);
            },
            PickupKind::Weapon => {
                player.equip_weapon();
                player.grant_ammo(config.weapon_ammo);
            },
        }
    }

    /// Transient entity id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Level-data placement, if any.
    #[must_use]
    pub const fn key(&self) -> Option<&SpawnKey> {
        self.key.as_ref()
    }

    /// Payload.
    #[must_use]
    pub const fn kind(&self) -> PickupKind {
        self.kind
    }

    /// Hitbox.
    #[must_use]
    pub const fn hitbox(&self) -> Hitbox {
        self.hitbox
    }

    /// Hitbox top-left.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.hitbox.position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weapon_pickup_equips_and_grants_ammo() {
        let config = PickupConfig::default();
        let mut player = Player::default();
        Pickup::new(PickupKind::Weapon, Vec2::ZERO, &config).apply(&mut player, &config);
        assert!(player.has_weapon());
        assert_eq!(player.ammo(), 5);
    }

    #[test]
    fn test_heal_pickup_is_capped() {
        let config = PickupConfig::default();
        let mut player = Player::default();
        player.set_health(5);
        let heart = Pickup::new(PickupKind::Heal(config.heal_amount), Vec2::ZERO, &config);
        heart.apply(&mut player, &config);
        heart.apply(&mut player, &config);
        assert_eq!(player.health(), 6);
    }

    #[test]
    fn test_pickup_hitbox() {
        let config = PickupConfig::default();
        let ammo = Pickup::new(PickupKind::Ammo(3), Vec2::new(230.0, 290.0), &config);
        assert_eq!(ammo.hitbox(), Hitbox::new(230.0, 290.0, 20.0, 20.0));
        assert!(ammo.key().is_none());
    }
}
