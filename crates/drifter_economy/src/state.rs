//! # Game State
//!
//! The unit of persistence: ship stats, inventory, upgrade levels and the
//! last known position. Transient world objects (asteroids, drops,
//! particles) are never part of it.
//!
//! ## Save Shape
//!
//! ```toml
//! [player]
//! max_hull = 100.0
//! current_hull = 100.0
//! # ...
//!
//! [inventory]
//! credits = 0
//!
//! [inventory.resources]
//! IRON = 0
//! TITANIUM = 0
//! GOLD = 0
//! AETHERIUM = 0
//!
//! [upgrades]
//! hull = 0
//!
//! [position]
//! x = 0.0
//! y = 0.0
//! ```

use std::collections::BTreeMap;

use drifter_core::{ResourceKind, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::{BaseStats, EconomyConfig};

/// Derived ship attributes.
///
/// `current_hull <= max_hull` is restored on docking and on every upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Maximum hull.
    pub max_hull: f32,
    /// Current hull.
    pub current_hull: f32,
    /// Cargo capacity, in resource units.
    pub cargo_size: u32,
    /// Laser damage per tick.
    pub laser_power: f32,
    /// Laser reach in world units.
    pub laser_range: f32,
    /// Thrust added per tick.
    pub engine_speed: f32,
    /// Radians turned per tick.
    pub turn_speed: f32,
}

impl PlayerStats {
    /// Stats straight from the base table, at full hull.
    #[must_use]
    pub fn from_base(base: &BaseStats) -> Self {
        Self {
            max_hull: base.max_hull,
            current_hull: base.max_hull,
            cargo_size: base.cargo_size,
            laser_power: base.laser_power,
            laser_range: base.laser_range,
            engine_speed: base.engine_speed,
            turn_speed: base.turn_speed,
        }
    }

    /// Restores the hull to its maximum.
    #[inline]
    pub fn heal(&mut self) {
        self.current_hull = self.max_hull;
    }
}

/// Credits and held resources.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Spendable credits.
    pub credits: u64,
    /// Units held per resource kind.
    #[serde(with = "resource_table")]
    pub resources: BTreeMap<ResourceKind, u32>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            credits: 0,
            resources: ResourceKind::ALL.into_iter().map(|kind| (kind, 0)).collect(),
        }
    }
}

impl Inventory {
    /// Units of `kind` held.
    #[inline]
    #[must_use]
    pub fn count(&self, kind: ResourceKind) -> u32 {
        self.resources.get(&kind).copied().unwrap_or(0)
    }

    /// Units held across all kinds.
    #[must_use]
    pub fn total_held(&self) -> u32 {
        self.resources.values().fold(0u32, |sum, n| sum.saturating_add(*n))
    }

    /// Adds `amount` units of `kind`, ignoring capacity.
    pub fn add(&mut self, kind: ResourceKind, amount: u32) {
        let slot = self.resources.entry(kind).or_insert(0);
        *slot = slot.saturating_add(amount);
    }

    /// Sets every counter to zero, keeping the keys.
    pub fn clear_resources(&mut self) {
        for count in self.resources.values_mut() {
            *count = 0;
        }
    }
}

/// Upgrade level per upgrade id. Levels only ever go up.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpgradeLevels(BTreeMap<String, u32>);

impl UpgradeLevels {
    /// Every id from `config` at level zero.
    #[must_use]
    pub fn zeroed(config: &EconomyConfig) -> Self {
        Self(config.upgrades.iter().map(|u| (u.id.clone(), 0)).collect())
    }

    /// Level of `id` (zero if never bought).
    #[inline]
    #[must_use]
    pub fn level(&self, id: &str) -> u32 {
        self.0.get(id).copied().unwrap_or(0)
    }

    /// Raises `id` by one level and returns the new level.
    pub fn increment(&mut self, id: &str) -> u32 {
        let level = self.0.entry(id.to_owned()).or_insert(0);
        *level = level.saturating_add(1);
        *level
    }

    /// Iterates `(id, level)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(id, level)| (id.as_str(), *level))
    }
}

impl<'a> FromIterator<(&'a str, u32)> for UpgradeLevels {
    fn from_iter<I: IntoIterator<Item = (&'a str, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(id, level)| (id.to_owned(), level)).collect())
    }
}

/// Everything that survives a restart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Ship stats.
    pub player: PlayerStats,
    /// Credits and cargo.
    pub inventory: Inventory,
    /// Upgrade levels.
    pub upgrades: UpgradeLevels,
    /// Last saved world position of the ship.
    pub position: Vec2,
}

impl GameState {
    /// A new game: base stats at full hull, no credits, empty hold, every
    /// upgrade at level zero, parked at the origin.
    #[must_use]
    pub fn new(config: &EconomyConfig) -> Self {
        Self {
            player: PlayerStats::from_base(&config.base_stats),
            inventory: Inventory::default(),
            upgrades: UpgradeLevels::zeroed(config),
            position: Vec2::ZERO,
        }
    }

    /// True if the hold has room for one more unit.
    #[inline]
    #[must_use]
    pub fn has_cargo_space(&self) -> bool {
        self.inventory.total_held() < self.player.cargo_size
    }
}

/// Resource counters as a string-keyed table (`IRON = 3`).
mod resource_table {
    use std::collections::BTreeMap;

    use drifter_core::ResourceKind;
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::warn;

    pub fn serialize<S: Serializer>(map: &BTreeMap<ResourceKind, u32>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(map.iter().map(|(kind, count)| (kind.key(), *count)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BTreeMap<ResourceKind, u32>, D::Error> {
        let raw = BTreeMap::<String, u32>::deserialize(deserializer)?;
        let mut map: BTreeMap<ResourceKind, u32> = ResourceKind::ALL.into_iter().map(|kind| (kind, 0)).collect();
        for (key, count) in raw {
            match ResourceKind::from_key(&key) {
                Some(kind) => {
                    map.insert(kind, count);
                }
                None => warn!(key = %key, count, "ignoring unknown resource in save"),
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let config = EconomyConfig::default();
        let state = GameState::new(&config);
        assert_eq!(state.player.current_hull, 100.0);
        assert_eq!(state.player.cargo_size, 20);
        assert_eq!(state.inventory.credits, 0);
        assert_eq!(state.inventory.total_held(), 0);
        assert_eq!(state.inventory.resources.len(), 4);
        assert_eq!(state.upgrades.iter().count(), 4);
        assert_eq!(state.upgrades.level("engine"), 0);
        assert_eq!(state.position, Vec2::ZERO);
    }

    #[test]
    fn test_inventory_counts() {
        let mut inv = Inventory::default();
        inv.add(ResourceKind::Iron, 3);
        inv.add(ResourceKind::Gold, 2);
        assert_eq!(inv.count(ResourceKind::Iron), 3);
        assert_eq!(inv.total_held(), 5);
        inv.clear_resources();
        assert_eq!(inv.total_held(), 0);
        assert_eq!(inv.resources.len(), 4);
    }

    #[test]
    fn test_cargo_space() {
        let mut state = GameState::new(&EconomyConfig::default());
        state.inventory.add(ResourceKind::Iron, 19);
        assert!(state.has_cargo_space());
        state.inventory.add(ResourceKind::Titanium, 1);
        assert!(!state.has_cargo_space());
    }

    #[test]
    fn test_upgrade_levels_increment() {
        let mut levels = UpgradeLevels::default();
        assert_eq!(levels.level("hull"), 0);
        assert_eq!(levels.increment("hull"), 1);
        assert_eq!(levels.increment("hull"), 2);
        assert_eq!(levels.level("hull"), 2);
    }

    #[test]
    fn test_resources_serialize_with_string_keys() {
        let mut inv = Inventory::default();
        inv.add(ResourceKind::Aetherium, 7);
        let text = toml::to_string(&inv).unwrap();
        assert!(text.contains("AETHERIUM = 7"), "{text}");

        let back: Inventory = toml::from_str(&text).unwrap();
        assert_eq!(back, inv);
    }

    #[test]
    fn test_unknown_resource_keys_are_ignored() {
        let inv: Inventory = toml::from_str(
            r#"
            credits = 12
            [resources]
            IRON = 2
            UNOBTAINIUM = 9
            "#,
        )
        .unwrap();
        assert_eq!(inv.credits, 12);
        assert_eq!(inv.count(ResourceKind::Iron), 2);
        assert_eq!(inv.count(ResourceKind::Gold), 0);
        assert_eq!(inv.total_held(), 2);
    }
}
