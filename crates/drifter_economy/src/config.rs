//! # Economy Configuration
//!
//! Resource values, upgrade curves and base ship stats.
//!
//! The built-in tables are returned by [`EconomyConfig::default`]. A TOML
//! file may replace any section:
//!
//! ```toml
//! [base_stats]
//! max_hull = 120.0
//!
//! [[resources]]
//! kind = "IRON"
//! name = "Ferrite"
//! base_value = 6
//! color = 0x9CA3AF
//! rarity = 0.8
//! ```
//!
//! Missing sections keep their defaults. A section that is present replaces
//! the default table as a whole, and [`EconomyConfig::validate`] then checks
//! that every resource kind is still priced.

use std::path::Path;

use drifter_core::{Color, ResourceKind};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{EconomyError, EconomyResult};

/// Display and sale data for one resource kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceDef {
    /// The resource this row describes.
    pub kind: ResourceKind,
    /// Display name.
    pub name: String,
    /// Credits paid per unit.
    pub base_value: u32,
    /// Display colour of drops and HUD entries.
    pub color: Color,
    /// Nominal rarity, informational only.
    pub rarity: f32,
}

/// Which ship stat an upgrade raises.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    /// Maximum hull.
    MaxHull,
    /// Cargo capacity.
    CargoSize,
    /// Laser damage per tick.
    LaserPower,
    /// Laser reach.
    LaserRange,
    /// Thrust per tick.
    EngineSpeed,
    /// Turn rate per tick.
    TurnSpeed,
}

/// One purchasable upgrade track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpgradeDef {
    /// Stable identifier (`"hull"`, `"cargo"`, ...).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Price of the first level.
    pub base_cost: u64,
    /// Price growth per level already owned.
    pub cost_multiplier: f64,
    /// Stat gained per level.
    pub value_multiplier: f32,
    /// Stat raised by this upgrade.
    pub stat: StatKind,
}

/// Ship stats before any upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseStats {
    /// Maximum hull.
    pub max_hull: f32,
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

impl Default for BaseStats {
    fn default() -> Self {
        Self {
            max_hull: 100.0,
            cargo_size: 20,
            laser_power: 10.0,
            laser_range: 300.0,
            engine_speed: 0.15,
            turn_speed: 0.05,
        }
    }
}

/// The full set of economy tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Ship stats before upgrades.
    pub base_stats: BaseStats,
    /// One row per resource kind.
    pub resources: Vec<ResourceDef>,
    /// Upgrade tracks, in display order.
    pub upgrades: Vec<UpgradeDef>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        let resource = |kind, name: &str, base_value, color, rarity| ResourceDef {
            kind,
            name: name.to_owned(),
            base_value,
            color: Color::hex(color),
            rarity,
        };
        let upgrade = |id: &str, name: &str, description: &str, base_cost, cost_multiplier, value_multiplier, stat| {
            UpgradeDef {
                id: id.to_owned(),
                name: name.to_owned(),
                description: description.to_owned(),
                base_cost,
                cost_multiplier,
                value_multiplier,
                stat,
            }
        };

        Self {
            base_stats: BaseStats::default(),
            resources: vec![
                resource(ResourceKind::Iron, "Ferrite", 5, 0x9C_A3AF, 0.8),
                resource(ResourceKind::Titanium, "Titanium", 15, 0x60_A5FA, 0.15),
                resource(ResourceKind::Gold, "Aurum", 40, 0xFA_CC15, 0.04),
                resource(ResourceKind::Aetherium, "Aetherium", 100, 0xD9_46EF, 0.01),
            ],
            upgrades: vec![
                upgrade(
                    "hull",
                    "Hull Reinforcement",
                    "Increases maximum hull integrity.",
                    50,
                    1.5,
                    25.0,
                    StatKind::MaxHull,
                ),
                upgrade(
                    "cargo",
                    "Cargo Bay Expansion",
                    "Increases resource storage capacity.",
                    100,
                    1.6,
                    10.0,
                    StatKind::CargoSize,
                ),
                upgrade(
                    "laser_p",
                    "Laser Intensity",
                    "Increases mining speed.",
                    75,
                    1.7,
                    5.0,
                    StatKind::LaserPower,
                ),
                upgrade(
                    "engine",
                    "Thruster Output",
                    "Increases max speed and acceleration.",
                    80,
                    1.4,
                    0.02,
                    StatKind::EngineSpeed,
                ),
            ],
        }
    }
}

impl EconomyConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::InvalidConfig`] on malformed TOML or a table
    /// that fails [`validate`](Self::validate).
    pub fn from_toml_str(text: &str) -> EconomyResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| EconomyError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::InvalidConfig`] if the file cannot be read or
    /// its contents are invalid.
    pub fn from_toml_file(path: impl AsRef<Path>) -> EconomyResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| EconomyError::InvalidConfig(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), upgrades = config.upgrades.len(), "loaded economy config");
        Ok(config)
    }

    /// Checks the tables for values the rules cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::InvalidConfig`] when a resource kind has no
    /// (or more than one) definition, an upgrade id repeats, a base cost is
    /// zero, or a cost multiplier is below 1.
    pub fn validate(&self) -> EconomyResult<()> {
        for kind in ResourceKind::ALL {
            let rows = self.resources.iter().filter(|r| r.kind == kind).count();
            if rows != 1 {
                return Err(EconomyError::InvalidConfig(format!(
                    "resource {kind} must be defined exactly once, found {rows}"
                )));
            }
        }

        for (index, upgrade) in self.upgrades.iter().enumerate() {
            if self.upgrades[..index].iter().any(|u| u.id == upgrade.id) {
                return Err(EconomyError::InvalidConfig(format!("duplicate upgrade id {}", upgrade.id)));
            }
            if upgrade.base_cost == 0 {
                return Err(EconomyError::InvalidConfig(format!("upgrade {} has zero base cost", upgrade.id)));
            }
            if !(upgrade.cost_multiplier >= 1.0 && upgrade.cost_multiplier.is_finite()) {
                return Err(EconomyError::InvalidConfig(format!(
                    "upgrade {} cost multiplier {} is below 1",
                    upgrade.id, upgrade.cost_multiplier
                )));
            }
        }
        Ok(())
    }

    /// Looks up a resource definition.
    #[must_use]
    pub fn resource(&self, kind: ResourceKind) -> Option<&ResourceDef> {
        self.resources.iter().find(|r| r.kind == kind)
    }

    /// Sale value of one unit of `kind` (zero if unpriced).
    #[must_use]
    pub fn unit_value(&self, kind: ResourceKind) -> u32 {
        self.resource(kind).map_or(0, |r| r.base_value)
    }

    /// Display colour of `kind`.
    #[must_use]
    pub fn color(&self, kind: ResourceKind) -> Color {
        self.resource(kind).map_or_else(Color::default, |r| r.color)
    }

    /// Looks up an upgrade definition by id.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::UnknownUpgrade`] for an id with no definition.
    pub fn upgrade(&self, id: &str) -> EconomyResult<&UpgradeDef> {
        self.upgrades
            .iter()
            .find(|u| u.id == id)
            .ok_or_else(|| EconomyError::UnknownUpgrade(id.to_owned()))
    }
}
