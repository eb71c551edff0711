//! Game config file.
//!
//! ```toml
//! save_path = "saves/pilot.toml"
//!
//! [game_loop]
//! world_seed = 42
//! autosave_interval_secs = 5.0
//!
//! [simulation]
//! friction = 0.97
//!
//! [economy.base_stats]
//! cargo_size = 30
//! ```
//!
//! Every section is optional; missing values take their defaults.

use std::path::{Path, PathBuf};

use drifter_economy::EconomyConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{DrifterError, DrifterResult};
use crate::game_loop::GameLoopConfig;
use crate::simulation::SimConfig;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrifterConfig {
    /// Resource and upgrade tables, base stats.
    pub economy: EconomyConfig,
    /// Physics and effect tuning.
    pub simulation: SimConfig,
    /// Loop driver settings.
    pub game_loop: GameLoopConfig,
    /// Save file location. `None` uses the default path.
    pub save_path: Option<PathBuf>,
}

impl DrifterConfig {
    /// Parses a TOML document and validates the economy tables.
    ///
    /// # Errors
    ///
    /// [`DrifterError::Config`] for malformed TOML, [`DrifterError::Economy`]
    /// if the economy tables fail validation.
    pub fn from_toml_str(text: &str) -> DrifterResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| DrifterError::Config(e.to_string()))?;
        config.economy.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// [`DrifterError::Config`] if the file cannot be read or parsed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> DrifterResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| DrifterError::Config(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), "loaded game config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drifter_economy::EconomyError;

    #[test]
    fn test_empty_document_is_default() {
        let config = DrifterConfig::from_toml_str("").unwrap();
        assert_eq!(config, DrifterConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = DrifterConfig::from_toml_str(
            r#"
            save_path = "pilot.toml"

            [game_loop]
            world_seed = 42

            [simulation]
            friction = 0.97

            [economy.base_stats]
            cargo_size = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.save_path, Some(PathBuf::from("pilot.toml")));
        assert_eq!(config.game_loop.world_seed, 42);
        assert_eq!(config.game_loop.target_fps, 60);
        assert!((config.simulation.friction - 0.97).abs() < 1e-6);
        assert_eq!(config.simulation.max_drops, 3);
        assert_eq!(config.economy.base_stats.cargo_size, 30);
        assert_eq!(config.economy.upgrades.len(), 4);
    }

    #[test]
    fn test_malformed_toml() {
        let err = DrifterConfig::from_toml_str("[game_loop\nworld_seed = ").unwrap_err();
        assert!(matches!(err, DrifterError::Config(_)));
    }

    #[test]
    fn test_invalid_economy_rejected() {
        let err = DrifterConfig::from_toml_str(
            r#"
            [[economy.upgrades]]
            id = "hull"
            name = "Hull"
            description = ""
            base_cost = 50
            cost_multiplier = 0.5
            value_multiplier = 25.0
            stat = "max_hull"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, DrifterError::Economy(EconomyError::InvalidConfig(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DrifterConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, DrifterError::Config(_)));
    }
}
