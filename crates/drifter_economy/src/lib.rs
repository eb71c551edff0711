//! # Aether Drifter Economy System
//!
//! The persistent half of the game: what the player owns and what it costs.
//!
//! ## Design Principles
//!
//! 1. **Re-derivation** - Ship stats are always recomputed from base stats and
//!    upgrade levels, never compounded on a previous result
//! 2. **Unchanged on failure** - A rejected sale or purchase leaves the state
//!    exactly as it was
//! 3. **External configuration** - All balance data can come from TOML
//! 4. **Forgiving saves** - Loads merge onto a fresh default state, so old
//!    saves pick up new fields and corrupt saves fall back to a new game
//!
//! ## Example
//!
//! ```rust
//! use drifter_core::ResourceKind;
//! use drifter_economy::{market, EconomyConfig, GameState};
//!
//! let config = EconomyConfig::default();
//! let mut state = GameState::new(&config);
//! state.inventory.add(ResourceKind::Iron, 3);
//!
//! let receipt = market::sell_all(&mut state, &config).unwrap();
//! assert_eq!(receipt.total, 15);
//! assert_eq!(state.inventory.credits, 15);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod market;
pub mod persistence;
pub mod state;
pub mod upgrades;

pub use config::{BaseStats, EconomyConfig, ResourceDef, StatKind, UpgradeDef};
pub use error::{EconomyError, EconomyResult, PersistenceError};
pub use market::{SaleReceipt, UpgradeOffer, UpgradeReceipt};
pub use persistence::{FileSaveStore, MemorySaveStore, SaveStore, SAVE_KEY};
pub use state::{GameState, Inventory, PlayerStats, UpgradeLevels};
pub use upgrades::{apply_upgrades, compute_upgrade_cost};
