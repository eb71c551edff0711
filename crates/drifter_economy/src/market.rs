//! # Market Rules
//!
//! State transitions triggered by station actions and cargo pickup.
//!
//! Every function here either applies its full effect or returns an error
//! with the state left exactly as it was. Saving and notifying the player is
//! the caller's job.

use std::collections::BTreeMap;

use drifter_core::ResourceKind;
use tracing::info;

use crate::config::EconomyConfig;
use crate::error::{EconomyError, EconomyResult};
use crate::state::GameState;
use crate::upgrades::{apply_upgrades, compute_upgrade_cost};

/// Outcome of a successful sale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaleReceipt {
    /// Credits earned.
    pub total: u64,
    /// Units sold per kind (kinds with zero units omitted).
    pub sold: BTreeMap<ResourceKind, u32>,
}

/// Outcome of a successful upgrade purchase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpgradeReceipt {
    /// Upgrade id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Level after the purchase.
    pub new_level: u32,
    /// Credits paid.
    pub cost: u64,
}

/// One row of the station's upgrade catalogue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpgradeOffer {
    /// Upgrade id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display description.
    pub description: String,
    /// Level currently owned.
    pub level: u32,
    /// Price of the next level.
    pub next_cost: u64,
    /// True if the player holds at least `next_cost` credits.
    pub affordable: bool,
}

/// Sells the entire hold at base value.
///
/// # Errors
///
/// Returns [`EconomyError::NothingToSell`] when the hold is worth zero
/// credits. Nothing is changed in that case.
pub fn sell_all(state: &mut GameState, config: &EconomyConfig) -> EconomyResult<SaleReceipt> {
    let mut total = 0u64;
    let mut sold = BTreeMap::new();
    for (&kind, &count) in &state.inventory.resources {
        if count == 0 {
            continue;
        }
        total = total.saturating_add(u64::from(count) * u64::from(config.unit_value(kind)));
        sold.insert(kind, count);
    }

    if total == 0 {
        return Err(EconomyError::NothingToSell);
    }

    state.inventory.credits = state.inventory.credits.saturating_add(total);
    state.inventory.clear_resources();
    info!(total, credits = state.inventory.credits, "sold cargo");
    Ok(SaleReceipt { total, sold })
}

/// Buys the next level of upgrade `id`.
///
/// On success the cost is debited, the level rises by one, every stat is
/// re-derived from base and the hull is fully repaired.
///
/// # Errors
///
/// - [`EconomyError::UnknownUpgrade`] if `id` has no definition
/// - [`EconomyError::InsufficientCredits`] if the player cannot pay
pub fn purchase_upgrade(state: &mut GameState, config: &EconomyConfig, id: &str) -> EconomyResult<UpgradeReceipt> {
    let def = config.upgrade(id)?;
    let cost = compute_upgrade_cost(def, state.upgrades.level(id));
    let available = state.inventory.credits;
    if available < cost {
        return Err(EconomyError::InsufficientCredits {
            required: cost,
            available,
        });
    }

    state.inventory.credits = available - cost;
    let new_level = state.upgrades.increment(id);
    state.player = apply_upgrades(&config.base_stats, &state.upgrades, &config.upgrades);

    info!(upgrade = id, level = new_level, cost, "purchased upgrade");
    Ok(UpgradeReceipt {
        id: def.id.clone(),
        name: def.name.clone(),
        new_level,
        cost,
    })
}

/// Restores the hull to maximum.
pub fn dock_repair(state: &mut GameState) {
    state.player.heal();
}

/// Stows one unit of `kind` if the hold has room.
///
/// Returns `false` (and changes nothing) when the hold is full.
pub fn try_stow(state: &mut GameState, kind: ResourceKind) -> bool {
    if !state.has_cargo_space() {
        return false;
    }
    state.inventory.add(kind, 1);
    true
}

/// The upgrade catalogue in display order.
#[must_use]
pub fn upgrade_catalogue(state: &GameState, config: &EconomyConfig) -> Vec<UpgradeOffer> {
    config
        .upgrades
        .iter()
        .map(|def| {
            let level = state.upgrades.level(&def.id);
            let next_cost = compute_upgrade_cost(def, level);
            UpgradeOffer {
                id: def.id.clone(),
                name: def.name.clone(),
                description: def.description.clone(),
                level,
                next_cost,
                affordable: state.inventory.credits >= next_cost,
            }
        })
        .collect()
}
