//! # Station Actions
//!
//! What the station menu can do while docked. Each action returns a
//! [`StationOutcome`] carrying the message shown to the player; rejected
//! actions leave the state untouched and are not saved.

use drifter_economy::{market, EconomyError, UpgradeOffer};

use crate::error::DrifterResult;
use crate::game_loop::GameLoop;

/// Message shown when the hold is empty.
pub const NOTHING_TO_SELL: &str = "Cargo empty. Nothing to sell.";
/// Message shown when an upgrade is too expensive.
pub const INSUFFICIENT_CREDITS: &str = "Insufficient Credits.";
/// Message shown when leaving the station.
pub const UNDOCK_MESSAGE: &str = "Undocking... Good luck out there, Drifter.";

/// Result of a station action, as shown to the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StationOutcome {
    /// True if the action changed the state.
    pub accepted: bool,
    /// Player-facing message.
    pub message: String,
}

impl StationOutcome {
    fn accepted(message: impl Into<String>) -> Self {
        Self {
            accepted: true,
            message: message.into(),
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        Self {
            accepted: false,
            message: message.into(),
        }
    }
}

impl GameLoop {
    /// Sells the whole hold.
    ///
    /// # Errors
    ///
    /// [`NotDocked`](crate::DrifterError::NotDocked) in flight,
    /// [`AlreadyShutDown`](crate::DrifterError::AlreadyShutDown) after
    /// teardown.
    pub fn sell_all(&mut self) -> DrifterResult<StationOutcome> {
        let (state, economy) = self.station_access()?;
        let outcome = match market::sell_all(state, economy) {
            Ok(receipt) => StationOutcome::accepted(format!("Sold resources for {} credits.", receipt.total)),
            Err(EconomyError::NothingToSell) => StationOutcome::rejected(NOTHING_TO_SELL),
            Err(e) => return Err(e.into()),
        };
        self.finish(&outcome);
        Ok(outcome)
    }

    /// Buys the next level of upgrade `id`.
    ///
    /// # Errors
    ///
    /// As [`sell_all`](Self::sell_all), plus
    /// [`EconomyError::UnknownUpgrade`] for an id with no definition.
    pub fn purchase_upgrade(&mut self, id: &str) -> DrifterResult<StationOutcome> {
        let (state, economy) = self.station_access()?;
        let outcome = match market::purchase_upgrade(state, economy, id) {
            Ok(receipt) => StationOutcome::accepted(format!("Upgraded {} to Level {}.", receipt.name, receipt.new_level)),
            Err(EconomyError::InsufficientCredits { .. }) => StationOutcome::rejected(INSUFFICIENT_CREDITS),
            Err(e) => return Err(e.into()),
        };
        self.finish(&outcome);
        Ok(outcome)
    }

    /// Leaves the station and resumes flight.
    ///
    /// # Errors
    ///
    /// As [`sell_all`](Self::sell_all).
    pub fn undock(&mut self) -> DrifterResult<StationOutcome> {
        self.station_access()?;
        self.leave_station();
        let outcome = StationOutcome::accepted(UNDOCK_MESSAGE);
        self.post_notice(&outcome.message);
        Ok(outcome)
    }

    /// The upgrade catalogue with current levels and prices.
    #[must_use]
    pub fn upgrade_catalogue(&self) -> Vec<UpgradeOffer> {
        market::upgrade_catalogue(self.state(), self.economy())
    }

    fn finish(&mut self, outcome: &StationOutcome) {
        if outcome.accepted {
            self.commit_state();
        }
        self.post_notice(&outcome.message);
    }
}
