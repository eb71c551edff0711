//! # Game Error Types

use drifter_economy::EconomyError;
use thiserror::Error;

/// Errors surfaced by the loop driver and the station.
///
/// Player-facing rejections (no credits, empty hold) are not errors here:
/// they come back as rejected [`StationOutcome`](crate::StationOutcome)s.
#[derive(Error, Debug)]
pub enum DrifterError {
    /// The game config file could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// An economy rule rejected a request the UI should never make.
    #[error(transparent)]
    Economy(#[from] EconomyError),

    /// A station action was requested while in flight.
    #[error("not docked at the station")]
    NotDocked,

    /// The loop has been shut down.
    #[error("game loop already shut down")]
    AlreadyShutDown,

    /// The save writer thread could not be started.
    #[error("failed to start save writer: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for loop and station operations.
pub type DrifterResult<T> = Result<T, DrifterError>;
