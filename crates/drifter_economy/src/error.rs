//! # Economy Error Types
//!
//! All errors that can occur in the economy system.

use thiserror::Error;

/// Errors from market actions and configuration.
///
/// None of these are fatal. Market errors become a notice for the player
/// and leave the game state untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EconomyError {
    /// Not enough credits for a purchase.
    #[error("insufficient credits: need {required}, have {available}")]
    InsufficientCredits {
        /// The price.
        required: u64,
        /// Credits held.
        available: u64,
    },

    /// The cargo hold is worth nothing.
    #[error("nothing to sell")]
    NothingToSell,

    /// No upgrade definition has this id.
    #[error("unknown upgrade: {0}")]
    UnknownUpgrade(String),

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for economy operations.
pub type EconomyResult<T> = Result<T, EconomyError>;

/// Errors reading or writing a save document.
///
/// These never leave a [`SaveStore`](crate::SaveStore): the store logs them
/// and falls back to defaults (load) or drops the write (save).
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Save storage unavailable.
    #[error("save storage unavailable: {0}")]
    Io(#[from] std::io::Error),

    /// Payload is not a valid save document.
    #[error("corrupt save document: {0}")]
    Decode(#[from] toml::de::Error),

    /// State could not be written as a document.
    #[error("could not encode save document: {0}")]
    Encode(#[from] toml::ser::Error),

    /// Document root is not a table.
    #[error("save document root is not a table")]
    Shape,
}
