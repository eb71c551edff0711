//! # Save Persistence
//!
//! Best-effort storage of [`GameState`] as a TOML document.
//!
//! ## Contract
//!
//! - `load` never fails: a missing, unreadable or corrupt save yields the
//!   defaults passed in.
//! - `save` never fails: errors are logged and the write is dropped.
//! - Loading merges the stored document onto the defaults table by table,
//!   so saves written before a field existed pick up its default value and
//!   unrelated stored fields survive.
//!
//! ## Durability
//!
//! [`FileSaveStore`] writes a sibling temporary file and renames it over the
//! save, so a crash mid-write leaves the previous save intact. Writers are
//! serialised by a mutex.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::error::PersistenceError;
use crate::state::GameState;

/// Storage key (and default file stem) of the save.
pub const SAVE_KEY: &str = "aether_drifter_save_v1";

/// A place game state is saved to and loaded from.
pub trait SaveStore: Send + Sync {
    /// Loads the saved state merged onto `defaults`, or `defaults` itself if
    /// there is no usable save.
    fn load(&self, defaults: &GameState) -> GameState;

    /// Saves `state`. Failures are logged, never returned.
    fn save(&self, state: &GameState);
}

/// Serialises a state as a TOML document.
///
/// # Errors
///
/// Returns [`PersistenceError::Encode`] if the state has no TOML form.
pub fn encode_save(state: &GameState) -> Result<String, PersistenceError> {
    Ok(toml::to_string(state)?)
}

/// Parses a TOML document and merges it onto `defaults`.
///
/// # Errors
///
/// - [`PersistenceError::Decode`] if the text is not TOML or the merged
///   document does not describe a game state
/// - [`PersistenceError::Encode`] / [`PersistenceError::Shape`] if the
///   defaults cannot be turned into a table
pub fn decode_save(text: &str, defaults: &GameState) -> Result<GameState, PersistenceError> {
    let stored: toml::Table = toml::from_str(text)?;
    let toml::Value::Table(mut merged) = toml::Value::try_from(defaults)? else {
        return Err(PersistenceError::Shape);
    };
    merge_tables(&mut merged, stored);
    Ok(toml::Value::Table(merged).try_into()?)
}

/// Overlays `overlay` onto `base`, recursing into tables present on both
/// sides. Any other stored value replaces the default.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(nested)) => merge_tables(existing, nested),
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Save file on disk.
#[derive(Debug)]
pub struct FileSaveStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSaveStore {
    /// Creates a store backed by `path`. The file need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the save file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Default file name in the working directory.
    #[must_use]
    pub fn default_path() -> PathBuf {
        PathBuf::from(format!("{SAVE_KEY}.toml"))
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Loads the save, distinguishing "no save" (`Ok(None)`) from failures.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the file exists but cannot be read or
    /// decoded.
    pub fn try_load(&self, defaults: &GameState) -> Result<Option<GameState>, PersistenceError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        decode_save(&text, defaults).map(Some)
    }

    /// Writes the save atomically.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if encoding or any filesystem step
    /// fails. The previous save is left in place.
    pub fn try_save(&self, state: &GameState) -> Result<(), PersistenceError> {
        let text = encode_save(state)?;
        let _guard = self.write_lock.lock();
        let temp = self.temp_path();
        std::fs::write(&temp, text)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

impl SaveStore for FileSaveStore {
    fn load(&self, defaults: &GameState) -> GameState {
        match self.try_load(defaults) {
            Ok(Some(state)) => {
                info!(path = %self.path.display(), credits = state.inventory.credits, "loaded save");
                state
            }
            Ok(None) => {
                info!(path = %self.path.display(), "no save found, starting a new game");
                defaults.clone()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to load save, starting a new game");
                defaults.clone()
            }
        }
    }

    fn save(&self, state: &GameState) {
        match self.try_save(state) {
            Ok(()) => debug!(path = %self.path.display(), "saved game"),
            Err(e) => error!(path = %self.path.display(), error = %e, "failed to save game"),
        }
    }
}

/// In-memory save slot.
#[derive(Debug, Default)]
pub struct MemorySaveStore {
    document: Mutex<Option<String>>,
    saves: Mutex<usize>,
}

impl MemorySaveStore {
    /// An empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot pre-filled with a raw document.
    #[must_use]
    pub fn with_document(text: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(text.into())),
            saves: Mutex::new(0),
        }
    }

    /// The stored document, if any.
    #[must_use]
    pub fn document(&self) -> Option<String> {
        self.document.lock().clone()
    }

    /// Number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        *self.saves.lock()
    }

    /// The stored state decoded onto `defaults`, if a save exists and decodes.
    #[must_use]
    pub fn saved_state(&self, defaults: &GameState) -> Option<GameState> {
        let text = self.document()?;
        decode_save(&text, defaults).ok()
    }
}

impl SaveStore for MemorySaveStore {
    fn load(&self, defaults: &GameState) -> GameState {
        let Some(text) = self.document() else {
            return defaults.clone();
        };
        decode_save(&text, defaults).unwrap_or_else(|e| {
            warn!(error = %e, "failed to load save, starting a new game");
            defaults.clone()
        })
    }

    fn save(&self, state: &GameState) {
        match encode_save(state) {
            Ok(text) => {
                *self.document.lock() = Some(text);
                *self.saves.lock() += 1;
            }
            Err(e) => error!(error = %e, "failed to save game"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EconomyConfig;
    use drifter_core::{ResourceKind, Vec2};

    fn defaults() -> GameState {
        GameState::new(&EconomyConfig::default())
    }

    #[test]
    fn test_encode_decode() {
        let mut state = defaults();
        state.inventory.credits = 321;
        state.inventory.add(ResourceKind::Gold, 4);
        state.upgrades.increment("engine");
        state.position = Vec2::new(-1500.5, 42.0);

        let text = encode_save(&state).unwrap();
        assert_eq!(decode_save(&text, &defaults()).unwrap(), state);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let text = r#"
            [player]
            max_hull = 150.0
            current_hull = 20.0

            [inventory]
            credits = 99
        "#;
        let state = decode_save(text, &defaults()).unwrap();
        assert_eq!(state.player.max_hull, 150.0);
        assert_eq!(state.player.current_hull, 20.0);
        assert_eq!(state.player.cargo_size, 20);
        assert_eq!(state.inventory.credits, 99);
        assert_eq!(state.inventory.resources.len(), 4);
        assert_eq!(state.upgrades.level("hull"), 0);
        assert_eq!(state.position, Vec2::ZERO);
    }

    #[test]
    fn test_merge_keeps_stored_extras() {
        let text = r#"
            [upgrades]
            hull = 3
            legacy_shield = 2
        "#;
        let state = decode_save(text, &defaults()).unwrap();
        assert_eq!(state.upgrades.level("hull"), 3);
        assert_eq!(state.upgrades.level("legacy_shield"), 2);
        assert_eq!(state.upgrades.level("cargo"), 0);
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        assert!(matches!(decode_save("{{{ not toml", &defaults()), Err(PersistenceError::Decode(_))));
        assert!(matches!(
            decode_save("[inventory]\ncredits = \"lots\"", &defaults()),
            Err(PersistenceError::Decode(_))
        ));
    }

    #[test]
    fn test_memory_store_falls_back_to_defaults() {
        let store = MemorySaveStore::with_document("garbage = [");
        assert_eq!(store.load(&defaults()), defaults());
        assert_eq!(MemorySaveStore::new().load(&defaults()), defaults());
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemorySaveStore::new();
        let mut state = defaults();
        state.inventory.credits = 5;
        store.save(&state);
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load(&defaults()), state);
        assert_eq!(store.saved_state(&defaults()), Some(state));
    }

    #[test]
    fn test_temp_path_is_a_sibling() {
        let store = FileSaveStore::new("saves/slot.toml");
        assert_eq!(store.temp_path(), PathBuf::from("saves/slot.toml.tmp"));
        assert_eq!(FileSaveStore::default_path(), PathBuf::from("aether_drifter_save_v1.toml"));
    }
}
