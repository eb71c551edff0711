//! Minable resource kinds.
//!
//! The kind is the stable identifier used as a key by the economy tables
//! and the save document (`IRON`, `TITANIUM`, `GOLD`, `AETHERIUM`).

use serde::{Deserialize, Serialize};

/// A minable resource type, ordered from most to least common.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResourceKind {
    /// Ferrite ore, available everywhere.
    Iron,
    /// Requires tier 1 space.
    Titanium,
    /// Requires tier 2 space.
    Gold,
    /// Requires tier 3 space.
    Aetherium,
}

impl ResourceKind {
    /// Every kind, in table order.
    pub const ALL: [Self; 4] = [Self::Iron, Self::Titanium, Self::Gold, Self::Aetherium];

    /// The stable string key (`"IRON"` etc.).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Iron => "IRON",
            Self::Titanium => "TITANIUM",
            Self::Gold => "GOLD",
            Self::Aetherium => "AETHERIUM",
        }
    }

    /// Parses a stable string key. Returns `None` for unknown keys.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_roundtrip() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(ResourceKind::from_key("UNOBTAINIUM"), None);
    }

    #[test]
    fn test_ordering_follows_rarity() {
        assert!(ResourceKind::Iron < ResourceKind::Titanium);
        assert!(ResourceKind::Gold < ResourceKind::Aetherium);
    }
}
