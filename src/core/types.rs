//! Strongly-typed wrappers for names
//!
//! Card names and player names are both free text coming from users or the
//! card database; wrapping them keeps the two from being mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Card name as printed (e.g. "Lightning Bolt")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardName(String);

impl CardName {
    pub fn new(s: impl Into<String>) -> Self {
        CardName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lookup key: ASCII-folded, lowercased, whitespace collapsed
    ///
    /// "Lim-Dûl's Vault" and "lim-dul's  vault" share a key.
    pub fn lookup_key(&self) -> String {
        normalize_card_name(&self.0)
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CardName {
    fn from(s: String) -> Self {
        CardName(s)
    }
}

impl From<&str> for CardName {
    fn from(s: &str) -> Self {
        CardName(s.to_string())
    }
}

/// Display name a player chose when creating or joining a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(s: impl Into<String>) -> Self {
        PlayerName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PlayerName {
    fn from(s: String) -> Self {
        PlayerName(s)
    }
}

impl From<&str> for PlayerName {
    fn from(s: &str) -> Self {
        PlayerName(s.to_string())
    }
}

pub fn normalize_card_name(name: &str) -> String {
    deunicode::deunicode(name)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_name() {
        let name = CardName::new("Lightning Bolt");
        assert_eq!(name.as_str(), "Lightning Bolt");
        assert_eq!(name.to_string(), "Lightning Bolt");
    }

    #[test]
    fn test_lookup_key_folds_accents_and_spacing() {
        let a = CardName::new("Lim-Dûl's Vault");
        let b = CardName::new("lim-dul's   vault");
        assert_eq!(a.lookup_key(), b.lookup_key());
        assert_eq!(a.lookup_key(), "lim-dul's vault");
    }

    #[test]
    fn test_player_name() {
        let name = PlayerName::new("Alice");
        assert_eq!(name.as_str(), "Alice");
    }
}
