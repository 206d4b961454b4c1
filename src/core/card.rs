//! Card records
//!
//! A [`CardData`] is what the card database knows about a printed card. A
//! [`Card`] is one physical copy of it at the table: it gets its own
//! [`CardId`] plus the little bit of game state the table tracks.

use crate::core::{CardId, CardName};
use crate::zones::Zone;
use serde::{Deserialize, Serialize};

/// Printed card data as resolved from the card database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    /// Card name (e.g., "Lightning Bolt")
    pub name: CardName,

    /// Mana cost in brace notation (e.g., "{1}{R}"), empty for lands
    #[serde(default)]
    pub mana_cost: String,

    /// Converted mana cost / mana value
    #[serde(default)]
    pub cmc: f32,

    /// Type line (e.g., "Legendary Creature — Elf Druid")
    #[serde(default)]
    pub type_line: String,

    /// Oracle text
    #[serde(default)]
    pub oracle_text: String,

    /// Image reference for the presentation layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<String>,

    /// Identifier in the external card database. Shared by every copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_id: Option<String>,
}

impl CardData {
    /// Minimal record carrying only a name
    pub fn named(name: impl Into<CardName>) -> Self {
        CardData {
            name: name.into(),
            mana_cost: String::new(),
            cmc: 0.0,
            type_line: String::new(),
            oracle_text: String::new(),
            image_uri: None,
            database_id: None,
        }
    }
}

/// One copy of a card at the table
///
/// `is_commander` is fixed at deck construction. `played_times` is the
/// commander-tax counter and is only touched by the zone store when a
/// commander leaves the command zone for the battlefield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,

    #[serde(flatten)]
    pub data: CardData,

    #[serde(default)]
    pub is_commander: bool,

    #[serde(default)]
    pub played_times: u32,

    /// True while the card sits on the battlefield
    #[serde(default)]
    pub in_play: bool,

    /// Zone the card was played from, while on the battlefield
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub played_from: Option<Zone>,
}

impl Card {
    /// Instantiate a new copy with a fresh id
    pub fn new(data: CardData) -> Self {
        Card {
            id: CardId::generate(),
            data,
            is_commander: false,
            played_times: 0,
            in_play: false,
            played_from: None,
        }
    }

    pub fn commander(data: CardData) -> Self {
        Card {
            is_commander: true,
            ..Card::new(data)
        }
    }

    pub fn name(&self) -> &str {
        self.data.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copies_get_distinct_ids() {
        let data = CardData::named("Forest");
        let a = Card::new(data.clone());
        let b = Card::new(data);
        assert_ne!(a.id, b.id);
        assert_eq!(a.name(), "Forest");
        assert!(!a.is_commander);
    }

    #[test]
    fn test_wire_shape_is_camel_case_and_flat() {
        let mut card = Card::commander(CardData::named("Sol Ring"));
        card.data.mana_cost = "{1}".to_string();
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["name"], "Sol Ring");
        assert_eq!(json["manaCost"], "{1}");
        assert_eq!(json["isCommander"], true);
        assert_eq!(json["playedTimes"], 0);
        assert!(json.get("playedFrom").is_none());
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let card: Card = serde_json::from_str(r#"{"id":"c1","name":"Island"}"#).unwrap();
        assert_eq!(card.id, CardId::from("c1"));
        assert_eq!(card.data.name.as_str(), "Island");
        assert!(!card.is_commander);
        assert_eq!(card.played_times, 0);
    }
}
