//! A player's deck: zone contents plus import warnings

use crate::core::Card;
use crate::zones::{PlayerZones, Zone};
use serde::{Deserialize, Serialize};

/// A player's cards partitioned into zones
///
/// Import fills `library`, `command`, `attractions` and `stickers`; the other
/// zones appear once cards move into them during play. `errors` lists the
/// deck-list lines the importer could not resolve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(flatten)]
    pub zones: PlayerZones,

    #[serde(default)]
    pub errors: Vec<String>,
}

impl Deck {
    pub fn new(zones: PlayerZones) -> Self {
        Deck {
            zones,
            errors: Vec::new(),
        }
    }

    pub fn library(&self) -> &[Card] {
        self.zones.cards(Zone::Library)
    }

    pub fn commanders(&self) -> &[Card] {
        self.zones.cards(Zone::Command)
    }

    pub fn attractions(&self) -> &[Card] {
        self.zones.cards(Zone::Attractions)
    }

    pub fn stickers(&self) -> &[Card] {
        self.zones.cards(Zone::Stickers)
    }

    pub fn total_cards(&self) -> usize {
        self.zones.total_cards()
    }
}
