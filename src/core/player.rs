//! Player representation

use crate::core::{Deck, PlayerId, PlayerName};
use crate::zones::Zone;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Commander damage from a single opponent that knocks a player out
pub const LETHAL_COMMANDER_DAMAGE: i32 = 21;

/// A player seated in a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// Unique ID for this player
    pub id: PlayerId,

    /// Player name
    pub name: PlayerName,

    /// Life total. Clients overwrite it freely; no floor or ceiling.
    pub life: i32,

    /// Commander damage dealt to this player, by opponent
    #[serde(default)]
    pub commander_damage: BTreeMap<PlayerId, i32>,

    /// The player's cards
    pub deck: Deck,
}

impl Player {
    pub fn new(name: impl Into<PlayerName>, deck: Deck, starting_life: i32) -> Self {
        Player {
            id: PlayerId::generate(),
            name: name.into(),
            life: starting_life,
            commander_damage: BTreeMap::new(),
            deck,
        }
    }

    pub fn set_life(&mut self, value: i32) {
        self.life = value;
    }

    pub fn set_commander_damage(&mut self, opponent: PlayerId, value: i32) {
        self.commander_damage.insert(opponent, value);
    }

    /// Out of the game by life or by commander damage from any one opponent
    pub fn is_out(&self) -> bool {
        self.life <= 0
            || self
                .commander_damage
                .values()
                .any(|&dmg| dmg >= LETHAL_COMMANDER_DAMAGE)
    }

    /// Projection safe to show to every client in the session
    pub fn public_view(&self) -> PublicPlayer {
        PublicPlayer {
            id: self.id.clone(),
            name: self.name.clone(),
            life: self.life,
            commander_damage: self.commander_damage.clone(),
            zone_sizes: self.deck.zones.zone_sizes(),
        }
    }
}

/// What other players may see: identity, life, and only the size of each zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPlayer {
    pub id: PlayerId,
    pub name: PlayerName,
    pub life: i32,
    pub commander_damage: BTreeMap<PlayerId, i32>,
    pub zone_sizes: BTreeMap<Zone, usize>,
}
