//! Game zones (Library, Hand, Graveyard, Battlefield, etc.)
//!
//! [`PlayerZones`] is the per-player zone store. It is the only thing that
//! splices zone contents; everything else moves cards through the
//! [`ZoneOps`] primitives. The end of each zone's `Vec` is its top.

use crate::core::{Card, CardId};
use rand::seq::SliceRandom;
use rand::Rng;
use rustc_hash::FxHashSet;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Different zones where cards can exist
///
/// `command` is the canonical name of the command zone; `commander` and
/// `commanders` are accepted as aliases wherever a zone name is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Library,
    Hand,
    Graveyard,
    Exile,
    Attractions,
    Stickers,
    #[serde(alias = "commander", alias = "commanders")]
    Command,
    Battlefield,
}

impl Zone {
    pub const ALL: [Zone; 8] = [
        Zone::Library,
        Zone::Hand,
        Zone::Graveyard,
        Zone::Exile,
        Zone::Attractions,
        Zone::Stickers,
        Zone::Command,
        Zone::Battlefield,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Library => "library",
            Zone::Hand => "hand",
            Zone::Graveyard => "graveyard",
            Zone::Exile => "exile",
            Zone::Attractions => "attractions",
            Zone::Stickers => "stickers",
            Zone::Command => "command",
            Zone::Battlefield => "battlefield",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "library" => Ok(Zone::Library),
            "hand" => Ok(Zone::Hand),
            "graveyard" => Ok(Zone::Graveyard),
            "exile" => Ok(Zone::Exile),
            "attractions" => Ok(Zone::Attractions),
            "stickers" => Ok(Zone::Stickers),
            "command" | "commander" | "commanders" => Ok(Zone::Command),
            "battlefield" => Ok(Zone::Battlefield),
            other => Err(other.to_string()),
        }
    }
}

/// A zone name as received from a client
///
/// Names the table does not know are kept verbatim instead of being
/// rejected, so newer clients can send zones this server has never heard of
/// and the move simply reports [`MoveStatus::UnsupportedZone`](crate::game::MoveStatus).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ZoneName {
    Known(Zone),
    Unsupported(String),
}

impl ZoneName {
    pub fn zone(&self) -> Option<Zone> {
        match self {
            ZoneName::Known(zone) => Some(*zone),
            ZoneName::Unsupported(_) => None,
        }
    }
}

impl From<String> for ZoneName {
    fn from(s: String) -> Self {
        match s.parse::<Zone>() {
            Ok(zone) => ZoneName::Known(zone),
            Err(name) => ZoneName::Unsupported(name),
        }
    }
}

impl From<ZoneName> for String {
    fn from(name: ZoneName) -> Self {
        match name {
            ZoneName::Known(zone) => zone.as_str().to_string(),
            ZoneName::Unsupported(name) => name,
        }
    }
}

impl From<Zone> for ZoneName {
    fn from(zone: Zone) -> Self {
        ZoneName::Known(zone)
    }
}

impl fmt::Display for ZoneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneName::Known(zone) => write!(f, "{zone}"),
            ZoneName::Unsupported(name) => write!(f, "{name}"),
        }
    }
}

/// Zone primitives the move applier runs against
///
/// [`PlayerZones`] is the store used by both the server and client mirrors.
/// None of these ever fail: asking for more cards than exist returns what
/// is there, and ids that are not present are ignored.
pub trait ZoneOps {
    /// Remove up to `count` cards from the top of `zone`
    fn draw_top_n(&mut self, zone: Zone, count: usize) -> Vec<Card>;

    /// Remove the cards with the given ids from `zone`
    ///
    /// Returns `None` when the store cannot address cards by id, in which
    /// case callers fall back to count-based moves.
    fn remove_by_ids(&mut self, _zone: Zone, _ids: &[CardId]) -> Option<Vec<Card>> {
        None
    }

    /// Put `cards` on top of `zone`, in order
    fn push_cards(&mut self, zone: Zone, cards: Vec<Card>);
}

/// Collection of all zones for a player
///
/// Zones materialise lazily: a zone that has never received a card reads as
/// empty and is absent from the serialised form until its first write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerZones {
    zones: BTreeMap<Zone, Vec<Card>>,
    /// Source of the most recent removal; battlefield entries record it
    last_source: Option<Zone>,
}

impl PlayerZones {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards in `zone`, bottom first
    pub fn cards(&self, zone: Zone) -> &[Card] {
        self.zones.get(&zone).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, zone: Zone) -> usize {
        self.cards(zone).len()
    }

    pub fn is_empty(&self, zone: Zone) -> bool {
        self.cards(zone).is_empty()
    }

    /// Whether `zone` has ever been written to
    pub fn is_materialized(&self, zone: Zone) -> bool {
        self.zones.contains_key(&zone)
    }

    /// Locate a card by id across all zones
    pub fn find(&self, id: &CardId) -> Option<(Zone, &Card)> {
        self.zones
            .iter()
            .find_map(|(zone, cards)| cards.iter().find(|c| &c.id == id).map(|c| (*zone, c)))
    }

    /// Card counts for every materialised zone
    pub fn zone_sizes(&self) -> BTreeMap<Zone, usize> {
        self.zones.iter().map(|(zone, cards)| (*zone, cards.len())).collect()
    }

    /// Ids of every card held, in zone order
    pub fn all_card_ids(&self) -> Vec<CardId> {
        self.zones
            .values()
            .flat_map(|cards| cards.iter().map(|c| c.id.clone()))
            .collect()
    }

    pub fn total_cards(&self) -> usize {
        self.zones.values().map(Vec::len).sum()
    }

    /// Shuffle the zone (for Library, Attractions, Stickers)
    pub fn shuffle(&mut self, zone: Zone, rng: &mut impl Rng) {
        if let Some(cards) = self.zones.get_mut(&zone) {
            cards.shuffle(rng);
        }
    }

    /// Cards of `zone` for in-place edits; empty when never materialised
    pub fn cards_mut(&mut self, zone: Zone) -> &mut [Card] {
        self.zones.get_mut(&zone).map(Vec::as_mut_slice).unwrap_or_default()
    }

    fn stamp_for_entry(card: &mut Card, zone: Zone, source: Option<Zone>) {
        if zone == Zone::Battlefield {
            let from = source.unwrap_or(Zone::Hand);
            if card.is_commander && from == Zone::Command {
                card.played_times += 1;
            }
            card.in_play = true;
            card.played_from = Some(from);
        } else {
            card.in_play = false;
            card.played_from = None;
        }
    }
}

impl ZoneOps for PlayerZones {
    fn draw_top_n(&mut self, zone: Zone, count: usize) -> Vec<Card> {
        self.last_source = Some(zone);
        match self.zones.get_mut(&zone) {
            Some(cards) => {
                let take = count.min(cards.len());
                cards.split_off(cards.len() - take)
            }
            None => Vec::new(),
        }
    }

    fn remove_by_ids(&mut self, zone: Zone, ids: &[CardId]) -> Option<Vec<Card>> {
        self.last_source = Some(zone);
        let Some(cards) = self.zones.get_mut(&zone) else {
            return Some(Vec::new());
        };
        let wanted: FxHashSet<&CardId> = ids.iter().collect();
        let (taken, kept): (Vec<Card>, Vec<Card>) = std::mem::take(cards)
            .into_iter()
            .partition(|c| wanted.contains(&c.id));
        *cards = kept;
        Some(taken)
    }

    fn push_cards(&mut self, zone: Zone, mut cards: Vec<Card>) {
        if cards.is_empty() {
            return;
        }
        let source = self.last_source;
        for card in &mut cards {
            Self::stamp_for_entry(card, zone, source);
        }
        self.zones.entry(zone).or_default().extend(cards);
    }
}

impl Serialize for PlayerZones {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.zones.len()))?;
        for (zone, cards) in &self.zones {
            map.serialize_entry(zone.as_str(), cards)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PlayerZones {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        let mut zones: BTreeMap<Zone, Vec<Card>> = BTreeMap::new();
        for (key, value) in raw {
            // Keys that are not zones (e.g. a deck's "errors") are skipped
            let Ok(zone) = key.parse::<Zone>() else {
                continue;
            };
            let cards: Vec<Card> = serde_json::from_value(value).map_err(serde::de::Error::custom)?;
            zones.entry(zone).or_default().extend(cards);
        }
        Ok(PlayerZones {
            zones,
            last_source: None,
        })
    }
}

impl FromIterator<(Zone, Vec<Card>)> for PlayerZones {
    fn from_iter<I: IntoIterator<Item = (Zone, Vec<Card>)>>(iter: I) -> Self {
        let mut zones = PlayerZones::new();
        for (zone, cards) in iter {
            zones.zones.entry(zone).or_default().extend(cards);
        }
        zones
    }
}
