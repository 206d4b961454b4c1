//! Game events and the event compiler
//!
//! A [`GameEvent`] is what a client declares ("draw 2", "move these cards to
//! the graveyard"). [`compile_event`] turns it into [`MoveInstruction`]s
//! without looking at any zone; the move applier executes them.

use crate::core::CardId;
use crate::zones::{Zone, ZoneName};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Card ids named by a move; most moves touch one or two cards
pub type CardIds = SmallVec<[CardId; 4]>;

/// Draw `count` cards, by default from the library into the hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawCardsEvent {
    pub count: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ZoneName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<ZoneName>,
}

/// Move cards between zones, either named by id or counted off the top
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCardsEvent {
    pub source: ZoneName,
    pub target: ZoneName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_ids: Option<CardIds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<bool>,
    /// Send the batch to the command zone if it contains a commander
    #[serde(default)]
    pub prefer_command_zone_for_commander: bool,
}

/// A declared game intent, tagged by `type` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    #[serde(rename = "DRAW_CARDS")]
    DrawCards(DrawCardsEvent),

    #[serde(rename = "MOVE_CARDS")]
    MoveCards(MoveCardsEvent),

    /// Any event type this build does not know; compiles to nothing
    #[serde(other)]
    Unknown,
}

impl GameEvent {
    /// Draw `count` cards from the library into the hand
    pub fn draw(count: i64) -> Self {
        GameEvent::DrawCards(DrawCardsEvent {
            count,
            from: None,
            to: None,
        })
    }

    /// Move specific cards from `source` to `target`
    pub fn move_cards(source: Zone, target: Zone, card_ids: impl IntoIterator<Item = CardId>) -> Self {
        GameEvent::MoveCards(MoveCardsEvent {
            source: source.into(),
            target: target.into(),
            card_ids: Some(card_ids.into_iter().collect()),
            count: None,
            top: None,
            prefer_command_zone_for_commander: false,
        })
    }

    /// Move `count` cards off the top of `source` onto `target`
    pub fn move_top(source: Zone, target: Zone, count: i64) -> Self {
        GameEvent::MoveCards(MoveCardsEvent {
            source: source.into(),
            target: target.into(),
            card_ids: None,
            count: Some(count),
            top: None,
            prefer_command_zone_for_commander: false,
        })
    }

    /// Opt a move into commander redirection; other events are unchanged
    pub fn with_commander_redirect(mut self) -> Self {
        if let GameEvent::MoveCards(ev) = &mut self {
            ev.prefer_command_zone_for_commander = true;
        }
        self
    }
}

/// One concrete move, the unit the applier executes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveInstruction {
    pub source: ZoneName,
    pub target: ZoneName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_ids: Option<CardIds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    pub top: bool,
    #[serde(default)]
    pub prefer_command_zone_for_commander: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompiledEvent {
    pub moves: Vec<MoveInstruction>,
}

impl CompiledEvent {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

/// Compile an event into move instructions. Pure: touches no zone state.
pub fn compile_event(event: &GameEvent) -> CompiledEvent {
    match event {
        GameEvent::DrawCards(ev) => CompiledEvent {
            moves: vec![MoveInstruction {
                source: ev.from.clone().unwrap_or(ZoneName::Known(Zone::Library)),
                target: ev.to.clone().unwrap_or(ZoneName::Known(Zone::Hand)),
                card_ids: None,
                count: Some(ev.count),
                top: true,
                prefer_command_zone_for_commander: false,
            }],
        },
        GameEvent::MoveCards(ev) => CompiledEvent {
            moves: vec![MoveInstruction {
                source: ev.source.clone(),
                target: ev.target.clone(),
                card_ids: ev.card_ids.clone(),
                count: ev.count,
                top: ev.top.unwrap_or(true),
                prefer_command_zone_for_commander: ev.prefer_command_zone_for_commander,
            }],
        },
        GameEvent::Unknown => CompiledEvent::default(),
    }
}
