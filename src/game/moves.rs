//! Move applier
//!
//! Executes compiled move instructions against any [`ZoneOps`] store and
//! reports how many cards each instruction actually moved. No legality
//! checks happen here.

use crate::core::Card;
use crate::game::events::{CompiledEvent, MoveInstruction};
use crate::zones::{Zone, ZoneOps};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveStatus {
    /// Cards (possibly zero) went to the requested target
    Moved,
    /// A commander was in the batch, so the whole batch went to the command zone
    RedirectedToCommand,
    /// Source or target is not a zone this store knows; nothing was touched
    UnsupportedZone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveDetail {
    pub instruction: MoveInstruction,
    pub moved: usize,
    pub status: MoveStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplyResult {
    pub details: Vec<MoveDetail>,
}

impl ApplyResult {
    pub fn total_moved(&self) -> usize {
        self.details.iter().map(|d| d.moved).sum()
    }
}

/// Apply every instruction of `compiled` in order
pub fn apply_moves<Z: ZoneOps + ?Sized>(zones: &mut Z, compiled: &CompiledEvent) -> ApplyResult {
    let details = compiled
        .moves
        .iter()
        .map(|m| apply_one(zones, m))
        .collect();
    ApplyResult { details }
}

fn apply_one<Z: ZoneOps + ?Sized>(zones: &mut Z, m: &MoveInstruction) -> MoveDetail {
    let detail = |moved, status| MoveDetail {
        instruction: m.clone(),
        moved,
        status,
    };

    // Resolve both ends first so a bad target never strands removed cards
    let (Some(source), Some(target)) = (m.source.zone(), m.target.zone()) else {
        return detail(0, MoveStatus::UnsupportedZone);
    };

    let by_id = match &m.card_ids {
        Some(ids) if !ids.is_empty() => zones.remove_by_ids(source, ids),
        _ => None,
    };

    let taken = match by_id {
        Some(taken) => taken,
        None => {
            let count = m.count.unwrap_or(0).max(0) as usize;
            if count == 0 {
                return detail(0, MoveStatus::Moved);
            }
            zones.draw_top_n(source, count)
        }
    };

    let moved = taken.len();
    let (target, status) = redirect_commanders(&taken, target, m.prefer_command_zone_for_commander);
    zones.push_cards(target, taken);
    detail(moved, status)
}

/// If any moving card is a commander, the entire batch goes to the command
/// zone. Non-commanders travelling with it are redirected too.
fn redirect_commanders(cards: &[Card], target: Zone, prefer_command_zone: bool) -> (Zone, MoveStatus) {
    if prefer_command_zone && target != Zone::Command && cards.iter().any(|c| c.is_commander) {
        (Zone::Command, MoveStatus::RedirectedToCommand)
    } else {
        (target, MoveStatus::Moved)
    }
}
