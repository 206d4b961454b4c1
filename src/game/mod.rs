//! Game events: declaring intents and applying them to zones

pub mod events;
pub mod moves;

pub use events::{compile_event, CompiledEvent, DrawCardsEvent, GameEvent, MoveCardsEvent, MoveInstruction};
pub use moves::{apply_moves, ApplyResult, MoveDetail, MoveStatus};

use crate::zones::ZoneOps;

/// Compile `event` and apply it to `zones` in one step
pub fn apply_event<Z: ZoneOps + ?Sized>(zones: &mut Z, event: &GameEvent) -> ApplyResult {
    apply_moves(zones, &compile_event(event))
}
