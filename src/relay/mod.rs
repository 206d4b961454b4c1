//! Real-time relay between the sockets of one session

pub mod hub;
pub mod interpret;
pub mod protocol;

pub use hub::{Outbox, RelayHub};
pub use interpret::{interpret, Interpretation};
pub use protocol::{
    CommanderDamagePayload, GameEventPayload, InboundMessage, LifeUpdatePayload, ServerMessage,
};
