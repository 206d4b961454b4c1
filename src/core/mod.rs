//! Core table types: ids, names, cards, decks and players

pub mod entity;
pub mod types;
pub mod card;
pub mod deck;
pub mod player;

pub use entity::{CardId, ConnectionId, PlayerId, SessionId};
pub use types::{CardName, PlayerName};
pub use card::{Card, CardData};
pub use deck::Deck;
pub use player::{Player, PublicPlayer};
