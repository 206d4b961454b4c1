//! Deck import
//!
//! Parser for exported deck-list lines, card sources to resolve names, and
//! the builder that partitions resolved cards into a player's zones.

pub mod card_line;
pub mod database;
pub mod deck;

pub use card_line::{parse_card_line, parse_deck_list, CardLine, DeckSection};
pub use database::{CardCatalog, CardSource, ScryfallClient};
pub use deck::{DeckImport, DeckImporter, ResolvedDeckList};
