//! MTG Table - multiplayer card table with a WebSocket relay
//!
//! Each player owns their zones and reports moves as game events; the server
//! keeps sessions, relays events between the players of a session, and
//! replays the few message types it understands against its own copy.

pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod relay;
pub mod server;
pub mod session;
pub mod zones;

pub use error::{Result, TableError};
