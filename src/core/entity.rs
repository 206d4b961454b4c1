//! Process-unique identifiers for cards, players and sessions
//!
//! Ids are UUID v4 strings minted once at creation. On the wire they are
//! plain strings, so an id received from a client that was never minted by
//! this process simply fails to look anything up.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Mint a fresh, process-unique id
            pub fn generate() -> Self {
                $name(Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(s.to_string())
            }
        }
    };
}

string_id!(
    /// Identifies one physical card instance. Two copies of "Forest" in the
    /// same deck get two different ids.
    CardId
);

string_id!(
    /// Identifies a player; immutable for the player's lifetime
    PlayerId
);

string_id!(
    /// Identifies a session; immutable for the session's lifetime
    SessionId
);

/// Identifies one live WebSocket connection
///
/// A player may hold several connections (e.g. two browser tabs), so fan-out
/// is keyed by connection rather than by player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        ConnectionId(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}
