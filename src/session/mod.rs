//! Sessions: players sharing one relay channel for one game

pub mod registry;

pub use registry::SessionRegistry;

use crate::core::{Player, PlayerId, PublicPlayer, SessionId};
use serde::{Deserialize, Serialize, Serializer};
use time::OffsetDateTime;

/// One game table. Lives until the process exits.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub created_at: OffsetDateTime,
    /// Players in join order
    players: Vec<Player>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            id: SessionId::generate(),
            created_at: OffsetDateTime::now_utc(),
            players: Vec::new(),
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    pub fn has_player(&self, id: &PlayerId) -> bool {
        self.player(id).is_some()
    }

    pub fn add_player(&mut self, player: Player) {
        self.players.push(player);
    }

    /// Redacted view any session member may see
    pub fn public_view(&self) -> PublicSession {
        PublicSession {
            id: self.id.clone(),
            created_at: self.created_at,
            players: self.players.iter().map(Player::public_view).collect(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_millis<S: Serializer>(at: &OffsetDateTime, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    let millis = at.unix_timestamp_nanos() / 1_000_000;
    serializer.serialize_i64(millis as i64)
}

/// `GET /api/session` body: identity and zone sizes only, no card contents
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicSession {
    pub id: SessionId,
    #[serde(serialize_with = "unix_millis")]
    pub created_at: OffsetDateTime,
    pub players: Vec<PublicPlayer>,
}

/// Create/join response: the session id plus the caller's own full player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: SessionId,
    pub player: Player,
}
