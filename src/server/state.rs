//! Shared server state
//!
//! Sessions and sockets sit behind one lock. Every handler takes it only for
//! synchronous work and never across an `.await`, so each inbound message
//! (interpret, then relay) is applied atomically with respect to the others.

use crate::config::ServerConfig;
use crate::core::{ConnectionId, PlayerId, SessionId};
use crate::loader::{CardSource, DeckImporter};
use crate::relay::{interpret, Interpretation, Outbox, RelayHub, ServerMessage};
use crate::session::{PublicSession, SessionRegistry, SessionResponse};
use crate::{Result, TableError};
use parking_lot::{Mutex, MutexGuard};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Table {
    pub registry: SessionRegistry,
    pub hub: RelayHub,
}

#[derive(Clone)]
pub struct AppState {
    table: Arc<Mutex<Table>>,
    cards: Arc<CardSource>,
}

/// `POST /api/session`
///
/// Absent and `null` fields both read as `None`.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub name: Option<String>,
    /// Deck URL or newline-delimited card list
    #[serde(default)]
    pub deck: Option<String>,
}

/// `POST /api/session/join`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinSessionRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub deck: Option<String>,
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(TableError::MissingField(field)),
    }
}

impl AppState {
    pub fn new(registry: SessionRegistry, cards: CardSource) -> Self {
        AppState {
            table: Arc::new(Mutex::new(Table {
                registry,
                hub: RelayHub::new(),
            })),
            cards: Arc::new(cards),
        }
    }

    pub async fn from_config(config: &ServerConfig) -> Result<Self> {
        let cards = config.card_source().await?;
        let registry = SessionRegistry::new(config.starting_life, config.seed);
        Ok(AppState::new(registry, cards))
    }

    /// Lock the table. The guard must not be held across an await.
    pub fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock()
    }

    pub async fn create_session(&self, request: CreateSessionRequest) -> Result<SessionResponse> {
        let name = required(request.name.as_deref(), "name")?;
        let deck = required(request.deck.as_deref(), "deck")?;

        let resolved = DeckImporter::new(&self.cards).resolve(deck).await?;
        Ok(self.table().registry.open_session(name, resolved))
    }

    pub async fn join_session(&self, request: JoinSessionRequest) -> Result<SessionResponse> {
        let session_id = SessionId::from(required(request.session_id.as_deref(), "sessionId")?);
        let name = required(request.name.as_deref(), "name")?;
        let deck = required(request.deck.as_deref(), "deck")?;

        // Fail fast before any card lookups
        let exists = self.table().registry.contains(&session_id);
        if !exists {
            return Err(TableError::SessionNotFound(session_id));
        }
        let resolved = DeckImporter::new(&self.cards).resolve(deck).await?;

        let mut table = self.table();
        let response = table.registry.join_session(&session_id, name, resolved)?;
        let notified = table.hub.broadcast(
            &session_id,
            &ServerMessage::player_joined(response.player.public_view()),
        );
        debug!(session = %session_id, notified, "announced new player");
        Ok(response)
    }

    pub fn public_session(&self, id: Option<&str>) -> Result<PublicSession> {
        let id = SessionId::from(required(id, "id")?);
        self.table().registry.public_session(&id)
    }

    /// Check a socket's credentials without attaching it
    pub fn authorize(&self, session: &SessionId, player: &PlayerId) -> Result<()> {
        self.table().registry.ensure_member(session, player)
    }

    /// Attach an authorised socket to its session's fan-out set
    pub fn connect(&self, session: &SessionId, player: &PlayerId) -> Result<(ConnectionId, Outbox)> {
        let mut table = self.table();
        table.registry.ensure_member(session, player)?;
        let (connection, outbox) = table.hub.attach(session, player);
        info!(session = %session, player = %player, %connection, "socket opened");
        Ok((connection, outbox))
    }

    /// Interpret one inbound message, then relay it to the other sockets
    ///
    /// Messages from a connection the hub has already evicted are dropped.
    pub fn handle_inbound(&self, session: &SessionId, connection: ConnectionId, text: &str) -> usize {
        let mut guard = self.table();
        let Table { registry, hub } = &mut *guard;
        if hub.player_of(session, connection).is_none() {
            debug!(session = %session, %connection, "dropped message from detached socket");
            return 0;
        }
        if let Ok(state) = registry.get_mut(session) {
            let outcome = interpret(state, text);
            if outcome != Interpretation::Ignored {
                debug!(session = %session, %connection, ?outcome, "interpreted message");
            }
        }
        hub.relay(session, connection, text)
    }

    /// Detach a closed socket and tell the rest of the session
    pub fn disconnect(&self, session: &SessionId, connection: ConnectionId) {
        let mut table = self.table();
        if let Some(player) = table.hub.detach(session, connection) {
            let remaining = table.hub.connection_count(session);
            info!(session = %session, player = %player, %connection, remaining, "socket closed");
            table
                .hub
                .broadcast(session, &ServerMessage::player_disconnected(player));
        }
    }
}
