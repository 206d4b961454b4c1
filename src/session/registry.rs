//! Process-wide table of live sessions

use crate::core::{Player, PlayerId, SessionId};
use crate::loader::ResolvedDeckList;
use crate::session::{PublicSession, Session, SessionResponse};
use crate::{Result, TableError};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use rustc_hash::FxHashMap;
use tracing::{info, warn};

/// In-memory session store
///
/// Sessions are never closed and players are never removed; everything is
/// lost when the process exits.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: FxHashMap<SessionId, Session>,
    starting_life: i32,
    rng: ChaCha12Rng,
}

impl SessionRegistry {
    /// `seed` makes deck shuffles reproducible; `None` seeds from the OS
    pub fn new(starting_life: i32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::from_entropy(),
        };
        SessionRegistry {
            sessions: FxHashMap::default(),
            starting_life,
            rng,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn get(&self, id: &SessionId) -> Result<&Session> {
        self.sessions
            .get(id)
            .ok_or_else(|| TableError::SessionNotFound(id.clone()))
    }

    pub fn get_mut(&mut self, id: &SessionId) -> Result<&mut Session> {
        self.sessions
            .get_mut(id)
            .ok_or_else(|| TableError::SessionNotFound(id.clone()))
    }

    /// Allocate an empty session
    pub fn create_session(&mut self) -> SessionId {
        let session = Session::new();
        let id = session.id.clone();
        info!(session = %id, "session created");
        self.sessions.insert(id.clone(), session);
        id
    }

    /// Build a player from a resolved deck list. Unresolved cards end up in
    /// the deck's `errors`; they never fail player creation.
    pub fn create_player(&mut self, name: &str, deck: ResolvedDeckList) -> Player {
        let import = deck.build(&mut self.rng);
        if !import.is_complete() {
            warn!(player = name, warnings = import.warnings().len(), "deck imported with errors");
        }
        Player::new(name, import.into_deck(), self.starting_life)
    }

    /// New session with its first player
    pub fn open_session(&mut self, name: &str, deck: ResolvedDeckList) -> SessionResponse {
        let mut session = Session::new();
        let session_id = session.id.clone();
        let player = self.create_player(name, deck);
        info!(session = %session_id, player = %player.id, name = %player.name, "session created");
        session.add_player(player.clone());
        self.sessions.insert(session_id.clone(), session);
        SessionResponse { session_id, player }
    }

    /// Add a new player to an existing session
    pub fn join_session(
        &mut self,
        session_id: &SessionId,
        name: &str,
        deck: ResolvedDeckList,
    ) -> Result<SessionResponse> {
        if !self.contains(session_id) {
            return Err(TableError::SessionNotFound(session_id.clone()));
        }
        let player = self.create_player(name, deck);
        self.seat(session_id, player)
    }

    fn seat(&mut self, session_id: &SessionId, player: Player) -> Result<SessionResponse> {
        let session = self.get_mut(session_id)?;
        info!(session = %session_id, player = %player.id, name = %player.name, "player joined");
        session.add_player(player.clone());
        Ok(SessionResponse {
            session_id: session_id.clone(),
            player,
        })
    }

    pub fn public_session(&self, id: &SessionId) -> Result<PublicSession> {
        Ok(self.get(id)?.public_view())
    }

    /// Check that `player` is seated in `session`
    pub fn ensure_member(&self, session: &SessionId, player: &PlayerId) -> Result<()> {
        if self.get(session)?.has_player(player) {
            Ok(())
        } else {
            Err(TableError::NotAMember {
                session: session.clone(),
                player: player.clone(),
            })
        }
    }
}
