//! Remembered player ids, so a client can reconnect to a session after a
//! restart

use crate::core::{PlayerId, SessionId};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// JSON file mapping session id to the player id this client holds there
///
/// Storage problems never surface: a missing or unreadable file reads as
/// empty, and a failed write only logs.
#[derive(Debug, Clone)]
pub struct PlayerIdStore {
    path: PathBuf,
}

impl PlayerIdStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PlayerIdStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, session: &SessionId) -> Option<PlayerId> {
        self.load().remove(session)
    }

    pub fn set(&self, session: &SessionId, player: &PlayerId) {
        let mut entries = self.load();
        entries.insert(session.clone(), player.clone());
        self.save(&entries);
    }

    pub fn clear(&self, session: &SessionId) {
        let mut entries = self.load();
        if entries.remove(session).is_some() {
            self.save(&entries);
        }
    }

    /// Drop the stored id for `session` if that player is no longer seated
    ///
    /// Returns the id that is still valid, if any.
    pub fn retain_members(&self, session: &SessionId, members: &[PlayerId]) -> Option<PlayerId> {
        let stored = self.get(session)?;
        if members.contains(&stored) {
            Some(stored)
        } else {
            debug!(session = %session, player = %stored, "forgetting stale player id");
            self.clear(session);
            None
        }
    }

    fn load(&self) -> BTreeMap<SessionId, PlayerId> {
        let Ok(json) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "ignoring unreadable player id store");
            BTreeMap::new()
        })
    }

    fn save(&self, entries: &BTreeMap<SessionId, PlayerId>) {
        let written = serde_json::to_string_pretty(entries)
            .map_err(crate::TableError::from)
            .and_then(|json| std::fs::write(&self.path, json).map_err(crate::TableError::from));
        if let Err(e) = written {
            warn!(path = %self.path.display(), error = %e, "could not save player id store");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_store() -> PlayerIdStore {
        let path = std::env::temp_dir().join(format!("mtg-table-ids-{}.json", uuid::Uuid::new_v4()));
        PlayerIdStore::new(path)
    }

    #[test]
    fn test_set_get_clear() {
        let store = scratch_store();
        let session = SessionId::from("s1");
        assert_eq!(store.get(&session), None);

        store.set(&session, &PlayerId::from("p1"));
        assert_eq!(store.get(&session), Some(PlayerId::from("p1")));

        // A fresh handle on the same file sees the entry
        let reopened = PlayerIdStore::new(store.path());
        assert_eq!(reopened.get(&session), Some(PlayerId::from("p1")));

        store.clear(&session);
        assert_eq!(store.get(&session), None);
        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn test_retain_members_drops_stale_entry() {
        let store = scratch_store();
        let session = SessionId::from("s1");
        store.set(&session, &PlayerId::from("p1"));

        let members = [PlayerId::from("p1"), PlayerId::from("p2")];
        assert_eq!(store.retain_members(&session, &members), Some(PlayerId::from("p1")));

        assert_eq!(store.retain_members(&session, &[PlayerId::from("p2")]), None);
        assert_eq!(store.get(&session), None);
        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let store = scratch_store();
        std::fs::write(store.path(), "{{{ not json").unwrap();
        assert_eq!(store.get(&SessionId::from("s1")), None);

        store.set(&SessionId::from("s1"), &PlayerId::from("p1"));
        assert_eq!(store.get(&SessionId::from("s1")), Some(PlayerId::from("p1")));
        let _ = std::fs::remove_file(store.path());
    }
}
