//! Per-session socket fan-out
//!
//! The hub only knows connections and their outbound queues. Each live
//! socket owns the receiving end of a bounded channel; a writer task drains
//! it into the socket, which keeps per-socket delivery FIFO. A socket whose
//! queue is full or whose writer is gone is evicted on the next send, and
//! the rest of its session hears `player:disconnected`.

use crate::core::{ConnectionId, PlayerId, SessionId};
use crate::relay::protocol::ServerMessage;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Messages a socket may have queued before it counts as stalled
pub const OUTBOX_CAPACITY: usize = 1024;

/// Receiving end handed to the socket writer
pub type Outbox = mpsc::Receiver<String>;

#[derive(Debug)]
struct Peer {
    player_id: PlayerId,
    tx: mpsc::Sender<String>,
}

impl Peer {
    fn send(&self, text: &str) -> bool {
        self.tx.try_send(text.to_string()).is_ok()
    }
}

#[derive(Debug)]
pub struct RelayHub {
    /// Ordered by connection id so fan-out order is stable
    sockets: FxHashMap<SessionId, BTreeMap<ConnectionId, Peer>>,
    next_connection: u64,
    capacity: usize,
}

impl Default for RelayHub {
    fn default() -> Self {
        RelayHub::with_capacity(OUTBOX_CAPACITY)
    }
}

impl RelayHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hub whose per-socket queues hold at most `capacity` messages
    pub fn with_capacity(capacity: usize) -> Self {
        RelayHub {
            sockets: FxHashMap::default(),
            next_connection: 0,
            capacity: capacity.max(1),
        }
    }

    /// Register a newly opened socket
    pub fn attach(&mut self, session: &SessionId, player: &PlayerId) -> (ConnectionId, Outbox) {
        self.next_connection += 1;
        let id = ConnectionId::new(self.next_connection);
        let (tx, rx) = mpsc::channel(self.capacity);
        self.sockets.entry(session.clone()).or_default().insert(
            id,
            Peer {
                player_id: player.clone(),
                tx,
            },
        );
        (id, rx)
    }

    /// Forget a socket. Returns the player it belonged to.
    pub fn detach(&mut self, session: &SessionId, connection: ConnectionId) -> Option<PlayerId> {
        let peers = self.sockets.get_mut(session)?;
        let peer = peers.remove(&connection)?;
        if peers.is_empty() {
            self.sockets.remove(session);
        }
        Some(peer.player_id)
    }

    pub fn connection_count(&self, session: &SessionId) -> usize {
        self.sockets.get(session).map_or(0, BTreeMap::len)
    }

    /// Player owning `connection`, if it is still attached to `session`
    pub fn player_of(&self, session: &SessionId, connection: ConnectionId) -> Option<&PlayerId> {
        self.sockets
            .get(session)?
            .get(&connection)
            .map(|peer| &peer.player_id)
    }

    /// Forward `payload` from `sender` to every other socket in the session
    ///
    /// Returns how many sockets accepted the message.
    pub fn relay(&mut self, session: &SessionId, sender: ConnectionId, payload: &str) -> usize {
        let Some(from) = self.player_of(session, sender).cloned() else {
            return 0;
        };
        let wrapped = ServerMessage::relay(from, payload).to_json();
        let delivered = self.fan_out(session, Some(sender), &wrapped);
        debug!(session = %session, %sender, delivered, "relayed message");
        delivered
    }

    /// Push a server-originated message to every socket in the session
    pub fn broadcast(&mut self, session: &SessionId, message: &ServerMessage) -> usize {
        self.fan_out(session, None, &message.to_json())
    }

    fn fan_out(&mut self, session: &SessionId, skip: Option<ConnectionId>, text: &str) -> usize {
        let Some(peers) = self.sockets.get_mut(session) else {
            return 0;
        };

        let mut delivered = 0;
        let mut stalled = Vec::new();
        for (id, peer) in peers.iter() {
            if Some(*id) == skip {
                continue;
            }
            if peer.send(text) {
                delivered += 1;
            } else {
                stalled.push(*id);
            }
        }

        // Dropping the sender ends the socket's writer, which closes it
        for id in stalled {
            if let Some(peer) = peers.remove(&id) {
                warn!(
                    session = %session,
                    connection = %id,
                    player = %peer.player_id,
                    "evicted stalled socket"
                );
                let notice = ServerMessage::player_disconnected(peer.player_id).to_json();
                for other in peers.values() {
                    other.send(&notice);
                }
            }
        }
        if peers.is_empty() {
            self.sockets.remove(session);
        }
        delivered
    }
}
