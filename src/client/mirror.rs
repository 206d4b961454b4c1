//! A client's mirrored view of the table
//!
//! Each client owns its own zones. Everyone else's zones are replayed here
//! from the events they relay, through the same compiler and applier the
//! server uses. Remote cards the client has never seen are held face down
//! under placeholder ids; a relayed move that names real ids the mirror has
//! not seen yet hands those ids to face-down cards in the source zone first.

use crate::core::{Card, CardData, CardId, Player, PlayerId, PlayerName, PublicPlayer};
use crate::game::{apply_moves, compile_event, GameEvent};
use crate::relay::{InboundMessage, ServerMessage};
use crate::zones::{PlayerZones, Zone};
use tracing::debug;
use uuid::Uuid;

const FACE_DOWN_PREFIX: &str = "face-down-";

#[derive(Debug, Clone, PartialEq)]
pub struct MirroredPlayer {
    pub id: PlayerId,
    pub name: PlayerName,
    pub life: i32,
    pub connected: bool,
    pub zones: PlayerZones,
}

impl MirroredPlayer {
    /// Mirror a full player record, e.g. the caller's own create/join response
    pub fn known(player: &Player) -> Self {
        MirroredPlayer {
            id: player.id.clone(),
            name: player.name.clone(),
            life: player.life,
            connected: true,
            zones: player.deck.zones.clone(),
        }
    }

    /// Mirror a redacted player; every zone is filled with face-down cards
    pub fn face_down(player: &PublicPlayer) -> Self {
        let zones = player
            .zone_sizes
            .iter()
            .map(|(&zone, &size)| (zone, (0..size).map(|_| face_down_card()).collect()))
            .collect();
        MirroredPlayer {
            id: player.id.clone(),
            name: player.name.clone(),
            life: player.life,
            connected: true,
            zones,
        }
    }
}

fn face_down_card() -> Card {
    Card {
        id: CardId::from(format!("{FACE_DOWN_PREFIX}{}", Uuid::new_v4())),
        ..Card::new(CardData::named(""))
    }
}

fn is_placeholder(card: &Card) -> bool {
    card.id.as_str().starts_with(FACE_DOWN_PREFIX)
}

/// Write `ids` the zones do not hold yet onto placeholder cards in `zone`,
/// topmost first. Returns how many ids were adopted.
fn adopt_ids(zones: &mut PlayerZones, zone: Zone, ids: &[CardId]) -> usize {
    let mut unknown: Vec<&CardId> = Vec::new();
    for id in ids {
        if zones.find(id).is_none() && !unknown.contains(&id) {
            unknown.push(id);
        }
    }

    let slots = zones.cards_mut(zone).iter_mut().rev().filter(|card| is_placeholder(card));
    let mut adopted = 0;
    for (card, id) in slots.zip(unknown) {
        card.id = id.clone();
        adopted += 1;
    }
    adopted
}

/// Apply a remote player's event to their mirrored zones
fn replay(zones: &mut PlayerZones, event: &GameEvent) -> usize {
    let compiled = compile_event(event);
    for instruction in &compiled.moves {
        if let (Some(zone), Some(ids)) = (instruction.source.zone(), &instruction.card_ids) {
            let adopted = adopt_ids(zones, zone, ids);
            if adopted > 0 {
                debug!(?zone, adopted, "revealed face-down cards");
            }
        }
    }
    apply_moves(zones, &compiled).total_moved()
}

/// What a single server message changed in the mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorUpdate {
    Joined(PlayerId),
    Disconnected(PlayerId),
    Moved { player: PlayerId, moved: usize },
    Life { player: PlayerId, life: i32 },
    Ignored,
}

#[derive(Debug, Clone)]
pub struct TableMirror {
    local: PlayerId,
    /// Join order
    players: Vec<MirroredPlayer>,
}

impl TableMirror {
    pub fn new(local: &Player) -> Self {
        TableMirror {
            local: local.id.clone(),
            players: vec![MirroredPlayer::known(local)],
        }
    }

    pub fn local_id(&self) -> &PlayerId {
        &self.local
    }

    pub fn players(&self) -> &[MirroredPlayer] {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Option<&MirroredPlayer> {
        self.players.iter().find(|p| &p.id == id)
    }

    fn player_mut(&mut self, id: &PlayerId) -> Option<&mut MirroredPlayer> {
        self.players.iter_mut().find(|p| &p.id == id)
    }

    /// Add a remote player unless already mirrored
    pub fn seat(&mut self, player: &PublicPlayer) -> bool {
        if let Some(existing) = self.player_mut(&player.id) {
            existing.connected = true;
            return false;
        }
        self.players.push(MirroredPlayer::face_down(player));
        true
    }

    /// Decode and apply one socket frame
    pub fn handle_text(&mut self, text: &str) -> MirrorUpdate {
        match serde_json::from_str::<ServerMessage>(text) {
            Ok(message) => self.handle(message),
            Err(e) => {
                debug!(error = %e, "unrecognised server message");
                MirrorUpdate::Ignored
            }
        }
    }

    pub fn handle(&mut self, message: ServerMessage) -> MirrorUpdate {
        match message {
            ServerMessage::PlayerJoined { payload } => {
                self.seat(&payload.player);
                MirrorUpdate::Joined(payload.player.id)
            }
            ServerMessage::PlayerDisconnected { payload } => match self.player_mut(&payload.player_id) {
                Some(player) => {
                    player.connected = false;
                    MirrorUpdate::Disconnected(payload.player_id)
                }
                None => MirrorUpdate::Ignored,
            },
            ServerMessage::Relay { from, payload } => self.handle_relay(from, &payload),
        }
    }

    fn handle_relay(&mut self, from: PlayerId, payload: &str) -> MirrorUpdate {
        match InboundMessage::parse(payload) {
            // A client only ever reports moves in its own zones
            Some(InboundMessage::GameEvent(event)) if event.player_id == from && from != self.local => {
                let Some(player) = self.player_mut(&from) else {
                    return MirrorUpdate::Ignored;
                };
                let moved = replay(&mut player.zones, &event.event);
                MirrorUpdate::Moved { player: from, moved }
            }
            // Life totals are table-wide: whoever deals damage may set them,
            // and the server accepts the same update from any member
            Some(InboundMessage::LifeUpdate(update)) => match self.player_mut(&update.player_id) {
                Some(player) => {
                    player.life = update.value;
                    MirrorUpdate::Life {
                        player: update.player_id,
                        life: update.value,
                    }
                }
                None => MirrorUpdate::Ignored,
            },
            _ => MirrorUpdate::Ignored,
        }
    }

    /// Cards of `player` in `zone`, face-down ones included
    pub fn zone_len(&self, player: &PlayerId, zone: Zone) -> usize {
        self.player(player).map_or(0, |p| p.zones.len(zone))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Deck;
    use crate::game::GameEvent;
    use crate::zones::ZoneOps;
    use serde_json::json;

    fn local_player() -> Player {
        let mut zones = PlayerZones::new();
        zones.push_cards(Zone::Library, vec![Card::new(CardData::named("Forest"))]);
        Player::new("Alice", Deck::new(zones), 40)
    }

    fn remote(id: &str, library: usize) -> PublicPlayer {
        PublicPlayer {
            id: PlayerId::from(id),
            name: PlayerName::new("Bob"),
            life: 40,
            commander_damage: Default::default(),
            zone_sizes: [(Zone::Library, library)].into_iter().collect(),
        }
    }

    fn relay(from: &str, payload: serde_json::Value) -> String {
        ServerMessage::relay(PlayerId::from(from), payload.to_string()).to_json()
    }

    #[test]
    fn test_join_then_relayed_draw() {
        let mut mirror = TableMirror::new(&local_player());
        let joined = ServerMessage::player_joined(remote("bob", 10)).to_json();
        assert_eq!(mirror.handle_text(&joined), MirrorUpdate::Joined(PlayerId::from("bob")));

        let bob = PlayerId::from("bob");
        let draw = relay("bob", json!({"type": "game:event", "payload": {"playerId": "bob", "event": GameEvent::draw(3)}}));
        assert_eq!(mirror.handle_text(&draw), MirrorUpdate::Moved { player: bob.clone(), moved: 3 });
        assert_eq!(mirror.zone_len(&bob, Zone::Library), 7);
        assert_eq!(mirror.zone_len(&bob, Zone::Hand), 3);
    }

    #[test]
    fn test_cannot_move_someone_elses_cards() {
        let alice = local_player();
        let mut mirror = TableMirror::new(&alice);
        mirror.seat(&remote("bob", 5));
        mirror.seat(&remote("carol", 5));

        let spoof = relay("carol", json!({"type": "game:event", "payload": {"playerId": "bob", "event": GameEvent::draw(2)}}));
        assert_eq!(mirror.handle_text(&spoof), MirrorUpdate::Ignored);
        assert_eq!(mirror.zone_len(&PlayerId::from("bob"), Zone::Library), 5);
        assert_eq!(mirror.zone_len(&alice.id, Zone::Library), 1);
    }

    #[test]
    fn test_life_and_disconnect() {
        let mut mirror = TableMirror::new(&local_player());
        mirror.seat(&remote("bob", 0));

        let life = relay("bob", json!({"type": "life:update", "payload": {"playerId": "bob", "value": 31}}));
        mirror.handle_text(&life);
        assert_eq!(mirror.player(&PlayerId::from("bob")).unwrap().life, 31);

        let gone = ServerMessage::player_disconnected(PlayerId::from("bob")).to_json();
        assert_eq!(mirror.handle_text(&gone), MirrorUpdate::Disconnected(PlayerId::from("bob")));
        assert!(!mirror.player(&PlayerId::from("bob")).unwrap().connected);

        // Reconnecting via a fresh listing marks them present again without duplicating
        assert!(!mirror.seat(&remote("bob", 0)));
        assert!(mirror.player(&PlayerId::from("bob")).unwrap().connected);
        assert_eq!(mirror.players().len(), 2);
    }

    #[test]
    fn test_chat_and_junk_are_ignored() {
        let mut mirror = TableMirror::new(&local_player());
        assert_eq!(mirror.handle_text("nope"), MirrorUpdate::Ignored);
        let chat = relay("bob", json!({"type": "chat", "payload": "hi"}));
        assert_eq!(mirror.handle_text(&chat), MirrorUpdate::Ignored);
    }

    #[test]
    fn test_remote_card_played_by_id_after_draw() {
        let mut mirror = TableMirror::new(&local_player());
        let joined = ServerMessage::player_joined(remote("bob", 10)).to_json();
        mirror.handle_text(&joined);
        let bob = PlayerId::from("bob");

        let draw = relay("bob", json!({"type": "game:event", "payload": {"playerId": "bob", "event": GameEvent::draw(1)}}));
        mirror.handle_text(&draw);

        // Bob knows the real id of the card he drew; the mirror only saw its back
        let drawn = CardId::generate();
        let play = GameEvent::move_cards(Zone::Hand, Zone::Battlefield, [drawn.clone()]);
        let play = relay("bob", json!({"type": "game:event", "payload": {"playerId": "bob", "event": play}}));
        assert_eq!(mirror.handle_text(&play), MirrorUpdate::Moved { player: bob.clone(), moved: 1 });
        assert_eq!(mirror.zone_len(&bob, Zone::Hand), 0);
        assert_eq!(mirror.zone_len(&bob, Zone::Battlefield), 1);

        let zones = &mirror.player(&bob).unwrap().zones;
        let on_field = &zones.cards(Zone::Battlefield)[0];
        assert_eq!(on_field.id, drawn);
        assert!(on_field.in_play);

        // The adopted id sticks for later moves
        let dies = GameEvent::move_cards(Zone::Battlefield, Zone::Graveyard, [drawn]);
        let dies = relay("bob", json!({"type": "game:event", "payload": {"playerId": "bob", "event": dies}}));
        assert_eq!(mirror.handle_text(&dies), MirrorUpdate::Moved { player: bob.clone(), moved: 1 });
        assert_eq!(mirror.zone_len(&bob, Zone::Graveyard), 1);
        assert_eq!(mirror.zone_len(&bob, Zone::Library), 9);
    }

    #[test]
    fn test_adoption_only_uses_placeholders_in_source_zone() {
        let mut mirror = TableMirror::new(&local_player());
        mirror.seat(&remote("bob", 3));
        let bob = PlayerId::from("bob");

        // Hand is empty, so nothing can be revealed there
        let play = GameEvent::move_cards(Zone::Hand, Zone::Battlefield, [CardId::generate()]);
        let play = relay("bob", json!({"type": "game:event", "payload": {"playerId": "bob", "event": play}}));
        assert_eq!(mirror.handle_text(&play), MirrorUpdate::Moved { player: bob.clone(), moved: 0 });
        assert_eq!(mirror.zone_len(&bob, Zone::Library), 3);

        // A repeated id claims a single card
        let twin = CardId::generate();
        let mill = GameEvent::move_cards(Zone::Library, Zone::Graveyard, [twin.clone(), twin]);
        let mill = relay("bob", json!({"type": "game:event", "payload": {"playerId": "bob", "event": mill}}));
        assert_eq!(mirror.handle_text(&mill), MirrorUpdate::Moved { player: bob.clone(), moved: 1 });
        assert_eq!(mirror.zone_len(&bob, Zone::Library), 2);
    }

    #[test]
    fn test_life_update_from_another_player_is_applied() {
        let alice = local_player();
        let mut mirror = TableMirror::new(&alice);
        mirror.seat(&remote("bob", 0));
        mirror.seat(&remote("carol", 0));

        let hit = relay("carol", json!({"type": "life:update", "payload": {"playerId": "bob", "value": 33}}));
        assert_eq!(
            mirror.handle_text(&hit),
            MirrorUpdate::Life { player: PlayerId::from("bob"), life: 33 }
        );
        assert_eq!(mirror.player(&PlayerId::from("bob")).unwrap().life, 33);

        let stranger = relay("carol", json!({"type": "life:update", "payload": {"playerId": "mallory", "value": 1}}));
        assert_eq!(mirror.handle_text(&stranger), MirrorUpdate::Ignored);
    }
}
