//! Best-effort server-side reading of relayed messages
//!
//! Most socket traffic is only forwarded. A few message types also update
//! the authoritative session so late joiners and HTTP reads see them.
//! Anything malformed, or aimed at a player outside the session, is left
//! alone; the message is still relayed either way.

use crate::core::PlayerId;
use crate::game::apply_event;
use crate::relay::protocol::InboundMessage;
use crate::session::Session;
use tracing::{debug, info};

/// What interpreting one message did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    /// A game event moved `moved` cards for `player`
    Applied { player: PlayerId, moved: usize },
    LifeUpdated { player: PlayerId, life: i32 },
    CommanderDamage { player: PlayerId, opponent: PlayerId, value: i32 },
    Ignored,
}

pub fn interpret(session: &mut Session, text: &str) -> Interpretation {
    let Some(message) = InboundMessage::parse(text) else {
        return Interpretation::Ignored;
    };

    match message {
        InboundMessage::GameEvent(payload) => match session.player_mut(&payload.player_id) {
            Some(player) => {
                let result = apply_event(&mut player.deck.zones, &payload.event);
                debug!(
                    session = %session.id,
                    player = %payload.player_id,
                    moved = result.total_moved(),
                    "applied game event"
                );
                Interpretation::Applied {
                    player: payload.player_id,
                    moved: result.total_moved(),
                }
            }
            None => ignored(session, &payload.player_id),
        },
        InboundMessage::LifeUpdate(payload) => match session.player_mut(&payload.player_id) {
            Some(player) => {
                player.set_life(payload.value);
                if player.is_out() {
                    info!(session = %session.id, player = %payload.player_id, "player is out on life");
                }
                Interpretation::LifeUpdated {
                    player: payload.player_id,
                    life: payload.value,
                }
            }
            None => ignored(session, &payload.player_id),
        },
        InboundMessage::CommanderDamage(payload) => {
            if !session.has_player(&payload.opponent_id) {
                return ignored(session, &payload.opponent_id);
            }
            match session.player_mut(&payload.player_id) {
                Some(player) => {
                    player.set_commander_damage(payload.opponent_id.clone(), payload.value);
                    if player.is_out() {
                        info!(
                            session = %session.id,
                            player = %payload.player_id,
                            "player is out on commander damage"
                        );
                    }
                    Interpretation::CommanderDamage {
                        player: payload.player_id,
                        opponent: payload.opponent_id,
                        value: payload.value,
                    }
                }
                None => ignored(session, &payload.player_id),
            }
        }
    }
}

fn ignored(session: &Session, player: &PlayerId) -> Interpretation {
    debug!(session = %session.id, player = %player, "message names a player outside the session");
    Interpretation::Ignored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardData, Deck, Player};
    use crate::game::GameEvent;
    use crate::zones::{PlayerZones, Zone, ZoneOps};
    use serde_json::json;

    fn seated(session: &mut Session, name: &str, library: usize) -> PlayerId {
        let mut zones = PlayerZones::new();
        let cards = (0..library)
            .map(|n| crate::core::Card::new(CardData::named(format!("Card {n}"))))
            .collect();
        zones.push_cards(Zone::Library, cards);
        let player = Player::new(name, Deck::new(zones), 40);
        let id = player.id.clone();
        session.add_player(player);
        id
    }

    #[test]
    fn test_game_event_moves_named_players_cards() {
        let mut session = Session::new();
        let alice = seated(&mut session, "Alice", 3);
        let bob = seated(&mut session, "Bob", 3);

        let text = json!({
            "type": "game:event",
            "payload": {"playerId": alice, "event": GameEvent::draw(2)}
        })
        .to_string();
        assert_eq!(
            interpret(&mut session, &text),
            Interpretation::Applied { player: alice.clone(), moved: 2 }
        );

        let zones = &session.player(&alice).unwrap().deck.zones;
        assert_eq!(zones.len(Zone::Hand), 2);
        assert_eq!(zones.len(Zone::Library), 1);
        assert_eq!(session.player(&bob).unwrap().deck.zones.len(Zone::Library), 3);
    }

    #[test]
    fn test_life_update_overwrites() {
        let mut session = Session::new();
        let alice = seated(&mut session, "Alice", 0);
        let text = json!({"type": "life:update", "payload": {"playerId": alice, "value": -3}}).to_string();

        interpret(&mut session, &text);
        assert_eq!(session.player(&alice).unwrap().life, -3);
    }

    #[test]
    fn test_commander_damage_needs_both_players() {
        let mut session = Session::new();
        let alice = seated(&mut session, "Alice", 0);
        let bob = seated(&mut session, "Bob", 0);

        let text = json!({
            "type": "commander:damage",
            "payload": {"playerId": alice, "opponentId": bob, "value": 21}
        })
        .to_string();
        assert!(matches!(interpret(&mut session, &text), Interpretation::CommanderDamage { .. }));
        assert!(session.player(&alice).unwrap().is_out());

        let stranger = json!({
            "type": "commander:damage",
            "payload": {"playerId": alice, "opponentId": "nobody", "value": 5}
        })
        .to_string();
        assert_eq!(interpret(&mut session, &stranger), Interpretation::Ignored);
        assert_eq!(session.player(&alice).unwrap().commander_damage.len(), 1);
    }

    #[test]
    fn test_unknown_player_and_garbage_are_ignored() {
        let mut session = Session::new();
        let alice = seated(&mut session, "Alice", 2);
        let before = session.public_view();

        for text in [
            json!({"type": "game:event", "payload": {"playerId": "ghost", "event": GameEvent::draw(1)}}).to_string(),
            json!({"type": "life:update", "payload": {"playerId": alice, "value": "lots"}}).to_string(),
            json!({"type": "chat", "payload": "gg"}).to_string(),
            "{not json".to_string(),
        ] {
            assert_eq!(interpret(&mut session, &text), Interpretation::Ignored);
        }
        assert_eq!(session.public_view().players, before.players);
    }
}
