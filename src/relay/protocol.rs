//! Wire messages on the session WebSocket
//!
//! Client payloads are opaque to the relay path: they are forwarded as the
//! original string inside a `relay` envelope. Only [`InboundMessage`] types
//! are ever decoded by the server.

use crate::core::{PlayerId, PublicPlayer};
use crate::game::GameEvent;
use serde::{Deserialize, Serialize};

/// Everything the server sends down a socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Another client's message, untouched
    #[serde(rename = "relay")]
    Relay { from: PlayerId, payload: String },

    /// A player joined through the HTTP control plane
    #[serde(rename = "player:joined")]
    PlayerJoined { payload: PlayerJoined },

    /// A player's socket closed; they remain in the roster
    #[serde(rename = "player:disconnected")]
    PlayerDisconnected { payload: PlayerDisconnected },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerJoined {
    pub player: PublicPlayer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDisconnected {
    pub player_id: PlayerId,
}

impl ServerMessage {
    pub fn relay(from: PlayerId, payload: impl Into<String>) -> Self {
        ServerMessage::Relay {
            from,
            payload: payload.into(),
        }
    }

    pub fn player_joined(player: PublicPlayer) -> Self {
        ServerMessage::PlayerJoined {
            payload: PlayerJoined { player },
        }
    }

    pub fn player_disconnected(player_id: PlayerId) -> Self {
        ServerMessage::PlayerDisconnected {
            payload: PlayerDisconnected { player_id },
        }
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialisation cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameEventPayload {
    pub event: GameEvent,
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeUpdatePayload {
    pub player_id: PlayerId,
    pub value: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommanderDamagePayload {
    pub player_id: PlayerId,
    pub opponent_id: PlayerId,
    pub value: i32,
}

/// Client message types the server also interprets
///
/// Anything that does not parse as one of these is still relayed; it just
/// has no server-side effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum InboundMessage {
    #[serde(rename = "game:event")]
    GameEvent(GameEventPayload),

    #[serde(rename = "life:update")]
    LifeUpdate(LifeUpdatePayload),

    #[serde(rename = "commander:damage")]
    CommanderDamage(CommanderDamagePayload),
}

impl InboundMessage {
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_relay_envelope_shape() {
        let msg = ServerMessage::relay(PlayerId::from("p1"), r#"{"type":"chat","payload":"hi"}"#);
        let value: serde_json::Value = serde_json::from_str(&msg.to_json()).unwrap();
        assert_eq!(
            value,
            json!({"type": "relay", "from": "p1", "payload": "{\"type\":\"chat\",\"payload\":\"hi\"}"})
        );
    }

    #[test]
    fn test_disconnect_shape() {
        let msg = ServerMessage::player_disconnected(PlayerId::from("p2"));
        let value: serde_json::Value = serde_json::from_str(&msg.to_json()).unwrap();
        assert_eq!(value, json!({"type": "player:disconnected", "payload": {"playerId": "p2"}}));
    }

    #[test]
    fn test_parse_interpreted_types() {
        let life = InboundMessage::parse(r#"{"type":"life:update","payload":{"playerId":"p1","value":33}}"#);
        assert_eq!(
            life,
            Some(InboundMessage::LifeUpdate(LifeUpdatePayload {
                player_id: PlayerId::from("p1"),
                value: 33
            }))
        );

        let event = InboundMessage::parse(
            r#"{"type":"game:event","payload":{"playerId":"p1","event":{"type":"DRAW_CARDS","count":1}}}"#,
        );
        assert!(matches!(event, Some(InboundMessage::GameEvent(p)) if p.event == GameEvent::draw(1)));
    }

    #[test]
    fn test_other_messages_are_not_interpreted() {
        assert_eq!(InboundMessage::parse(r#"{"type":"chat","payload":"gg"}"#), None);
        assert_eq!(InboundMessage::parse("not json at all"), None);
        assert_eq!(InboundMessage::parse(r#"{"type":"life:update","payload":{"value":3}}"#), None);
    }
}
