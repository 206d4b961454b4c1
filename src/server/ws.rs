//! WebSocket endpoint: authorise on upgrade, then relay until close

use crate::core::{PlayerId, SessionId};
use crate::server::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        Query, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WsQuery {
    session_id: Option<String>,
    player_id: Option<String>,
}

pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> Response {
    let (Some(session), Some(player)) = (query.session_id, query.player_id) else {
        warn!("upgrade rejected: missing sessionId or playerId");
        return StatusCode::FORBIDDEN.into_response();
    };
    let session = SessionId::from(session);
    let player = PlayerId::from(player);

    if let Err(e) = state.authorize(&session, &player) {
        warn!(session = %session, player = %player, error = %e, "upgrade rejected");
        return StatusCode::FORBIDDEN.into_response();
    }

    ws.on_upgrade(move |socket| handle_socket(state, session, player, socket))
}

async fn handle_socket(state: AppState, session: SessionId, player: PlayerId, socket: WebSocket) {
    // The player may have been checked a moment ago but we attach under the lock
    let (connection, mut outbox) = match state.connect(&session, &player) {
        Ok(attached) => attached,
        Err(e) => {
            warn!(session = %session, player = %player, error = %e, "socket dropped before attach");
            return;
        }
    };

    let (mut sink, mut stream) = socket.split();

    // Drains this socket's queue; ends once the hub drops the sender
    let writer = tokio::spawn(async move {
        while let Some(text) = outbox.recv().await {
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    });

    while let Some(frame) = stream.next().await {
        if writer.is_finished() {
            // The hub evicted this socket
            break;
        }
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Binary(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
            Ok(Message::Close(_)) => break,
            Err(e) => {
                debug!(session = %session, %connection, error = %e, "socket read failed");
                break;
            }
        };
        state.handle_inbound(&session, connection, &text);
    }

    state.disconnect(&session, connection);
    let _ = writer.await;
}
