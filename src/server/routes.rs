//! HTTP session control plane

use crate::server::state::{AppState, CreateSessionRequest, JoinSessionRequest};
use crate::session::{PublicSession, SessionResponse};
use crate::TableError;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

impl IntoResponse for TableError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            warn!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub async fn health() -> &'static str {
    "ok"
}

/// Read a request body as JSON whatever its content type
///
/// A body that does not parse reads as an empty request, so it fails field
/// validation with a 400 like any other incomplete request.
fn lenient_body<T: DeserializeOwned + Default>(body: &Bytes) -> T {
    serde_json::from_slice(body).unwrap_or_else(|e| {
        debug!(error = %e, "unparseable request body");
        T::default()
    })
}

pub async fn create_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SessionResponse>, TableError> {
    let request: CreateSessionRequest = lenient_body(&body);
    state.create_session(request).await.map(Json)
}

pub async fn join_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SessionResponse>, TableError> {
    let request: JoinSessionRequest = lenient_body(&body);
    state.join_session(request).await.map(Json)
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    id: Option<String>,
}

pub async fn get_session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<PublicSession>, TableError> {
    state.public_session(query.id.as_deref()).map(Json)
}
