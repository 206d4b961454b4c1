//! HTTP + WebSocket server

pub mod routes;
pub mod state;
pub mod ws;

pub use state::{AppState, CreateSessionRequest, JoinSessionRequest, Table};

use crate::config::ServerConfig;
use crate::Result;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

fn cors(allowed_origin: &str) -> CorsLayer {
    let origin = match HeaderValue::from_str(allowed_origin) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) => {
            warn!(origin = allowed_origin, "invalid CORS origin, allowing any");
            AllowOrigin::from(Any)
        }
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/healthz", get(routes::health))
        .route("/api/session", post(routes::create_session).get(routes::get_session))
        .route("/api/session/join", post(routes::join_session))
        .route("/ws", get(ws::ws_handler))
        .layer(cors(&config.allowed_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("could not install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

/// Bind and serve until ctrl-c
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = AppState::from_config(&config).await?;
    let app = build_router(state, &config);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, card_source = ?config.card_source, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
