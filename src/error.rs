//! Error types for the card table

use crate::core::{PlayerId, SessionId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Player {player} is not a member of session {session}")]
    NotAMember { session: SessionId, player: PlayerId },

    #[error("Missing {0}")]
    MissingField(&'static str),

    #[error("Invalid deck format: {0}")]
    InvalidDeckFormat(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TableError {
    /// HTTP status code this error surfaces as at the session control plane
    pub fn status(&self) -> u16 {
        match self {
            TableError::MissingField(_) | TableError::InvalidDeckFormat(_) => 400,
            TableError::SessionNotFound(_) => 404,
            TableError::NotAMember { .. } => 403,
            _ => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, TableError>;
