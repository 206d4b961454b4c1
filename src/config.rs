//! Server configuration, resolved from the command line and environment

use crate::loader::database::SCRYFALL_API;
use crate::loader::{CardCatalog, CardSource, ScryfallClient};
use crate::{Result, TableError};
use clap::ValueEnum;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Where deck-list names are looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CardSourceMode {
    /// Exact-name lookups against the Scryfall API
    Scryfall,
    /// A JSON card file loaded at start-up
    File,
    /// Every name resolves to a placeholder card
    #[default]
    Offline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Browser origin allowed by CORS
    pub allowed_origin: String,
    pub starting_life: i32,
    pub card_source: CardSourceMode,
    /// Required when `card_source` is `File`
    pub card_file: Option<PathBuf>,
    /// Fixed seed for deck shuffles
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
            allowed_origin: "http://localhost:5173".to_string(),
            starting_life: 40,
            card_source: CardSourceMode::Offline,
            card_file: None,
            seed: None,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    /// Build the configured card source, loading the card file if needed
    pub async fn card_source(&self) -> Result<CardSource> {
        match self.card_source {
            CardSourceMode::Offline => Ok(CardSource::Offline),
            CardSourceMode::Scryfall => Ok(CardSource::Scryfall(ScryfallClient::new(SCRYFALL_API)?)),
            CardSourceMode::File => {
                let path = self
                    .card_file
                    .as_deref()
                    .ok_or(TableError::MissingField("card file"))?;
                Ok(CardSource::Catalog(CardCatalog::load_from_file(path).await?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
        assert_eq!(config.starting_life, 40);
        assert_eq!(config.card_source, CardSourceMode::Offline);
    }

    #[tokio::test]
    async fn test_file_mode_needs_a_path() {
        let config = ServerConfig {
            card_source: CardSourceMode::File,
            ..ServerConfig::default()
        };
        assert!(matches!(
            config.card_source().await,
            Err(TableError::MissingField("card file"))
        ));
    }

    #[tokio::test]
    async fn test_file_mode_loads_catalog() {
        let path = std::env::temp_dir().join(format!("mtg-table-cards-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"[{"name":"Forest","typeLine":"Basic Land"}]"#).unwrap();
        let config = ServerConfig {
            card_source: CardSourceMode::File,
            card_file: Some(path.clone()),
            ..ServerConfig::default()
        };
        match config.card_source().await.unwrap() {
            CardSource::Catalog(catalog) => assert_eq!(catalog.len(), 1),
            other => panic!("expected catalog, got {other:?}"),
        }
        let _ = std::fs::remove_file(path);
    }
}
