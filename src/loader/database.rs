//! Card sources used to resolve deck-list names into card data
//!
//! Three modes:
//! 1. Offline: every name resolves to a placeholder record carrying only the name
//! 2. Catalog: a JSON card file loaded once at start-up
//! 3. Scryfall: exact-name lookups against the Scryfall HTTP API

use crate::core::{CardData, CardName};
use crate::Result;
use futures::future::join_all;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

pub const SCRYFALL_API: &str = "https://api.scryfall.com";

/// In-memory card catalog keyed by normalised card name
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: FxHashMap<String, CardData>,
}

impl CardCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, card: CardData) {
        self.cards.insert(card.name.lookup_key(), card);
    }

    pub fn get(&self, name: &CardName) -> Option<&CardData> {
        self.cards.get(&name.lookup_key())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Parse a JSON array of card records
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<CardData> = serde_json::from_str(json)?;
        Ok(records.into_iter().collect())
    }

    /// Load a JSON card file
    pub async fn load_from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let catalog = Self::from_json_str(&content)?;
        debug!(path = %path.display(), cards = catalog.len(), "loaded card catalog");
        Ok(catalog)
    }
}

impl FromIterator<CardData> for CardCatalog {
    fn from_iter<I: IntoIterator<Item = CardData>>(iter: I) -> Self {
        let mut catalog = CardCatalog::new();
        for card in iter {
            catalog.insert(card);
        }
        catalog
    }
}

/// Subset of a Scryfall card object the table uses
#[derive(Debug, Deserialize)]
struct ScryfallCard {
    id: String,
    name: String,
    #[serde(default)]
    mana_cost: Option<String>,
    #[serde(default)]
    cmc: f32,
    #[serde(default)]
    type_line: String,
    #[serde(default)]
    oracle_text: Option<String>,
    #[serde(default)]
    image_uris: Option<ScryfallImages>,
    #[serde(default)]
    card_faces: Vec<ScryfallFace>,
}

#[derive(Debug, Deserialize)]
struct ScryfallImages {
    normal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScryfallFace {
    #[serde(default)]
    mana_cost: Option<String>,
    #[serde(default)]
    oracle_text: Option<String>,
    #[serde(default)]
    image_uris: Option<ScryfallImages>,
}

impl From<ScryfallCard> for CardData {
    fn from(card: ScryfallCard) -> Self {
        // Double-faced cards keep cost, text and image on their faces
        let front = card.card_faces.into_iter().next();
        let (face_cost, face_text, face_image) = match front {
            Some(f) => (f.mana_cost, f.oracle_text, f.image_uris.and_then(|i| i.normal)),
            None => (None, None, None),
        };
        CardData {
            name: CardName::new(card.name),
            mana_cost: card.mana_cost.or(face_cost).unwrap_or_default(),
            cmc: card.cmc,
            type_line: card.type_line,
            oracle_text: card.oracle_text.or(face_text).unwrap_or_default(),
            image_uri: card.image_uris.and_then(|i| i.normal).or(face_image),
            database_id: Some(card.id),
        }
    }
}

/// HTTP client for the Scryfall card API
#[derive(Debug, Clone)]
pub struct ScryfallClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScryfallClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("mtg-table/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(ScryfallClient {
            http,
            base_url: base_url.into(),
        })
    }

    /// Exact-name lookup; `Ok(None)` when Scryfall has no such card
    pub async fn get_card(&self, name: &CardName) -> Result<Option<CardData>> {
        let url = format!("{}/cards/named", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .get(url)
            .query(&[("exact", name.as_str())])
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let card: ScryfallCard = response.error_for_status()?.json().await?;
        Ok(Some(card.into()))
    }
}

/// Where card names are resolved
#[derive(Debug, Clone)]
pub enum CardSource {
    Offline,
    Catalog(CardCatalog),
    Scryfall(ScryfallClient),
}

impl CardSource {
    /// Resolve one name. Offline mode always succeeds.
    pub async fn lookup(&self, name: &CardName) -> Result<Option<CardData>> {
        match self {
            CardSource::Offline => Ok(Some(CardData::named(name.clone()))),
            CardSource::Catalog(catalog) => Ok(catalog.get(name).cloned()),
            CardSource::Scryfall(client) => client.get_card(name).await,
        }
    }

    /// Resolve many names concurrently, keyed by lookup key
    ///
    /// A name whose lookup errors is treated as unresolved: one flaky
    /// request must not sink the whole deck.
    pub async fn lookup_many(&self, names: &[CardName]) -> FxHashMap<String, CardData> {
        let lookups = names.iter().map(|name| async move { (name, self.lookup(name).await) });
        let mut found = FxHashMap::default();
        for (name, outcome) in join_all(lookups).await {
            match outcome {
                Ok(Some(card)) => {
                    found.insert(name.lookup_key(), card);
                }
                Ok(None) => debug!(card = %name, "card not found"),
                Err(err) => warn!(card = %name, error = %err, "card lookup failed"),
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup_is_case_and_accent_insensitive() {
        let catalog = CardCatalog::from_json_str(
            r#"[{"name":"Lim-Dûl's Vault","manaCost":"{U}{B}","typeLine":"Instant"},
                {"name":"Forest","typeLine":"Basic Land — Forest"}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        let vault = catalog.get(&CardName::new("lim-dul's vault")).unwrap();
        assert_eq!(vault.mana_cost, "{U}{B}");
        assert_eq!(catalog.get(&CardName::new("FOREST")).unwrap().type_line, "Basic Land — Forest");
        assert!(catalog.get(&CardName::new("Island")).is_none());
    }

    #[test]
    fn test_scryfall_double_faced_card_uses_front_face() {
        let json = r#"{
            "id": "abc",
            "name": "Delver of Secrets // Insectile Aberration",
            "cmc": 1.0,
            "type_line": "Creature — Human Wizard // Creature — Human Insect",
            "card_faces": [
                {"mana_cost": "{U}", "oracle_text": "At the beginning of your upkeep...",
                 "image_uris": {"normal": "https://img/front.jpg"}},
                {"mana_cost": "", "oracle_text": "Flying"}
            ]
        }"#;
        let card: CardData = serde_json::from_str::<ScryfallCard>(json).unwrap().into();
        assert_eq!(card.mana_cost, "{U}");
        assert_eq!(card.image_uri.as_deref(), Some("https://img/front.jpg"));
        assert_eq!(card.database_id.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_offline_resolves_everything() {
        let source = CardSource::Offline;
        let names = vec![CardName::new("Forest"), CardName::new("Made Up Card")];
        let found = source.lookup_many(&names).await;
        assert_eq!(found.len(), 2);
        assert_eq!(found["made up card"].name.as_str(), "Made Up Card");
    }

    #[tokio::test]
    async fn test_catalog_source_reports_missing() {
        let catalog: CardCatalog = vec![CardData::named("Forest")].into_iter().collect();
        let source = CardSource::Catalog(catalog);
        let found = source
            .lookup_many(&[CardName::new("Forest"), CardName::new("Island")])
            .await;
        assert!(found.contains_key("forest"));
        assert!(!found.contains_key("island"));
    }
}
