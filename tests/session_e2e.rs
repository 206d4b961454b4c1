//! Session lifecycle through the registry and deck import

use mtg_table::core::{CardData, PlayerId, SessionId};
use mtg_table::loader::{CardCatalog, CardSource, DeckImporter};
use mtg_table::session::SessionRegistry;
use mtg_table::zones::Zone;
use mtg_table::{Result, TableError};

fn basic_lands() -> CardSource {
    let catalog: CardCatalog = ["Forest", "Island", "Swamp"]
        .into_iter()
        .map(CardData::named)
        .collect();
    CardSource::Catalog(catalog)
}

#[tokio::test]
async fn test_two_card_deck_scenario() -> Result<()> {
    let source = basic_lands();
    let mut registry = SessionRegistry::new(40, Some(42));

    let deck = DeckImporter::new(&source).resolve("1x Forest\n1x Island").await?;
    let response = registry.open_session("Alice", deck);

    let player = &response.player;
    assert_eq!(player.name.as_str(), "Alice");
    assert_eq!(player.deck.library().len(), 2);
    assert!(player.deck.commanders().is_empty());
    assert!(player.deck.attractions().is_empty());
    assert!(player.deck.stickers().is_empty());
    assert!(player.deck.errors.is_empty());

    let public = registry.public_session(&response.session_id)?;
    assert_eq!(public.players.len(), 1);
    assert_eq!(public.players[0].zone_sizes.get(&Zone::Library), Some(&2));
    Ok(())
}

#[tokio::test]
async fn test_join_unknown_session() {
    let source = basic_lands();
    let mut registry = SessionRegistry::new(40, None);
    registry.create_session();

    let deck = DeckImporter::new(&source).resolve("1 Forest").await.unwrap();
    let result = registry.join_session(&SessionId::from("nonexistent-id"), "Alice", deck);

    assert!(matches!(result, Err(TableError::SessionNotFound(_))));
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_partial_import_still_seats_player() -> Result<()> {
    let source = basic_lands();
    let mut registry = SessionRegistry::new(20, Some(1));

    let deck = DeckImporter::new(&source)
        .resolve("10 Forest\n1 Imaginary Dragon\n1 Swamp [Commander{top}]")
        .await?;
    let response = registry.open_session("Alice", deck);
    let deck = &response.player.deck;

    assert_eq!(deck.library().len(), 10);
    assert_eq!(deck.commanders().len(), 1);
    assert!(deck.commanders()[0].is_commander);
    assert_eq!(
        deck.errors,
        vec!["Card Imaginary Dragon could not be found (1x times)".to_string()]
    );
    assert_eq!(response.player.life, 20);

    let members: Vec<PlayerId> = registry
        .get(&response.session_id)?
        .players()
        .iter()
        .map(|p| p.id.clone())
        .collect();
    assert_eq!(members, vec![response.player.id.clone()]);
    Ok(())
}
