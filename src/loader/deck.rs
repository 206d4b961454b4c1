//! Deck import: deck-list text in, partitioned and shuffled [`Deck`] out
//!
//! Import runs in two halves. [`DeckImporter::resolve`] is async and does the
//! card lookups; [`ResolvedDeckList::build`] is synchronous and needs the
//! RNG, so callers can shuffle while holding their own state lock.

use crate::core::{Card, CardData, CardName, Deck};
use crate::error::{Result, TableError};
use crate::loader::card_line::{parse_deck_list, CardLine, DeckSection};
use crate::loader::database::CardSource;
use crate::zones::{PlayerZones, Zone, ZoneOps};
use rand::Rng;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

/// Most copies a single deck-list line may ask for
pub const MAX_COPIES_PER_LINE: u32 = 250;

/// Most cards a whole deck list may ask for
pub const MAX_DECK_CARDS: u64 = 1000;

/// Outcome of a deck import
///
/// An import with unresolved lines still produces a usable deck; the
/// warnings ride along instead of failing the request.
#[derive(Debug, Clone, PartialEq)]
pub enum DeckImport {
    Complete(Deck),
    Partial { deck: Deck, warnings: Vec<String> },
}

impl DeckImport {
    pub fn deck(&self) -> &Deck {
        match self {
            DeckImport::Complete(deck) | DeckImport::Partial { deck, .. } => deck,
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            DeckImport::Complete(_) => &[],
            DeckImport::Partial { warnings, .. } => warnings,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, DeckImport::Complete(_))
    }

    /// The deck with warnings attached as `errors`, the shape clients expect
    pub fn into_deck(self) -> Deck {
        match self {
            DeckImport::Complete(deck) => deck,
            DeckImport::Partial { mut deck, warnings } => {
                deck.errors = warnings;
                deck
            }
        }
    }
}

/// Deck-list lines paired with whatever the card source found for them
#[derive(Debug, Clone)]
pub struct ResolvedDeckList {
    entries: Vec<(CardLine, Option<CardData>)>,
    warnings: Vec<String>,
}

impl ResolvedDeckList {
    /// Instantiate cards and partition them into zones
    ///
    /// Library, attractions and stickers are shuffled; commanders keep list
    /// order.
    pub fn build(self, rng: &mut impl Rng) -> DeckImport {
        let mut zones = PlayerZones::new();
        let mut warnings = self.warnings;

        for (line, data) in self.entries {
            let Some(data) = data else {
                warnings.push(format!(
                    "Card {} could not be found ({}x times)",
                    line.name,
                    line.copies()
                ));
                continue;
            };

            let section = line.section();
            let zone = match section {
                DeckSection::Commander => Zone::Command,
                DeckSection::Attraction => Zone::Attractions,
                DeckSection::Sticker => Zone::Stickers,
                DeckSection::Library => Zone::Library,
            };
            let copies = (0..line.copies())
                .map(|_| match section {
                    DeckSection::Commander => Card::commander(data.clone()),
                    _ => Card::new(data.clone()),
                })
                .collect();
            zones.push_cards(zone, copies);
        }

        for zone in [Zone::Library, Zone::Attractions, Zone::Stickers] {
            zones.shuffle(zone, rng);
        }

        let deck = Deck::new(zones);
        if warnings.is_empty() {
            DeckImport::Complete(deck)
        } else {
            DeckImport::Partial { deck, warnings }
        }
    }
}

/// Resolves deck input against a card source
pub struct DeckImporter<'a> {
    source: &'a CardSource,
}

impl<'a> DeckImporter<'a> {
    pub fn new(source: &'a CardSource) -> Self {
        DeckImporter { source }
    }

    /// Resolve raw deck input: a deck URL or a newline-delimited card list
    ///
    /// Lists over [`MAX_COPIES_PER_LINE`] or [`MAX_DECK_CARDS`] are rejected
    /// before any lookup happens.
    pub async fn resolve(&self, input: &str) -> Result<ResolvedDeckList> {
        let input = input.trim();
        if input.contains("http") {
            // Deck sites need per-site scraping; the deck starts empty
            return Ok(ResolvedDeckList {
                entries: Vec::new(),
                warnings: vec![format!("Deck URL import is not supported: {input}")],
            });
        }
        let lines = parse_deck_list(input);
        check_copy_limits(&lines)?;
        Ok(self.resolve_lines(lines).await)
    }

    pub async fn resolve_lines(&self, lines: Vec<CardLine>) -> ResolvedDeckList {
        let mut seen = FxHashSet::default();
        let names: Vec<CardName> = lines
            .iter()
            .map(|line| CardName::new(line.name.as_str()))
            .filter(|name| seen.insert(name.lookup_key()))
            .collect();

        let found: FxHashMap<String, CardData> = self.source.lookup_many(&names).await;
        debug!(requested = names.len(), found = found.len(), "resolved deck list");

        let entries = lines
            .into_iter()
            .map(|line| {
                let data = found.get(&CardName::new(line.name.as_str()).lookup_key()).cloned();
                (line, data)
            })
            .collect();
        ResolvedDeckList {
            entries,
            warnings: Vec::new(),
        }
    }
}

fn check_copy_limits(lines: &[CardLine]) -> Result<()> {
    let mut total: u64 = 0;
    for line in lines {
        let copies = line.copies();
        if copies > MAX_COPIES_PER_LINE {
            warn!(card = %line.name, copies, "deck line over copy limit");
            return Err(TableError::InvalidDeckFormat(format!(
                "{} asks for {copies} copies, at most {MAX_COPIES_PER_LINE} are allowed",
                line.name
            )));
        }
        total += u64::from(copies);
    }
    if total > MAX_DECK_CARDS {
        warn!(total, "deck list over card limit");
        return Err(TableError::InvalidDeckFormat(format!(
            "deck asks for {total} cards, at most {MAX_DECK_CARDS} are allowed"
        )));
    }
    Ok(())
}
