//! Card catalog for definition lookup.
//!
//! The `CardCatalog` stores every card definition a game can reference. It is
//! filled once before setup and shared read-only (behind an `Arc`) by the
//! engine; the core never mutates it mid-game.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardId};

/// Catalog of card definitions.
///
/// ## Example
///
/// ```
/// use lore_engine::cards::{CardCatalog, CardDefinition, CardId, InkColor};
///
/// let catalog = CardCatalog::new()
///     .with_card(CardDefinition::character(CardId::new(1), "Stitch", 2, InkColor::Amber, 2, 2, 1));
///
/// let found = catalog.get(CardId::new(1)).unwrap();
/// assert_eq!(found.name, "Stitch");
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, CardDefinition>,
}

impl CardCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition, returning the one it replaced.
    pub fn insert(&mut self, card: CardDefinition) -> Option<CardDefinition> {
        self.cards.insert(card.id, card)
    }

    #[must_use]
    pub fn with_card(mut self, card: CardDefinition) -> Self {
        self.insert(card);
        self
    }

    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.cards.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All definitions, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }
}

impl FromIterator<CardDefinition> for CardCatalog {
    fn from_iter<I: IntoIterator<Item = CardDefinition>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for card in iter {
            catalog.insert(card);
        }
        catalog
    }
}
