//! Game setup.

use std::sync::Arc;

use crate::cards::{CardCatalog, CardId};
use crate::core::{GameState, PlayerId, RulesConfig};
use crate::error::SetupError;
use crate::triggers::AbilityRegistry;
use crate::zones::{Zone, ZonePosition};

use super::game::Engine;

/// Builds an `Engine` from deck lists.
///
/// One deck per player, seated in the order they were added. `build`
/// shuffles every deck with the seeded RNG, deals opening hands and queues
/// the first turn; call `Engine::run_until_stable` to play up to the first
/// player's Main phase.
///
/// ```
/// use std::sync::Arc;
/// use lore_engine::cards::{CardCatalog, CardDefinition, CardId, InkColor};
/// use lore_engine::core::PlayerId;
/// use lore_engine::engine::{EngineStatus, GameBuilder};
///
/// let catalog = Arc::new(
///     CardCatalog::new().with_card(CardDefinition::character(CardId(1), "Page", 1, InkColor::Amber, 1, 1, 1)),
/// );
/// let mut engine = GameBuilder::new(catalog)
///     .with_seed(42)
///     .with_deck(vec![CardId(1); 20])
///     .with_deck(vec![CardId(1); 20])
///     .build()
///     .unwrap();
/// engine.run_until_stable().unwrap();
///
/// assert_eq!(*engine.status(), EngineStatus::AwaitingMove);
/// assert_eq!(engine.state().active_player, PlayerId(0));
/// ```
#[derive(Clone, Debug)]
pub struct GameBuilder {
    catalog: Arc<CardCatalog>,
    config: RulesConfig,
    seed: u64,
    first_player: PlayerId,
    decks: Vec<Vec<CardId>>,
}

impl GameBuilder {
    #[must_use]
    pub fn new(catalog: Arc<CardCatalog>) -> Self {
        Self {
            catalog,
            config: RulesConfig::default(),
            seed: 0,
            first_player: PlayerId(0),
            decks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RulesConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_first_player(mut self, player: PlayerId) -> Self {
        self.first_player = player;
        self
    }

    /// Seat another player with this deck.
    #[must_use]
    pub fn with_deck(mut self, deck: impl IntoIterator<Item = CardId>) -> Self {
        self.decks.push(deck.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_decks(mut self, decks: Vec<Vec<CardId>>) -> Self {
        self.decks = decks;
        self
    }

    pub fn build(self) -> Result<Engine, SetupError> {
        let player_count = self.decks.len();
        if player_count == 0 || player_count > 255 {
            return Err(SetupError::PlayerCount(player_count));
        }
        if self.first_player.index() >= player_count {
            return Err(SetupError::FirstPlayer {
                first: self.first_player,
                player_count,
            });
        }
        if let Some(unknown) = self.decks.iter().flatten().find(|id| !self.catalog.contains(**id)) {
            return Err(SetupError::UnknownCard(*unknown));
        }

        let mut state = GameState::new(player_count, self.first_player, self.seed);
        let mut shuffler = state.rng.for_context("shuffle");
        for (player, deck) in PlayerId::all(player_count).zip(&self.decks) {
            let zone = state.zone(player, Zone::Deck);
            for card in deck {
                state.create_card(*card, player, zone, ZonePosition::Bottom)?;
            }
            state.zones.shuffle_zone(zone, &mut shuffler);
        }

        for player in PlayerId::turn_order(self.first_player, player_count) {
            let deck = state.zone(player, Zone::Deck);
            let hand = state.zone(player, Zone::Hand);
            for _ in 0..self.config.opening_hand_size {
                let Some(top) = state.zones.top_card(deck) else {
                    break;
                };
                state.move_card(top, hand, ZonePosition::Top);
            }
        }

        let mut registry = AbilityRegistry::new();
        for card in state.cards() {
            if let Some(def) = self.catalog.get(card.card_id) {
                registry.register(card.entity_id, def, card.zone);
            }
        }
        state.check_invariants()?;

        tracing::debug!(
            target: "lore_engine::setup",
            players = player_count,
            cards = state.zones.total_cards(),
            hand = self.config.opening_hand_size,
            "game.built"
        );

        let mut engine = Engine::new(self.catalog, self.config, state, registry, self.seed, self.decks);
        engine.start();
        Ok(engine)
    }
}
