//! Effect targeting.
//!
//! - `TargetSpec`: which card(s) a template refers to, relative to the
//!   ability's source and the event that fired it
//! - `PlayerSpec`: which player(s) a template refers to
//! - `CardFilter`: a predicate over cards, relative to a choosing player
//! - `Selector`: a filter bound to a chooser and source; enumerates candidates

use serde::{Deserialize, Serialize};

use crate::abilities::KeywordKind;
use crate::core::{EntityId, PlayerId};
use crate::rules::GameView;
use crate::zones::{Zone, ZoneId};

/// Which card a template acts on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetSpec {
    /// The ability's source card.
    This,
    /// The event's subject card (the character that quested, the card that
    /// was played, ...).
    EventSubject,
    /// The event's other card (the defender of a challenge, ...).
    EventOther,
    /// One card matching the filter, chosen by the controller.
    Chosen(CardFilter),
    /// Every card matching the filter when the effect is created.
    EachMatching(CardFilter),
}

/// Which player a template acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSpec {
    /// The ability's controller.
    Controller,
    /// Every other player.
    EachOpponent,
    /// The player the event is about.
    EventPlayer,
}

/// Whose cards a filter accepts, relative to the chooser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Friendly,
    Opposing,
    Any,
}

impl Side {
    fn accepts(self, chooser: PlayerId, controller: PlayerId) -> bool {
        match self {
            Side::Friendly => chooser == controller,
            Side::Opposing => chooser != controller,
            Side::Any => true,
        }
    }
}

/// A predicate over cards.
///
/// ```
/// use lore_engine::effects::CardFilter;
///
/// let filter = CardFilter::opposing_characters().exerted(true).damaged(false);
/// assert_eq!(filter.exerted, Some(true));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardFilter {
    pub side: Side,
    pub zone: Zone,
    /// Skip the ability's source card.
    #[serde(default)]
    pub exclude_self: bool,
    #[serde(default)]
    pub exerted: Option<bool>,
    #[serde(default)]
    pub damaged: Option<bool>,
}

impl CardFilter {
    #[must_use]
    pub const fn new(side: Side, zone: Zone) -> Self {
        Self {
            side,
            zone,
            exclude_self: false,
            exerted: None,
            damaged: None,
        }
    }

    #[must_use]
    pub const fn friendly_characters() -> Self {
        Self::new(Side::Friendly, Zone::Characters)
    }

    /// Friendly characters other than the source.
    #[must_use]
    pub const fn other_friendly_characters() -> Self {
        Self::friendly_characters().excluding_self()
    }

    #[must_use]
    pub const fn opposing_characters() -> Self {
        Self::new(Side::Opposing, Zone::Characters)
    }

    #[must_use]
    pub const fn any_character() -> Self {
        Self::new(Side::Any, Zone::Characters)
    }

    #[must_use]
    pub const fn excluding_self(mut self) -> Self {
        self.exclude_self = true;
        self
    }

    #[must_use]
    pub const fn exerted(mut self, exerted: bool) -> Self {
        self.exerted = Some(exerted);
        self
    }

    #[must_use]
    pub const fn damaged(mut self, damaged: bool) -> Self {
        self.damaged = Some(damaged);
        self
    }

    fn zones(&self, chooser: PlayerId, player_count: usize) -> Vec<ZoneId> {
        match self.zone {
            Zone::Locations => vec![ZoneId::locations()],
            zone => PlayerId::turn_order(chooser, player_count)
                .map(|p| ZoneId::player(p, zone))
                .collect(),
        }
    }
}

/// A filter bound to the player who chooses and the card asking.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selector {
    pub filter: CardFilter,
    pub chooser: PlayerId,
    pub source: Option<EntityId>,
}

impl Selector {
    #[must_use]
    pub fn new(filter: CardFilter, chooser: PlayerId) -> Self {
        Self {
            filter,
            chooser,
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    /// Does `entity` satisfy the filter right now? Ward plays no part here;
    /// "each" effects reach warded cards.
    #[must_use]
    pub fn matches(&self, view: &GameView<'_>, entity: EntityId) -> bool {
        let Some(card) = view.state.card(entity) else {
            return false;
        };
        let filter = &self.filter;

        card.zone.zone() == filter.zone
            && filter.side.accepts(self.chooser, card.controller)
            && !(filter.exclude_self && self.source == Some(entity))
            && filter.exerted.map_or(true, |e| card.exerted == e)
            && filter.damaged.map_or(true, |d| card.is_damaged() == d)
    }

    /// Can the chooser pick `entity`? Cards with Ward cannot be chosen by
    /// their opponents.
    #[must_use]
    pub fn choosable(&self, view: &GameView<'_>, entity: EntityId) -> bool {
        self.matches(view, entity)
            && !view
                .state
                .card(entity)
                .map_or(false, |card| card.controller != self.chooser && view.has_keyword(entity, KeywordKind::Ward))
    }

    /// Every card that satisfies the selector, chooser's cards first, then
    /// the other players in turn order, each in board order.
    #[must_use]
    pub fn candidates(&self, view: &GameView<'_>) -> Vec<EntityId> {
        self.filter
            .zones(self.chooser, view.state.player_count())
            .into_iter()
            .flat_map(|zone| view.state.cards_in(zone))
            .filter(|&entity| self.matches(view, entity))
            .collect()
    }

    /// The candidates the chooser may actually pick, in the same order.
    #[must_use]
    pub fn choices(&self, view: &GameView<'_>) -> Vec<EntityId> {
        self.candidates(view)
            .into_iter()
            .filter(|&entity| self.choosable(view, entity))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::{Ability, Keyword};
    use crate::cards::{CardCatalog, CardDefinition, CardId, InkColor};
    use crate::core::{GameState, RulesConfig};
    use crate::triggers::AbilityRegistry;
    use crate::zones::ZonePosition;

    struct Board {
        catalog: CardCatalog,
        state: GameState,
        registry: AbilityRegistry,
        config: RulesConfig,
    }

    impl Board {
        fn new() -> Self {
            let catalog = CardCatalog::new()
                .with_card(CardDefinition::character(CardId(1), "Plain", 1, InkColor::Amber, 1, 3, 1))
                .with_card(
                    CardDefinition::character(CardId(2), "Warded", 1, InkColor::Amber, 1, 3, 1)
                        .with_ability(Ability::Keyword(Keyword::Ward)),
                );
            Self {
                catalog,
                state: GameState::new(2, PlayerId(0), 1),
                registry: AbilityRegistry::new(),
                config: RulesConfig::default(),
            }
        }

        fn place(&mut self, card: u32, owner: u8) -> EntityId {
            let zone = ZoneId::player(PlayerId(owner), Zone::Characters);
            let entity = self
                .state
                .create_card(CardId(card), PlayerId(owner), zone, ZonePosition::Top)
                .unwrap();
            let def = self.catalog.get(CardId(card)).unwrap();
            self.registry.register(entity, def, zone);
            entity
        }

        fn view(&self) -> GameView<'_> {
            GameView::new(&self.catalog, &self.state, &self.registry, &self.config)
        }
    }

    #[test]
    fn test_sides_and_order() {
        let mut board = Board::new();
        let theirs = board.place(1, 1);
        let mine = board.place(1, 0);
        let view = board.view();

        let any = Selector::new(CardFilter::any_character(), PlayerId(0));
        assert_eq!(any.candidates(&view), vec![mine, theirs]);

        let opposing = Selector::new(CardFilter::opposing_characters(), PlayerId(0));
        assert_eq!(opposing.candidates(&view), vec![theirs]);
    }

    #[test]
    fn test_exclude_self() {
        let mut board = Board::new();
        let a = board.place(1, 0);
        let b = board.place(1, 0);
        let view = board.view();

        let selector = Selector::new(CardFilter::other_friendly_characters(), PlayerId(0)).with_source(a);
        assert_eq!(selector.candidates(&view), vec![b]);
    }

    #[test]
    fn test_ward_blocks_opponents_only() {
        let mut board = Board::new();
        let warded = board.place(2, 1);
        let view = board.view();

        let opponent = Selector::new(CardFilter::any_character(), PlayerId(0));
        assert!(!opponent.choosable(&view, warded));
        assert!(opponent.choices(&view).is_empty());

        let owner = Selector::new(CardFilter::any_character(), PlayerId(1));
        assert!(owner.choosable(&view, warded));
    }

    #[test]
    fn test_ward_still_matches_each_effects() {
        let mut board = Board::new();
        let plain = board.place(1, 1);
        let warded = board.place(2, 1);
        let view = board.view();

        let opposing = Selector::new(CardFilter::opposing_characters(), PlayerId(0));
        assert!(opposing.matches(&view, warded));
        assert_eq!(opposing.candidates(&view), vec![plain, warded]);
        assert_eq!(opposing.choices(&view), vec![plain]);
    }

    #[test]
    fn test_state_filters() {
        let mut board = Board::new();
        let tired = board.place(1, 1);
        let hurt = board.place(1, 1);
        board.state.card_mut(tired).unwrap().exerted = true;
        board.state.card_mut(hurt).unwrap().damage = 1;
        let view = board.view();

        let exerted = Selector::new(CardFilter::opposing_characters().exerted(true), PlayerId(0));
        assert_eq!(exerted.candidates(&view), vec![tired]);

        let damaged = Selector::new(CardFilter::opposing_characters().damaged(true), PlayerId(0));
        assert_eq!(damaged.candidates(&view), vec![hurt]);
    }
}
