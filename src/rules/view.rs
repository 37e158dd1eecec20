//! Read-only rules queries.
//!
//! `GameView` bundles the catalog, state, ability registry and config so
//! rules code can ask for *effective* values: printed stats plus temporary
//! modifiers plus every live static ability that applies. The validator,
//! checker, selectors and trigger conditions all read state through it.

use smallvec::SmallVec;

use crate::abilities::{Applicability, Keyword, KeywordKind, Stat, StatLine, StaticCondition, StaticEffect};
use crate::cards::{CardCatalog, CardDefinition, CardInstance, InkColor};
use crate::core::{EntityId, GameState, PlayerId, RulesConfig};
use crate::triggers::{AbilityRegistry, LiveStatic};
use crate::zones::Zone;

/// Borrowed view over one game.
#[derive(Clone, Copy)]
pub struct GameView<'a> {
    pub catalog: &'a CardCatalog,
    pub state: &'a GameState,
    pub registry: &'a AbilityRegistry,
    pub config: &'a RulesConfig,
}

impl<'a> GameView<'a> {
    #[must_use]
    pub fn new(
        catalog: &'a CardCatalog,
        state: &'a GameState,
        registry: &'a AbilityRegistry,
        config: &'a RulesConfig,
    ) -> Self {
        Self {
            catalog,
            state,
            registry,
            config,
        }
    }

    #[must_use]
    pub fn card(&self, entity: EntityId) -> Option<&'a CardInstance> {
        self.state.card(entity)
    }

    /// The printed definition of an instance.
    #[must_use]
    pub fn definition(&self, entity: EntityId) -> Option<&'a CardDefinition> {
        let card = self.state.card(entity)?;
        self.catalog.get(card.card_id)
    }

    #[must_use]
    pub fn controller_of(&self, entity: EntityId) -> Option<PlayerId> {
        self.state.card(entity).map(|c| c.controller)
    }

    /// In play and not entered this turn.
    #[must_use]
    pub fn is_dry(&self, entity: EntityId) -> bool {
        self.state
            .card(entity)
            .map_or(false, |c| c.is_in_play() && !c.is_drying(self.state.turn_number))
    }

    // === Stats ===

    #[must_use]
    pub fn effective_strength(&self, entity: EntityId) -> u32 {
        self.effective_stat(entity, Stat::Strength)
    }

    #[must_use]
    pub fn effective_willpower(&self, entity: EntityId) -> u32 {
        self.effective_stat(entity, Stat::Willpower)
    }

    #[must_use]
    pub fn effective_lore(&self, entity: EntityId) -> u32 {
        self.effective_stat(entity, Stat::Lore)
    }

    /// Printed value plus temporary and static modifiers, clamped at 0.
    ///
    /// Cards out of play report their last-known value when they have one.
    #[must_use]
    pub fn effective_stat(&self, entity: EntityId, stat: Stat) -> u32 {
        let (Some(card), Some(def)) = (self.state.card(entity), self.definition(entity)) else {
            return 0;
        };
        if !card.is_in_play() {
            return card.last_known.map_or_else(|| base_stat(def, stat), |line| line.get(stat));
        }

        let statics: i32 = self
            .applicable_statics(entity)
            .filter_map(|s| match s.effect {
                StaticEffect::ModifyStat { stat: st, delta } if st == stat => Some(delta),
                _ => None,
            })
            .sum();
        let total = i64::from(base_stat(def, stat)) + i64::from(card.stat_delta(stat)) + i64::from(statics);
        u32::try_from(total.max(0)).unwrap_or(u32::MAX)
    }

    /// All three stats at once, for last-known capture.
    #[must_use]
    pub fn stat_line(&self, entity: EntityId) -> StatLine {
        StatLine {
            strength: self.effective_strength(entity),
            willpower: self.effective_willpower(entity),
            lore: self.effective_lore(entity),
        }
    }

    /// Ink cost after static cost modifiers, clamped at 0.
    #[must_use]
    pub fn effective_cost(&self, entity: EntityId) -> u32 {
        let Some(def) = self.definition(entity) else {
            return 0;
        };
        let delta: i32 = self
            .applicable_statics(entity)
            .filter_map(|s| match s.effect {
                StaticEffect::ModifyCost { delta } => Some(delta),
                _ => None,
            })
            .sum();
        u32::try_from((i64::from(def.cost) + i64::from(delta)).max(0)).unwrap_or(u32::MAX)
    }

    // === Keywords ===

    /// Printed, granted and statically granted keywords.
    #[must_use]
    pub fn keywords(&self, entity: EntityId) -> SmallVec<[Keyword; 4]> {
        let mut keywords: SmallVec<[Keyword; 4]> = self.registry.keywords_of(entity).iter().copied().collect();
        if let Some(card) = self.state.card(entity) {
            keywords.extend(card.granted_keywords());
        }
        keywords.extend(self.applicable_statics(entity).filter_map(|s| match s.effect {
            StaticEffect::GrantKeyword(k) => Some(k),
            _ => None,
        }));
        keywords
    }

    #[must_use]
    pub fn has_keyword(&self, entity: EntityId, kind: KeywordKind) -> bool {
        self.keywords(entity).iter().any(|k| k.kind() == kind)
    }

    /// Combined value of a valued keyword: summed for stacking keywords,
    /// otherwise the highest instance. `None` if the card lacks it.
    #[must_use]
    pub fn keyword_value(&self, entity: EntityId, kind: KeywordKind) -> Option<u32> {
        let values = self
            .keywords(entity)
            .into_iter()
            .filter(|k| k.kind() == kind)
            .filter_map(Keyword::value);
        if kind.stacks() {
            values.reduce(|a, b| a.saturating_add(b))
        } else {
            values.max()
        }
    }

    // === Ink ===

    /// Ready cards in the player's inkwell.
    #[must_use]
    pub fn available_ink(&self, player: PlayerId) -> u32 {
        let count = self
            .state
            .cards_in(self.state.zone(player, Zone::Inkwell))
            .filter(|e| self.state.card(*e).map_or(false, |c| !c.exerted))
            .count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Any inkwell card, ready or not, of this color.
    #[must_use]
    pub fn inkwell_has_color(&self, player: PlayerId, color: InkColor) -> bool {
        self.state
            .cards_in(self.state.zone(player, Zone::Inkwell))
            .filter_map(|e| self.definition(e))
            .any(|def| def.color == color)
    }

    // === Statics ===

    /// Live static abilities that currently apply to `entity`.
    pub fn applicable_statics(&self, entity: EntityId) -> impl Iterator<Item = &'a LiveStatic> + 'a {
        let view = *self;
        self.registry.statics().filter(move |s| view.static_applies(s, entity))
    }

    fn static_applies(&self, live: &LiveStatic, target: EntityId) -> bool {
        let (Some(source), Some(card)) = (self.state.card(live.source), self.state.card(target)) else {
            return false;
        };

        let switched_on = match live.condition {
            StaticCondition::Always => true,
            StaticCondition::DuringYourTurn => self.state.active_player == source.controller,
            StaticCondition::WhileExerted => source.exerted,
            StaticCondition::WhileDamaged => source.is_damaged(),
        };
        if !switched_on {
            return false;
        }

        let is_character = card.zone.zone() == Zone::Characters;
        let friendly = card.controller == source.controller;
        match live.applies_to {
            Applicability::This => target == live.source,
            Applicability::OtherFriendlyCharacters => target != live.source && friendly && is_character,
            Applicability::FriendlyCharacters => friendly && is_character,
            Applicability::OpposingCharacters => !friendly && is_character,
            Applicability::FriendlyCardsInHand(kind) => {
                card.zone == self.state.zone(source.controller, Zone::Hand)
                    && kind.map_or(true, |tag| {
                        self.catalog.get(card.card_id).map_or(false, |def| def.kind.tag() == tag)
                    })
            }
        }
    }
}

fn base_stat(def: &CardDefinition, stat: Stat) -> u32 {
    match stat {
        Stat::Strength => def.base_strength(),
        Stat::Willpower => def.kind.as_damageable().map_or(0, |d| d.willpower()),
        Stat::Lore => def.base_lore(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::{Ability, Duration, Modifier, StaticAbility};
    use crate::cards::{CardId, CardKindTag};
    use crate::zones::{ZoneId, ZonePosition};

    struct Table {
        catalog: CardCatalog,
        state: GameState,
        registry: AbilityRegistry,
        config: RulesConfig,
    }

    impl Table {
        fn new() -> Self {
            let catalog = CardCatalog::new()
                .with_card(CardDefinition::character(CardId(1), "Squire", 2, InkColor::Steel, 2, 3, 1))
                .with_card(
                    CardDefinition::character(CardId(2), "Captain", 4, InkColor::Steel, 3, 4, 2)
                        .with_ability(Ability::Keyword(Keyword::Resist(1)))
                        .with_ability(
                            StaticAbility::new(
                                "LEAD",
                                StaticEffect::ModifyStat {
                                    stat: Stat::Strength,
                                    delta: 1,
                                },
                                Applicability::OtherFriendlyCharacters,
                            )
                            .into(),
                        )
                        .with_ability(
                            StaticAbility::new(
                                "DISCOUNT",
                                StaticEffect::ModifyCost { delta: -1 },
                                Applicability::FriendlyCardsInHand(Some(CardKindTag::Character)),
                            )
                            .when(StaticCondition::DuringYourTurn)
                            .into(),
                        ),
                )
                .with_card(CardDefinition::item(CardId(3), "Lantern", 1, InkColor::Amber));
            Self {
                catalog,
                state: GameState::new(2, PlayerId(0), 1),
                registry: AbilityRegistry::new(),
                config: RulesConfig::default(),
            }
        }

        fn put(&mut self, card: u32, owner: u8, zone: Zone) -> EntityId {
            let zone = ZoneId::player(PlayerId(owner), zone);
            let e = self
                .state
                .create_card(CardId(card), PlayerId(owner), zone, ZonePosition::Top)
                .unwrap();
            self.registry.register(e, self.catalog.get(CardId(card)).unwrap(), zone);
            e
        }

        fn view(&self) -> GameView<'_> {
            GameView::new(&self.catalog, &self.state, &self.registry, &self.config)
        }
    }

    #[test]
    fn test_static_buff_applies_to_others_only() {
        let mut t = Table::new();
        let squire = t.put(1, 0, Zone::Characters);
        let captain = t.put(2, 0, Zone::Characters);
        let enemy = t.put(1, 1, Zone::Characters);

        let view = t.view();
        assert_eq!(view.effective_strength(squire), 3);
        assert_eq!(view.effective_strength(captain), 3);
        assert_eq!(view.effective_strength(enemy), 2);
    }

    #[test]
    fn test_temporary_modifiers_clamp_at_zero() {
        let mut t = Table::new();
        let squire = t.put(1, 0, Zone::Characters);
        t.state
            .card_mut(squire)
            .unwrap()
            .add_modifier(Modifier::stat(Stat::Strength, -5, Duration::EndOfTurn));
        assert_eq!(t.view().effective_strength(squire), 0);
    }

    #[test]
    fn test_cost_discount_only_on_your_turn() {
        let mut t = Table::new();
        t.put(2, 0, Zone::Characters);
        let in_hand = t.put(1, 0, Zone::Hand);
        let item = t.put(3, 0, Zone::Hand);

        assert_eq!(t.view().effective_cost(in_hand), 1);
        assert_eq!(t.view().effective_cost(item), 1);

        t.state.active_player = PlayerId(1);
        assert_eq!(t.view().effective_cost(in_hand), 2);
    }

    #[test]
    fn test_keyword_values() {
        let mut t = Table::new();
        let captain = t.put(2, 0, Zone::Characters);
        t.state
            .card_mut(captain)
            .unwrap()
            .add_modifier(Modifier::keyword(Keyword::Resist(2), Duration::EndOfTurn));

        let view = t.view();
        assert_eq!(view.keyword_value(captain, KeywordKind::Resist), Some(3));
        assert!(view.has_keyword(captain, KeywordKind::Resist));
        assert_eq!(view.keyword_value(captain, KeywordKind::Singer), None);
    }

    #[test]
    fn test_last_known_out_of_play() {
        let mut t = Table::new();
        let squire = t.put(1, 0, Zone::Discard);
        assert_eq!(t.view().effective_strength(squire), 2);

        t.state.card_mut(squire).unwrap().last_known = Some(StatLine {
            strength: 5,
            willpower: 3,
            lore: 1,
        });
        assert_eq!(t.view().effective_strength(squire), 5);
    }

    #[test]
    fn test_available_ink_counts_ready_cards() {
        let mut t = Table::new();
        let a = t.put(1, 0, Zone::Inkwell);
        t.put(3, 0, Zone::Inkwell);
        t.state.card_mut(a).unwrap().exerted = true;

        let view = t.view();
        assert_eq!(view.available_ink(PlayerId(0)), 1);
        assert!(view.inkwell_has_color(PlayerId(0), InkColor::Steel));
        assert!(!view.inkwell_has_color(PlayerId(0), InkColor::Ruby));
    }

    #[test]
    fn test_drying() {
        let mut t = Table::new();
        t.state.turn_number = 3;
        let squire = t.put(1, 0, Zone::Characters);
        t.state.card_mut(squire).unwrap().entered_turn = Some(3);
        assert!(!t.view().is_dry(squire));

        t.state.turn_number = 4;
        assert!(t.view().is_dry(squire));
    }
}
