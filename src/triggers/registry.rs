//! Ability registry.
//!
//! The registry knows which abilities are live right now. A card's abilities
//! are filed when it enters a zone they work in and removed when it leaves,
//! so dispatching an event only looks at the triggers listening for that
//! event kind instead of scanning the board.
//!
//! - Triggered abilities are indexed by `EventKind`.
//! - Static abilities go into a list consulted by `GameView` stat queries.
//! - Keywords and activated abilities are indexed per card.
//!
//! The Support keyword is filed as a synthesized quest trigger.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::abilities::{
    Ability, AbilityId, Applicability, Keyword, StaticCondition, StaticEffect,
};
use crate::cards::CardDefinition;
use crate::core::{EntityId, PlayerId};
use crate::effects::{CardFilter, EffectTemplate, TargetSpec};
use crate::rules::GameView;
use crate::stack::Priority;
use crate::zones::ZoneId;

use super::condition::{ConditionContext, ConditionEvaluator, TriggerCondition};
use super::event::{EventKind, GameEvent};

/// Which of a card's abilities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AbilitySlot {
    /// An ability printed on the definition.
    Defined(AbilityId),
    /// The trigger synthesized for the Support keyword.
    Support,
}

impl AbilitySlot {
    #[must_use]
    pub fn ability_id(self) -> Option<AbilityId> {
        match self {
            AbilitySlot::Defined(id) => Some(id),
            AbilitySlot::Support => None,
        }
    }
}

/// A live triggered ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AbilityRef {
    pub source: EntityId,
    pub slot: AbilitySlot,
}

/// A live static ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LiveStatic {
    pub source: EntityId,
    pub ability: AbilityId,
    pub effect: StaticEffect,
    pub applies_to: Applicability,
    pub condition: StaticCondition,
}

/// A triggered ability whose condition matched an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingTrigger {
    pub source: EntityId,
    pub controller: PlayerId,
    pub slot: AbilitySlot,
    pub event: GameEvent,
    pub effects: Vec<EffectTemplate>,
    pub optional: bool,
    pub priority: Priority,
}

/// Index of live abilities.
#[derive(Clone, Debug, Default)]
pub struct AbilityRegistry {
    by_event: FxHashMap<EventKind, Vec<AbilityRef>>,
    statics: Vec<LiveStatic>,
    activated: FxHashMap<EntityId, SmallVec<[AbilityId; 2]>>,
    keywords: FxHashMap<EntityId, SmallVec<[Keyword; 4]>>,
    /// Event kinds each card is filed under, for unregistering.
    filed: FxHashMap<EntityId, SmallVec<[EventKind; 2]>>,
}

impl AbilityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// File the abilities of `card` that are live in `zone`.
    pub fn register(&mut self, card: EntityId, def: &CardDefinition, zone: ZoneId) {
        for (idx, ability) in def.abilities.iter().enumerate() {
            if !ability.live_in().contains(zone.zone()) {
                continue;
            }
            let id = AbilityId(idx as u16);
            match ability {
                Ability::Keyword(keyword) => {
                    self.keywords.entry(card).or_default().push(*keyword);
                    if *keyword == Keyword::Support {
                        self.file_trigger(card, EventKind::CharacterQuested, AbilitySlot::Support);
                    }
                }
                Ability::Triggered(trigger) => {
                    self.file_trigger(card, trigger.trigger.event, AbilitySlot::Defined(id));
                }
                Ability::Static(s) => self.statics.push(LiveStatic {
                    source: card,
                    ability: id,
                    effect: s.effect,
                    applies_to: s.applies_to,
                    condition: s.condition,
                }),
                Ability::Activated(_) => self.activated.entry(card).or_default().push(id),
            }
        }
    }

    fn file_trigger(&mut self, card: EntityId, kind: EventKind, slot: AbilitySlot) {
        self.by_event
            .entry(kind)
            .or_default()
            .push(AbilityRef { source: card, slot });
        let kinds = self.filed.entry(card).or_default();
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    /// Remove everything `card` filed.
    pub fn unregister(&mut self, card: EntityId) {
        if let Some(kinds) = self.filed.remove(&card) {
            for kind in kinds {
                if let Some(refs) = self.by_event.get_mut(&kind) {
                    refs.retain(|r| r.source != card);
                }
            }
        }
        self.statics.retain(|s| s.source != card);
        self.activated.remove(&card);
        self.keywords.remove(&card);
    }

    /// Re-file `card` after it moved to `zone`.
    pub fn sync(&mut self, card: EntityId, def: &CardDefinition, zone: ZoneId) {
        self.unregister(card);
        self.register(card, def, zone);
    }

    // === Queries ===

    /// Live keywords printed on `card`.
    #[must_use]
    pub fn keywords_of(&self, card: EntityId) -> &[Keyword] {
        self.keywords.get(&card).map_or(&[], |k| k.as_slice())
    }

    /// Live activated abilities of `card`.
    #[must_use]
    pub fn activated_of(&self, card: EntityId) -> &[AbilityId] {
        self.activated.get(&card).map_or(&[], |a| a.as_slice())
    }

    /// Live static abilities, in registration order.
    pub fn statics(&self) -> impl Iterator<Item = &LiveStatic> {
        self.statics.iter()
    }

    /// Live triggers listening for `kind`.
    #[must_use]
    pub fn listeners(&self, kind: EventKind) -> &[AbilityRef] {
        self.by_event.get(&kind).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn is_registered(&self, card: EntityId) -> bool {
        self.filed.contains_key(&card)
            || self.keywords.contains_key(&card)
            || self.activated.contains_key(&card)
            || self.statics.iter().any(|s| s.source == card)
    }

    // === Dispatch ===

    /// Triggers that fire for `event`, in resolution order.
    ///
    /// Order: the event's subject card first; then the active player's
    /// cards, then the other players in turn order; within a player by zone
    /// and board position; then by ability slot.
    ///
    /// Leaves-play events (`Banished`, `ReturnedToHand`) also check the
    /// subject's own abilities, which are no longer live where it landed.
    #[must_use]
    pub fn dispatch(&self, event: &GameEvent, view: &GameView<'_>) -> Vec<PendingTrigger> {
        let kind = event.kind();
        let mut pending: Vec<PendingTrigger> = self
            .listeners(kind)
            .iter()
            .filter_map(|r| Self::fire(event, view, r.source, r.slot))
            .collect();

        if matches!(kind, EventKind::Banished | EventKind::ReturnedToHand) {
            if let Some(subject) = event.subject() {
                pending.extend(self.look_back(event, view, subject, &pending));
            }
        }

        let active = view.state.active_player;
        let count = view.state.player_count();
        let subject = event.subject();
        pending.sort_by_key(|p| {
            let position = view.state.zones.position_of(p.source).unwrap_or(usize::MAX);
            let zone = view.state.card(p.source).map(|c| c.zone.zone());
            (
                subject != Some(p.source),
                p.controller.seats_after(active, count),
                zone,
                position,
                p.slot,
            )
        });

        if !pending.is_empty() {
            tracing::trace!(
                target: "lore_engine::triggers",
                event = %kind,
                matched = pending.len(),
                "triggers.dispatched"
            );
        }
        pending
    }

    fn look_back(
        &self,
        event: &GameEvent,
        view: &GameView<'_>,
        subject: EntityId,
        already: &[PendingTrigger],
    ) -> Vec<PendingTrigger> {
        let Some(def) = view.definition(subject) else {
            return Vec::new();
        };
        def.abilities
            .iter()
            .enumerate()
            .filter(|(_, ability)| matches!(ability, Ability::Triggered(t) if t.trigger.event == event.kind()))
            .map(|(idx, _)| AbilitySlot::Defined(AbilityId(idx as u16)))
            .filter(|slot| !already.iter().any(|p| p.source == subject && p.slot == *slot))
            .filter_map(|slot| Self::fire(event, view, subject, slot))
            .collect()
    }

    fn fire(event: &GameEvent, view: &GameView<'_>, source: EntityId, slot: AbilitySlot) -> Option<PendingTrigger> {
        let controller = view.state.card(source)?.controller;
        match slot {
            AbilitySlot::Support => {
                let ctx = ConditionContext::new(event, view, source, controller);
                ConditionEvaluator::matches(&TriggerCondition::whenever_quests(), &ctx).then(|| PendingTrigger {
                    source,
                    controller,
                    slot,
                    event: event.clone(),
                    effects: vec![EffectTemplate::Support {
                        target: TargetSpec::Chosen(CardFilter::other_friendly_characters()),
                    }],
                    optional: true,
                    priority: Priority::High,
                })
            }
            AbilitySlot::Defined(id) => {
                let Some(Ability::Triggered(trigger)) = view.definition(source)?.ability(id) else {
                    return None;
                };
                let ctx = ConditionContext::new(event, view, source, controller);
                ConditionEvaluator::matches(&trigger.trigger, &ctx).then(|| PendingTrigger {
                    source,
                    controller,
                    slot,
                    event: event.clone(),
                    effects: trigger.effects.clone(),
                    optional: trigger.optional,
                    priority: trigger.priority,
                })
            }
        }
    }
}
