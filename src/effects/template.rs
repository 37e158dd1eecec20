//! Effect templates.
//!
//! Abilities and action cards carry `EffectTemplate`s: effects written
//! relative to "this card", "the event's subject", "a chosen character",
//! "each opponent". A template is instantiated into concrete `Effect`s when
//! the ability fires or the action resolves. Counts are expanded here, so
//! "draw 2 cards" becomes two `DrawCard` effects and two queue steps.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::effect::{Amount, Effect, Target};
use super::targeting::{CardFilter, PlayerSpec, Selector, Side, TargetSpec};
use crate::abilities::{Duration, Keyword, Stat};
use crate::core::{EntityId, PlayerId};
use crate::rules::GameView;
use crate::triggers::GameEvent;
use crate::zones::Zone;

/// An effect relative to its ability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectTemplate {
    DealDamage { amount: u32, target: TargetSpec },
    RemoveDamage { amount: u32, target: TargetSpec },
    Exert { target: TargetSpec },
    Ready { target: TargetSpec },
    Banish { target: TargetSpec },
    ReturnToHand { target: TargetSpec },
    ModifyStat {
        stat: Stat,
        delta: i32,
        duration: Duration,
        target: TargetSpec,
    },
    GrantKeyword {
        keyword: Keyword,
        duration: Duration,
        target: TargetSpec,
    },
    GainLore { amount: u32, player: PlayerSpec },
    LoseLore { amount: u32, player: PlayerSpec },
    DrawCards { count: u32, player: PlayerSpec },
    /// The player chooses cards from their own hand to discard.
    Discard { count: u32, player: PlayerSpec },
    /// Give the target +S strength this turn, where S is the source's
    /// current strength.
    Support { target: TargetSpec },
}

impl EffectTemplate {
    /// The card target spec, if the template has one.
    #[must_use]
    pub fn target(&self) -> Option<&TargetSpec> {
        match self {
            EffectTemplate::DealDamage { target, .. }
            | EffectTemplate::RemoveDamage { target, .. }
            | EffectTemplate::Exert { target }
            | EffectTemplate::Ready { target }
            | EffectTemplate::Banish { target }
            | EffectTemplate::ReturnToHand { target }
            | EffectTemplate::ModifyStat { target, .. }
            | EffectTemplate::GrantKeyword { target, .. }
            | EffectTemplate::Support { target } => Some(target),
            _ => None,
        }
    }

    /// Expand into concrete effects.
    ///
    /// `Chosen` targets consume the context's pre-bound targets in order and
    /// otherwise stay open for the engine to ask about. `EachMatching` is
    /// evaluated against `view` now. Specs that refer to a missing card (an
    /// event without an other card, for instance) produce nothing.
    pub fn instantiate(&self, view: &GameView<'_>, ctx: &mut TemplateContext<'_>) -> Vec<Effect> {
        match self {
            EffectTemplate::DealDamage { amount, target } => ctx
                .targets(view, target)
                .into_iter()
                .map(|target| Effect::DealDamage {
                    target,
                    amount: Amount::Fixed(*amount),
                    source: ctx.source,
                })
                .collect(),
            EffectTemplate::RemoveDamage { amount, target } => ctx
                .targets(view, target)
                .into_iter()
                .map(|target| Effect::RemoveDamage { target, amount: *amount })
                .collect(),
            EffectTemplate::Exert { target } => ctx
                .targets(view, target)
                .into_iter()
                .map(|target| Effect::Exert { target })
                .collect(),
            EffectTemplate::Ready { target } => ctx
                .targets(view, target)
                .into_iter()
                .map(|target| Effect::Ready { target })
                .collect(),
            EffectTemplate::Banish { target } => ctx
                .targets(view, target)
                .into_iter()
                .map(|target| Effect::Banish { target })
                .collect(),
            EffectTemplate::ReturnToHand { target } => ctx
                .targets(view, target)
                .into_iter()
                .map(|target| Effect::ReturnToHand { target })
                .collect(),
            EffectTemplate::ModifyStat {
                stat,
                delta,
                duration,
                target,
            } => ctx
                .targets(view, target)
                .into_iter()
                .map(|target| Effect::ModifyStat {
                    target,
                    stat: *stat,
                    delta: *delta,
                    duration: *duration,
                })
                .collect(),
            EffectTemplate::GrantKeyword {
                keyword,
                duration,
                target,
            } => ctx
                .targets(view, target)
                .into_iter()
                .map(|target| Effect::GrantKeyword {
                    target,
                    keyword: *keyword,
                    duration: *duration,
                })
                .collect(),
            EffectTemplate::GainLore { amount, player } => ctx
                .players(view, *player)
                .into_iter()
                .map(|player| Effect::GainLore {
                    player,
                    amount: Amount::Fixed(*amount),
                })
                .collect(),
            EffectTemplate::LoseLore { amount, player } => ctx
                .players(view, *player)
                .into_iter()
                .map(|player| Effect::LoseLore { player, amount: *amount })
                .collect(),
            EffectTemplate::DrawCards { count, player } => ctx
                .players(view, *player)
                .into_iter()
                .flat_map(|player| (0..*count).map(move |_| Effect::DrawCard { player }))
                .collect(),
            EffectTemplate::Discard { count, player } => ctx
                .players(view, *player)
                .into_iter()
                .flat_map(|player| {
                    let selector = Selector::new(CardFilter::new(Side::Friendly, Zone::Hand), player);
                    (0..*count).map(move |_| Effect::Discard {
                        target: Target::Choose(selector.clone()),
                    })
                })
                .collect(),
            EffectTemplate::Support { target } => {
                let strength = ctx.source.map_or(0, |s| view.effective_strength(s));
                if strength == 0 {
                    return Vec::new();
                }
                ctx.targets(view, target)
                    .into_iter()
                    .map(|target| Effect::ModifyStat {
                        target,
                        stat: Stat::Strength,
                        delta: i32::try_from(strength).unwrap_or(i32::MAX),
                        duration: Duration::EndOfTurn,
                    })
                    .collect()
            }
        }
    }
}

/// Who and what a template is instantiated for.
#[derive(Clone, Debug)]
pub struct TemplateContext<'e> {
    pub controller: PlayerId,
    pub source: Option<EntityId>,
    pub event: Option<&'e GameEvent>,
    bound: SmallVec<[EntityId; 2]>,
    next_bound: usize,
}

impl<'e> TemplateContext<'e> {
    #[must_use]
    pub fn new(controller: PlayerId) -> Self {
        Self {
            controller,
            source: None,
            event: None,
            bound: SmallVec::new(),
            next_bound: 0,
        }
    }

    #[must_use]
    pub fn from_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn for_event(mut self, event: &'e GameEvent) -> Self {
        self.event = Some(event);
        self
    }

    /// Targets chosen up front (activated abilities). Consumed in order by
    /// `Chosen` specs.
    #[must_use]
    pub fn with_targets(mut self, targets: impl IntoIterator<Item = EntityId>) -> Self {
        self.bound = targets.into_iter().collect();
        self
    }

    fn targets(&mut self, view: &GameView<'_>, spec: &TargetSpec) -> SmallVec<[Target; 1]> {
        let mut targets = SmallVec::new();
        match spec {
            TargetSpec::This => targets.extend(self.source.map(Target::Card)),
            TargetSpec::EventSubject => {
                targets.extend(self.event.and_then(GameEvent::subject).map(Target::Card));
            }
            TargetSpec::EventOther => {
                targets.extend(self.event.and_then(GameEvent::other).map(Target::Card));
            }
            TargetSpec::Chosen(filter) => {
                let target = match self.bound.get(self.next_bound) {
                    Some(entity) => {
                        self.next_bound += 1;
                        Target::Card(*entity)
                    }
                    None => Target::Choose(self.selector(filter)),
                };
                targets.push(target);
            }
            TargetSpec::EachMatching(filter) => {
                targets.extend(
                    self.selector(filter)
                        .candidates(view)
                        .into_iter()
                        .map(Target::Card),
                );
            }
        }
        targets
    }

    fn selector(&self, filter: &CardFilter) -> Selector {
        let selector = Selector::new(filter.clone(), self.controller);
        match self.source {
            Some(source) => selector.with_source(source),
            None => selector,
        }
    }

    fn players(&self, view: &GameView<'_>, spec: PlayerSpec) -> SmallVec<[PlayerId; 2]> {
        let count = view.state.player_count();
        match spec {
            PlayerSpec::Controller => smallvec::smallvec![self.controller],
            PlayerSpec::EachOpponent => PlayerId::turn_order(self.controller, count).skip(1).collect(),
            PlayerSpec::EventPlayer => {
                smallvec::smallvec![self.event.and_then(GameEvent::player).unwrap_or(self.controller)]
            }
        }
    }
}
