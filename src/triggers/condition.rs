//! Trigger conditions.
//!
//! A `TriggerCondition` names the `EventKind` a triggered ability listens for
//! plus an `EventFilter` evaluated against the concrete event, relative to the
//! ability's source card and controller.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerId};
use crate::rules::GameView;

use super::event::{EventKind, GameEvent};

/// When a triggered ability fires.
///
/// ```
/// use lore_engine::triggers::{EventFilter, EventKind, TriggerCondition};
///
/// let on_quest = TriggerCondition::whenever_quests();
/// assert_eq!(on_quest.event, EventKind::CharacterQuested);
/// assert_eq!(on_quest.filter, EventFilter::SubjectIsSelf);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerCondition {
    pub event: EventKind,
    #[serde(default)]
    pub filter: EventFilter,
}

impl TriggerCondition {
    #[must_use]
    pub fn on(event: EventKind, filter: EventFilter) -> Self {
        Self { event, filter }
    }

    /// "When you play this character".
    #[must_use]
    pub fn when_played() -> Self {
        Self::on(EventKind::CharacterPlayed, EventFilter::SubjectIsSelf)
    }

    /// "Whenever this character quests".
    #[must_use]
    pub fn whenever_quests() -> Self {
        Self::on(EventKind::CharacterQuested, EventFilter::SubjectIsSelf)
    }

    /// "When this character is banished". Fires from the discard, looking
    /// back at the card as it was in play.
    #[must_use]
    pub fn when_banished() -> Self {
        Self::on(EventKind::Banished, EventFilter::SubjectIsSelf)
    }

    /// "At the start of your turn".
    #[must_use]
    pub fn start_of_your_turn() -> Self {
        Self::on(EventKind::TurnStarted, EventFilter::ByController)
    }

    /// "At the end of your turn".
    #[must_use]
    pub fn end_of_your_turn() -> Self {
        Self::on(EventKind::TurnEnded, EventFilter::ByController)
    }

    /// "Whenever this character challenges another character".
    #[must_use]
    pub fn when_challenges() -> Self {
        Self::on(EventKind::CharacterChallenged, EventFilter::SubjectIsSelf)
    }

    /// "Whenever this character is challenged".
    #[must_use]
    pub fn when_challenged() -> Self {
        Self::on(EventKind::CharacterChallenged, EventFilter::OtherIsSelf)
    }

    /// Add a filter that must also hold.
    #[must_use]
    pub fn and(mut self, filter: EventFilter) -> Self {
        self.filter = match self.filter {
            EventFilter::Always => filter,
            EventFilter::All(mut filters) => {
                filters.push(filter);
                EventFilter::All(filters)
            }
            existing => EventFilter::All(vec![existing, filter]),
        };
        self
    }
}

/// A predicate over an event, relative to the listening ability.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventFilter {
    #[default]
    Always,

    // === Cards ===
    /// The event's subject is the ability's source.
    SubjectIsSelf,
    /// The event's other card is the ability's source.
    OtherIsSelf,
    /// The event's subject is some card other than the source.
    SubjectIsOther,
    /// The subject is controlled by the ability's controller.
    SubjectFriendly,
    /// The subject is controlled by someone else.
    SubjectOpposing,

    // === Players ===
    /// The event's player is the ability's controller.
    ByController,
    /// The event's player is someone else.
    ByOpponent,

    // === Combinators ===
    All(Vec<EventFilter>),
    Any(Vec<EventFilter>),
    Not(Box<EventFilter>),
}

/// Inputs for evaluating a filter.
pub struct ConditionContext<'a, 'v> {
    pub event: &'a GameEvent,
    pub view: &'a GameView<'v>,
    /// The card whose ability is listening.
    pub source: EntityId,
    pub controller: PlayerId,
}

impl<'a, 'v> ConditionContext<'a, 'v> {
    pub fn new(event: &'a GameEvent, view: &'a GameView<'v>, source: EntityId, controller: PlayerId) -> Self {
        Self {
            event,
            view,
            source,
            controller,
        }
    }

    fn subject_controller(&self) -> Option<PlayerId> {
        self.event
            .subject()
            .and_then(|card| self.view.state.card(card))
            .map(|card| card.controller)
    }
}

/// Evaluator for event filters.
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Does the condition match this event?
    #[must_use]
    pub fn matches(condition: &TriggerCondition, ctx: &ConditionContext<'_, '_>) -> bool {
        condition.event == ctx.event.kind() && Self::evaluate(&condition.filter, ctx)
    }

    #[must_use]
    pub fn evaluate(filter: &EventFilter, ctx: &ConditionContext<'_, '_>) -> bool {
        match filter {
            EventFilter::Always => true,
            EventFilter::SubjectIsSelf => ctx.event.subject() == Some(ctx.source),
            EventFilter::OtherIsSelf => ctx.event.other() == Some(ctx.source),
            EventFilter::SubjectIsOther => ctx.event.subject().map_or(false, |s| s != ctx.source),
            EventFilter::SubjectFriendly => ctx.subject_controller() == Some(ctx.controller),
            EventFilter::SubjectOpposing => ctx.subject_controller().map_or(false, |c| c != ctx.controller),
            EventFilter::ByController => ctx.event.player() == Some(ctx.controller),
            EventFilter::ByOpponent => ctx.event.player().map_or(false, |p| p != ctx.controller),
            EventFilter::All(filters) => filters.iter().all(|f| Self::evaluate(f, ctx)),
            EventFilter::Any(filters) => filters.iter().any(|f| Self::evaluate(f, ctx)),
            EventFilter::Not(inner) => !Self::evaluate(inner, ctx),
        }
    }
}
