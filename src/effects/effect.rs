//! Effect definitions.
//!
//! An `Effect` is one atomic state mutation. Moves and abilities never touch
//! state directly: they are converted into effects, queued, and applied one
//! per engine step. Abilities that do several things ("draw 2, then deal 1
//! damage") become several effects.
//!
//! ## Groups
//!
//! - **Turn structure**: `BeginTurn`, `ReadyAll`, `AdvancePhase`,
//!   `GainLocationLore`, `EndTurn`, `ExpireModifiers`
//! - **Move results**: `InkCard`, `PayInk`, `PlaceCard`, `PlayAction`,
//!   `Quest`, `DeclareChallenge`, `EndChallenge`, `PayActivationCost`
//! - **Card and player mutations**: everything else

use serde::{Deserialize, Serialize};

use crate::abilities::{AbilityId, Duration, Keyword, Stat};
use crate::core::{EntityId, Phase, PlayerId};
use crate::error::EffectError;
use crate::stack::{EffectId, Priority};

use super::targeting::Selector;

/// A number evaluated when the effect is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Amount {
    Fixed(u32),
    /// Effective strength of a card, or its last-known strength if it has
    /// left play.
    StrengthOf(EntityId),
    /// Effective lore of a card, or its last-known lore.
    LoreOf(EntityId),
}

impl From<u32> for Amount {
    fn from(n: u32) -> Self {
        Amount::Fixed(n)
    }
}

/// The card an effect acts on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    Card(EntityId),
    /// Not yet chosen. The engine asks `chooser` to pick before applying.
    Choose(Selector),
}

impl Target {
    /// The bound card, if one has been chosen.
    #[must_use]
    pub fn card(&self) -> Option<EntityId> {
        match self {
            Target::Card(e) => Some(*e),
            Target::Choose(_) => None,
        }
    }
}

impl From<EntityId> for Target {
    fn from(entity: EntityId) -> Self {
        Target::Card(entity)
    }
}

/// An atomic state mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    // === Turn structure ===
    /// Make `player` active, reset their per-turn flags, enter Ready.
    BeginTurn { player: PlayerId },
    /// Ready every exerted card `player` controls in play or in the inkwell.
    ReadyAll { player: PlayerId },
    /// Enter `phase` and queue its automatic steps.
    AdvancePhase { player: PlayerId, phase: Phase },
    /// Gain the lore of a location `player` controls.
    GainLocationLore { player: PlayerId, location: EntityId },
    /// End `player`'s turn and queue the next one.
    EndTurn { player: PlayerId },
    /// Drop every temporary modifier with this duration.
    ExpireModifiers { duration: Duration },

    // === Move results ===
    InkCard { player: PlayerId, card: EntityId },
    /// Exert this many ready inkwell cards.
    PayInk { player: PlayerId, amount: u32 },
    /// Put a character, item or location from hand into play.
    PlaceCard { player: PlayerId, card: EntityId },
    /// Resolve an action from hand; it goes to the discard.
    PlayAction {
        player: PlayerId,
        card: EntityId,
        singer: Option<EntityId>,
    },
    Quest { character: EntityId },
    DeclareChallenge { attacker: EntityId, defender: EntityId },
    /// Expire challenge-only modifiers on the attacker.
    EndChallenge { attacker: EntityId },
    PayActivationCost { source: EntityId, ability: AbilityId },

    // === Mutations ===
    DealDamage {
        target: Target,
        amount: Amount,
        source: Option<EntityId>,
    },
    RemoveDamage { target: Target, amount: u32 },
    GainLore { player: PlayerId, amount: Amount },
    LoseLore { player: PlayerId, amount: u32 },
    DrawCard { player: PlayerId },
    /// Discard a card from its controller's hand.
    Discard { target: Target },
    Exert { target: Target },
    Ready { target: Target },
    Banish { target: Target },
    ReturnToHand { target: Target },
    ModifyStat {
        target: Target,
        stat: Stat,
        delta: i32,
        duration: Duration,
    },
    GrantKeyword {
        target: Target,
        keyword: Keyword,
        duration: Duration,
    },
}

impl Effect {
    /// The effect's card target, if it has one.
    #[must_use]
    pub fn target(&self) -> Option<&Target> {
        match self {
            Effect::DealDamage { target, .. }
            | Effect::RemoveDamage { target, .. }
            | Effect::Discard { target }
            | Effect::Exert { target }
            | Effect::Ready { target }
            | Effect::Banish { target }
            | Effect::ReturnToHand { target }
            | Effect::ModifyStat { target, .. }
            | Effect::GrantKeyword { target, .. } => Some(target),
            _ => None,
        }
    }

    fn target_mut(&mut self) -> Option<&mut Target> {
        match self {
            Effect::DealDamage { target, .. }
            | Effect::RemoveDamage { target, .. }
            | Effect::Discard { target }
            | Effect::Exert { target }
            | Effect::Ready { target }
            | Effect::Banish { target }
            | Effect::ReturnToHand { target }
            | Effect::ModifyStat { target, .. }
            | Effect::GrantKeyword { target, .. } => Some(target),
            _ => None,
        }
    }

    /// The pending selector, if the target is still to be chosen.
    #[must_use]
    pub fn selector(&self) -> Option<&Selector> {
        match self.target() {
            Some(Target::Choose(selector)) => Some(selector),
            _ => None,
        }
    }

    /// Replace an unchosen target with `entity`.
    #[must_use]
    pub fn bind(mut self, entity: EntityId) -> Self {
        if let Some(target) = self.target_mut() {
            *target = Target::Card(entity);
        }
        self
    }

    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Effect::BeginTurn { .. } => "begin_turn",
            Effect::ReadyAll { .. } => "ready_all",
            Effect::AdvancePhase { .. } => "advance_phase",
            Effect::GainLocationLore { .. } => "gain_location_lore",
            Effect::EndTurn { .. } => "end_turn",
            Effect::ExpireModifiers { .. } => "expire_modifiers",
            Effect::InkCard { .. } => "ink_card",
            Effect::PayInk { .. } => "pay_ink",
            Effect::PlaceCard { .. } => "place_card",
            Effect::PlayAction { .. } => "play_action",
            Effect::Quest { .. } => "quest",
            Effect::DeclareChallenge { .. } => "declare_challenge",
            Effect::EndChallenge { .. } => "end_challenge",
            Effect::PayActivationCost { .. } => "pay_activation_cost",
            Effect::DealDamage { .. } => "deal_damage",
            Effect::RemoveDamage { .. } => "remove_damage",
            Effect::GainLore { .. } => "gain_lore",
            Effect::LoseLore { .. } => "lose_lore",
            Effect::DrawCard { .. } => "draw_card",
            Effect::Discard { .. } => "discard",
            Effect::Exert { .. } => "exert",
            Effect::Ready { .. } => "ready",
            Effect::Banish { .. } => "banish",
            Effect::ReturnToHand { .. } => "return_to_hand",
            Effect::ModifyStat { .. } => "modify_stat",
            Effect::GrantKeyword { .. } => "grant_keyword",
        }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.target() {
            Some(Target::Card(e)) => write!(f, "{}({})", self.name(), e),
            Some(Target::Choose(_)) => write!(f, "{}(?)", self.name()),
            None => f.write_str(self.name()),
        }
    }
}

/// What a step reports about the effect it applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectSummary {
    pub id: EffectId,
    pub priority: Priority,
    pub effect: Effect,
}

/// How an applied effect ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectOutcome {
    Resolved,
    /// An optional effect its controller chose not to use.
    Declined,
    /// The effect could not apply. Nothing changed.
    Fizzled(EffectError),
}

impl EffectOutcome {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, EffectOutcome::Resolved)
    }
}
