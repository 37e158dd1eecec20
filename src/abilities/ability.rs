//! Ability descriptors.
//!
//! Abilities are data, built once when the catalog is assembled. The four
//! variants map onto the four ways an ability can act:
//!
//! - `Keyword`: consulted by the validator and by damage and challenge rules.
//! - `Triggered`: reacts to a `GameEvent` by enqueueing effects.
//! - `Static`: continuously modifies stats, costs or keywords.
//! - `Activated`: the controller pays a cost to enqueue effects.
//!
//! Every ability is live only while its card is in one of the zones in
//! `live_in()`; by default that is any in-play zone.

use serde::{Deserialize, Serialize};

use super::keyword::Keyword;
use super::modifier::{Applicability, StaticCondition, StaticEffect};
use crate::effects::{EffectTemplate, TargetSpec};
use crate::stack::Priority;
use crate::triggers::TriggerCondition;
use crate::zones::ZoneSet;

/// Index of an ability within its card definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AbilityId(pub u16);

impl AbilityId {
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for AbilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ability({})", self.0)
    }
}

/// One ability printed on a card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ability {
    Keyword(Keyword),
    Triggered(TriggeredAbility),
    Static(StaticAbility),
    Activated(ActivatedAbility),
}

impl Ability {
    /// Zones where this ability functions.
    #[must_use]
    pub fn live_in(&self) -> ZoneSet {
        match self {
            Ability::Keyword(_) => ZoneSet::IN_PLAY,
            Ability::Triggered(t) => t.live_in,
            Ability::Static(s) => s.live_in,
            Ability::Activated(a) => a.live_in,
        }
    }

    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Ability::Keyword(k) => k.to_string(),
            Ability::Triggered(t) => t.name.clone(),
            Ability::Static(s) => s.name.clone(),
            Ability::Activated(a) => a.name.clone(),
        }
    }
}

/// "When/Whenever ..., do ...".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggeredAbility {
    pub name: String,
    pub trigger: TriggerCondition,
    pub effects: Vec<EffectTemplate>,
    /// "may" abilities ask their controller before each effect applies.
    #[serde(default)]
    pub optional: bool,
    /// Tier the generated effects are queued at.
    #[serde(default = "default_trigger_priority")]
    pub priority: Priority,
    #[serde(default)]
    pub live_in: ZoneSet,
}

fn default_trigger_priority() -> Priority {
    Priority::High
}

impl TriggeredAbility {
    pub fn new(name: impl Into<String>, trigger: TriggerCondition) -> Self {
        Self {
            name: name.into(),
            trigger,
            effects: Vec::new(),
            optional: false,
            priority: Priority::High,
            live_in: ZoneSet::IN_PLAY,
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: EffectTemplate) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[must_use]
    pub fn at_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn live_in(mut self, zones: ZoneSet) -> Self {
        self.live_in = zones;
        self
    }
}

impl From<TriggeredAbility> for Ability {
    fn from(ability: TriggeredAbility) -> Self {
        Ability::Triggered(ability)
    }
}

/// A continuous effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticAbility {
    pub name: String,
    pub effect: StaticEffect,
    pub applies_to: Applicability,
    #[serde(default)]
    pub condition: StaticCondition,
    #[serde(default)]
    pub live_in: ZoneSet,
}

impl StaticAbility {
    pub fn new(name: impl Into<String>, effect: StaticEffect, applies_to: Applicability) -> Self {
        Self {
            name: name.into(),
            effect,
            applies_to,
            condition: StaticCondition::Always,
            live_in: ZoneSet::IN_PLAY,
        }
    }

    #[must_use]
    pub fn when(mut self, condition: StaticCondition) -> Self {
        self.condition = condition;
        self
    }
}

impl From<StaticAbility> for Ability {
    fn from(ability: StaticAbility) -> Self {
        Ability::Static(ability)
    }
}

/// Cost paid to activate an ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ActivationCost {
    /// Exert the source.
    pub exert: bool,
    /// Ink to pay.
    pub ink: u32,
    /// Banish the source.
    pub banish_self: bool,
}

impl ActivationCost {
    /// Just exert the source.
    #[must_use]
    pub const fn exert() -> Self {
        Self {
            exert: true,
            ink: 0,
            banish_self: false,
        }
    }

    #[must_use]
    pub const fn with_ink(mut self, ink: u32) -> Self {
        self.ink = ink;
        self
    }
}

/// "{cost} - do ...".
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivatedAbility {
    pub name: String,
    pub cost: ActivationCost,
    pub effects: Vec<EffectTemplate>,
    #[serde(default)]
    pub live_in: ZoneSet,
}

impl ActivatedAbility {
    pub fn new(name: impl Into<String>, cost: ActivationCost) -> Self {
        Self {
            name: name.into(),
            cost,
            effects: Vec::new(),
            live_in: ZoneSet::IN_PLAY,
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: EffectTemplate) -> Self {
        self.effects.push(effect);
        self
    }

    /// Target specs that ask the activating player to choose, in order.
    pub fn chosen_targets(&self) -> impl Iterator<Item = &TargetSpec> {
        self.effects
            .iter()
            .filter_map(EffectTemplate::target)
            .filter(|spec| matches!(spec, TargetSpec::Chosen(_)))
    }
}

impl From<ActivatedAbility> for Ability {
    fn from(ability: ActivatedAbility) -> Self {
        Ability::Activated(ability)
    }
}
