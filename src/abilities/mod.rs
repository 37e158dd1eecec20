//! Ability descriptors: keywords, triggered, static and activated abilities.
//!
//! Abilities are attached to `CardDefinition`s. The `triggers` module turns
//! triggered abilities into queued effects; static abilities and temporary
//! modifiers are folded into effective stats by `rules::GameView`.

pub mod ability;
pub mod keyword;
pub mod modifier;

pub use ability::{
    Ability, AbilityId, ActivatedAbility, ActivationCost, StaticAbility, TriggeredAbility,
};
pub use keyword::{Keyword, KeywordKind};
pub use modifier::{
    Applicability, Duration, Modifier, ModifierKind, Stat, StatLine, StaticCondition, StaticEffect,
};
