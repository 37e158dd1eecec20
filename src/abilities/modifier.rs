//! Stat modifiers.
//!
//! Two sources change a card's numbers:
//!
//! - **Temporary modifiers** are stored on the `CardInstance` by effects
//!   ("gets +2 strength this turn") and expire at a `Duration` boundary.
//! - **Static abilities** are never stored on their targets. The registry
//!   keeps a list of live static abilities and the rules view sums the ones
//!   that apply whenever an effective value is asked for.

use serde::{Deserialize, Serialize};

use super::keyword::Keyword;
use crate::cards::CardKindTag;
use crate::core::EntityId;

/// A modifiable stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Strength,
    Willpower,
    Lore,
}

/// A card's stats at one moment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct StatLine {
    pub strength: u32,
    pub willpower: u32,
    pub lore: u32,
}

impl StatLine {
    #[must_use]
    pub const fn get(self, stat: Stat) -> u32 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Willpower => self.willpower,
            Stat::Lore => self.lore,
        }
    }
}

/// When a temporary modifier expires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Duration {
    /// At the end of the current turn.
    EndOfTurn,
    /// When the current challenge finishes dealing damage.
    EndOfChallenge,
}

/// What a temporary modifier changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKind {
    Stat { stat: Stat, delta: i32 },
    Keyword(Keyword),
}

/// A temporary modifier on a card instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifier {
    pub kind: ModifierKind,
    pub duration: Duration,
    /// Card whose effect created the modifier.
    pub source: Option<EntityId>,
}

impl Modifier {
    #[must_use]
    pub const fn stat(stat: Stat, delta: i32, duration: Duration) -> Self {
        Self {
            kind: ModifierKind::Stat { stat, delta },
            duration,
            source: None,
        }
    }

    #[must_use]
    pub const fn keyword(keyword: Keyword, duration: Duration) -> Self {
        Self {
            kind: ModifierKind::Keyword(keyword),
            duration,
            source: None,
        }
    }

    #[must_use]
    pub fn from_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }
}

/// What a static ability does to the cards it applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaticEffect {
    ModifyStat { stat: Stat, delta: i32 },
    /// Change the ink cost of matching cards in hand.
    ModifyCost { delta: i32 },
    GrantKeyword(Keyword),
}

/// Which cards a static ability applies to, relative to its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Applicability {
    /// Only the source card.
    This,
    /// The controller's other characters in play.
    OtherFriendlyCharacters,
    /// The controller's characters in play, the source included.
    FriendlyCharacters,
    /// Characters in play controlled by anyone else.
    OpposingCharacters,
    /// Cards in the controller's hand, optionally of one kind.
    FriendlyCardsInHand(Option<CardKindTag>),
}

/// When a static ability is switched on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StaticCondition {
    #[default]
    Always,
    DuringYourTurn,
    WhileExerted,
    WhileDamaged,
}
