//! Keyword abilities.
//!
//! Keywords are the shorthand abilities printed in bold on cards. Most change
//! what the move validator allows; Resist changes incoming damage, Challenger
//! adds strength while challenging, and Support is expanded by the ability
//! registry into a triggered ability.

use serde::{Deserialize, Serialize};

/// A keyword and its value, if it has one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    /// Opposing characters must challenge this one first, if exerted. May
    /// enter play exerted.
    Bodyguard,
    /// Only evasive characters can challenge this one.
    Evasive,
    /// Cannot quest.
    Reckless,
    /// Can challenge the turn it is played.
    Rush,
    /// When questing, may add its strength to another chosen character.
    Support,
    /// Opponents cannot choose this card with their effects.
    Ward,
    /// +N strength while challenging.
    Challenger(u32),
    /// Incoming damage is reduced by N.
    Resist(u32),
    /// Counts as cost N for singing songs.
    Singer(u32),
}

/// Fieldless keyword discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeywordKind {
    Bodyguard,
    Evasive,
    Reckless,
    Rush,
    Support,
    Ward,
    Challenger,
    Resist,
    Singer,
}

impl Keyword {
    #[must_use]
    pub const fn kind(self) -> KeywordKind {
        match self {
            Keyword::Bodyguard => KeywordKind::Bodyguard,
            Keyword::Evasive => KeywordKind::Evasive,
            Keyword::Reckless => KeywordKind::Reckless,
            Keyword::Rush => KeywordKind::Rush,
            Keyword::Support => KeywordKind::Support,
            Keyword::Ward => KeywordKind::Ward,
            Keyword::Challenger(_) => KeywordKind::Challenger,
            Keyword::Resist(_) => KeywordKind::Resist,
            Keyword::Singer(_) => KeywordKind::Singer,
        }
    }

    #[must_use]
    pub const fn value(self) -> Option<u32> {
        match self {
            Keyword::Challenger(n) | Keyword::Resist(n) | Keyword::Singer(n) => Some(n),
            _ => None,
        }
    }
}

impl KeywordKind {
    /// Whether multiple instances add up (Resist +1 and Resist +2 is Resist +3).
    ///
    /// Non-stacking values take the highest instance.
    #[must_use]
    pub const fn stacks(self) -> bool {
        matches!(self, KeywordKind::Challenger | KeywordKind::Resist)
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value() {
            Some(n) => write!(f, "{:?} {}", self.kind(), n),
            None => write!(f, "{:?}", self.kind()),
        }
    }
}
