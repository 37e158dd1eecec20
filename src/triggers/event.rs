//! Game events.
//!
//! Every applied effect reports what happened as `GameEvent`s. The engine
//! hands them to the `AbilityRegistry` for trigger dispatch and returns them
//! to the caller from `step()` for display.
//!
//! Events are immutable records. `EventKind` is the fieldless discriminant the
//! registry indexes triggers by.

use serde::{Deserialize, Serialize};

use crate::abilities::{AbilityId, Duration, Keyword, Stat};
use crate::core::{EntityId, Phase, PlayerId};
use crate::rules::GameResult;

/// Something that happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    // === Turn structure ===
    TurnStarted { player: PlayerId, turn: u32 },
    TurnEnded { player: PlayerId, turn: u32 },
    PhaseChanged { player: PlayerId, phase: Phase },

    // === Cards changing zones ===
    CardDrawn { player: PlayerId, card: EntityId },
    CardInked { player: PlayerId, card: EntityId },
    CharacterPlayed { player: PlayerId, card: EntityId },
    ItemPlayed { player: PlayerId, card: EntityId },
    LocationPlayed { player: PlayerId, card: EntityId },
    ActionPlayed { player: PlayerId, card: EntityId },
    SongSung {
        player: PlayerId,
        song: EntityId,
        singer: EntityId,
    },
    Banished { card: EntityId, owner: PlayerId },
    ReturnedToHand { card: EntityId, owner: PlayerId },
    CardDiscarded { player: PlayerId, card: EntityId },

    // === Quests and challenges ===
    CharacterQuested {
        player: PlayerId,
        character: EntityId,
        lore: u32,
    },
    CharacterChallenged {
        player: PlayerId,
        attacker: EntityId,
        defender: EntityId,
    },
    DamageDealt {
        target: EntityId,
        amount: u32,
        source: Option<EntityId>,
    },
    DamageRemoved { target: EntityId, amount: u32 },

    // === Lore and ink ===
    LoreGained { player: PlayerId, amount: u32 },
    LoreLost { player: PlayerId, amount: u32 },
    InkPaid { player: PlayerId, amount: u32 },

    // === Card state ===
    CardExerted { card: EntityId },
    CardReadied { card: EntityId },
    AbilityActivated {
        player: PlayerId,
        source: EntityId,
        ability: AbilityId,
    },
    StatModified { card: EntityId, stat: Stat, delta: i32 },
    KeywordGranted { card: EntityId, keyword: Keyword },
    ModifiersExpired { duration: Duration, count: usize },

    // === Game ===
    DeckShuffled { player: PlayerId },
    GameEnded { result: GameResult },
}

/// Fieldless event discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventKind {
    TurnStarted,
    TurnEnded,
    PhaseChanged,
    CardDrawn,
    CardInked,
    CharacterPlayed,
    ItemPlayed,
    LocationPlayed,
    ActionPlayed,
    SongSung,
    Banished,
    ReturnedToHand,
    CardDiscarded,
    CharacterQuested,
    CharacterChallenged,
    DamageDealt,
    DamageRemoved,
    LoreGained,
    LoreLost,
    InkPaid,
    CardExerted,
    CardReadied,
    AbilityActivated,
    StatModified,
    KeywordGranted,
    ModifiersExpired,
    DeckShuffled,
    GameEnded,
}

impl GameEvent {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::TurnStarted { .. } => EventKind::TurnStarted,
            GameEvent::TurnEnded { .. } => EventKind::TurnEnded,
            GameEvent::PhaseChanged { .. } => EventKind::PhaseChanged,
            GameEvent::CardDrawn { .. } => EventKind::CardDrawn,
            GameEvent::CardInked { .. } => EventKind::CardInked,
            GameEvent::CharacterPlayed { .. } => EventKind::CharacterPlayed,
            GameEvent::ItemPlayed { .. } => EventKind::ItemPlayed,
            GameEvent::LocationPlayed { .. } => EventKind::LocationPlayed,
            GameEvent::ActionPlayed { .. } => EventKind::ActionPlayed,
            GameEvent::SongSung { .. } => EventKind::SongSung,
            GameEvent::Banished { .. } => EventKind::Banished,
            GameEvent::ReturnedToHand { .. } => EventKind::ReturnedToHand,
            GameEvent::CardDiscarded { .. } => EventKind::CardDiscarded,
            GameEvent::CharacterQuested { .. } => EventKind::CharacterQuested,
            GameEvent::CharacterChallenged { .. } => EventKind::CharacterChallenged,
            GameEvent::DamageDealt { .. } => EventKind::DamageDealt,
            GameEvent::DamageRemoved { .. } => EventKind::DamageRemoved,
            GameEvent::LoreGained { .. } => EventKind::LoreGained,
            GameEvent::LoreLost { .. } => EventKind::LoreLost,
            GameEvent::InkPaid { .. } => EventKind::InkPaid,
            GameEvent::CardExerted { .. } => EventKind::CardExerted,
            GameEvent::CardReadied { .. } => EventKind::CardReadied,
            GameEvent::AbilityActivated { .. } => EventKind::AbilityActivated,
            GameEvent::StatModified { .. } => EventKind::StatModified,
            GameEvent::KeywordGranted { .. } => EventKind::KeywordGranted,
            GameEvent::ModifiersExpired { .. } => EventKind::ModifiersExpired,
            GameEvent::DeckShuffled { .. } => EventKind::DeckShuffled,
            GameEvent::GameEnded { .. } => EventKind::GameEnded,
        }
    }

    /// The card the event is about: the card played, the character that
    /// quested, the attacker, the card that took damage.
    #[must_use]
    pub fn subject(&self) -> Option<EntityId> {
        match self {
            GameEvent::CardDrawn { card, .. }
            | GameEvent::CardInked { card, .. }
            | GameEvent::CharacterPlayed { card, .. }
            | GameEvent::ItemPlayed { card, .. }
            | GameEvent::LocationPlayed { card, .. }
            | GameEvent::ActionPlayed { card, .. }
            | GameEvent::Banished { card, .. }
            | GameEvent::ReturnedToHand { card, .. }
            | GameEvent::CardDiscarded { card, .. }
            | GameEvent::CardExerted { card }
            | GameEvent::CardReadied { card }
            | GameEvent::StatModified { card, .. }
            | GameEvent::KeywordGranted { card, .. } => Some(*card),
            GameEvent::SongSung { song, .. } => Some(*song),
            GameEvent::CharacterQuested { character, .. } => Some(*character),
            GameEvent::CharacterChallenged { attacker, .. } => Some(*attacker),
            GameEvent::DamageDealt { target, .. } | GameEvent::DamageRemoved { target, .. } => Some(*target),
            GameEvent::AbilityActivated { source, .. } => Some(*source),
            _ => None,
        }
    }

    /// The second card involved: the defender, the singer, the damage source.
    #[must_use]
    pub fn other(&self) -> Option<EntityId> {
        match self {
            GameEvent::CharacterChallenged { defender, .. } => Some(*defender),
            GameEvent::SongSung { singer, .. } => Some(*singer),
            GameEvent::DamageDealt { source, .. } => *source,
            _ => None,
        }
    }

    /// The player the event is about, when the event names one.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            GameEvent::TurnStarted { player, .. }
            | GameEvent::TurnEnded { player, .. }
            | GameEvent::PhaseChanged { player, .. }
            | GameEvent::CardDrawn { player, .. }
            | GameEvent::CardInked { player, .. }
            | GameEvent::CharacterPlayed { player, .. }
            | GameEvent::ItemPlayed { player, .. }
            | GameEvent::LocationPlayed { player, .. }
            | GameEvent::ActionPlayed { player, .. }
            | GameEvent::SongSung { player, .. }
            | GameEvent::CardDiscarded { player, .. }
            | GameEvent::CharacterQuested { player, .. }
            | GameEvent::CharacterChallenged { player, .. }
            | GameEvent::LoreGained { player, .. }
            | GameEvent::LoreLost { player, .. }
            | GameEvent::InkPaid { player, .. }
            | GameEvent::AbilityActivated { player, .. }
            | GameEvent::DeckShuffled { player } => Some(*player),
            GameEvent::Banished { owner, .. } | GameEvent::ReturnedToHand { owner, .. } => Some(*owner),
            _ => None,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_challenge_roles() {
        let event = GameEvent::CharacterChallenged {
            player: PlayerId(0),
            attacker: EntityId(3),
            defender: EntityId(7),
        };
        assert_eq!(event.kind(), EventKind::CharacterChallenged);
        assert_eq!(event.subject(), Some(EntityId(3)));
        assert_eq!(event.other(), Some(EntityId(7)));
        assert_eq!(event.player(), Some(PlayerId(0)));
    }

    #[test]
    fn test_banished_player_is_owner() {
        let event = GameEvent::Banished {
            card: EntityId(5),
            owner: PlayerId(1),
        };
        assert_eq!(event.player(), Some(PlayerId(1)));
        assert_eq!(event.other(), None);
    }

    #[test]
    fn test_turn_events_have_no_subject() {
        let event = GameEvent::TurnStarted {
            player: PlayerId(1),
            turn: 2,
        };
        assert_eq!(event.subject(), None);
        assert_eq!(event.kind().to_string(), "TurnStarted");
    }
}
