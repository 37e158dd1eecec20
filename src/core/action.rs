//! Player input: moves, choice answers, and the action history.
//!
//! A `Move` is what the active player asks the engine to do while it is
//! awaiting a move. A `ChoiceValue` answers a `ChoiceRequest` raised while an
//! effect is suspended. Both are plain data so they can be recorded and
//! replayed.
//!
//! ```
//! use lore_engine::core::{EntityId, Move, MoveKind};
//!
//! let quest = Move::Quest { character: EntityId(12) };
//! assert_eq!(quest.kind(), MoveKind::Quest);
//! assert_eq!(quest.cards().collect::<Vec<_>>(), vec![EntityId(12)]);
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::EntityId;
use super::player::PlayerId;
use crate::abilities::AbilityId;
use crate::effects::{EffectOutcome, EffectSummary};

/// A move submitted by the active player.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Pay a card's ink cost and put it into play (or resolve it, for actions).
    PlayCard { card: EntityId },
    /// Exert a dry character to gain its lore.
    Quest { character: EntityId },
    /// Exert a character to challenge an exerted opposing character or a location.
    Challenge { attacker: EntityId, defender: EntityId },
    /// Put an inkable card from hand into the inkwell.
    Ink { card: EntityId },
    /// Exert a character to play a song for free.
    Sing { song: EntityId, singer: EntityId },
    /// Pay an activated ability's cost. `targets` pre-answer its choices in order.
    ActivateAbility {
        source: EntityId,
        ability: AbilityId,
        targets: SmallVec<[EntityId; 2]>,
    },
    /// End the turn.
    Pass,
}

/// Move discriminant, used for origins and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    PlayCard,
    Quest,
    Challenge,
    Ink,
    Sing,
    ActivateAbility,
    Pass,
}

impl Move {
    #[must_use]
    pub fn kind(&self) -> MoveKind {
        match self {
            Move::PlayCard { .. } => MoveKind::PlayCard,
            Move::Quest { .. } => MoveKind::Quest,
            Move::Challenge { .. } => MoveKind::Challenge,
            Move::Ink { .. } => MoveKind::Ink,
            Move::Sing { .. } => MoveKind::Sing,
            Move::ActivateAbility { .. } => MoveKind::ActivateAbility,
            Move::Pass => MoveKind::Pass,
        }
    }

    /// Cards referenced by this move, in parameter order.
    pub fn cards(&self) -> impl Iterator<Item = EntityId> {
        let mut cards: SmallVec<[EntityId; 3]> = SmallVec::new();
        match self {
            Move::PlayCard { card } | Move::Ink { card } => cards.push(*card),
            Move::Quest { character } => cards.push(*character),
            Move::Challenge { attacker, defender } => cards.extend([*attacker, *defender]),
            Move::Sing { song, singer } => cards.extend([*song, *singer]),
            Move::ActivateAbility { source, targets, .. } => {
                cards.push(*source);
                cards.extend(targets.iter().copied());
            }
            Move::Pass => {}
        }
        cards.into_iter()
    }

    /// Shorthand for an activation with no pre-bound targets.
    #[must_use]
    pub fn activate(source: EntityId, ability: AbilityId) -> Self {
        Move::ActivateAbility {
            source,
            ability,
            targets: SmallVec::new(),
        }
    }
}

impl std::fmt::Display for MoveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Answer to a pending `ChoiceRequest`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChoiceValue {
    /// Pick this card as the target.
    Target(EntityId),
    /// Use an optional effect that needs no target.
    Accept,
    /// Skip an optional effect.
    Decline,
}

/// One entry in the engine's history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionRecord {
    /// Monotonic position in the history.
    pub sequence: u64,
    /// Turn number when the entry was recorded.
    pub turn: u32,
    pub entry: RecordEntry,
}

/// What happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordEntry {
    /// A move was accepted.
    Submitted { player: PlayerId, mv: Move },
    /// A choice was answered.
    Chose { player: PlayerId, value: ChoiceValue },
    /// An effect left the queue.
    Resolved { effect: EffectSummary, outcome: EffectOutcome },
}

impl ActionRecord {
    #[must_use]
    pub fn new(sequence: u64, turn: u32, entry: RecordEntry) -> Self {
        Self { sequence, turn, entry }
    }

    /// The move, if this entry records one.
    #[must_use]
    pub fn as_move(&self) -> Option<&Move> {
        match &self.entry {
            RecordEntry::Submitted { mv, .. } => Some(mv),
            _ => None,
        }
    }
}
