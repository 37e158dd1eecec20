//! Error types.
//!
//! Failures are split by how far they reach:
//!
//! - `Rejection`: an illegal move. Nothing was mutated.
//! - `EffectError`: one effect could not apply. The effect is reported as
//!   fizzled and the queue keeps going.
//! - `InvariantViolation`: the state model is corrupt. Fatal; the engine halts.
//! - `EngineError`, `ChoiceError`, `SetupError`, `ReplayError`: API-level
//!   wrappers for the calls that can hit the above.

use thiserror::Error;

use crate::abilities::AbilityId;
use crate::cards::{CardId, InkColor};
use crate::core::{ChoiceValue, EntityId, Phase, PlayerId};
use crate::zones::{Zone, ZoneId};

/// Why a move was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    // === Engine state ===
    #[error("engine is not awaiting a move")]
    NotAwaitingMove,
    #[error("the game is over")]
    GameOver,
    #[error("the engine has halted")]
    EngineHalted,
    #[error("it is {active}'s turn")]
    NotYourTurn { active: PlayerId },
    #[error("moves are not accepted during the {0} phase")]
    WrongPhase(Phase),

    // === Card location and ownership ===
    #[error("{0} does not exist")]
    CardNotFound(EntityId),
    #[error("{0} is not in hand")]
    NotInHand(EntityId),
    #[error("{0} is not in play")]
    NotInPlay(EntityId),
    #[error("{card} is not controlled by {player}")]
    NotControlled { card: EntityId, player: PlayerId },
    #[error("{0} is the wrong kind of card for this move")]
    WrongCardKind(EntityId),

    // === Ink ===
    #[error("{0} cannot be put into the inkwell")]
    NotInkable(EntityId),
    #[error("ink was already played this turn")]
    InkAlreadyPlayed,
    #[error("costs {cost} ink but only {available} is ready")]
    CannotAfford { cost: u32, available: u32 },
    #[error("no {color:?} ink in the inkwell")]
    ColorMismatch { color: InkColor },

    // === Character state ===
    #[error("{0} is exerted")]
    Exerted(EntityId),
    #[error("{0} entered play this turn")]
    Drying(EntityId),
    #[error("{0} is reckless and cannot quest")]
    Reckless(EntityId),

    // === Challenges ===
    #[error("{0} must be exerted to be challenged")]
    DefenderNotExerted(EntityId),
    #[error("{0} is not an opposing card")]
    OwnDefender(EntityId),
    #[error("{0} can only be challenged by an evasive character")]
    Evasive(EntityId),
    #[error("{0} cannot be challenged while an opposing bodyguard is exerted")]
    Bodyguard(EntityId),

    // === Songs and abilities ===
    #[error("{0} is not a song")]
    NotASong(EntityId),
    #[error("{singer} cannot sing a song costing {cost}")]
    SingerTooWeak { singer: EntityId, cost: u32 },
    #[error("{card} has no ability {ability}")]
    UnknownAbility { card: EntityId, ability: AbilityId },
    #[error("ability {ability} of {card} is not an activated ability")]
    NotActivated { card: EntityId, ability: AbilityId },
    #[error("ability {ability} of {card} does not work from its zone")]
    AbilityNotLive { card: EntityId, ability: AbilityId },
    #[error("{0} is not a legal target")]
    InvalidTarget(EntityId),
    #[error("more targets supplied than the ability chooses")]
    TooManyTargets,
}

/// Why a single effect fizzled.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EffectError {
    #[error("{0} does not exist")]
    MissingCard(EntityId),
    #[error("{card} is no longer in {expected:?}")]
    NotInZone { card: EntityId, expected: Zone },
    #[error("no valid target")]
    NoValidTarget,
    #[error("target was never chosen")]
    UnboundTarget,
    #[error("needs {needed} ink but only {available} is ready")]
    InsufficientInk { needed: u32, available: u32 },
    #[error("{0} has no cards left to draw")]
    EmptyDeck(PlayerId),
    #[error("{0} is the wrong kind of card")]
    WrongCardKind(EntityId),
    #[error("{card} has no ability {ability}")]
    UnknownAbility { card: EntityId, ability: AbilityId },
}

/// A broken state-model invariant. Always fatal.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{card} found in both {first} and {second}")]
    DuplicateLocation {
        card: EntityId,
        first: ZoneId,
        second: ZoneId,
    },
    #[error("{card} is listed in {actual} but indexed in {recorded:?}")]
    ZoneMismatch {
        card: EntityId,
        recorded: Option<ZoneId>,
        actual: ZoneId,
    },
    #[error("{card} is indexed in {zone} but not listed there")]
    UnlistedCard { card: EntityId, zone: ZoneId },
    #[error("{card} believes it is in {instance} but is tracked in {tracked:?}")]
    InstanceZoneDrift {
        card: EntityId,
        instance: ZoneId,
        tracked: Option<ZoneId>,
    },
    #[error("{card} sits in {zone}, which no seat in this game owns")]
    UnknownZone { card: EntityId, zone: ZoneId },
    #[error("active player index {index} out of range for {player_count} players")]
    ActivePlayerOutOfRange { index: usize, player_count: usize },
    #[error("turn number went from {from} to {to}")]
    TurnRegressed { from: u32, to: u32 },
    #[error("{player} should own {expected} cards but {actual} are tracked")]
    ConservationBroken {
        player: PlayerId,
        expected: usize,
        actual: usize,
    },
}

/// Error from `Engine::step`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("engine halted: {0}")]
    Halted(InvariantViolation),
}

/// Error from `Engine::provide_choice`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ChoiceError {
    #[error("no choice is pending")]
    NoPendingChoice,
    #[error("{0:?} is not one of the offered options")]
    InvalidChoice(ChoiceValue),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Error from `GameBuilder::build`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("a game needs 1 to 255 players, got {0}")]
    PlayerCount(usize),
    #[error("first player {first} is not seated in a {player_count}-player game")]
    FirstPlayer { first: PlayerId, player_count: usize },
    #[error("deck list references unknown card {0}")]
    UnknownCard(CardId),
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// Error from encoding, decoding, or re-running a replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("replay encoding failed: {0}")]
    Decode(#[from] bincode::Error),
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error("input {index} was rejected: {reason}")]
    Rejected {
        index: usize,
        #[source]
        reason: Rejection,
    },
    #[error("input {index} was not a valid choice: {source}")]
    Choice {
        index: usize,
        #[source]
        source: ChoiceError,
    },
    #[error(transparent)]
    Engine(#[from] EngineError),
}
