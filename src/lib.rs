//! # lore-engine
//!
//! A deterministic, step-driven rules engine for Lorcana-style trading card
//! games.
//!
//! ## Design Principles
//!
//! 1. **One effect per step**: every state change is a queued `Effect`, and
//!    `Engine::step` applies exactly one. Callers see every intermediate state.
//!
//! 2. **Deterministic ordering**: five strict priority tiers, FIFO within a
//!    tier, and a fixed order for triggers that share an event. Same seed and
//!    same inputs give the same game.
//!
//! 3. **Abilities are data**: keywords, triggered, static and activated
//!    abilities are structured descriptors on the card definition.
//!
//! ## Architecture
//!
//! ```text
//! Move ─► submit ─► validate ─► convert ─► EffectQueue
//!                                              │ step
//!                                              ▼
//!                           resolve ─► GameEvents ─► AbilityRegistry::dispatch
//!                              │                          │
//!                              ▼                          ▼
//!                     banish / game end            triggers queued at High
//! ```
//!
//! - **Persistent Data Structures**: card instances, zones and history use
//!   `im`, so cloning a `GameState` for lookahead is cheap.
//!
//! ## Modules
//!
//! - `core`: entity IDs, players, state, moves, RNG, configuration
//! - `zones`: zones and card location tracking
//! - `cards`: card definitions, instances and the catalog
//! - `abilities`: keyword, triggered, static and activated ability descriptors
//! - `effects`: atomic effects, templates, targeting and the resolver
//! - `triggers`: game events and the live-ability registry
//! - `stack`: the tiered effect queue
//! - `rules`: effective stats, move validation, turn structure, state checks
//! - `engine`: the submit / step / choose cycle and game setup
//! - `replay`: recording and re-running games

pub mod abilities;
pub mod cards;
pub mod core;
pub mod effects;
pub mod engine;
pub mod error;
pub mod replay;
pub mod rules;
pub mod stack;
pub mod triggers;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    ActionRecord, ChoiceValue, EntityId, GameRng, GameState, Move, MoveKind, Phase, PlayerId, PlayerMap,
    RulesConfig,
};

pub use crate::zones::{Zone, ZoneId, ZoneManager, ZonePosition};

pub use crate::cards::{CardCatalog, CardDefinition, CardId, CardInstance, CardKind, InkColor};

pub use crate::abilities::{Ability, AbilityId, Keyword, KeywordKind};

pub use crate::effects::{Effect, EffectOutcome, EffectTemplate, TargetSpec};

pub use crate::triggers::{AbilityRegistry, EventKind, GameEvent};

pub use crate::stack::{EffectOrigin, EffectQueue, Priority};

pub use crate::rules::{GameResult, GameView};

pub use crate::engine::{ChoiceRequest, Engine, EngineStatus, GameBuilder, StepResult};

pub use crate::error::{ChoiceError, EffectError, EngineError, InvariantViolation, Rejection, ReplayError, SetupError};

pub use crate::replay::{Replay, ReplayInput};
