//! Core engine types: entities, players, state, moves, RNG, configuration.

pub mod action;
pub mod config;
pub mod entity;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{ActionRecord, ChoiceValue, Move, MoveKind, RecordEntry};
pub use config::{Phase, RulesConfig};
pub use entity::EntityId;
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{GameState, PlayerState};
