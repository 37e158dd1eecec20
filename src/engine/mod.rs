//! Execution engine.
//!
//! - `Engine`: owns the game and runs the submit / step / choose cycle
//! - `GameBuilder`: seats players, shuffles, deals and queues the first turn
//! - `ChoiceRequest`: what a suspended effect needs answered

mod builder;
mod choice;
mod convert;
mod game;

pub use builder::GameBuilder;
pub use choice::{ChoiceKind, ChoiceRequest};
pub use game::{Engine, EngineStatus, StepResult};
