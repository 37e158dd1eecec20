//! Game rules.
//!
//! - [`GameView`]: effective stats, keywords, costs and ink
//! - [`validate`] / [`legal_moves`]: move legality
//! - [`phases`]: what each turn-structure effect schedules next
//! - [`run_checks`]: banishment and game end, after every step
//!
//! Everything here is read-only. Mutation happens in `effects::resolver`.

mod checker;
pub mod phases;
mod validator;
mod view;

pub use checker::{banishments, game_result, run_checks, CheckOutcome, GameResult};
pub use validator::{legal_moves, validate};
pub use view::GameView;
