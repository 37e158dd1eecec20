//! Replays.
//!
//! A game is fully determined by its setup (seed, first player, rules and
//! deck lists) and the inputs the players gave it. `Replay` stores exactly
//! that, encodes it with bincode, and re-runs it through a fresh engine.
//!
//! ```
//! use std::sync::Arc;
//! use lore_engine::cards::{CardCatalog, CardDefinition, CardId, InkColor};
//! use lore_engine::core::{Move, PlayerId};
//! use lore_engine::engine::GameBuilder;
//! use lore_engine::replay::Replay;
//!
//! let catalog = Arc::new(
//!     CardCatalog::new().with_card(CardDefinition::character(CardId(1), "Page", 1, InkColor::Amber, 1, 1, 1)),
//! );
//! let mut engine = GameBuilder::new(Arc::clone(&catalog))
//!     .with_seed(3)
//!     .with_deck(vec![CardId(1); 15])
//!     .with_deck(vec![CardId(1); 15])
//!     .build()
//!     .unwrap();
//! engine.run_until_stable().unwrap();
//! engine.submit(PlayerId(0), Move::Pass).unwrap();
//! engine.run_until_stable().unwrap();
//!
//! let bytes = engine.replay().to_bytes().unwrap();
//! let rerun = Replay::from_bytes(&bytes).unwrap().run(catalog).unwrap();
//! assert_eq!(rerun.state().fingerprint(), engine.state().fingerprint());
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cards::{CardCatalog, CardId};
use crate::core::{ChoiceValue, Move, PlayerId, RulesConfig};
use crate::engine::{Engine, GameBuilder};
use crate::error::ReplayError;

/// One recorded input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplayInput {
    Move { player: PlayerId, mv: Move },
    Choice(ChoiceValue),
}

/// A recorded game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    pub seed: u64,
    pub first_player: PlayerId,
    pub config: RulesConfig,
    pub decks: Vec<Vec<CardId>>,
    pub inputs: Vec<ReplayInput>,
}

impl Replay {
    pub fn to_bytes(&self) -> Result<Vec<u8>, ReplayError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReplayError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// A builder for this replay's starting position.
    #[must_use]
    pub fn builder(&self, catalog: Arc<CardCatalog>) -> GameBuilder {
        GameBuilder::new(catalog)
            .with_config(self.config.clone())
            .with_seed(self.seed)
            .with_first_player(self.first_player)
            .with_decks(self.decks.clone())
    }

    /// Re-run every input, resolving the queue after each one.
    pub fn run(&self, catalog: Arc<CardCatalog>) -> Result<Engine, ReplayError> {
        let mut engine = self.builder(catalog).build()?;
        engine.run_until_stable()?;

        for (index, input) in self.inputs.iter().enumerate() {
            match input {
                ReplayInput::Move { player, mv } => engine
                    .submit(*player, mv.clone())
                    .map_err(|reason| ReplayError::Rejected { index, reason })?,
                ReplayInput::Choice(value) => {
                    engine
                        .provide_choice(*value)
                        .map_err(|source| ReplayError::Choice { index, source })?;
                }
            }
            engine.run_until_stable()?;
        }

        tracing::debug!(
            target: "lore_engine::replay",
            inputs = self.inputs.len(),
            fingerprint = engine.state().fingerprint(),
            "replay.finished"
        );
        Ok(engine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, InkColor};
    use crate::error::Rejection;

    fn catalog() -> Arc<CardCatalog> {
        Arc::new(CardCatalog::new().with_card(CardDefinition::character(CardId(1), "Page", 1, InkColor::Amber, 1, 2, 1)))
    }

    fn replay(inputs: Vec<ReplayInput>) -> Replay {
        Replay {
            seed: 11,
            first_player: PlayerId(1),
            config: RulesConfig::default().with_opening_hand_size(2),
            decks: vec![vec![CardId(1); 8], vec![CardId(1); 8]],
            inputs,
        }
    }

    #[test]
    fn test_bytes_round_trip() {
        let original = replay(vec![
            ReplayInput::Move {
                player: PlayerId(1),
                mv: Move::Pass,
            },
            ReplayInput::Choice(ChoiceValue::Decline),
        ]);
        let decoded = Replay::from_bytes(&original.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, original);
        assert!(matches!(Replay::from_bytes(&[1, 2]), Err(ReplayError::Decode(_))));
    }

    #[test]
    fn test_run_reports_rejected_input() {
        let bad = replay(vec![
            ReplayInput::Move {
                player: PlayerId(1),
                mv: Move::Pass,
            },
            ReplayInput::Move {
                player: PlayerId(1),
                mv: Move::Pass,
            },
        ]);
        match bad.run(catalog()) {
            Err(ReplayError::Rejected { index, reason }) => {
                assert_eq!(index, 1);
                assert_eq!(reason, Rejection::NotYourTurn { active: PlayerId(0) });
            }
            other => panic!("expected a rejection, got {:?}", other.map(|e| e.state().turn_number)),
        }
    }
}
