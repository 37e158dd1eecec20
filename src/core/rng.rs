//! Deterministic random number generation.
//!
//! The only randomness in a game is deck order. Every shuffle draws from a
//! seeded ChaCha8 stream so a game is fully reproduced by its seed, its decks,
//! and the sequence of moves and choices (see `replay`).
//!
//! ## Context streams
//!
//! ```
//! use lore_engine::core::GameRng;
//!
//! let rng = GameRng::new(7);
//! let mut a = rng.for_context("shuffle.0");
//! let mut b = GameRng::new(7).for_context("shuffle.0");
//! assert_eq!(a.gen_range_usize(0..100), b.gen_range_usize(0..100));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Seeded RNG used for shuffling.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this stream was created from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Create an independent stream for a named purpose.
    ///
    /// The same context always yields the same stream for the same seed,
    /// regardless of how much of the parent stream has been consumed, and on
    /// every toolchain.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    /// Capture the stream position.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Resume a stream from a captured position.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter).
    pub word_pos: u128,
}
