//! Rules configuration and turn phases.
//!
//! `RulesConfig` collects the numeric thresholds and optional rules that a
//! table may want to vary. Defaults follow the standard game: 20 lore wins,
//! seven-card opening hands, and the first player skips their first draw.
//!
//! ```
//! use lore_engine::core::RulesConfig;
//!
//! let config = RulesConfig::default()
//!     .with_lore_to_win(10)
//!     .with_max_consecutive_passes(None);
//! assert_eq!(config.lore_to_win, 10);
//! assert_eq!(config.opening_hand_size, 7);
//! ```

use serde::{Deserialize, Serialize};

/// Steps of a turn, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Ready the active player's cards.
    #[default]
    Ready,
    /// Start-of-turn effects, location lore, and the turn's draw.
    Set,
    /// The player acts: ink, play, quest, challenge, sing, activate, pass.
    Main,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Ready => "ready",
            Phase::Set => "set",
            Phase::Main => "main",
        };
        f.write_str(name)
    }
}

/// Table rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Lore needed to win.
    pub lore_to_win: u32,

    /// Cards drawn by each player during setup.
    pub opening_hand_size: usize,

    /// The first player does not draw on the first turn of the game.
    pub first_player_skips_draw: bool,

    /// End the game as a draw after this many turns in a row end without
    /// any move besides `Pass`. `None` disables the check.
    pub max_consecutive_passes: Option<u32>,

    /// Playing a card requires at least one inkwell card of its color.
    pub require_ink_color: bool,

    /// A player with no cards in deck or hand after the first turn loses.
    pub deck_out_loses: bool,

    /// Verify zone and turn invariants after every step.
    pub check_invariants: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            lore_to_win: 20,
            opening_hand_size: 7,
            first_player_skips_draw: true,
            max_consecutive_passes: Some(20),
            require_ink_color: false,
            deck_out_loses: true,
            check_invariants: true,
        }
    }
}

impl RulesConfig {
    #[must_use]
    pub fn with_lore_to_win(mut self, lore: u32) -> Self {
        self.lore_to_win = lore;
        self
    }

    #[must_use]
    pub fn with_opening_hand_size(mut self, size: usize) -> Self {
        self.opening_hand_size = size;
        self
    }

    #[must_use]
    pub fn with_first_player_skips_draw(mut self, skips: bool) -> Self {
        self.first_player_skips_draw = skips;
        self
    }

    #[must_use]
    pub fn with_max_consecutive_passes(mut self, passes: Option<u32>) -> Self {
        self.max_consecutive_passes = passes;
        self
    }

    #[must_use]
    pub fn with_ink_color_requirement(mut self, required: bool) -> Self {
        self.require_ink_color = required;
        self
    }

    #[must_use]
    pub fn with_deck_out(mut self, loses: bool) -> Self {
        self.deck_out_loses = loses;
        self
    }
}
