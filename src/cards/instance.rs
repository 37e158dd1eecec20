//! Card instances - runtime card state.
//!
//! A `CardInstance` is one physical copy of a card in one game. Instances are
//! created at setup and never destroyed: they only move between zones. All
//! mutable per-card state lives here (damage, exerted flag, temporary
//! modifiers). Effective stats that also depend on static abilities are
//! computed by `rules::GameView`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::definition::CardId;
use crate::abilities::{Duration, Keyword, Modifier, ModifierKind, Stat, StatLine};
use crate::core::{EntityId, PlayerId};
use crate::zones::ZoneId;

/// A card in a game.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardInstance {
    /// Unique entity ID for this instance.
    pub entity_id: EntityId,

    /// Reference to the card definition.
    pub card_id: CardId,

    /// Player who started the game with this card.
    pub owner: PlayerId,

    /// Player who currently controls it. Reset to the owner when it leaves play.
    pub controller: PlayerId,

    /// Current zone. Mirrors the `ZoneManager` index.
    pub zone: ZoneId,

    pub damage: u32,

    pub exerted: bool,

    /// Turn number on which the card last entered play.
    pub entered_turn: Option<u32>,

    /// Temporary modifiers applied by effects.
    #[serde(default)]
    pub modifiers: SmallVec<[Modifier; 2]>,

    /// Effective stats captured when the card last left play.
    pub last_known: Option<StatLine>,
}

impl CardInstance {
    #[must_use]
    pub fn new(entity_id: EntityId, card_id: CardId, owner: PlayerId, zone: ZoneId) -> Self {
        Self {
            entity_id,
            card_id,
            owner,
            controller: owner,
            zone,
            damage: 0,
            exerted: false,
            entered_turn: None,
            modifiers: SmallVec::new(),
            last_known: None,
        }
    }

    #[must_use]
    pub fn is_in_play(&self) -> bool {
        self.zone.is_in_play()
    }

    #[must_use]
    pub fn is_damaged(&self) -> bool {
        self.damage > 0
    }

    /// Entered play this turn and cannot yet quest, challenge or sing.
    #[must_use]
    pub fn is_drying(&self, turn_number: u32) -> bool {
        self.entered_turn == Some(turn_number)
    }

    /// Sum of temporary deltas to one stat.
    #[must_use]
    pub fn stat_delta(&self, stat: Stat) -> i32 {
        self.modifiers
            .iter()
            .filter_map(|m| match m.kind {
                ModifierKind::Stat { stat: s, delta } if s == stat => Some(delta),
                _ => None,
            })
            .sum()
    }

    /// Keywords granted by temporary modifiers.
    pub fn granted_keywords(&self) -> impl Iterator<Item = Keyword> + '_ {
        self.modifiers.iter().filter_map(|m| match m.kind {
            ModifierKind::Keyword(k) => Some(k),
            ModifierKind::Stat { .. } => None,
        })
    }

    pub fn add_modifier(&mut self, modifier: Modifier) {
        self.modifiers.push(modifier);
    }

    /// Drop modifiers with the given duration. Returns how many were removed.
    pub fn expire_modifiers(&mut self, duration: Duration) -> usize {
        let before = self.modifiers.len();
        self.modifiers.retain(|m| m.duration != duration);
        before - self.modifiers.len()
    }

    /// Forget everything tied to being in play.
    pub fn reset_play_state(&mut self) {
        self.damage = 0;
        self.exerted = false;
        self.entered_turn = None;
        self.modifiers.clear();
        self.controller = self.owner;
    }
}
