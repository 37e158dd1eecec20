//! State-based checks.
//!
//! Run by the engine after every applied effect, inside the same step:
//!
//! - **Banishment**: characters and locations whose damage has reached their
//!   effective willpower.
//! - **Game end**: lore win, deck exhaustion, or a stalemate of passed turns.

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, PlayerId};
use crate::zones::{Zone, ZoneId};

use super::view::GameView;

/// How a game ended.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    Winner(PlayerId),
    Draw,
}

impl GameResult {
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self {
            GameResult::Winner(p) => Some(*p),
            GameResult::Draw => None,
        }
    }

    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winner() == Some(player)
    }
}

/// What the checks found.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Cards to banish, in turn order from the active player, then board order.
    pub banish: Vec<EntityId>,
    pub result: Option<GameResult>,
}

impl CheckOutcome {
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.banish.is_empty() && self.result.is_none()
    }
}

/// Run every state-based check.
#[must_use]
pub fn run_checks(view: &GameView<'_>) -> CheckOutcome {
    CheckOutcome {
        banish: banishments(view),
        result: game_result(view),
    }
}

/// Damaged cards at or past their willpower.
#[must_use]
pub fn banishments(view: &GameView<'_>) -> Vec<EntityId> {
    let state = view.state;
    let characters = PlayerId::turn_order(state.active_player, state.player_count())
        .flat_map(|p| state.cards_in(state.zone(p, Zone::Characters)));
    characters
        .chain(state.cards_in(ZoneId::locations()))
        .filter(|e| {
            let damageable = view.definition(*e).map_or(false, |d| d.kind.as_damageable().is_some());
            let damage = view.card(*e).map_or(0, |c| c.damage);
            damageable && damage >= view.effective_willpower(*e)
        })
        .collect()
}

/// The game's result, if it is over.
///
/// Lore is checked first, then deck exhaustion, then the pass stalemate.
#[must_use]
pub fn game_result(view: &GameView<'_>) -> Option<GameResult> {
    lore_winner(view)
        .or_else(|| deck_out(view))
        .or_else(|| stalemate(view))
}

fn lore_winner(view: &GameView<'_>) -> Option<GameResult> {
    let target = view.config.lore_to_win;
    best_by_lore(
        view,
        PlayerId::turn_order(view.state.active_player, view.state.player_count())
            .filter(|p| view.state.player(*p).lore >= target),
    )
    .map(GameResult::Winner)
}

fn deck_out(view: &GameView<'_>) -> Option<GameResult> {
    let state = view.state;
    if !view.config.deck_out_loses || state.turn_number <= 1 {
        return None;
    }
    let exhausted = |p: PlayerId| state.zone_size(p, Zone::Deck) == 0 && state.zone_size(p, Zone::Hand) == 0;
    if !state.player_ids().any(exhausted) {
        return None;
    }

    let survivors = PlayerId::turn_order(state.active_player, state.player_count()).filter(|p| !exhausted(*p));
    Some(best_by_lore(view, survivors).map_or(GameResult::Draw, GameResult::Winner))
}

fn stalemate(view: &GameView<'_>) -> Option<GameResult> {
    let limit = view.config.max_consecutive_passes?;
    (view.state.consecutive_passes >= limit).then_some(GameResult::Draw)
}

/// Highest lore; ties go to the earliest in the given order.
fn best_by_lore(view: &GameView<'_>, players: impl Iterator<Item = PlayerId>) -> Option<PlayerId> {
    players.fold(None, |best: Option<PlayerId>, p| match best {
        Some(b) if view.state.player(b).lore >= view.state.player(p).lore => Some(b),
        _ => Some(p),
    })
}
