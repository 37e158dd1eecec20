//! Turn structure.
//!
//! A turn is a chain of queued effects, so every transition is a step the
//! caller can observe:
//!
//! ```text
//! EndTurn(p) ──► ExpireModifiers(EndOfTurn) @Low
//!            └─► BeginTurn(next) @Cleanup ──► ReadyAll(next), AdvancePhase(Set) @Normal
//!                                              AdvancePhase(Set) ──► location lore, draw,
//!                                                                    AdvancePhase(Main)
//! ```
//!
//! Main has no automatic steps: the engine waits for moves until `Pass`.
//! The functions here only decide *what* comes next; the resolver applies it.

use crate::abilities::Duration;
use crate::cards::CardKind;
use crate::core::{Phase, PlayerId};
use crate::effects::{Effect, Scheduled};
use crate::stack::Priority;
use crate::zones::ZoneId;

use super::view::GameView;

/// The player after the active one.
#[must_use]
pub fn next_player(view: &GameView<'_>) -> PlayerId {
    view.state.active_player.next(view.state.player_count())
}

/// The first player skips the draw on the game's first turn.
#[must_use]
pub fn skips_draw(view: &GameView<'_>, player: PlayerId) -> bool {
    view.config.first_player_skips_draw && view.state.turn_number == 1 && player == view.state.first_player
}

/// What follows `EndTurn`.
#[must_use]
pub fn after_end_turn(view: &GameView<'_>) -> Vec<Scheduled> {
    vec![
        Scheduled::new(
            Priority::Low,
            Effect::ExpireModifiers {
                duration: Duration::EndOfTurn,
            },
        ),
        Scheduled::new(
            Priority::Cleanup,
            Effect::BeginTurn {
                player: next_player(view),
            },
        ),
    ]
}

/// What follows `BeginTurn`: the Ready step, then entering Set.
#[must_use]
pub fn after_begin_turn(player: PlayerId) -> Vec<Scheduled> {
    vec![
        Scheduled::new(Priority::Normal, Effect::ReadyAll { player }),
        Scheduled::new(
            Priority::Normal,
            Effect::AdvancePhase {
                player,
                phase: Phase::Set,
            },
        ),
    ]
}

/// The Set step: lore from each location `player` controls, the turn's
/// draw, then Main.
#[must_use]
pub fn set_phase_steps(view: &GameView<'_>, player: PlayerId) -> Vec<Scheduled> {
    let mut steps: Vec<Scheduled> = view
        .state
        .cards_in(ZoneId::locations())
        .filter(|e| view.controller_of(*e) == Some(player))
        .filter(|e| matches!(view.definition(*e).map(|d| &d.kind), Some(CardKind::Location(_))))
        .filter(|e| view.effective_lore(*e) > 0)
        .map(|location| Scheduled::new(Priority::Normal, Effect::GainLocationLore { player, location }))
        .collect();

    if !skips_draw(view, player) {
        steps.push(Scheduled::new(Priority::Normal, Effect::DrawCard { player }));
    }
    steps.push(Scheduled::new(
        Priority::Normal,
        Effect::AdvancePhase {
            player,
            phase: Phase::Main,
        },
    ));
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardCatalog, CardDefinition, CardId, InkColor};
    use crate::core::{GameState, RulesConfig};
    use crate::triggers::AbilityRegistry;
    use crate::zones::ZonePosition;

    fn catalog() -> CardCatalog {
        CardCatalog::new()
            .with_card(CardDefinition::location(CardId(1), "Harbor", 2, InkColor::Sapphire, 1, 6, 1))
            .with_card(CardDefinition::location(CardId(2), "Ruins", 1, InkColor::Ruby, 1, 3, 0))
    }

    #[test]
    fn test_first_turn_skips_draw_for_first_player_only() {
        let catalog = catalog();
        let registry = AbilityRegistry::new();
        let config = RulesConfig::default();
        let mut state = GameState::new(2, PlayerId(1), 0);
        state.turn_number = 1;
        state.active_player = PlayerId(1);

        let view = GameView::new(&catalog, &state, &registry, &config);
        assert!(skips_draw(&view, PlayerId(1)));
        assert!(!skips_draw(&view, PlayerId(0)));
        assert_eq!(next_player(&view), PlayerId(0));

        let steps = set_phase_steps(&view, PlayerId(1));
        assert_eq!(steps.len(), 1);
        assert!(matches!(steps[0].effect, Effect::AdvancePhase { phase: Phase::Main, .. }));
    }

    #[test]
    fn test_set_phase_gains_location_lore() {
        let catalog = catalog();
        let registry = AbilityRegistry::new();
        let config = RulesConfig::default();
        let mut state = GameState::new(2, PlayerId(0), 0);
        state.turn_number = 3;
        let harbor = state
            .create_card(CardId(1), PlayerId(0), ZoneId::locations(), ZonePosition::Top)
            .unwrap();
        state
            .create_card(CardId(2), PlayerId(0), ZoneId::locations(), ZonePosition::Top)
            .unwrap();
        state
            .create_card(CardId(1), PlayerId(1), ZoneId::locations(), ZonePosition::Top)
            .unwrap();

        let view = GameView::new(&catalog, &state, &registry, &config);
        let effects: Vec<_> = set_phase_steps(&view, PlayerId(0)).into_iter().map(|s| s.effect).collect();
        assert_eq!(
            effects,
            vec![
                Effect::GainLocationLore {
                    player: PlayerId(0),
                    location: harbor
                },
                Effect::DrawCard { player: PlayerId(0) },
                Effect::AdvancePhase {
                    player: PlayerId(0),
                    phase: Phase::Main
                },
            ]
        );
    }

    #[test]
    fn test_end_turn_schedule() {
        let catalog = catalog();
        let registry = AbilityRegistry::new();
        let config = RulesConfig::default();
        let state = GameState::new(3, PlayerId(0), 0);
        let view = GameView::new(&catalog, &state, &registry, &config);

        let steps = after_end_turn(&view);
        assert_eq!(steps[0].priority, Priority::Low);
        assert_eq!(steps[1].priority, Priority::Cleanup);
        assert_eq!(steps[1].effect, Effect::BeginTurn { player: PlayerId(1) });
    }
}
