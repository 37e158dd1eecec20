//! Effect queue integration tests.
//!
//! The queue on its own (tier order, FIFO within a tier, cancellation) and
//! as the engine drives it through a turn change.

use std::sync::Arc;

use proptest::prelude::*;

use lore_engine::abilities::Duration;
use lore_engine::cards::{CardCatalog, CardDefinition, CardId, InkColor};
use lore_engine::core::{Move, MoveKind, PlayerId};
use lore_engine::effects::Effect;
use lore_engine::engine::GameBuilder;
use lore_engine::stack::{EffectId, EffectOrigin, EffectQueue, Priority};

const P0: PlayerId = PlayerId(0);
const P1: PlayerId = PlayerId(1);

fn draw(player: PlayerId) -> Effect {
    Effect::DrawCard { player }
}

fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop::sample::select(Priority::ALL.to_vec())
}

// =============================================================================
// Queue ordering
// =============================================================================

/// Test that every tier drains before the next one starts.
#[test]
fn test_tiers_drain_in_order() {
    let mut queue = EffectQueue::new();
    for priority in Priority::ALL.iter().rev() {
        queue.enqueue(draw(P0), *priority, P0, EffectOrigin::Rules);
        queue.enqueue(draw(P1), *priority, P1, EffectOrigin::Rules);
    }

    let drained: Vec<_> = std::iter::from_fn(|| queue.take_next())
        .map(|q| (q.priority, q.controller))
        .collect();
    let expected: Vec<_> = Priority::ALL.iter().flat_map(|p| [(*p, P0), (*p, P1)]).collect();
    assert_eq!(drained, expected);
}

/// Test that a late High effect still jumps ahead of queued Normal ones.
#[test]
fn test_late_high_effect_jumps_ahead() {
    let mut queue = EffectQueue::new();
    let origin = EffectOrigin::Move(MoveKind::Quest);
    let first = queue.enqueue(draw(P0), Priority::Normal, P0, origin);
    queue.enqueue(draw(P0), Priority::Normal, P0, origin);

    assert_eq!(queue.take_next().map(|q| q.id), Some(first));
    let trigger = queue.enqueue_optional(draw(P1), Priority::High, P1, EffectOrigin::Rules);

    let next = queue.take_next().unwrap();
    assert_eq!(next.id, trigger);
    assert!(next.optional);
    assert_eq!(queue.len_at(Priority::Normal), 1);
}

/// Test that cancelled effects never resolve and ids keep counting after a clear.
#[test]
fn test_remove_and_clear() {
    let mut queue = EffectQueue::new();
    let a = queue.enqueue(draw(P0), Priority::Low, P0, EffectOrigin::Rules);
    let b = queue.enqueue(draw(P1), Priority::Low, P1, EffectOrigin::Rules);

    assert_eq!(queue.remove(a).map(|q| q.id), Some(a));
    assert!(queue.remove(a).is_none());
    assert_eq!(queue.peek_next().map(|q| q.id), Some(b));

    queue.clear();
    assert!(queue.is_empty());
    let c = queue.enqueue(draw(P0), Priority::Low, P0, EffectOrigin::Rules);
    assert!(c > b);
}

proptest! {
    /// Any enqueue sequence drains sorted by tier, then by enqueue order.
    #[test]
    fn prop_drain_order_is_tier_then_fifo(priorities in prop::collection::vec(priority_strategy(), 0..40)) {
        let mut queue = EffectQueue::new();
        let mut expected: Vec<(Priority, EffectId)> = priorities
            .iter()
            .map(|p| (*p, queue.enqueue(draw(P0), *p, P0, EffectOrigin::Rules)))
            .collect();
        expected.sort();

        prop_assert_eq!(queue.len(), expected.len());
        let drained: Vec<_> = std::iter::from_fn(|| queue.take_next()).map(|q| (q.priority, q.id)).collect();
        prop_assert_eq!(drained, expected);
    }
}

// =============================================================================
// Queue inside the engine
// =============================================================================

/// Test that ending a turn expires modifiers before the next turn begins.
#[test]
fn test_turn_change_is_queued_behind_expiry() {
    let catalog = Arc::new(
        CardCatalog::new().with_card(CardDefinition::character(CardId(1), "Page", 1, InkColor::Amber, 1, 2, 1)),
    );
    let mut engine = GameBuilder::new(catalog)
        .with_deck(vec![CardId(1); 12])
        .with_deck(vec![CardId(1); 12])
        .build()
        .unwrap();
    engine.run_until_stable().unwrap();

    engine.submit(P0, Move::Pass).unwrap();
    let pass = engine.queue().peek_next().unwrap();
    assert_eq!(pass.effect, Effect::EndTurn { player: P0 });
    assert_eq!(pass.origin, EffectOrigin::Move(MoveKind::Pass));

    engine.step().unwrap();
    let pending: Vec<_> = engine.queue().iter().map(|q| (q.priority, q.effect.clone())).collect();
    assert_eq!(
        pending,
        vec![
            (
                Priority::Low,
                Effect::ExpireModifiers {
                    duration: Duration::EndOfTurn
                }
            ),
            (Priority::Cleanup, Effect::BeginTurn { player: P1 }),
        ]
    );
}
