//! Tiered effect queue.
//!
//! Effects wait in one of five priority tiers. `take_next` always returns the
//! earliest-enqueued effect of the highest non-empty tier, and it is the only
//! way effects leave the queue during play. The engine calls it exactly once
//! per step.
//!
//! ```
//! use lore_engine::core::PlayerId;
//! use lore_engine::effects::Effect;
//! use lore_engine::stack::{EffectOrigin, EffectQueue, Priority};
//!
//! let mut queue = EffectQueue::new();
//! let p = PlayerId::new(0);
//! queue.enqueue(Effect::DrawCard { player: p }, Priority::Normal, p, EffectOrigin::Rules);
//! queue.enqueue(Effect::EndTurn { player: p }, Priority::Cleanup, p, EffectOrigin::Rules);
//! queue.enqueue(Effect::ReadyAll { player: p }, Priority::High, p, EffectOrigin::Rules);
//!
//! assert_eq!(queue.take_next().map(|q| q.priority), Some(Priority::High));
//! assert_eq!(queue.take_next().map(|q| q.priority), Some(Priority::Normal));
//! assert_eq!(queue.take_next().map(|q| q.priority), Some(Priority::Cleanup));
//! assert!(queue.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::abilities::AbilityId;
use crate::core::{EntityId, MoveKind, PlayerId};
use crate::effects::{Effect, EffectSummary};

/// Resolution tiers, highest first. Declaration order is resolution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Replacement-style effects that must apply before anything else.
    Immediate,
    /// Triggered abilities.
    High,
    /// Direct results of moves.
    Normal,
    /// Deferred effects.
    Low,
    /// End-of-phase bookkeeping.
    Cleanup,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Priority::Immediate,
        Priority::High,
        Priority::Normal,
        Priority::Low,
        Priority::Cleanup,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Identifier assigned at enqueue time. Monotonic over a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EffectId(pub u64);

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Effect#{}", self.0)
    }
}

/// What put an effect in the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectOrigin {
    /// Conversion of a submitted move.
    Move(MoveKind),
    /// A triggered ability. `ability` is `None` for keyword-synthesized
    /// triggers such as Support.
    Trigger {
        source: EntityId,
        ability: Option<AbilityId>,
    },
    /// Game rules: turn structure, Bodyguard, challenge cleanup.
    Rules,
}

/// An effect waiting in the queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueuedEffect {
    pub id: EffectId,
    pub priority: Priority,
    pub effect: Effect,
    /// Player who makes choices for this effect.
    pub controller: PlayerId,
    /// "May" effects ask the controller before applying.
    pub optional: bool,
    pub origin: EffectOrigin,
}

impl QueuedEffect {
    #[must_use]
    pub fn summary(&self) -> EffectSummary {
        EffectSummary {
            id: self.id,
            priority: self.priority,
            effect: self.effect.clone(),
        }
    }
}

/// Five FIFO tiers.
#[derive(Clone, Debug, Default)]
pub struct EffectQueue {
    tiers: [VecDeque<QueuedEffect>; 5],
    next_id: u64,
}

impl EffectQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mandatory effect to the tail of its tier.
    pub fn enqueue(
        &mut self,
        effect: Effect,
        priority: Priority,
        controller: PlayerId,
        origin: EffectOrigin,
    ) -> EffectId {
        self.push(effect, priority, controller, false, origin)
    }

    /// Append an effect its controller may decline.
    pub fn enqueue_optional(
        &mut self,
        effect: Effect,
        priority: Priority,
        controller: PlayerId,
        origin: EffectOrigin,
    ) -> EffectId {
        self.push(effect, priority, controller, true, origin)
    }

    fn push(
        &mut self,
        effect: Effect,
        priority: Priority,
        controller: PlayerId,
        optional: bool,
        origin: EffectOrigin,
    ) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;

        tracing::trace!(
            target: "lore_engine::queue",
            id = id.0,
            ?priority,
            effect = effect.name(),
            "effect.enqueued"
        );

        self.tiers[priority.index()].push_back(QueuedEffect {
            id,
            priority,
            effect,
            controller,
            optional,
            origin,
        });
        id
    }

    /// Remove and return the next effect to resolve.
    pub fn take_next(&mut self) -> Option<QueuedEffect> {
        self.tiers.iter_mut().find_map(VecDeque::pop_front)
    }

    /// The effect `take_next` would return.
    #[must_use]
    pub fn peek_next(&self) -> Option<&QueuedEffect> {
        self.tiers.iter().find_map(VecDeque::front)
    }

    /// Cancel a queued effect.
    pub fn remove(&mut self, id: EffectId) -> Option<QueuedEffect> {
        self.tiers.iter_mut().find_map(|tier| {
            let idx = tier.iter().position(|q| q.id == id)?;
            tier.remove(idx)
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.iter().map(VecDeque::len).sum()
    }

    #[must_use]
    pub fn len_at(&self, priority: Priority) -> usize {
        self.tiers[priority.index()].len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.iter().all(VecDeque::is_empty)
    }

    /// Every queued effect, in resolution order.
    pub fn iter(&self) -> impl Iterator<Item = &QueuedEffect> {
        self.tiers.iter().flat_map(|tier| tier.iter())
    }

    /// Drop everything. Ids keep counting.
    pub fn clear(&mut self) {
        for tier in &mut self.tiers {
            tier.clear();
        }
    }
}
