//! Event-driven abilities.
//!
//! - [`GameEvent`]: what an applied effect reports
//! - [`TriggerCondition`]: the event kind and filter a triggered ability waits for
//! - [`AbilityRegistry`]: the live-ability index, updated on every zone change
//!
//! Dispatch returns [`PendingTrigger`]s; the engine instantiates their
//! templates and enqueues the effects at the ability's priority.

mod condition;
mod event;
mod registry;

pub use condition::{ConditionContext, ConditionEvaluator, EventFilter, TriggerCondition};
pub use event::{EventKind, GameEvent};
pub use registry::{AbilityRef, AbilityRegistry, AbilitySlot, LiveStatic, PendingTrigger};
