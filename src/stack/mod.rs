//! Effect queue.
//!
//! Pending work lives in an `EffectQueue` split into five strict priority
//! tiers (`Immediate`, `High`, `Normal`, `Low`, `Cleanup`). Within a tier,
//! effects resolve in the order they were enqueued. This single FIFO rule
//! covers move results, triggered abilities and turn bookkeeping alike.

mod queue;

pub use queue::{EffectId, EffectOrigin, EffectQueue, Priority, QueuedEffect};
