//! Effect system.
//!
//! - `Effect`: one atomic state mutation, queued and applied per step
//! - `EffectTemplate`: an effect relative to its ability, instantiated when
//!   the ability fires
//! - `TargetSpec`, `CardFilter`, `Selector`: how effects pick their cards
//! - `resolver`: applies one `Effect` to the state and reports the events

mod effect;
pub mod resolver;
mod targeting;
mod template;

pub use effect::{Amount, Effect, EffectOutcome, EffectSummary, Target};
pub use resolver::{resolve, Resolution, ResolverContext, Scheduled};
pub use targeting::{CardFilter, PlayerSpec, Selector, Side, TargetSpec};
pub use template::{EffectTemplate, TemplateContext};
