//! Choice requests raised while an effect is suspended.

use serde::{Deserialize, Serialize};

use crate::core::{ChoiceValue, EntityId, PlayerId};
use crate::effects::EffectSummary;

/// A question the engine needs answered before it can apply an effect.
///
/// Raised when the effect must pick a target from more than one candidate,
/// or when it is a "may" effect. The engine does nothing else until
/// `Engine::provide_choice` answers it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChoiceRequest {
    /// Player who answers.
    pub player: PlayerId,
    /// The suspended effect.
    pub effect: EffectSummary,
    /// Legal targets, in selector order. Empty for a plain yes/no.
    pub candidates: Vec<EntityId>,
    /// `Decline` is allowed.
    pub optional: bool,
}

/// Which kind of answer a request wants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChoiceKind {
    Target,
    Confirm,
}

impl ChoiceRequest {
    #[must_use]
    pub fn kind(&self) -> ChoiceKind {
        if self.candidates.is_empty() {
            ChoiceKind::Confirm
        } else {
            ChoiceKind::Target
        }
    }

    /// Is `value` a legal answer?
    #[must_use]
    pub fn accepts(&self, value: ChoiceValue) -> bool {
        match value {
            ChoiceValue::Target(entity) => self.candidates.contains(&entity),
            ChoiceValue::Accept => self.candidates.is_empty(),
            ChoiceValue::Decline => self.optional,
        }
    }

    /// Every legal answer.
    #[must_use]
    pub fn options(&self) -> Vec<ChoiceValue> {
        let mut options: Vec<ChoiceValue> = self.candidates.iter().copied().map(ChoiceValue::Target).collect();
        if self.candidates.is_empty() {
            options.push(ChoiceValue::Accept);
        }
        if self.optional {
            options.push(ChoiceValue::Decline);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::Effect;
    use crate::stack::{EffectId, Priority};

    fn request(candidates: Vec<EntityId>, optional: bool) -> ChoiceRequest {
        ChoiceRequest {
            player: PlayerId(0),
            effect: EffectSummary {
                id: EffectId(3),
                priority: Priority::High,
                effect: Effect::DrawCard { player: PlayerId(0) },
            },
            candidates,
            optional,
        }
    }

    #[test]
    fn test_target_request() {
        let req = request(vec![EntityId(4), EntityId(7)], false);
        assert_eq!(req.kind(), ChoiceKind::Target);
        assert!(req.accepts(ChoiceValue::Target(EntityId(7))));
        assert!(!req.accepts(ChoiceValue::Target(EntityId(5))));
        assert!(!req.accepts(ChoiceValue::Accept));
        assert!(!req.accepts(ChoiceValue::Decline));
        assert_eq!(req.options().len(), 2);
    }

    #[test]
    fn test_confirm_request() {
        let req = request(Vec::new(), true);
        assert_eq!(req.kind(), ChoiceKind::Confirm);
        assert_eq!(req.options(), vec![ChoiceValue::Accept, ChoiceValue::Decline]);
        assert!(!req.accepts(ChoiceValue::Target(EntityId(1))));
    }
}
