//! Move conversion: a validated `Move` becomes the queued effects that carry
//! it out.
//!
//! Everything lands at `Normal` except the end of a challenge, which waits
//! at `Cleanup` so triggers from the fight resolve first. Card templates are
//! instantiated here; chosen targets that were not supplied stay open and
//! are asked about when their effect comes up.

use crate::abilities::Ability;
use crate::cards::CardKind;
use crate::core::{EntityId, Move, PlayerId};
use crate::effects::{Amount, Effect, EffectTemplate, Scheduled, Target, TemplateContext};
use crate::rules::GameView;
use crate::stack::Priority;

/// The effects for `mv`. Assumes `validate` accepted it.
#[must_use]
pub(crate) fn convert(view: &GameView<'_>, player: PlayerId, mv: &Move) -> Vec<Scheduled> {
    let effects = match mv {
        Move::Ink { card } => vec![Effect::InkCard { player, card: *card }],

        Move::PlayCard { card } => {
            let mut effects = Vec::new();
            let cost = view.effective_cost(*card);
            if cost > 0 {
                effects.push(Effect::PayInk { player, amount: cost });
            }
            match view.definition(*card).map(|d| &d.kind) {
                Some(CardKind::Action(stats)) => {
                    effects.push(Effect::PlayAction {
                        player,
                        card: *card,
                        singer: None,
                    });
                    effects.extend(instantiate(view, player, *card, &stats.effects, &[]));
                }
                _ => effects.push(Effect::PlaceCard { player, card: *card }),
            }
            effects
        }

        Move::Sing { song, singer } => {
            let mut effects = vec![
                Effect::Exert {
                    target: Target::Card(*singer),
                },
                Effect::PlayAction {
                    player,
                    card: *song,
                    singer: Some(*singer),
                },
            ];
            let templates = view.definition(*song).map_or(&[][..], |d| d.action_effects());
            effects.extend(instantiate(view, player, *song, templates, &[]));
            effects
        }

        Move::Quest { character } => vec![
            Effect::Quest { character: *character },
            Effect::GainLore {
                player,
                amount: Amount::LoreOf(*character),
            },
        ],

        Move::Challenge { attacker, defender } => {
            let mut effects = vec![
                Effect::DeclareChallenge {
                    attacker: *attacker,
                    defender: *defender,
                },
                Effect::DealDamage {
                    target: Target::Card(*defender),
                    amount: Amount::StrengthOf(*attacker),
                    source: Some(*attacker),
                },
            ];
            let location = matches!(view.definition(*defender).map(|d| &d.kind), Some(CardKind::Location(_)));
            if !location {
                effects.push(Effect::DealDamage {
                    target: Target::Card(*attacker),
                    amount: Amount::StrengthOf(*defender),
                    source: Some(*defender),
                });
            }
            let mut scheduled: Vec<Scheduled> = effects
                .into_iter()
                .map(|e| Scheduled::new(Priority::Normal, e))
                .collect();
            scheduled.push(Scheduled::new(
                Priority::Cleanup,
                Effect::EndChallenge { attacker: *attacker },
            ));
            return scheduled;
        }

        Move::ActivateAbility {
            source,
            ability,
            targets,
        } => {
            let mut effects = vec![Effect::PayActivationCost {
                source: *source,
                ability: *ability,
            }];
            if let Some(Ability::Activated(activated)) = view.definition(*source).and_then(|d| d.ability(*ability)) {
                effects.extend(instantiate(view, player, *source, &activated.effects, targets));
            }
            effects
        }

        Move::Pass => vec![Effect::EndTurn { player }],
    };

    effects
        .into_iter()
        .map(|e| Scheduled::new(Priority::Normal, e))
        .collect()
}

fn instantiate(
    view: &GameView<'_>,
    player: PlayerId,
    source: EntityId,
    templates: &[EffectTemplate],
    targets: &[EntityId],
) -> Vec<Effect> {
    let mut ctx = TemplateContext::new(player)
        .from_source(source)
        .with_targets(targets.iter().copied());
    templates
        .iter()
        .flat_map(|template| template.instantiate(view, &mut ctx))
        .collect()
}
