//! Move legality.
//!
//! `validate` answers "may this player make this move right now?" without
//! touching state. `legal_moves` enumerates candidates and keeps the ones
//! `validate` accepts, so the two can never disagree.
//!
//! Engine-level gates (game over, halted, awaiting a choice) are checked by
//! the engine before it gets here.

use crate::abilities::{Ability, AbilityId, KeywordKind};
use crate::cards::{CardInstance, CardKind};
use crate::core::{EntityId, Move, Phase, PlayerId};
use crate::effects::{Selector, TargetSpec};
use crate::error::Rejection;
use crate::zones::{Zone, ZoneId};

use super::view::GameView;

/// Check one move for `player`.
pub fn validate(view: &GameView<'_>, player: PlayerId, mv: &Move) -> Result<(), Rejection> {
    let state = view.state;
    if player != state.active_player {
        return Err(Rejection::NotYourTurn {
            active: state.active_player,
        });
    }
    if state.phase != Phase::Main {
        return Err(Rejection::WrongPhase(state.phase));
    }

    match mv {
        Move::Ink { card } => validate_ink(view, player, *card),
        Move::PlayCard { card } => validate_play(view, player, *card),
        Move::Quest { character } => validate_quest(view, player, *character),
        Move::Challenge { attacker, defender } => validate_challenge(view, player, *attacker, *defender),
        Move::Sing { song, singer } => validate_sing(view, player, *song, *singer),
        Move::ActivateAbility {
            source,
            ability,
            targets,
        } => validate_activation(view, player, *source, *ability, targets),
        Move::Pass => Ok(()),
    }
}

/// Every legal move for `player`, in a stable order: ink, play, quest,
/// challenge, sing, activate, pass.
///
/// Activations are listed without pre-bound targets; their choices are
/// asked for during resolution.
#[must_use]
pub fn legal_moves(view: &GameView<'_>, player: PlayerId) -> Vec<Move> {
    let state = view.state;
    if player != state.active_player || state.phase != Phase::Main {
        return Vec::new();
    }

    let hand: Vec<EntityId> = state.cards_in(state.zone(player, Zone::Hand)).collect();
    let in_play: Vec<EntityId> = state.in_play(player).collect();
    let characters: Vec<EntityId> = state.cards_in(state.zone(player, Zone::Characters)).collect();
    let defenders: Vec<EntityId> = PlayerId::turn_order(player, state.player_count())
        .skip(1)
        .flat_map(|p| state.cards_in(state.zone(p, Zone::Characters)))
        .chain(
            state
                .cards_in(ZoneId::locations())
                .filter(|e| view.controller_of(*e).map_or(false, |c| c != player)),
        )
        .collect();

    let mut candidates = Vec::new();
    candidates.extend(hand.iter().map(|&card| Move::Ink { card }));
    candidates.extend(hand.iter().map(|&card| Move::PlayCard { card }));
    candidates.extend(characters.iter().map(|&character| Move::Quest { character }));
    for &attacker in &characters {
        candidates.extend(defenders.iter().map(|&defender| Move::Challenge { attacker, defender }));
    }
    for &song in hand.iter().filter(|e| view.definition(**e).map_or(false, |d| d.is_song())) {
        candidates.extend(characters.iter().map(|&singer| Move::Sing { song, singer }));
    }
    for &source in in_play.iter().chain(hand.iter()) {
        candidates.extend(
            view.registry
                .activated_of(source)
                .iter()
                .map(|&ability| Move::activate(source, ability)),
        );
    }
    candidates.push(Move::Pass);

    candidates.retain(|mv| validate(view, player, mv).is_ok());
    candidates
}

// === Per-move checks ===

fn validate_ink(view: &GameView<'_>, player: PlayerId, card: EntityId) -> Result<(), Rejection> {
    if view.state.player(player).ink_played_this_turn {
        return Err(Rejection::InkAlreadyPlayed);
    }
    in_hand(view, player, card)?;
    let def = view.definition(card).ok_or(Rejection::CardNotFound(card))?;
    if !def.inkable {
        return Err(Rejection::NotInkable(card));
    }
    Ok(())
}

fn validate_play(view: &GameView<'_>, player: PlayerId, card: EntityId) -> Result<(), Rejection> {
    in_hand(view, player, card)?;
    let def = view.definition(card).ok_or(Rejection::CardNotFound(card))?;

    let cost = view.effective_cost(card);
    let available = view.available_ink(player);
    if cost > available {
        return Err(Rejection::CannotAfford { cost, available });
    }
    if view.config.require_ink_color && !view.inkwell_has_color(player, def.color) {
        return Err(Rejection::ColorMismatch { color: def.color });
    }
    Ok(())
}

fn validate_quest(view: &GameView<'_>, player: PlayerId, character: EntityId) -> Result<(), Rejection> {
    ready_dry_character(view, player, character, false)?;
    if view.has_keyword(character, KeywordKind::Reckless) {
        return Err(Rejection::Reckless(character));
    }
    Ok(())
}

fn validate_challenge(
    view: &GameView<'_>,
    player: PlayerId,
    attacker: EntityId,
    defender: EntityId,
) -> Result<(), Rejection> {
    let rush = view.has_keyword(attacker, KeywordKind::Rush);
    ready_dry_character(view, player, attacker, rush)?;

    let target = view.card(defender).ok_or(Rejection::CardNotFound(defender))?;
    if !target.is_in_play() {
        return Err(Rejection::NotInPlay(defender));
    }
    if target.controller == player {
        return Err(Rejection::OwnDefender(defender));
    }

    match view.definition(defender).map(|d| &d.kind) {
        Some(CardKind::Location(_)) => Ok(()),
        Some(CardKind::Character(_)) => {
            if !target.exerted {
                return Err(Rejection::DefenderNotExerted(defender));
            }
            if evades(view, attacker, defender) {
                return Err(Rejection::Evasive(defender));
            }
            if !view.has_keyword(defender, KeywordKind::Bodyguard) && guarded(view, attacker, target) {
                return Err(Rejection::Bodyguard(defender));
            }
            Ok(())
        }
        _ => Err(Rejection::WrongCardKind(defender)),
    }
}

fn evades(view: &GameView<'_>, attacker: EntityId, defender: EntityId) -> bool {
    view.has_keyword(defender, KeywordKind::Evasive) && !view.has_keyword(attacker, KeywordKind::Evasive)
}

/// An exerted Bodyguard that `attacker` could challenge instead stands
/// beside `defender`.
fn guarded(view: &GameView<'_>, attacker: EntityId, defender: &CardInstance) -> bool {
    view.state
        .cards_in(view.state.zone(defender.controller, Zone::Characters))
        .any(|e| {
            e != defender.entity_id
                && view.card(e).map_or(false, |c| c.exerted)
                && view.has_keyword(e, KeywordKind::Bodyguard)
                && !evades(view, attacker, e)
        })
}

fn validate_sing(view: &GameView<'_>, player: PlayerId, song: EntityId, singer: EntityId) -> Result<(), Rejection> {
    in_hand(view, player, song)?;
    let def = view.definition(song).ok_or(Rejection::CardNotFound(song))?;
    if !def.is_song() {
        return Err(Rejection::NotASong(song));
    }

    ready_dry_character(view, player, singer, false)?;
    let voice = view
        .keyword_value(singer, KeywordKind::Singer)
        .or_else(|| view.definition(singer).map(|d| d.cost))
        .unwrap_or(0);
    if voice < def.cost {
        return Err(Rejection::SingerTooWeak { singer, cost: def.cost });
    }
    Ok(())
}

fn validate_activation(
    view: &GameView<'_>,
    player: PlayerId,
    source: EntityId,
    ability: AbilityId,
    targets: &[EntityId],
) -> Result<(), Rejection> {
    let card = view.card(source).ok_or(Rejection::CardNotFound(source))?;
    if card.controller != player {
        return Err(Rejection::NotControlled { card: source, player });
    }
    let def = view.definition(source).ok_or(Rejection::CardNotFound(source))?;
    let activated = match def.ability(ability) {
        Some(Ability::Activated(activated)) => activated,
        Some(_) => return Err(Rejection::NotActivated { card: source, ability }),
        None => return Err(Rejection::UnknownAbility { card: source, ability }),
    };
    if !activated.live_in.contains(card.zone.zone()) {
        return Err(Rejection::AbilityNotLive { card: source, ability });
    }

    if activated.cost.exert {
        if card.exerted {
            return Err(Rejection::Exerted(source));
        }
        if def.is_character() && card.is_drying(view.state.turn_number) {
            return Err(Rejection::Drying(source));
        }
    }
    let available = view.available_ink(player);
    if activated.cost.ink > available {
        return Err(Rejection::CannotAfford {
            cost: activated.cost.ink,
            available,
        });
    }

    let filters: Vec<_> = activated
        .chosen_targets()
        .filter_map(|spec| match spec {
            TargetSpec::Chosen(filter) => Some(filter),
            _ => None,
        })
        .collect();
    if targets.len() > filters.len() {
        return Err(Rejection::TooManyTargets);
    }
    for (target, filter) in targets.iter().zip(filters) {
        let selector = Selector::new(filter.clone(), player).with_source(source);
        if !selector.choosable(view, *target) {
            return Err(Rejection::InvalidTarget(*target));
        }
    }
    Ok(())
}

// === Shared checks ===

fn in_hand(view: &GameView<'_>, player: PlayerId, card: EntityId) -> Result<(), Rejection> {
    let instance = view.card(card).ok_or(Rejection::CardNotFound(card))?;
    if instance.zone != view.state.zone(player, Zone::Hand) {
        return Err(Rejection::NotInHand(card));
    }
    Ok(())
}

/// A character `player` controls in play, ready, and dry unless `rush`.
fn ready_dry_character(view: &GameView<'_>, player: PlayerId, card: EntityId, rush: bool) -> Result<(), Rejection> {
    let instance = view.card(card).ok_or(Rejection::CardNotFound(card))?;
    if !instance.is_in_play() {
        return Err(Rejection::NotInPlay(card));
    }
    if instance.controller != player {
        return Err(Rejection::NotControlled { card, player });
    }
    if !view.definition(card).map_or(false, |d| d.is_character()) {
        return Err(Rejection::WrongCardKind(card));
    }
    if instance.exerted {
        return Err(Rejection::Exerted(card));
    }
    if !rush && instance.is_drying(view.state.turn_number) {
        return Err(Rejection::Drying(card));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abilities::{ActivatedAbility, ActivationCost, Keyword};
    use crate::cards::{CardCatalog, CardDefinition, CardId, InkColor};
    use crate::core::{GameState, RulesConfig};
    use crate::effects::{CardFilter, EffectTemplate};
    use crate::triggers::AbilityRegistry;
    use crate::zones::ZonePosition;

    const GRUNT: CardId = CardId(1);
    const EVADER: CardId = CardId(2);
    const GUARD: CardId = CardId(3);
    const RAIDER: CardId = CardId(4);
    const HOTHEAD: CardId = CardId(5);
    const BALLAD: CardId = CardId(6);
    const WAND: CardId = CardId(7);
    const KEEP: CardId = CardId(8);
    const RELIC: CardId = CardId(9);
    const SKY_GUARD: CardId = CardId(10);

    fn catalog() -> CardCatalog {
        CardCatalog::new()
            .with_card(CardDefinition::character(GRUNT, "Grunt", 2, InkColor::Ruby, 2, 2, 1))
            .with_card(
                CardDefinition::character(EVADER, "Flyer", 3, InkColor::Sapphire, 1, 2, 2)
                    .with_ability(Ability::Keyword(Keyword::Evasive)),
            )
            .with_card(
                CardDefinition::character(GUARD, "Guard", 3, InkColor::Steel, 1, 4, 1)
                    .with_ability(Ability::Keyword(Keyword::Bodyguard)),
            )
            .with_card(
                CardDefinition::character(RAIDER, "Raider", 2, InkColor::Ruby, 3, 1, 1)
                    .with_ability(Ability::Keyword(Keyword::Rush)),
            )
            .with_card(
                CardDefinition::character(HOTHEAD, "Hothead", 1, InkColor::Ruby, 4, 2, 0)
                    .with_ability(Ability::Keyword(Keyword::Reckless))
                    .with_ability(Ability::Keyword(Keyword::Singer(5))),
            )
            .with_card(CardDefinition::song(BALLAD, "Ballad", 4, InkColor::Amber).with_inkable(false))
            .with_card(
                CardDefinition::item(WAND, "Wand", 1, InkColor::Amethyst).with_ability(
                    ActivatedAbility::new("ZAP", ActivationCost::exert().with_ink(1))
                        .with_effect(EffectTemplate::DealDamage {
                            amount: 1,
                            target: TargetSpec::Chosen(CardFilter::opposing_characters()),
                        })
                        .into(),
                ),
            )
            .with_card(CardDefinition::location(KEEP, "Keep", 2, InkColor::Steel, 1, 5, 1))
            .with_card(CardDefinition::item(RELIC, "Relic", 1, InkColor::Amber))
            .with_card(
                CardDefinition::character(SKY_GUARD, "Sky Guard", 3, InkColor::Sapphire, 1, 3, 1)
                    .with_ability(Ability::Keyword(Keyword::Evasive))
                    .with_ability(Ability::Keyword(Keyword::Bodyguard)),
            )
    }

    struct Table {
        catalog: CardCatalog,
        state: GameState,
        registry: AbilityRegistry,
        config: RulesConfig,
    }

    impl Table {
        fn new() -> Self {
            let mut state = GameState::new(2, PlayerId(0), 9);
            state.turn_number = 2;
            state.phase = Phase::Main;
            Self {
                catalog: catalog(),
                state,
                registry: AbilityRegistry::new(),
                config: RulesConfig::default(),
            }
        }

        fn put(&mut self, card: CardId, owner: u8, zone: Zone) -> EntityId {
            let zone = ZoneId::player(PlayerId(owner), zone);
            let e = self
                .state
                .create_card(card, PlayerId(owner), zone, ZonePosition::Top)
                .unwrap();
            if zone.is_in_play() {
                self.state.card_mut(e).unwrap().entered_turn = Some(1);
            }
            self.registry.register(e, self.catalog.get(card).unwrap(), zone);
            e
        }

        fn exert(&mut self, e: EntityId) {
            self.state.card_mut(e).unwrap().exerted = true;
        }

        fn check(&self, mv: Move) -> Result<(), Rejection> {
            let view = GameView::new(&self.catalog, &self.state, &self.registry, &self.config);
            validate(&view, PlayerId(0), &mv)
        }

        fn moves(&self) -> Vec<Move> {
            let view = GameView::new(&self.catalog, &self.state, &self.registry, &self.config);
            legal_moves(&view, PlayerId(0))
        }
    }

    #[test]
    fn test_turn_and_phase_gates() {
        let mut t = Table::new();
        let view = GameView::new(&t.catalog, &t.state, &t.registry, &t.config);
        assert_eq!(
            validate(&view, PlayerId(1), &Move::Pass),
            Err(Rejection::NotYourTurn { active: PlayerId(0) })
        );

        t.state.phase = Phase::Set;
        assert_eq!(t.check(Move::Pass), Err(Rejection::WrongPhase(Phase::Set)));
    }

    #[test]
    fn test_ink_once_per_turn() {
        let mut t = Table::new();
        let card = t.put(GRUNT, 0, Zone::Hand);
        let song = t.put(BALLAD, 0, Zone::Hand);

        assert_eq!(t.check(Move::Ink { card }), Ok(()));
        assert_eq!(t.check(Move::Ink { card: song }), Err(Rejection::NotInkable(song)));

        t.state.player_mut(PlayerId(0)).ink_played_this_turn = true;
        assert_eq!(t.check(Move::Ink { card }), Err(Rejection::InkAlreadyPlayed));
    }

    #[test]
    fn test_play_needs_ink() {
        let mut t = Table::new();
        let card = t.put(GRUNT, 0, Zone::Hand);
        t.put(RELIC, 0, Zone::Inkwell);
        assert_eq!(
            t.check(Move::PlayCard { card }),
            Err(Rejection::CannotAfford { cost: 2, available: 1 })
        );

        t.put(RELIC, 0, Zone::Inkwell);
        assert_eq!(t.check(Move::PlayCard { card }), Ok(()));

        t.config.require_ink_color = true;
        assert_eq!(
            t.check(Move::PlayCard { card }),
            Err(Rejection::ColorMismatch { color: InkColor::Ruby })
        );
    }

    #[test]
    fn test_quest_rules() {
        let mut t = Table::new();
        let grunt = t.put(GRUNT, 0, Zone::Characters);
        let hothead = t.put(HOTHEAD, 0, Zone::Characters);
        let theirs = t.put(GRUNT, 1, Zone::Characters);

        assert_eq!(t.check(Move::Quest { character: grunt }), Ok(()));
        assert_eq!(t.check(Move::Quest { character: hothead }), Err(Rejection::Reckless(hothead)));
        assert_eq!(
            t.check(Move::Quest { character: theirs }),
            Err(Rejection::NotControlled {
                card: theirs,
                player: PlayerId(0)
            })
        );

        t.state.card_mut(grunt).unwrap().entered_turn = Some(2);
        assert_eq!(t.check(Move::Quest { character: grunt }), Err(Rejection::Drying(grunt)));
    }

    #[test]
    fn test_challenge_requires_exerted_defender() {
        let mut t = Table::new();
        let attacker = t.put(GRUNT, 0, Zone::Characters);
        let defender = t.put(GRUNT, 1, Zone::Characters);
        let challenge = Move::Challenge { attacker, defender };

        assert_eq!(t.check(challenge.clone()), Err(Rejection::DefenderNotExerted(defender)));
        t.exert(defender);
        assert_eq!(t.check(challenge), Ok(()));
    }

    #[test]
    fn test_rush_skips_drying_for_challenges_only() {
        let mut t = Table::new();
        let raider = t.put(RAIDER, 0, Zone::Characters);
        t.state.card_mut(raider).unwrap().entered_turn = Some(2);
        let defender = t.put(GRUNT, 1, Zone::Characters);
        t.exert(defender);

        assert_eq!(t.check(Move::Challenge { attacker: raider, defender }), Ok(()));
        assert_eq!(t.check(Move::Quest { character: raider }), Err(Rejection::Drying(raider)));
    }

    #[test]
    fn test_evasive_and_bodyguard() {
        let mut t = Table::new();
        let grunt = t.put(GRUNT, 0, Zone::Characters);
        let flyer = t.put(EVADER, 0, Zone::Characters);
        let their_flyer = t.put(EVADER, 1, Zone::Characters);
        t.exert(their_flyer);

        assert_eq!(
            t.check(Move::Challenge {
                attacker: grunt,
                defender: their_flyer
            }),
            Err(Rejection::Evasive(their_flyer))
        );
        assert_eq!(
            t.check(Move::Challenge {
                attacker: flyer,
                defender: their_flyer
            }),
            Ok(())
        );

        let guard = t.put(GUARD, 1, Zone::Characters);
        t.exert(guard);
        assert_eq!(
            t.check(Move::Challenge {
                attacker: flyer,
                defender: their_flyer
            }),
            Err(Rejection::Bodyguard(their_flyer))
        );
        assert_eq!(t.check(Move::Challenge { attacker: grunt, defender: guard }), Ok(()));
    }

    #[test]
    fn test_unreachable_bodyguard_does_not_guard() {
        let mut t = Table::new();
        let grunt = t.put(GRUNT, 0, Zone::Characters);
        let flyer = t.put(EVADER, 0, Zone::Characters);
        let plain = t.put(GRUNT, 1, Zone::Characters);
        let sky_guard = t.put(SKY_GUARD, 1, Zone::Characters);
        t.exert(plain);
        t.exert(sky_guard);

        assert_eq!(
            t.check(Move::Challenge {
                attacker: grunt,
                defender: sky_guard
            }),
            Err(Rejection::Evasive(sky_guard))
        );
        assert_eq!(t.check(Move::Challenge { attacker: grunt, defender: plain }), Ok(()));
        assert_eq!(
            t.check(Move::Challenge {
                attacker: flyer,
                defender: plain
            }),
            Err(Rejection::Bodyguard(plain))
        );
    }

    #[test]
    fn test_locations_need_not_be_exerted() {
        let mut t = Table::new();
        let attacker = t.put(GRUNT, 0, Zone::Characters);
        let keep = t.put(KEEP, 1, Zone::Locations);
        let own_keep = t.put(KEEP, 0, Zone::Locations);

        assert_eq!(t.check(Move::Challenge { attacker, defender: keep }), Ok(()));
        assert_eq!(
            t.check(Move::Challenge {
                attacker,
                defender: own_keep
            }),
            Err(Rejection::OwnDefender(own_keep))
        );
    }

    #[test]
    fn test_singing() {
        let mut t = Table::new();
        let song = t.put(BALLAD, 0, Zone::Hand);
        let grunt = t.put(GRUNT, 0, Zone::Characters);
        let hothead = t.put(HOTHEAD, 0, Zone::Characters);

        assert_eq!(
            t.check(Move::Sing { song, singer: grunt }),
            Err(Rejection::SingerTooWeak { singer: grunt, cost: 4 })
        );
        assert_eq!(t.check(Move::Sing { song, singer: hothead }), Ok(()));
        assert_eq!(
            t.check(Move::Sing {
                song: grunt,
                singer: hothead
            }),
            Err(Rejection::NotInHand(grunt))
        );
    }

    #[test]
    fn test_activation_costs_and_targets() {
        let mut t = Table::new();
        let wand = t.put(WAND, 0, Zone::Items);
        let mine = t.put(GRUNT, 0, Zone::Characters);
        let theirs = t.put(GRUNT, 1, Zone::Characters);
        let zap = AbilityId(0);

        assert_eq!(
            t.check(Move::activate(wand, zap)),
            Err(Rejection::CannotAfford { cost: 1, available: 0 })
        );
        t.put(RELIC, 0, Zone::Inkwell);
        assert_eq!(t.check(Move::activate(wand, zap)), Ok(()));

        let aimed = |target| Move::ActivateAbility {
            source: wand,
            ability: zap,
            targets: smallvec::smallvec![target],
        };
        assert_eq!(t.check(aimed(theirs)), Ok(()));
        assert_eq!(t.check(aimed(mine)), Err(Rejection::InvalidTarget(mine)));
        assert_eq!(
            t.check(Move::activate(mine, zap)),
            Err(Rejection::UnknownAbility { card: mine, ability: zap })
        );

        t.exert(wand);
        assert_eq!(t.check(Move::activate(wand, zap)), Err(Rejection::Exerted(wand)));
    }

    #[test]
    fn test_legal_moves_all_validate() {
        let mut t = Table::new();
        t.put(GRUNT, 0, Zone::Hand);
        t.put(BALLAD, 0, Zone::Hand);
        t.put(RELIC, 0, Zone::Inkwell);
        t.put(RELIC, 0, Zone::Inkwell);
        t.put(HOTHEAD, 0, Zone::Characters);
        t.put(WAND, 0, Zone::Items);
        let defender = t.put(GRUNT, 1, Zone::Characters);
        t.exert(defender);

        let moves = t.moves();
        assert_eq!(moves.last(), Some(&Move::Pass));
        assert!(moves.iter().all(|mv| t.check(mv.clone()).is_ok()));
        assert!(moves.iter().any(|mv| matches!(mv, Move::Sing { .. })));
        assert!(moves.iter().any(|mv| matches!(mv, Move::Challenge { .. })));
        assert!(moves.iter().any(|mv| matches!(mv, Move::ActivateAbility { .. })));
        assert!(!moves.iter().any(|mv| matches!(mv, Move::Quest { .. })));
    }

    #[test]
    fn test_no_moves_outside_main() {
        let mut t = Table::new();
        t.state.phase = Phase::Ready;
        assert!(t.moves().is_empty());
    }
}
