//! Keyword integration tests.
//!
//! Each test seats two small decks, deploys characters over a few turns and
//! then checks one keyword's effect on move validation or resolution.

use std::sync::Arc;

use lore_engine::abilities::{Ability, Keyword};
use lore_engine::cards::{CardCatalog, CardDefinition, CardId, InkColor};
use lore_engine::core::{ChoiceValue, EntityId, Move, PlayerId, RulesConfig};
use lore_engine::effects::{CardFilter, EffectTemplate, PlayerSpec, TargetSpec};
use lore_engine::engine::{ChoiceKind, Engine, EngineStatus, GameBuilder};
use lore_engine::error::Rejection;
use lore_engine::zones::Zone;

const P0: PlayerId = PlayerId(0);
const P1: PlayerId = PlayerId(1);

const PAGE: CardId = CardId(1);
const FLYER: CardId = CardId(2);
const GUARD: CardId = CardId(3);
const RAIDER: CardId = CardId(4);
const HOTHEAD: CardId = CardId(5);
const WARDED: CardId = CardId(6);
const SINGER: CardId = CardId(7);
const BALLAD: CardId = CardId(8);
const TANK: CardId = CardId(9);
const DUELIST: CardId = CardId(10);
const HELPER: CardId = CardId(11);
const ZAP: CardId = CardId(12);
const BLOT: CardId = CardId(13);
const SWEEP: CardId = CardId(14);

fn with_keyword(def: CardDefinition, keyword: Keyword) -> CardDefinition {
    def.with_ability(Ability::Keyword(keyword))
}

fn catalog() -> Arc<CardCatalog> {
    let character = |id, name, strength, willpower| CardDefinition::character(id, name, 1, InkColor::Steel, strength, willpower, 1);
    Arc::new(
        CardCatalog::new()
            .with_card(character(PAGE, "Page", 1, 2))
            .with_card(with_keyword(character(FLYER, "Flyer", 1, 2), Keyword::Evasive))
            .with_card(with_keyword(character(GUARD, "Guard", 1, 3), Keyword::Bodyguard))
            .with_card(with_keyword(character(RAIDER, "Raider", 2, 2), Keyword::Rush))
            .with_card(with_keyword(character(HOTHEAD, "Hothead", 2, 2), Keyword::Reckless))
            .with_card(with_keyword(character(WARDED, "Warded", 1, 2), Keyword::Ward))
            .with_card(with_keyword(character(SINGER, "Singer", 1, 2), Keyword::Singer(3)))
            .with_card(
                CardDefinition::song(BALLAD, "Ballad", 3, InkColor::Amber).with_effect(EffectTemplate::GainLore {
                    amount: 2,
                    player: PlayerSpec::Controller,
                }),
            )
            .with_card(with_keyword(character(TANK, "Tank", 1, 3), Keyword::Resist(1)))
            .with_card(with_keyword(character(DUELIST, "Duelist", 1, 2), Keyword::Challenger(2)))
            .with_card(with_keyword(character(HELPER, "Helper", 2, 2), Keyword::Support))
            .with_card(
                CardDefinition::action(ZAP, "Zap", 1, InkColor::Amethyst).with_effect(EffectTemplate::DealDamage {
                    amount: 1,
                    target: TargetSpec::Chosen(CardFilter::opposing_characters()),
                }),
            )
            .with_card(CardDefinition::item(BLOT, "Ink Blot", 9, InkColor::Amber))
            .with_card(
                CardDefinition::action(SWEEP, "Sweep", 1, InkColor::Ruby).with_effect(EffectTemplate::Banish {
                    target: TargetSpec::EachMatching(CardFilter::opposing_characters()),
                }),
            ),
    )
}

fn card_in_hand(engine: &Engine, player: PlayerId, card: CardId) -> EntityId {
    let state = engine.state();
    state
        .cards_in(state.zone(player, Zone::Hand))
        .find(|e| state.card(*e).unwrap().card_id == card)
        .expect("card in hand")
}

fn act(engine: &mut Engine, player: PlayerId, mv: Move) {
    engine.submit(player, mv).unwrap();
    engine.run_until_stable().unwrap();
}

/// Each turn both players ink a blot and play their next listed card,
/// declining any question it asks. Returns on player 0's turn with every
/// deployed character dry. `extras` go into player 0's hand unplayed.
fn deploy(p0: &[CardId], p1: &[CardId], extras: &[CardId]) -> (Engine, Vec<EntityId>, Vec<EntityId>) {
    let rounds = p0.len().max(p1.len());
    let mut deck0: Vec<CardId> = p0.iter().chain(extras).copied().collect();
    let mut deck1: Vec<CardId> = p1.to_vec();
    deck0.extend(vec![BLOT; rounds + 2]);
    deck1.extend(vec![BLOT; rounds + 2]);

    let config = RulesConfig::default()
        .with_opening_hand_size(deck0.len().max(deck1.len()))
        .with_deck_out(false);
    let mut engine = GameBuilder::new(catalog())
        .with_seed(9)
        .with_config(config)
        .with_deck(deck0)
        .with_deck(deck1)
        .build()
        .unwrap();
    engine.run_until_stable().unwrap();

    let mut deployed = [Vec::new(), Vec::new()];
    for round in 0..rounds {
        for (player, list) in [(P0, p0), (P1, p1)] {
            let blot = card_in_hand(&engine, player, BLOT);
            act(&mut engine, player, Move::Ink { card: blot });
            if let Some(card) = list.get(round) {
                let entity = card_in_hand(&engine, player, *card);
                act(&mut engine, player, Move::PlayCard { card: entity });
                if engine.pending_choice().is_some() {
                    engine.provide_choice(ChoiceValue::Decline).unwrap();
                    engine.run_until_stable().unwrap();
                }
                deployed[player.index()].push(entity);
            }
            act(&mut engine, player, Move::Pass);
        }
    }
    let [mine, theirs] = deployed;
    (engine, mine, theirs)
}

/// Player 0 passes, player 1 quests with `questers`, and play returns to player 0.
fn opponent_quests(engine: &mut Engine, questers: &[EntityId]) {
    act(engine, P0, Move::Pass);
    for character in questers {
        act(engine, P1, Move::Quest { character: *character });
    }
    act(engine, P1, Move::Pass);
}

fn challenge(attacker: EntityId, defender: EntityId) -> Move {
    Move::Challenge { attacker, defender }
}

// =============================================================================
// Challenge restrictions
// =============================================================================

/// Test that only an Evasive attacker may challenge an Evasive defender.
#[test]
fn test_evasive_defender_needs_evasive_attacker() {
    let (mut engine, mine, theirs) = deploy(&[PAGE, FLYER], &[FLYER], &[]);
    opponent_quests(&mut engine, &theirs);

    assert_eq!(
        engine.submit(P0, challenge(mine[0], theirs[0])),
        Err(Rejection::Evasive(theirs[0]))
    );
    assert!(engine.submit(P0, challenge(mine[1], theirs[0])).is_ok());
}

/// Test that an exerted Bodyguard has to be challenged before its teammates.
#[test]
fn test_exerted_bodyguard_draws_challenges() {
    let (mut engine, mine, theirs) = deploy(&[PAGE], &[GUARD, PAGE], &[]);
    opponent_quests(&mut engine, &theirs);

    assert_eq!(
        engine.submit(P0, challenge(mine[0], theirs[1])),
        Err(Rejection::Bodyguard(theirs[1]))
    );
    act(&mut engine, P0, challenge(mine[0], theirs[0]));
    assert_eq!(engine.state().card(theirs[0]).unwrap().damage, 1);
}

/// Test that a Bodyguard offers to enter play exerted.
#[test]
fn test_bodyguard_may_enter_exerted() {
    let config = RulesConfig::default().with_opening_hand_size(4).with_deck_out(false);
    let mut engine = GameBuilder::new(catalog())
        .with_config(config)
        .with_deck(vec![GUARD; 4])
        .with_deck(vec![PAGE; 4])
        .build()
        .unwrap();
    engine.run_until_stable().unwrap();

    let ink = card_in_hand(&engine, P0, GUARD);
    act(&mut engine, P0, Move::Ink { card: ink });
    let guard = card_in_hand(&engine, P0, GUARD);
    act(&mut engine, P0, Move::PlayCard { card: guard });

    let request = engine.pending_choice().cloned().expect("bodyguard asks");
    assert_eq!(request.kind(), ChoiceKind::Confirm);
    assert!(!engine.state().card(guard).unwrap().exerted);

    engine.provide_choice(ChoiceValue::Accept).unwrap();
    assert!(engine.state().card(guard).unwrap().exerted);
    assert_eq!(*engine.status(), EngineStatus::AwaitingMove);
}

/// Test that Rush lets a character challenge the turn it is played.
#[test]
fn test_rush_challenges_while_drying() {
    let (mut engine, _, theirs) = deploy(&[], &[PAGE], &[RAIDER, PAGE]);
    opponent_quests(&mut engine, &theirs);

    let blot = card_in_hand(&engine, P0, BLOT);
    act(&mut engine, P0, Move::Ink { card: blot });
    let page = card_in_hand(&engine, P0, PAGE);
    act(&mut engine, P0, Move::PlayCard { card: page });
    let raider = card_in_hand(&engine, P0, RAIDER);
    act(&mut engine, P0, Move::PlayCard { card: raider });

    assert_eq!(engine.submit(P0, challenge(page, theirs[0])), Err(Rejection::Drying(page)));
    assert_eq!(engine.submit(P0, Move::Quest { character: raider }), Err(Rejection::Drying(raider)));

    act(&mut engine, P0, challenge(raider, theirs[0]));
    assert_eq!(engine.state().card(theirs[0]).unwrap().zone.zone(), Zone::Discard);
}

// =============================================================================
// Questing and singing
// =============================================================================

/// Test that a Reckless character cannot quest.
#[test]
fn test_reckless_cannot_quest() {
    let (mut engine, mine, _) = deploy(&[HOTHEAD], &[], &[]);
    assert_eq!(
        engine.submit(P0, Move::Quest { character: mine[0] }),
        Err(Rejection::Reckless(mine[0]))
    );
    assert!(!engine
        .legal_moves(P0)
        .contains(&Move::Quest { character: mine[0] }));
}

/// Test that Singer lets a cheap character sing an expensive song for free.
#[test]
fn test_singer_sings_above_its_cost() {
    let (mut engine, mine, _) = deploy(&[SINGER, PAGE], &[], &[BALLAD]);
    let ballad = card_in_hand(&engine, P0, BALLAD);
    let (singer, page) = (mine[0], mine[1]);

    assert_eq!(
        engine.submit(P0, Move::Sing { song: ballad, singer: page }),
        Err(Rejection::SingerTooWeak { singer: page, cost: 3 })
    );

    let ink = engine.view().available_ink(P0);
    act(&mut engine, P0, Move::Sing { song: ballad, singer });
    assert_eq!(engine.state().player(P0).lore, 2);
    assert!(engine.state().card(singer).unwrap().exerted);
    assert_eq!(engine.state().card(ballad).unwrap().zone.zone(), Zone::Discard);
    assert_eq!(engine.view().available_ink(P0), ink);
}

// =============================================================================
// Damage and strength
// =============================================================================

/// Test that Resist reduces each hit by its value.
#[test]
fn test_resist_absorbs_damage() {
    let (mut engine, mine, theirs) = deploy(&[PAGE], &[TANK], &[]);
    opponent_quests(&mut engine, &theirs);

    act(&mut engine, P0, challenge(mine[0], theirs[0]));
    assert_eq!(engine.state().card(theirs[0]).unwrap().damage, 0);
    assert_eq!(engine.state().card(mine[0]).unwrap().damage, 1);
}

/// Test that Challenger adds strength only for the challenge.
#[test]
fn test_challenger_boost_lasts_one_challenge() {
    let (mut engine, mine, theirs) = deploy(&[DUELIST], &[PAGE], &[]);
    opponent_quests(&mut engine, &theirs);

    act(&mut engine, P0, challenge(mine[0], theirs[0]));
    assert_eq!(engine.state().card(theirs[0]).unwrap().zone.zone(), Zone::Discard);
    assert_eq!(engine.state().card(mine[0]).unwrap().damage, 1);
    assert_eq!(engine.view().effective_strength(mine[0]), 1);
}

/// Test that Ward keeps a card out of an opponent's target choices.
#[test]
fn test_ward_hides_from_opposing_choices() {
    let (mut engine, _, theirs) = deploy(&[], &[WARDED, PAGE], &[ZAP]);
    let zap = card_in_hand(&engine, P0, ZAP);

    act(&mut engine, P0, Move::PlayCard { card: zap });
    assert_eq!(*engine.status(), EngineStatus::AwaitingMove);
    assert_eq!(engine.state().card(theirs[0]).unwrap().damage, 0);
    assert_eq!(engine.state().card(theirs[1]).unwrap().damage, 1);
}

/// Test that Ward does not shield a card from effects that hit each opposing character.
#[test]
fn test_ward_does_not_stop_each_effects() {
    let (mut engine, _, theirs) = deploy(&[], &[WARDED, PAGE], &[SWEEP]);
    let sweep = card_in_hand(&engine, P0, SWEEP);

    act(&mut engine, P0, Move::PlayCard { card: sweep });
    assert_eq!(*engine.status(), EngineStatus::AwaitingMove);
    for card in &theirs {
        assert_eq!(engine.state().card(*card).unwrap().zone.zone(), Zone::Discard);
    }
    assert_eq!(engine.state().in_play(P1).count(), 0);
}

/// Test that Support lends the quester's strength to a chosen teammate for the turn.
#[test]
fn test_support_lends_strength_until_end_of_turn() {
    let (mut engine, mine, _) = deploy(&[HELPER, PAGE], &[], &[]);
    let (helper, page) = (mine[0], mine[1]);

    act(&mut engine, P0, Move::Quest { character: helper });
    let request = engine.pending_choice().cloned().expect("support asks");
    assert!(request.optional);
    assert_eq!(request.candidates, vec![page]);

    engine.provide_choice(ChoiceValue::Target(page)).unwrap();
    engine.run_until_stable().unwrap();
    assert_eq!(engine.view().effective_strength(page), 3);
    assert_eq!(engine.state().player(P0).lore, 1);

    act(&mut engine, P0, Move::Pass);
    assert_eq!(engine.view().effective_strength(page), 1);
}
