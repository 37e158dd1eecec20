//! Effect resolution - applying one effect to game state.
//!
//! `resolve` is the only code that mutates `GameState` during play. It
//! applies exactly one `Effect` and reports:
//!
//! - the `GameEvent`s it produced, for trigger dispatch and the caller;
//! - follow-up effects the rules schedule as a consequence (turn structure,
//!   Bodyguard's optional exert).
//!
//! Every arm checks its preconditions before writing anything, so an
//! `EffectError` means the state is unchanged.
//!
//! Cards change zones through `ResolverContext::relocate`, which captures
//! last-known stats when a card leaves play and keeps the ability registry
//! in step with the card's new zone.

use smallvec::SmallVec;

use crate::abilities::{Ability, Duration, KeywordKind, Modifier, Stat};
use crate::cards::{CardCatalog, CardDefinition, CardInstance, CardKind};
use crate::core::{EntityId, GameState, Phase, PlayerId, RulesConfig};
use crate::error::EffectError;
use crate::rules::{phases, GameView};
use crate::stack::Priority;
use crate::triggers::{AbilityRegistry, GameEvent};
use crate::zones::{Zone, ZoneId, ZonePosition};

use super::effect::{Amount, Effect, Target};

/// Mutable access to everything an effect may touch.
pub struct ResolverContext<'a> {
    pub catalog: &'a CardCatalog,
    pub config: &'a RulesConfig,
    pub state: &'a mut GameState,
    pub registry: &'a mut AbilityRegistry,
}

/// An effect the rules want queued next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scheduled {
    pub priority: Priority,
    pub effect: Effect,
    pub optional: bool,
}

impl Scheduled {
    #[must_use]
    pub fn new(priority: Priority, effect: Effect) -> Self {
        Self {
            priority,
            effect,
            optional: false,
        }
    }

    /// A "may" effect.
    #[must_use]
    pub fn optional(priority: Priority, effect: Effect) -> Self {
        Self {
            priority,
            effect,
            optional: true,
        }
    }
}

/// What applying an effect produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub events: SmallVec<[GameEvent; 4]>,
    pub follow_ups: Vec<Scheduled>,
}

impl Resolution {
    fn event(event: GameEvent) -> Self {
        let mut resolution = Self::default();
        resolution.events.push(event);
        resolution
    }

    fn with(mut self, event: GameEvent) -> Self {
        self.events.push(event);
        self
    }

    fn then(mut self, follow_ups: impl IntoIterator<Item = Scheduled>) -> Self {
        self.follow_ups.extend(follow_ups);
        self
    }
}

/// Apply one effect. Targets must already be bound.
pub fn resolve(ctx: &mut ResolverContext<'_>, effect: &Effect) -> Result<Resolution, EffectError> {
    match effect {
        // === Turn structure ===
        Effect::BeginTurn { player } => {
            let state = &mut *ctx.state;
            state.active_player = *player;
            if *player == state.first_player {
                state.turn_number += 1;
            }
            state.phase = Phase::Ready;
            let counters = state.player_mut(*player);
            counters.ink_played_this_turn = false;
            counters.acted_this_turn = false;

            let turn = state.turn_number;
            tracing::info!(target: "lore_engine::turn", player = player.0, turn, "turn.started");
            Ok(Resolution::event(GameEvent::TurnStarted { player: *player, turn })
                .then(phases::after_begin_turn(*player)))
        }

        Effect::ReadyAll { player } => {
            let inkwell = ctx.state.zone(*player, Zone::Inkwell);
            let cards: Vec<EntityId> = ctx
                .state
                .in_play(*player)
                .chain(ctx.state.cards_in(inkwell))
                .collect();

            let mut resolution = Resolution::default();
            for entity in cards {
                if let Some(card) = ctx.state.card_mut(entity) {
                    if card.exerted {
                        card.exerted = false;
                        if card.is_in_play() {
                            resolution.events.push(GameEvent::CardReadied { card: entity });
                        }
                    }
                }
            }
            Ok(resolution)
        }

        Effect::AdvancePhase { player, phase } => {
            ctx.state.phase = *phase;
            let resolution = Resolution::event(GameEvent::PhaseChanged {
                player: *player,
                phase: *phase,
            });
            if *phase == Phase::Set {
                let steps = phases::set_phase_steps(&ctx.view(), *player);
                return Ok(resolution.then(steps));
            }
            Ok(resolution)
        }

        Effect::GainLocationLore { player, location } => {
            ctx.in_play(*location)?;
            let amount = ctx.view().effective_lore(*location);
            ctx.state.player_mut(*player).lore += amount;
            Ok(Resolution::event(GameEvent::LoreGained {
                player: *player,
                amount,
            }))
        }

        Effect::EndTurn { player } => {
            let acted = ctx.state.player(*player).acted_this_turn;
            ctx.state.consecutive_passes = if acted { 0 } else { ctx.state.consecutive_passes + 1 };
            let steps = phases::after_end_turn(&ctx.view());
            Ok(Resolution::event(GameEvent::TurnEnded {
                player: *player,
                turn: ctx.state.turn_number,
            })
            .then(steps))
        }

        Effect::ExpireModifiers { duration } => {
            let holders: Vec<EntityId> = ctx
                .state
                .cards()
                .filter(|c| !c.modifiers.is_empty())
                .map(|c| c.entity_id)
                .collect();
            let count = holders
                .into_iter()
                .filter_map(|e| ctx.state.card_mut(e).map(|c| c.expire_modifiers(*duration)))
                .sum();
            Ok(Resolution::event(GameEvent::ModifiersExpired {
                duration: *duration,
                count,
            }))
        }

        // === Move results ===
        Effect::InkCard { player, card } => {
            ctx.in_hand(*card, *player)?;
            ctx.relocate(*card, ZoneId::player(*player, Zone::Inkwell))?;
            if let Some(instance) = ctx.state.card_mut(*card) {
                instance.exerted = false;
            }
            ctx.state.player_mut(*player).ink_played_this_turn = true;
            Ok(Resolution::event(GameEvent::CardInked {
                player: *player,
                card: *card,
            }))
        }

        Effect::PayInk { player, amount } => {
            if *amount == 0 {
                return Ok(Resolution::default());
            }
            ctx.exert_ink(*player, *amount)?;
            Ok(Resolution::event(GameEvent::InkPaid {
                player: *player,
                amount: *amount,
            }))
        }

        Effect::PlaceCard { player, card } => {
            ctx.in_hand(*card, *player)?;
            let def = ctx.definition(*card)?;
            let zone = def.kind.play_zone().ok_or(EffectError::WrongCardKind(*card))?;
            ctx.relocate(*card, ZoneId::player(*player, zone))?;
            if let Some(instance) = ctx.state.card_mut(*card) {
                instance.controller = *player;
            }

            let (player, card) = (*player, *card);
            let event = match def.kind {
                CardKind::Character(_) => GameEvent::CharacterPlayed { player, card },
                CardKind::Location(_) => GameEvent::LocationPlayed { player, card },
                _ => GameEvent::ItemPlayed { player, card },
            };
            let mut resolution = Resolution::event(event);
            if ctx.view().has_keyword(card, KeywordKind::Bodyguard) {
                resolution.follow_ups.push(Scheduled::optional(
                    Priority::Immediate,
                    Effect::Exert {
                        target: Target::Card(card),
                    },
                ));
            }
            Ok(resolution)
        }

        Effect::PlayAction { player, card, singer } => {
            let owner = ctx.in_hand(*card, *player)?.owner;
            if !matches!(ctx.definition(*card)?.kind, CardKind::Action(_)) {
                return Err(EffectError::WrongCardKind(*card));
            }
            ctx.relocate(*card, ZoneId::player(owner, Zone::Discard))?;

            let resolution = Resolution::event(GameEvent::ActionPlayed {
                player: *player,
                card: *card,
            });
            Ok(match singer {
                Some(singer) => resolution.with(GameEvent::SongSung {
                    player: *player,
                    song: *card,
                    singer: *singer,
                }),
                None => resolution,
            })
        }

        Effect::Quest { character } => {
            let player = ctx.in_play(*character)?.controller;
            if ctx.definition(*character)?.kind.as_questable().is_none() {
                return Err(EffectError::WrongCardKind(*character));
            }
            let lore = ctx.view().effective_lore(*character);
            if let Some(card) = ctx.state.card_mut(*character) {
                card.exerted = true;
            }
            Ok(Resolution::event(GameEvent::CharacterQuested {
                player,
                character: *character,
                lore,
            }))
        }

        Effect::DeclareChallenge { attacker, defender } => {
            let player = ctx.in_play(*attacker)?.controller;
            ctx.in_play(*defender)?;
            let bonus = ctx
                .view()
                .keyword_value(*attacker, KeywordKind::Challenger)
                .unwrap_or(0);

            let mut resolution = Resolution::event(GameEvent::CharacterChallenged {
                player,
                attacker: *attacker,
                defender: *defender,
            });
            if let Some(card) = ctx.state.card_mut(*attacker) {
                card.exerted = true;
                if bonus > 0 {
                    let delta = i32::try_from(bonus).unwrap_or(i32::MAX);
                    card.add_modifier(
                        Modifier::stat(Stat::Strength, delta, Duration::EndOfChallenge).from_source(*attacker),
                    );
                    resolution.events.push(GameEvent::StatModified {
                        card: *attacker,
                        stat: Stat::Strength,
                        delta,
                    });
                }
            }
            Ok(resolution)
        }

        Effect::EndChallenge { attacker } => {
            ctx.instance(*attacker)?;
            let count = ctx
                .state
                .card_mut(*attacker)
                .map_or(0, |c| c.expire_modifiers(Duration::EndOfChallenge));
            Ok(Resolution::event(GameEvent::ModifiersExpired {
                duration: Duration::EndOfChallenge,
                count,
            }))
        }

        Effect::PayActivationCost { source, ability } => {
            let card = ctx.instance(*source)?;
            let (player, owner) = (card.controller, card.owner);
            let unknown = EffectError::UnknownAbility {
                card: *source,
                ability: *ability,
            };
            let cost = match ctx.definition(*source)?.ability(*ability) {
                Some(Ability::Activated(activated)) => activated.cost,
                _ => return Err(unknown),
            };
            let available = ctx.view().available_ink(player);
            if cost.ink > available {
                return Err(EffectError::InsufficientInk {
                    needed: cost.ink,
                    available,
                });
            }

            let mut resolution = Resolution::event(GameEvent::AbilityActivated {
                player,
                source: *source,
                ability: *ability,
            });
            if cost.exert {
                if let Some(card) = ctx.state.card_mut(*source) {
                    card.exerted = true;
                }
                resolution.events.push(GameEvent::CardExerted { card: *source });
            }
            if cost.ink > 0 {
                ctx.exert_ink(player, cost.ink)?;
                resolution.events.push(GameEvent::InkPaid { player, amount: cost.ink });
            }
            if cost.banish_self {
                ctx.relocate(*source, ZoneId::player(owner, Zone::Discard))?;
                resolution.events.push(GameEvent::Banished { card: *source, owner });
            }
            Ok(resolution)
        }

        // === Mutations ===
        Effect::DealDamage { target, amount, source } => {
            let entity = bound(target)?;
            ctx.in_play(entity)?;
            if ctx.definition(entity)?.kind.as_damageable().is_none() {
                return Err(EffectError::WrongCardKind(entity));
            }
            let view = ctx.view();
            let resist = view.keyword_value(entity, KeywordKind::Resist).unwrap_or(0);
            let dealt = ctx.amount(*amount).saturating_sub(resist);
            if dealt == 0 {
                return Ok(Resolution::default());
            }
            if let Some(card) = ctx.state.card_mut(entity) {
                card.damage += dealt;
            }
            Ok(Resolution::event(GameEvent::DamageDealt {
                target: entity,
                amount: dealt,
                source: *source,
            }))
        }

        Effect::RemoveDamage { target, amount } => {
            let entity = bound(target)?;
            let removed = ctx.in_play(entity)?.damage.min(*amount);
            if removed == 0 {
                return Ok(Resolution::default());
            }
            if let Some(card) = ctx.state.card_mut(entity) {
                card.damage -= removed;
            }
            Ok(Resolution::event(GameEvent::DamageRemoved {
                target: entity,
                amount: removed,
            }))
        }

        Effect::GainLore { player, amount } => {
            let amount = ctx.amount(*amount);
            if amount == 0 {
                return Ok(Resolution::default());
            }
            ctx.state.player_mut(*player).lore += amount;
            Ok(Resolution::event(GameEvent::LoreGained {
                player: *player,
                amount,
            }))
        }

        Effect::LoseLore { player, amount } => {
            let lore = &mut ctx.state.player_mut(*player).lore;
            let lost = (*lore).min(*amount);
            *lore -= lost;
            if lost == 0 {
                return Ok(Resolution::default());
            }
            Ok(Resolution::event(GameEvent::LoreLost {
                player: *player,
                amount: lost,
            }))
        }

        Effect::DrawCard { player } => {
            let deck = ctx.state.zone(*player, Zone::Deck);
            let top = ctx.state.zones.top_card(deck).ok_or(EffectError::EmptyDeck(*player))?;
            ctx.relocate(top, ZoneId::player(*player, Zone::Hand))?;
            Ok(Resolution::event(GameEvent::CardDrawn {
                player: *player,
                card: top,
            }))
        }

        Effect::Discard { target } => {
            let entity = bound(target)?;
            let card = ctx.instance(entity)?;
            if card.zone.zone() != Zone::Hand {
                return Err(EffectError::NotInZone {
                    card: entity,
                    expected: Zone::Hand,
                });
            }
            let owner = card.owner;
            ctx.relocate(entity, ZoneId::player(owner, Zone::Discard))?;
            Ok(Resolution::event(GameEvent::CardDiscarded {
                player: owner,
                card: entity,
            }))
        }

        Effect::Exert { target } => {
            let entity = bound(target)?;
            if ctx.in_play(entity)?.exerted {
                return Ok(Resolution::default());
            }
            if let Some(card) = ctx.state.card_mut(entity) {
                card.exerted = true;
            }
            Ok(Resolution::event(GameEvent::CardExerted { card: entity }))
        }

        Effect::Ready { target } => {
            let entity = bound(target)?;
            if !ctx.in_play(entity)?.exerted {
                return Ok(Resolution::default());
            }
            if let Some(card) = ctx.state.card_mut(entity) {
                card.exerted = false;
            }
            Ok(Resolution::event(GameEvent::CardReadied { card: entity }))
        }

        Effect::Banish { target } => {
            let entity = bound(target)?;
            let owner = ctx.in_play(entity)?.owner;
            ctx.relocate(entity, ZoneId::player(owner, Zone::Discard))?;
            Ok(Resolution::event(GameEvent::Banished { card: entity, owner }))
        }

        Effect::ReturnToHand { target } => {
            let entity = bound(target)?;
            let owner = ctx.in_play(entity)?.owner;
            ctx.relocate(entity, ZoneId::player(owner, Zone::Hand))?;
            Ok(Resolution::event(GameEvent::ReturnedToHand { card: entity, owner }))
        }

        Effect::ModifyStat {
            target,
            stat,
            delta,
            duration,
        } => {
            let entity = bound(target)?;
            ctx.in_play(entity)?;
            if let Some(card) = ctx.state.card_mut(entity) {
                card.add_modifier(Modifier::stat(*stat, *delta, *duration));
            }
            Ok(Resolution::event(GameEvent::StatModified {
                card: entity,
                stat: *stat,
                delta: *delta,
            }))
        }

        Effect::GrantKeyword {
            target,
            keyword,
            duration,
        } => {
            let entity = bound(target)?;
            ctx.in_play(entity)?;
            if let Some(card) = ctx.state.card_mut(entity) {
                card.add_modifier(Modifier::keyword(*keyword, *duration));
            }
            Ok(Resolution::event(GameEvent::KeywordGranted {
                card: entity,
                keyword: *keyword,
            }))
        }
    }
}

fn bound(target: &Target) -> Result<EntityId, EffectError> {
    target.card().ok_or(EffectError::UnboundTarget)
}

impl<'a> ResolverContext<'a> {
    pub fn new(
        catalog: &'a CardCatalog,
        config: &'a RulesConfig,
        state: &'a mut GameState,
        registry: &'a mut AbilityRegistry,
    ) -> Self {
        Self {
            catalog,
            config,
            state,
            registry,
        }
    }

    #[must_use]
    pub fn view(&self) -> GameView<'_> {
        GameView::new(self.catalog, self.state, self.registry, self.config)
    }

    fn instance(&self, entity: EntityId) -> Result<&CardInstance, EffectError> {
        self.state.card(entity).ok_or(EffectError::MissingCard(entity))
    }

    fn definition(&self, entity: EntityId) -> Result<&'a CardDefinition, EffectError> {
        let catalog: &'a CardCatalog = self.catalog;
        let card_id = self.instance(entity)?.card_id;
        catalog.get(card_id).ok_or(EffectError::MissingCard(entity))
    }

    /// The card, if it is still in play.
    fn in_play(&self, entity: EntityId) -> Result<&CardInstance, EffectError> {
        let card = self.instance(entity)?;
        if card.is_in_play() {
            return Ok(card);
        }
        let expected = self
            .catalog
            .get(card.card_id)
            .and_then(|d| d.kind.play_zone())
            .unwrap_or(Zone::Characters);
        Err(EffectError::NotInZone { card: entity, expected })
    }

    fn in_hand(&self, entity: EntityId, player: PlayerId) -> Result<&CardInstance, EffectError> {
        let card = self.instance(entity)?;
        if card.zone != self.state.zone(player, Zone::Hand) {
            return Err(EffectError::NotInZone {
                card: entity,
                expected: Zone::Hand,
            });
        }
        Ok(card)
    }

    fn amount(&self, amount: Amount) -> u32 {
        let view = self.view();
        match amount {
            Amount::Fixed(n) => n,
            Amount::StrengthOf(e) => view.effective_strength(e),
            Amount::LoreOf(e) => view.effective_lore(e),
        }
    }

    /// Exert `amount` ready inkwell cards, oldest first.
    fn exert_ink(&mut self, player: PlayerId, amount: u32) -> Result<(), EffectError> {
        let inkwell = self.state.zone(player, Zone::Inkwell);
        let ready: Vec<EntityId> = self
            .state
            .cards_in(inkwell)
            .filter(|e| self.state.card(*e).map_or(false, |c| !c.exerted))
            .collect();
        let needed = amount as usize;
        if ready.len() < needed {
            return Err(EffectError::InsufficientInk {
                needed: amount,
                available: u32::try_from(ready.len()).unwrap_or(u32::MAX),
            });
        }
        for entity in ready.into_iter().take(needed) {
            if let Some(card) = self.state.card_mut(entity) {
                card.exerted = true;
            }
        }
        Ok(())
    }

    /// Move a card, keeping play state and the registry consistent.
    ///
    /// Leaving play captures last-known stats and clears damage, exertion,
    /// modifiers and control. Entering play marks the card as drying.
    pub fn relocate(&mut self, entity: EntityId, to: ZoneId) -> Result<(), EffectError> {
        let def = self.definition(entity)?;
        let from = self.instance(entity)?.zone;

        if from.is_in_play() && !to.is_in_play() {
            let line = self.view().stat_line(entity);
            if let Some(card) = self.state.card_mut(entity) {
                card.last_known = Some(line);
                card.reset_play_state();
            }
        }

        self.state
            .move_card(entity, to, ZonePosition::Top)
            .ok_or(EffectError::MissingCard(entity))?;

        if to.is_in_play() && !from.is_in_play() {
            let turn = self.state.turn_number;
            if let Some(card) = self.state.card_mut(entity) {
                card.entered_turn = Some(turn);
                card.exerted = false;
                card.last_known = None;
            }
        }

        self.registry.sync(entity, def, to);
        Ok(())
    }
}
