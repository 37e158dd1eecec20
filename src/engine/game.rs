//! The execution engine.
//!
//! `Engine` owns the state, the ability registry and the effect queue, and
//! is the only thing that mutates them. Callers drive it with three calls:
//!
//! - `submit` validates a move and queues its effects;
//! - `step` applies exactly one queued effect;
//! - `provide_choice` answers a suspended effect and applies it.
//!
//! Every step runs the same pipeline: resolve the effect, queue the rules'
//! follow-ups, dispatch the events to triggers, banish what has to go,
//! check for game end, verify invariants, record history.

use std::sync::Arc;

use crate::cards::{CardCatalog, CardId};
use crate::core::{ActionRecord, ChoiceValue, GameState, Move, PlayerId, RecordEntry, RulesConfig};
use crate::effects::{resolve, Effect, EffectOutcome, EffectSummary, ResolverContext, Scheduled, Target, TemplateContext};
use crate::error::{ChoiceError, EffectError, EngineError, InvariantViolation, Rejection};
use crate::replay::{Replay, ReplayInput};
use crate::rules::{banishments, game_result, legal_moves, validate, GameResult, GameView};
use crate::stack::{EffectOrigin, EffectQueue, Priority, QueuedEffect};
use crate::triggers::{AbilityRegistry, GameEvent};

use super::choice::ChoiceRequest;
use super::convert::convert;

/// Where the engine is in its cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineStatus {
    /// Queue empty, waiting for the active player's move.
    AwaitingMove,
    /// Effects are queued; call `step`.
    ResolvingQueue,
    /// An effect is suspended until `provide_choice` answers.
    AwaitingChoice(ChoiceRequest),
    GameOver(GameResult),
    /// A state invariant broke. Nothing further is accepted.
    Halted(InvariantViolation),
}

/// What one call to `step` did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// One effect left the queue.
    Applied {
        effect: EffectSummary,
        outcome: EffectOutcome,
        /// Events from the effect, then from any banishments it caused.
        events: Vec<GameEvent>,
    },
    AwaitingChoice(ChoiceRequest),
    QueueEmpty,
    GameOver(GameResult),
}

impl StepResult {
    /// The events, if an effect was applied.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        match self {
            StepResult::Applied { events, .. } => events,
            _ => &[],
        }
    }
}

/// A running game.
pub struct Engine {
    catalog: Arc<CardCatalog>,
    config: RulesConfig,
    state: GameState,
    registry: AbilityRegistry,
    queue: EffectQueue,
    status: EngineStatus,

    /// The effect behind `AwaitingChoice`.
    suspended: Option<QueuedEffect>,

    history: im::Vector<ActionRecord>,
    sequence: u64,

    // === Replay ===
    seed: u64,
    decks: Vec<Vec<CardId>>,
    inputs: Vec<ReplayInput>,

    last_turn: u32,
}

impl Engine {
    pub(crate) fn new(
        catalog: Arc<CardCatalog>,
        config: RulesConfig,
        state: GameState,
        registry: AbilityRegistry,
        seed: u64,
        decks: Vec<Vec<CardId>>,
    ) -> Self {
        let last_turn = state.turn_number;
        Self {
            catalog,
            config,
            state,
            registry,
            queue: EffectQueue::new(),
            status: EngineStatus::AwaitingMove,
            suspended: None,
            history: im::Vector::new(),
            sequence: 0,
            seed,
            decks,
            inputs: Vec::new(),
            last_turn,
        }
    }

    /// Queue the first player's opening turn.
    pub(crate) fn start(&mut self) {
        let first = self.state.first_player;
        self.queue
            .enqueue(Effect::BeginTurn { player: first }, Priority::Cleanup, first, EffectOrigin::Rules);
        self.status = EngineStatus::ResolvingQueue;
        tracing::info!(
            target: "lore_engine::engine",
            players = self.state.player_count(),
            first = first.0,
            seed = self.seed,
            "game.started"
        );
    }

    // === Queries ===

    #[must_use]
    pub fn status(&self) -> &EngineStatus {
        &self.status
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn queue(&self) -> &EffectQueue {
        &self.queue
    }

    #[must_use]
    pub fn registry(&self) -> &AbilityRegistry {
        &self.registry
    }

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    #[must_use]
    pub fn view(&self) -> GameView<'_> {
        GameView::new(&self.catalog, &self.state, &self.registry, &self.config)
    }

    #[must_use]
    pub fn history(&self) -> &im::Vector<ActionRecord> {
        &self.history
    }

    #[must_use]
    pub fn pending_choice(&self) -> Option<&ChoiceRequest> {
        match &self.status {
            EngineStatus::AwaitingChoice(request) => Some(request),
            _ => None,
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<&GameResult> {
        match &self.status {
            EngineStatus::GameOver(result) => Some(result),
            _ => None,
        }
    }

    /// Legal moves for `player`. Empty unless the engine awaits a move.
    #[must_use]
    pub fn legal_moves(&self, player: PlayerId) -> Vec<Move> {
        if self.status != EngineStatus::AwaitingMove {
            return Vec::new();
        }
        legal_moves(&self.view(), player)
    }

    /// Everything needed to re-run this game from the start.
    #[must_use]
    pub fn replay(&self) -> Replay {
        Replay {
            seed: self.seed,
            first_player: self.state.first_player,
            config: self.config.clone(),
            decks: self.decks.clone(),
            inputs: self.inputs.clone(),
        }
    }

    // === Driving ===

    /// Validate `mv` and queue its effects.
    ///
    /// On rejection nothing changes.
    pub fn submit(&mut self, player: PlayerId, mv: Move) -> Result<(), Rejection> {
        match self.status {
            EngineStatus::AwaitingMove => {}
            EngineStatus::Halted(_) => return Err(Rejection::EngineHalted),
            EngineStatus::GameOver(_) => return Err(Rejection::GameOver),
            _ => return Err(Rejection::NotAwaitingMove),
        }

        let view = self.view();
        if let Err(reason) = validate(&view, player, &mv) {
            tracing::debug!(
                target: "lore_engine::engine",
                player = player.0,
                kind = %mv.kind(),
                %reason,
                "move.rejected"
            );
            return Err(reason);
        }
        let scheduled = convert(&view, player, &mv);

        if mv != Move::Pass {
            self.state.player_mut(player).acted_this_turn = true;
        }
        let origin = EffectOrigin::Move(mv.kind());
        for s in scheduled {
            self.push(s, player, origin);
        }
        tracing::debug!(
            target: "lore_engine::engine",
            player = player.0,
            kind = %mv.kind(),
            queued = self.queue.len(),
            "move.accepted"
        );

        self.record(RecordEntry::Submitted { player, mv: mv.clone() });
        self.inputs.push(ReplayInput::Move { player, mv });
        self.status = EngineStatus::ResolvingQueue;
        Ok(())
    }

    /// Take the next effect and apply it, or suspend it for a choice.
    pub fn step(&mut self) -> Result<StepResult, EngineError> {
        match &self.status {
            EngineStatus::Halted(violation) => return Err(EngineError::Halted(violation.clone())),
            EngineStatus::GameOver(result) => return Ok(StepResult::GameOver(result.clone())),
            EngineStatus::AwaitingChoice(request) => return Ok(StepResult::AwaitingChoice(request.clone())),
            EngineStatus::AwaitingMove | EngineStatus::ResolvingQueue => {}
        }

        let Some(queued) = self.queue.take_next() else {
            self.status = EngineStatus::AwaitingMove;
            return Ok(StepResult::QueueEmpty);
        };

        let Some(selector) = queued.effect.selector() else {
            if queued.optional {
                let request = confirm_request(&queued);
                return Ok(self.suspend(queued, request));
            }
            return self.apply(queued);
        };

        let chooser = selector.chooser;
        let candidates = selector.choices(&self.view());
        match candidates.len() {
            0 => self.fizzle(queued, EffectError::NoValidTarget),
            1 if !queued.optional => {
                let mut queued = queued;
                queued.effect = queued.effect.bind(candidates[0]);
                self.apply(queued)
            }
            _ => {
                let request = ChoiceRequest {
                    player: chooser,
                    effect: queued.summary(),
                    candidates,
                    optional: queued.optional,
                };
                Ok(self.suspend(queued, request))
            }
        }
    }

    /// Answer the pending choice and apply the suspended effect.
    pub fn provide_choice(&mut self, value: ChoiceValue) -> Result<StepResult, ChoiceError> {
        let request = match &self.status {
            EngineStatus::Halted(violation) => return Err(EngineError::Halted(violation.clone()).into()),
            EngineStatus::AwaitingChoice(request) => request,
            _ => return Err(ChoiceError::NoPendingChoice),
        };
        if !request.accepts(value) {
            return Err(ChoiceError::InvalidChoice(value));
        }
        let player = request.player;
        let Some(queued) = self.suspended.take() else {
            return Err(ChoiceError::NoPendingChoice);
        };

        self.record(RecordEntry::Chose { player, value });
        self.inputs.push(ReplayInput::Choice(value));
        self.status = EngineStatus::ResolvingQueue;

        match value {
            ChoiceValue::Decline => {
                let summary = queued.summary();
                tracing::debug!(
                    target: "lore_engine::engine",
                    id = summary.id.0,
                    effect = summary.effect.name(),
                    "effect.declined"
                );
                self.finish(summary, EffectOutcome::Declined, Vec::new())
                    .map_err(ChoiceError::from)
            }
            ChoiceValue::Target(entity) => {
                let mut queued = queued;
                queued.effect = queued.effect.bind(entity);
                self.apply(queued).map_err(ChoiceError::from)
            }
            ChoiceValue::Accept => self.apply(queued).map_err(ChoiceError::from),
        }
    }

    /// Step until the engine needs input or the game ends.
    pub fn run_until_stable(&mut self) -> Result<Vec<StepResult>, EngineError> {
        let mut results = Vec::new();
        while self.status == EngineStatus::ResolvingQueue {
            results.push(self.step()?);
        }
        if let EngineStatus::Halted(violation) = &self.status {
            return Err(EngineError::Halted(violation.clone()));
        }
        Ok(results)
    }

    // === Pipeline ===

    fn suspend(&mut self, queued: QueuedEffect, request: ChoiceRequest) -> StepResult {
        tracing::debug!(
            target: "lore_engine::engine",
            id = queued.id.0,
            effect = queued.effect.name(),
            player = request.player.0,
            candidates = request.candidates.len(),
            "effect.suspended"
        );
        self.suspended = Some(queued);
        self.status = EngineStatus::AwaitingChoice(request.clone());
        StepResult::AwaitingChoice(request)
    }

    fn fizzle(&mut self, queued: QueuedEffect, err: EffectError) -> Result<StepResult, EngineError> {
        let summary = queued.summary();
        tracing::warn!(
            target: "lore_engine::engine",
            id = summary.id.0,
            effect = summary.effect.name(),
            %err,
            "effect.fizzled"
        );
        self.finish(summary, EffectOutcome::Fizzled(err), Vec::new())
    }

    fn apply(&mut self, queued: QueuedEffect) -> Result<StepResult, EngineError> {
        let summary = queued.summary();
        let mut ctx = ResolverContext::new(&self.catalog, &self.config, &mut self.state, &mut self.registry);
        let resolution = match resolve(&mut ctx, &queued.effect) {
            Ok(resolution) => resolution,
            Err(err) => return self.fizzle(queued, err),
        };

        tracing::debug!(
            target: "lore_engine::engine",
            id = summary.id.0,
            effect = %summary.effect,
            events = resolution.events.len(),
            "effect.applied"
        );

        for s in resolution.follow_ups {
            self.push(s, queued.controller, EffectOrigin::Rules);
        }
        let mut events: Vec<GameEvent> = resolution.events.into_vec();
        for event in &events {
            self.fire_triggers(event);
        }
        self.banish_defeated(&mut events);

        if let Some(result) = game_result(&self.view()) {
            tracing::info!(target: "lore_engine::engine", ?result, turn = self.state.turn_number, "game.over");
            events.push(GameEvent::GameEnded { result: result.clone() });
            self.queue.clear();
            self.status = EngineStatus::GameOver(result);
        }

        self.finish(summary, EffectOutcome::Resolved, events)
    }

    /// Record the outcome, verify the state and settle the status.
    fn finish(
        &mut self,
        summary: EffectSummary,
        outcome: EffectOutcome,
        events: Vec<GameEvent>,
    ) -> Result<StepResult, EngineError> {
        self.record(RecordEntry::Resolved {
            effect: summary.clone(),
            outcome: outcome.clone(),
        });
        self.verify()?;

        if self.status == EngineStatus::ResolvingQueue && self.queue.is_empty() {
            self.status = EngineStatus::AwaitingMove;
        }
        Ok(StepResult::Applied {
            effect: summary,
            outcome,
            events,
        })
    }

    /// Banish every card whose damage reached its willpower, repeating until
    /// none are left. Each banishment's events are dispatched as it happens.
    fn banish_defeated(&mut self, events: &mut Vec<GameEvent>) {
        loop {
            let defeated = banishments(&self.view());
            if defeated.is_empty() {
                return;
            }
            for card in defeated {
                let banish = Effect::Banish {
                    target: Target::Card(card),
                };
                let mut ctx = ResolverContext::new(&self.catalog, &self.config, &mut self.state, &mut self.registry);
                match resolve(&mut ctx, &banish) {
                    Ok(resolution) => {
                        tracing::debug!(target: "lore_engine::engine", card = card.0, "card.banished");
                        for event in resolution.events {
                            self.fire_triggers(&event);
                            events.push(event);
                        }
                    }
                    Err(err) => {
                        tracing::warn!(target: "lore_engine::engine", card = card.0, %err, "banish.failed");
                        return;
                    }
                }
            }
        }
    }

    /// Queue the effects of every trigger `event` satisfies.
    fn fire_triggers(&mut self, event: &GameEvent) {
        let view = self.view();
        let mut fired = Vec::new();
        for trigger in self.registry.dispatch(event, &view) {
            let origin = EffectOrigin::Trigger {
                source: trigger.source,
                ability: trigger.slot.ability_id(),
            };
            let mut ctx = TemplateContext::new(trigger.controller)
                .from_source(trigger.source)
                .for_event(&trigger.event);
            for template in &trigger.effects {
                for effect in template.instantiate(&view, &mut ctx) {
                    let scheduled = Scheduled {
                        priority: trigger.priority,
                        effect,
                        optional: trigger.optional,
                    };
                    fired.push((scheduled, trigger.controller, origin));
                }
            }
        }
        for (scheduled, controller, origin) in fired {
            self.push(scheduled, controller, origin);
        }
    }

    fn push(&mut self, scheduled: Scheduled, controller: PlayerId, origin: EffectOrigin) {
        let Scheduled {
            priority,
            effect,
            optional,
        } = scheduled;
        if optional {
            self.queue.enqueue_optional(effect, priority, controller, origin);
        } else {
            self.queue.enqueue(effect, priority, controller, origin);
        }
    }

    fn record(&mut self, entry: RecordEntry) {
        self.history
            .push_back(ActionRecord::new(self.sequence, self.state.turn_number, entry));
        self.sequence += 1;
    }

    /// Turn monotonicity, plus the state model when enabled. Halts on failure.
    fn verify(&mut self) -> Result<(), EngineError> {
        let turn = self.state.turn_number;
        let mut violation = (turn < self.last_turn).then_some(InvariantViolation::TurnRegressed {
            from: self.last_turn,
            to: turn,
        });
        if violation.is_none() && self.config.check_invariants {
            violation = self.state.check_invariants().err();
        }
        self.last_turn = turn;

        match violation {
            None => Ok(()),
            Some(violation) => {
                tracing::error!(target: "lore_engine::engine", %violation, "engine.halted");
                self.queue.clear();
                self.suspended = None;
                self.status = EngineStatus::Halted(violation.clone());
                Err(EngineError::Halted(violation))
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

/// A yes/no question for an optional effect with no target.
fn confirm_request(queued: &QueuedEffect) -> ChoiceRequest {
    ChoiceRequest {
        player: queued.controller,
        effect: queued.summary(),
        candidates: Vec::new(),
        optional: true,
    }
}
