//! Game state.
//!
//! `GameState` is pure data: per-player counters, turn/phase position, the
//! zone manager, card instances and the RNG. It has no rules behavior beyond
//! invariant checks; effects mutate it through `effects::resolver` and the
//! engine is its only mutator.
//!
//! Card instances live in an `im::OrdMap` and zone contents in `im::Vector`,
//! so cloning a state for lookahead is cheap.

use im::OrdMap;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::config::Phase;
use super::entity::EntityId;
use super::player::{PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::cards::{CardId, CardInstance};
use crate::error::InvariantViolation;
use crate::zones::{Zone, ZoneId, ZoneManager, ZonePosition};

/// Per-player counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerState {
    pub lore: u32,

    /// Ink allowance used this turn.
    pub ink_played_this_turn: bool,

    /// Made any move besides `Pass` this turn.
    pub acted_this_turn: bool,

    /// Cards this player brought to the game.
    pub starting_deck_size: usize,
}

/// Full game state.
#[derive(Clone, Debug)]
pub struct GameState {
    player_count: usize,

    pub players: PlayerMap<PlayerState>,

    // === Turn position ===
    pub active_player: PlayerId,

    /// Player who took the first turn; the turn number advances when play
    /// returns to them.
    pub first_player: PlayerId,

    /// 0 during setup, 1 from the first turn on.
    pub turn_number: u32,

    pub phase: Phase,

    /// Turns in a row that ended without any move besides `Pass`.
    pub consecutive_passes: u32,

    // === Cards ===
    pub zones: ZoneManager,

    cards: OrdMap<EntityId, CardInstance>,

    next_entity: EntityId,

    pub rng: GameRng,
}

impl GameState {
    /// Create an empty state.
    ///
    /// Panics if `player_count` is 0 or above 255.
    #[must_use]
    pub fn new(player_count: usize, first_player: PlayerId, seed: u64) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        Self {
            player_count,
            players: PlayerMap::with_default(player_count),
            active_player: first_player,
            first_player,
            turn_number: 0,
            phase: Phase::Ready,
            consecutive_passes: 0,
            zones: ZoneManager::new(),
            cards: OrdMap::new(),
            next_entity: EntityId(1),
            rng: GameRng::new(seed),
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.player_count
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.player_count)
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player]
    }

    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player]
    }

    // === Cards ===

    /// Create a new instance owned by `owner` and place it in `zone`.
    ///
    /// Counts toward the owner's starting deck size.
    pub fn create_card(
        &mut self,
        card_id: CardId,
        owner: PlayerId,
        zone: ZoneId,
        position: ZonePosition,
    ) -> Result<EntityId, InvariantViolation> {
        let entity = self.next_entity;
        self.zones.add_to_zone(entity, zone, position)?;
        self.next_entity = entity.next();
        self.cards.insert(entity, CardInstance::new(entity, card_id, owner, zone));
        self.players[owner].starting_deck_size += 1;
        Ok(entity)
    }

    #[must_use]
    pub fn card(&self, entity: EntityId) -> Option<&CardInstance> {
        self.cards.get(&entity)
    }

    pub fn card_mut(&mut self, entity: EntityId) -> Option<&mut CardInstance> {
        self.cards.get_mut(&entity)
    }

    /// Every instance, in entity order.
    pub fn cards(&self) -> impl Iterator<Item = &CardInstance> {
        self.cards.values()
    }

    /// Move a card and keep its instance's zone in step.
    ///
    /// Returns the previous zone, or `None` if the card is unknown.
    pub fn move_card(&mut self, entity: EntityId, zone: ZoneId, position: ZonePosition) -> Option<ZoneId> {
        let instance = self.cards.get_mut(&entity)?;
        let old = self.zones.move_to_zone(entity, zone, position)?;
        instance.zone = zone;
        Some(old)
    }

    /// Shorthand for a zone owned by `player`.
    #[must_use]
    pub fn zone(&self, player: PlayerId, zone: Zone) -> ZoneId {
        ZoneId::player(player, zone)
    }

    pub fn cards_in(&self, zone: ZoneId) -> impl Iterator<Item = EntityId> + '_ {
        self.zones.cards_in(zone)
    }

    #[must_use]
    pub fn zone_size(&self, player: PlayerId, zone: Zone) -> usize {
        self.zones.zone_size(ZoneId::player(player, zone))
    }

    /// Cards `player` controls in play: characters, then items, then
    /// locations, each in board order.
    pub fn in_play(&self, player: PlayerId) -> impl Iterator<Item = EntityId> + '_ {
        let own = self
            .zones
            .cards_in(ZoneId::player(player, Zone::Characters))
            .chain(self.zones.cards_in(ZoneId::player(player, Zone::Items)));
        let locations = self
            .zones
            .cards_in(ZoneId::locations())
            .filter(move |e| self.cards.get(e).map_or(false, |c| c.controller == player));
        own.chain(locations)
    }

    // === Invariants ===

    /// Verify the state model.
    ///
    /// - The zone index and zone contents agree (exclusivity).
    /// - Every instance's recorded zone matches the index.
    /// - The active player is a valid seat.
    /// - Each player owns as many tracked cards as they started with.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.zones.verify()?;

        if self.active_player.index() >= self.player_count {
            return Err(InvariantViolation::ActivePlayerOutOfRange {
                index: self.active_player.index(),
                player_count: self.player_count,
            });
        }

        let mut owned = PlayerMap::with_value(self.player_count, 0usize);
        for card in self.cards.values() {
            let tracked = self.zones.zone_of(card.entity_id);
            if tracked != Some(card.zone) {
                return Err(InvariantViolation::InstanceZoneDrift {
                    card: card.entity_id,
                    instance: card.zone,
                    tracked,
                });
            }
            if card.zone.owner().map_or(false, |p| p.index() >= self.player_count) {
                return Err(InvariantViolation::UnknownZone {
                    card: card.entity_id,
                    zone: card.zone,
                });
            }
            owned[card.owner] += 1;
        }

        for (player, state) in self.players.iter() {
            if owned[player] != state.starting_deck_size {
                return Err(InvariantViolation::ConservationBroken {
                    player,
                    expected: state.starting_deck_size,
                    actual: owned[player],
                });
            }
        }
        Ok(())
    }

    /// Hash of everything observable, for determinism checks.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        for (_, player) in self.players.iter() {
            player.hash(&mut hasher);
        }
        self.active_player.hash(&mut hasher);
        self.turn_number.hash(&mut hasher);
        self.phase.hash(&mut hasher);
        self.consecutive_passes.hash(&mut hasher);
        for zone in ZoneId::all(self.player_count) {
            zone.hash(&mut hasher);
            for entity in self.zones.cards_in(zone) {
                entity.hash(&mut hasher);
            }
        }
        for card in self.cards.values() {
            card.hash(&mut hasher);
        }
        self.rng.state().hash(&mut hasher);
        hasher.finish()
    }
}
