//! Zone manager for card locations and movement.
//!
//! The `ZoneManager` is the single source of truth for where every card is.
//! Each zone keeps its cards in order: for decks the last entry is the top
//! card, for in-play zones the order is board position (oldest first).
//!
//! Contents use `im::Vector` so cloning a `GameState` stays cheap.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::zone::ZoneId;
use crate::core::{EntityId, GameRng};
use crate::error::InvariantViolation;

/// Where to insert a card in its new zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// End of the zone (top of a deck, newest on the board).
    Top,
    /// Start of the zone (bottom of a deck).
    Bottom,
    /// Specific index, clamped to the zone's length.
    Index(usize),
}

/// Tracks which zone each card occupies.
///
/// ## Usage
///
/// ```
/// use lore_engine::core::{EntityId, PlayerId};
/// use lore_engine::zones::{Zone, ZoneId, ZoneManager, ZonePosition};
///
/// let deck = ZoneId::player(PlayerId::new(0), Zone::Deck);
/// let hand = ZoneId::player(PlayerId::new(0), Zone::Hand);
///
/// let mut zones = ZoneManager::new();
/// zones.add_to_zone(EntityId(10), deck, ZonePosition::Top).unwrap();
/// zones.add_to_zone(EntityId(11), deck, ZonePosition::Top).unwrap();
///
/// assert_eq!(zones.top_card(deck), Some(EntityId(11)));
/// assert_eq!(zones.move_to_zone(EntityId(11), hand, ZonePosition::Top), Some(deck));
/// assert_eq!(zones.zone_size(deck), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ZoneManager {
    /// entity -> zone
    locations: FxHashMap<EntityId, ZoneId>,

    /// zone -> ordered contents
    contents: FxHashMap<ZoneId, Vector<EntityId>>,
}

impl ZoneManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a card that is not yet tracked.
    pub fn add_to_zone(
        &mut self,
        entity: EntityId,
        zone: ZoneId,
        position: ZonePosition,
    ) -> Result<(), InvariantViolation> {
        if let Some(existing) = self.locations.get(&entity) {
            return Err(InvariantViolation::DuplicateLocation {
                card: entity,
                first: *existing,
                second: zone,
            });
        }

        self.locations.insert(entity, zone);
        Self::insert_at(self.contents.entry(zone).or_default(), entity, position);
        Ok(())
    }

    /// Move a card to another zone.
    ///
    /// Returns the old zone, or `None` if the card isn't tracked. Moving a
    /// card into the zone it already occupies is a no-op.
    pub fn move_to_zone(
        &mut self,
        entity: EntityId,
        new_zone: ZoneId,
        position: ZonePosition,
    ) -> Option<ZoneId> {
        let old_zone = self.locations.get(&entity).copied()?;
        if old_zone == new_zone {
            return Some(old_zone);
        }

        if let Some(order) = self.contents.get_mut(&old_zone) {
            if let Some(idx) = order.index_of(&entity) {
                order.remove(idx);
            }
        }

        self.locations.insert(entity, new_zone);
        Self::insert_at(self.contents.entry(new_zone).or_default(), entity, position);
        Some(old_zone)
    }

    fn insert_at(order: &mut Vector<EntityId>, entity: EntityId, position: ZonePosition) {
        match position {
            ZonePosition::Top => order.push_back(entity),
            ZonePosition::Bottom => order.push_front(entity),
            ZonePosition::Index(i) => {
                let idx = i.min(order.len());
                order.insert(idx, entity);
            }
        }
    }

    #[must_use]
    pub fn zone_of(&self, entity: EntityId) -> Option<ZoneId> {
        self.locations.get(&entity).copied()
    }

    #[must_use]
    pub fn is_in_zone(&self, entity: EntityId, zone: ZoneId) -> bool {
        self.locations.get(&entity) == Some(&zone)
    }

    /// Cards in a zone, in order.
    pub fn cards_in(&self, zone: ZoneId) -> impl Iterator<Item = EntityId> + '_ {
        self.contents.get(&zone).into_iter().flat_map(|order| order.iter().copied())
    }

    /// Index of a card within its zone.
    #[must_use]
    pub fn position_of(&self, entity: EntityId) -> Option<usize> {
        let zone = self.locations.get(&entity)?;
        self.contents.get(zone)?.index_of(&entity)
    }

    #[must_use]
    pub fn zone_size(&self, zone: ZoneId) -> usize {
        self.contents.get(&zone).map_or(0, Vector::len)
    }

    /// The last card of a zone (top of a deck).
    #[must_use]
    pub fn top_card(&self, zone: ZoneId) -> Option<EntityId> {
        self.contents.get(&zone)?.last().copied()
    }

    pub fn shuffle_zone(&mut self, zone: ZoneId, rng: &mut GameRng) {
        if let Some(order) = self.contents.get_mut(&zone) {
            let mut cards: Vec<EntityId> = order.iter().copied().collect();
            rng.shuffle(&mut cards);
            *order = Vector::from(cards);
        }
    }

    /// Total number of tracked cards.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn contains(&self, entity: EntityId) -> bool {
        self.locations.contains_key(&entity)
    }

    /// Check that the location index and the zone contents agree.
    ///
    /// Every tracked card must appear exactly once, in the zone the index
    /// says it occupies.
    pub fn verify(&self) -> Result<(), InvariantViolation> {
        let mut seen: FxHashMap<EntityId, ZoneId> = FxHashMap::default();

        for (zone, order) in &self.contents {
            for entity in order.iter() {
                if let Some(first) = seen.insert(*entity, *zone) {
                    return Err(InvariantViolation::DuplicateLocation {
                        card: *entity,
                        first,
                        second: *zone,
                    });
                }
                match self.locations.get(entity) {
                    Some(indexed) if indexed == zone => {}
                    indexed => {
                        return Err(InvariantViolation::ZoneMismatch {
                            card: *entity,
                            recorded: indexed.copied(),
                            actual: *zone,
                        })
                    }
                }
            }
        }

        if seen.len() != self.locations.len() {
            if let Some((card, zone)) = self.locations.iter().find(|(e, _)| !seen.contains_key(*e)) {
                return Err(InvariantViolation::UnlistedCard {
                    card: *card,
                    zone: *zone,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;
    use crate::zones::Zone;

    fn zone(z: Zone) -> ZoneId {
        ZoneId::player(PlayerId(0), z)
    }

    #[test]
    fn test_positions() {
        let mut zones = ZoneManager::new();
        let deck = zone(Zone::Deck);

        zones.add_to_zone(EntityId(10), deck, ZonePosition::Top).unwrap();
        zones.add_to_zone(EntityId(11), deck, ZonePosition::Bottom).unwrap();
        zones.add_to_zone(EntityId(12), deck, ZonePosition::Top).unwrap();
        zones.add_to_zone(EntityId(13), deck, ZonePosition::Index(1)).unwrap();

        let order: Vec<_> = zones.cards_in(deck).collect();
        assert_eq!(order, vec![EntityId(11), EntityId(13), EntityId(10), EntityId(12)]);
        assert_eq!(zones.top_card(deck), Some(EntityId(12)));
        assert_eq!(zones.position_of(EntityId(10)), Some(2));
    }

    #[test]
    fn test_duplicate_add_rejected() {
        let mut zones = ZoneManager::new();
        zones.add_to_zone(EntityId(1), zone(Zone::Hand), ZonePosition::Top).unwrap();

        let err = zones
            .add_to_zone(EntityId(1), zone(Zone::Discard), ZonePosition::Top)
            .unwrap_err();
        assert!(matches!(err, InvariantViolation::DuplicateLocation { .. }));
    }

    #[test]
    fn test_move_updates_both_indices() {
        let mut zones = ZoneManager::new();
        let hand = zone(Zone::Hand);
        let play = zone(Zone::Characters);
        zones.add_to_zone(EntityId(5), hand, ZonePosition::Top).unwrap();

        assert_eq!(zones.move_to_zone(EntityId(5), play, ZonePosition::Top), Some(hand));
        assert_eq!(zones.zone_size(hand), 0);
        assert!(zones.is_in_zone(EntityId(5), play));
        assert!(zones.verify().is_ok());

        assert_eq!(zones.move_to_zone(EntityId(99), play, ZonePosition::Top), None);
    }

    #[test]
    fn test_shuffle_keeps_cards() {
        let mut zones = ZoneManager::new();
        let deck = zone(Zone::Deck);
        for i in 0..20 {
            zones.add_to_zone(EntityId(i), deck, ZonePosition::Top).unwrap();
        }

        let mut rng = GameRng::new(1);
        zones.shuffle_zone(deck, &mut rng);

        let mut order: Vec<_> = zones.cards_in(deck).map(EntityId::raw).collect();
        assert_ne!(order, (0..20).collect::<Vec<_>>());
        order.sort_unstable();
        assert_eq!(order, (0..20).collect::<Vec<_>>());
        assert!(zones.verify().is_ok());
    }
}
