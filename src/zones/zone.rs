//! Zone identifiers.
//!
//! Each player owns a deck, hand, discard, inkwell, and two in-play areas
//! (characters and items). Locations share a single table-wide zone; the
//! controller of a location is tracked on its `CardInstance`.

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Kinds of zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    Discard,
    Inkwell,
    Characters,
    Items,
    Locations,
}

impl Zone {
    /// Every zone kind.
    pub const ALL: [Zone; 7] = [
        Zone::Deck,
        Zone::Hand,
        Zone::Discard,
        Zone::Inkwell,
        Zone::Characters,
        Zone::Items,
        Zone::Locations,
    ];

    /// Zones owned by a single player.
    pub const PER_PLAYER: [Zone; 6] = [
        Zone::Deck,
        Zone::Hand,
        Zone::Discard,
        Zone::Inkwell,
        Zone::Characters,
        Zone::Items,
    ];

    /// Is this one of the in-play areas?
    #[must_use]
    pub const fn is_in_play(self) -> bool {
        matches!(self, Zone::Characters | Zone::Items | Zone::Locations)
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// A concrete zone: a zone kind plus its owner.
///
/// ```
/// use lore_engine::core::PlayerId;
/// use lore_engine::zones::{Zone, ZoneId};
///
/// let hand = ZoneId::player(PlayerId::new(1), Zone::Hand);
/// assert_eq!(hand.owner(), Some(PlayerId::new(1)));
///
/// // Locations are never player-owned.
/// let shared = ZoneId::player(PlayerId::new(1), Zone::Locations);
/// assert_eq!(shared, ZoneId::locations());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneId {
    owner: Option<PlayerId>,
    zone: Zone,
}

impl ZoneId {
    /// A zone owned by `player`. `Zone::Locations` maps to the shared zone.
    #[must_use]
    pub const fn player(player: PlayerId, zone: Zone) -> Self {
        match zone {
            Zone::Locations => Self::locations(),
            _ => Self {
                owner: Some(player),
                zone,
            },
        }
    }

    /// The shared locations zone.
    #[must_use]
    pub const fn locations() -> Self {
        Self {
            owner: None,
            zone: Zone::Locations,
        }
    }

    #[must_use]
    pub const fn owner(self) -> Option<PlayerId> {
        self.owner
    }

    #[must_use]
    pub const fn zone(self) -> Zone {
        self.zone
    }

    #[must_use]
    pub const fn is_in_play(self) -> bool {
        self.zone.is_in_play()
    }

    /// Every zone in a game with `player_count` players.
    pub fn all(player_count: usize) -> impl Iterator<Item = ZoneId> {
        PlayerId::all(player_count)
            .flat_map(|p| Zone::PER_PLAYER.into_iter().map(move |z| ZoneId::player(p, z)))
            .chain(std::iter::once(ZoneId::locations()))
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.owner {
            Some(p) => write!(f, "{} {:?}", p, self.zone),
            None => write!(f, "{:?}", self.zone),
        }
    }
}

/// Set of zone kinds an ability is live in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneSet(u8);

impl ZoneSet {
    /// Characters, items, and locations.
    pub const IN_PLAY: ZoneSet =
        ZoneSet(Zone::Characters.bit() | Zone::Items.bit() | Zone::Locations.bit());

    pub const HAND: ZoneSet = ZoneSet(Zone::Hand.bit());

    pub const DISCARD: ZoneSet = ZoneSet(Zone::Discard.bit());

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub const fn with(self, zone: Zone) -> Self {
        Self(self.0 | zone.bit())
    }

    #[must_use]
    pub const fn union(self, other: ZoneSet) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn contains(self, zone: Zone) -> bool {
        self.0 & zone.bit() != 0
    }
}

impl Default for ZoneSet {
    fn default() -> Self {
        Self::IN_PLAY
    }
}
