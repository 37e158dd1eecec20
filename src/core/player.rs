//! Players, seating order, and per-player storage.
//!
//! ## PlayerId
//!
//! Seat index in turn order. `PlayerId(0)` sits first at the table; turn
//! order proceeds by ascending index and wraps.
//!
//! ## PlayerMap
//!
//! `Vec`-backed per-player storage indexed by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat identifier (0-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The player seated after this one.
    ///
    /// ```
    /// use lore_engine::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(0).next(2), PlayerId::new(1));
    /// assert_eq!(PlayerId::new(1).next(2), PlayerId::new(0));
    /// ```
    #[must_use]
    pub const fn next(self, player_count: usize) -> Self {
        Self(((self.0 as usize + 1) % player_count) as u8)
    }

    /// Seats between `from` and this player, walking forward in turn order.
    ///
    /// Used to order simultaneous decisions starting at the active player.
    #[must_use]
    pub const fn seats_after(self, from: PlayerId, player_count: usize) -> usize {
        (self.0 as usize + player_count - from.0 as usize) % player_count
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }

    /// Every player in turn order, starting with `first`.
    pub fn turn_order(first: PlayerId, player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count).map(move |offset| PlayerId(((first.index() + offset) % player_count) as u8))
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// One value per seat: lore, counters, anything tracked per player.
///
/// ```
/// use lore_engine::core::{PlayerId, PlayerMap};
///
/// let mut lore: PlayerMap<u32> = PlayerMap::with_value(2, 0);
/// lore[PlayerId::new(1)] += 3;
/// assert_eq!(lore[PlayerId::new(1)], 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Player counts are validated by `GameBuilder` before any map exists.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8).map(|i| factory(PlayerId(i))).collect();
        Self { data }
    }

    /// Create a map with every entry set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Create a map with default values.
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Seats with their values, in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}
