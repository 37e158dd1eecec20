//! Card instance identification.
//!
//! Every card that takes part in a game gets a unique `EntityId` when the
//! game is set up. The id follows the card through every zone change for the
//! rest of the game; cards are never destroyed, only relocated.
//!
//! ## Usage
//!
//! ```
//! use lore_engine::core::EntityId;
//!
//! let first = EntityId::new(0);
//! assert_eq!(first.next(), EntityId::new(1));
//! assert_eq!(format!("{}", first), "Entity(0)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance.
///
/// Ordered so that maps keyed by `EntityId` iterate deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create a new entity ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The id allocated after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}
