//! Card system: definitions, instances, and the catalog.
//!
//! ## Key Types
//!
//! - `CardId`: identifier for a printed card
//! - `CardDefinition`: immutable card data with its `CardKind` and abilities
//! - `CardInstance`: one copy of a card in a game (zone, damage, exerted)
//! - `CardCatalog`: definition lookup by `CardId`

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{
    ActionStats, CardDefinition, CardId, CardKind, CardKindTag, CharacterStats, Damageable,
    Exertable, InkColor, ItemStats, LocationStats, Questable,
};
pub use instance::CardInstance;
pub use registry::CardCatalog;
