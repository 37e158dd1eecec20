//! Zones and card locations.
//!
//! ## Key Types
//!
//! - `Zone`: deck, hand, discard, inkwell, and the three in-play areas
//! - `ZoneId`: a zone plus its owner (locations are shared)
//! - `ZoneSet`: zone kinds where an ability is live
//! - `ZoneManager`: card location tracking and movement

pub mod manager;
pub mod zone;

pub use manager::{ZoneManager, ZonePosition};
pub use zone::{Zone, ZoneId, ZoneSet};
