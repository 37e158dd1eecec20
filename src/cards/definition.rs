//! Card definitions - static card data.
//!
//! A `CardDefinition` is what is printed on the card: name, ink cost, color,
//! whether it can be inked, its kind with the kind's base stats, and its
//! abilities as structured descriptors. Definitions never change during a
//! game; everything mutable lives on `CardInstance`.
//!
//! ## Card kinds
//!
//! `CardKind` is a tagged union over the four kinds. Stat access goes through
//! the small capability traits `Damageable`, `Exertable` and `Questable`, so
//! rules code asks "can this be damaged?" rather than matching on kinds.
//!
//! ```
//! use lore_engine::abilities::{Ability, Keyword};
//! use lore_engine::cards::{CardDefinition, CardId, InkColor};
//!
//! let guard = CardDefinition::character(CardId::new(1), "Palace Guard", 3, InkColor::Steel, 2, 4, 1)
//!     .with_ability(Ability::Keyword(Keyword::Bodyguard));
//!
//! assert_eq!(guard.kind.as_damageable().map(|d| d.willpower()), Some(4));
//! assert!(guard.has_keyword(Keyword::Bodyguard.kind()));
//! ```

use serde::{Deserialize, Serialize};

use crate::abilities::{Ability, AbilityId, Keyword, KeywordKind};
use crate::effects::EffectTemplate;
use crate::zones::Zone;

/// Identifier for a card definition (a printed card, not a copy of it).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Ink colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InkColor {
    Amber,
    Amethyst,
    Emerald,
    Ruby,
    Sapphire,
    Steel,
}

/// Can take damage and be banished by it.
pub trait Damageable {
    fn willpower(&self) -> u32;
}

/// Can be exerted to pay for things.
pub trait Exertable {
    /// Whether the card must be dry before it can exert.
    fn must_dry(&self) -> bool;
}

/// Can quest for lore.
pub trait Questable {
    fn lore(&self) -> u32;
}

/// Base stats of a character.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterStats {
    pub strength: u32,
    pub willpower: u32,
    pub lore: u32,
    /// Classifications such as "Hero" or "Princess".
    #[serde(default)]
    pub classifications: Vec<String>,
}

/// An action card. Its effects resolve once when it is played.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionStats {
    /// Songs can be sung by a character instead of paying ink.
    pub song: bool,
    #[serde(default)]
    pub effects: Vec<EffectTemplate>,
}

/// Items have no base stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemStats;

/// Base stats of a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocationStats {
    pub move_cost: u32,
    pub willpower: u32,
    /// Lore gained by the controller at the start of each of their turns.
    pub lore: u32,
}

impl Damageable for CharacterStats {
    fn willpower(&self) -> u32 {
        self.willpower
    }
}

impl Damageable for LocationStats {
    fn willpower(&self) -> u32 {
        self.willpower
    }
}

impl Exertable for CharacterStats {
    fn must_dry(&self) -> bool {
        true
    }
}

impl Exertable for ItemStats {
    fn must_dry(&self) -> bool {
        false
    }
}

impl Questable for CharacterStats {
    fn lore(&self) -> u32 {
        self.lore
    }
}

/// The four card kinds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    Character(CharacterStats),
    Action(ActionStats),
    Item(ItemStats),
    Location(LocationStats),
}

/// Fieldless card kind, for filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKindTag {
    Character,
    Action,
    Item,
    Location,
}

impl CardKind {
    #[must_use]
    pub fn tag(&self) -> CardKindTag {
        match self {
            CardKind::Character(_) => CardKindTag::Character,
            CardKind::Action(_) => CardKindTag::Action,
            CardKind::Item(_) => CardKindTag::Item,
            CardKind::Location(_) => CardKindTag::Location,
        }
    }

    /// The in-play zone this kind occupies. Actions never enter play.
    #[must_use]
    pub fn play_zone(&self) -> Option<Zone> {
        match self {
            CardKind::Character(_) => Some(Zone::Characters),
            CardKind::Item(_) => Some(Zone::Items),
            CardKind::Location(_) => Some(Zone::Locations),
            CardKind::Action(_) => None,
        }
    }

    #[must_use]
    pub fn as_damageable(&self) -> Option<&dyn Damageable> {
        match self {
            CardKind::Character(stats) => Some(stats),
            CardKind::Location(stats) => Some(stats),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_exertable(&self) -> Option<&dyn Exertable> {
        match self {
            CardKind::Character(stats) => Some(stats),
            CardKind::Item(stats) => Some(stats),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_questable(&self) -> Option<&dyn Questable> {
        match self {
            CardKind::Character(stats) => Some(stats),
            _ => None,
        }
    }
}

/// Static card definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    /// Subtitle distinguishing versions of the same character.
    #[serde(default)]
    pub version: Option<String>,
    pub cost: u32,
    pub color: InkColor,
    pub inkable: bool,
    pub kind: CardKind,
    #[serde(default)]
    pub abilities: Vec<Ability>,
}

impl CardDefinition {
    /// Create a definition. Cards are inkable unless stated otherwise.
    pub fn new(id: CardId, name: impl Into<String>, cost: u32, color: InkColor, kind: CardKind) -> Self {
        Self {
            id,
            name: name.into(),
            version: None,
            cost,
            color,
            inkable: true,
            kind,
            abilities: Vec::new(),
        }
    }

    pub fn character(
        id: CardId,
        name: impl Into<String>,
        cost: u32,
        color: InkColor,
        strength: u32,
        willpower: u32,
        lore: u32,
    ) -> Self {
        let stats = CharacterStats {
            strength,
            willpower,
            lore,
            classifications: Vec::new(),
        };
        Self::new(id, name, cost, color, CardKind::Character(stats))
    }

    pub fn action(id: CardId, name: impl Into<String>, cost: u32, color: InkColor) -> Self {
        Self::new(id, name, cost, color, CardKind::Action(ActionStats::default()))
    }

    pub fn song(id: CardId, name: impl Into<String>, cost: u32, color: InkColor) -> Self {
        let stats = ActionStats {
            song: true,
            effects: Vec::new(),
        };
        Self::new(id, name, cost, color, CardKind::Action(stats))
    }

    pub fn item(id: CardId, name: impl Into<String>, cost: u32, color: InkColor) -> Self {
        Self::new(id, name, cost, color, CardKind::Item(ItemStats))
    }

    pub fn location(
        id: CardId,
        name: impl Into<String>,
        cost: u32,
        color: InkColor,
        move_cost: u32,
        willpower: u32,
        lore: u32,
    ) -> Self {
        let stats = LocationStats {
            move_cost,
            willpower,
            lore,
        };
        Self::new(id, name, cost, color, CardKind::Location(stats))
    }

    // === Builder methods ===

    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }

    #[must_use]
    pub fn with_inkable(mut self, inkable: bool) -> Self {
        self.inkable = inkable;
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_classification(mut self, classification: impl Into<String>) -> Self {
        if let CardKind::Character(stats) = &mut self.kind {
            stats.classifications.push(classification.into());
        }
        self
    }

    /// Add an effect to an action or song. Ignored for other kinds.
    #[must_use]
    pub fn with_effect(mut self, effect: EffectTemplate) -> Self {
        if let CardKind::Action(stats) = &mut self.kind {
            stats.effects.push(effect);
        }
        self
    }

    // === Queries ===

    /// Full name, including the version subtitle.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.version {
            Some(version) => format!("{} - {}", self.name, version),
            None => self.name.clone(),
        }
    }

    #[must_use]
    pub fn ability(&self, id: AbilityId) -> Option<&Ability> {
        self.abilities.get(id.index())
    }

    /// Printed keywords.
    pub fn keywords(&self) -> impl Iterator<Item = Keyword> + '_ {
        self.abilities.iter().filter_map(|ability| match ability {
            Ability::Keyword(keyword) => Some(*keyword),
            _ => None,
        })
    }

    #[must_use]
    pub fn has_keyword(&self, kind: KeywordKind) -> bool {
        self.keywords().any(|k| k.kind() == kind)
    }

    #[must_use]
    pub fn is_character(&self) -> bool {
        matches!(self.kind, CardKind::Character(_))
    }

    #[must_use]
    pub fn is_song(&self) -> bool {
        matches!(&self.kind, CardKind::Action(stats) if stats.song)
    }

    /// Printed strength (0 for non-characters).
    #[must_use]
    pub fn base_strength(&self) -> u32 {
        match &self.kind {
            CardKind::Character(stats) => stats.strength,
            _ => 0,
        }
    }

    /// Printed lore: quest value for characters, per-turn lore for locations.
    #[must_use]
    pub fn base_lore(&self) -> u32 {
        match &self.kind {
            CardKind::Character(stats) => stats.lore(),
            CardKind::Location(stats) => stats.lore,
            _ => 0,
        }
    }

    /// Effects resolved when this action is played.
    #[must_use]
    pub fn action_effects(&self) -> &[EffectTemplate] {
        match &self.kind {
            CardKind::Action(stats) => &stats.effects,
            _ => &[],
        }
    }
}
