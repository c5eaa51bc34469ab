//! Character entity - the record progression and card selection hang off
//!
//! # Invariants
//!
//! - `level` is always 1-10 (enforced by `Level`)
//! - `name` is always non-empty (enforced by `CharacterName`)
//! - `max_hp` is derived: class base HP plus one per recorded hit point slot.
//!   Callers recompute it through `CharacterProgress`, never by hand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::CharacterId;
use crate::value_objects::{CharacterName, CharacterTrait, Level, MarkedTraits};

use super::CharacterClass;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    id: CharacterId,
    name: CharacterName,
    /// Catalog class name; resolves base HP
    class_name: String,
    level: Level,
    max_hp: u8,
    marked_traits: MarkedTraits,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Character {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Create a new level 1 character with the class's base hit points.
    pub fn new(name: CharacterName, class: &CharacterClass, now: DateTime<Utc>) -> Self {
        Self {
            id: CharacterId::new(),
            name,
            class_name: class.name.clone(),
            level: Level::MIN,
            max_hp: class.base_hp,
            marked_traits: MarkedTraits::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a character from stored columns.
    pub fn from_storage(
        id: CharacterId,
        name: CharacterName,
        class_name: String,
        level: Level,
        max_hp: u8,
        marked_traits: MarkedTraits,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            class_name,
            level,
            max_hp,
            marked_traits,
            created_at,
            updated_at,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    #[inline]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    #[inline]
    pub fn max_hp(&self) -> u8 {
        self.max_hp
    }

    #[inline]
    pub fn marked_traits(&self) -> &MarkedTraits {
        &self.marked_traits
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn set_level(&mut self, level: Level, now: DateTime<Utc>) {
        self.level = level;
        self.updated_at = now;
    }

    pub fn set_max_hp(&mut self, max_hp: u8, now: DateTime<Utc>) {
        self.max_hp = max_hp;
        self.updated_at = now;
    }

    pub fn mark_trait(&mut self, t: CharacterTrait, now: DateTime<Utc>) {
        self.marked_traits.set(t, true);
        self.updated_at = now;
    }

    pub fn clear_marked_traits(&mut self, now: DateTime<Utc>) {
        self.marked_traits.clear_all();
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn guardian() -> CharacterClass {
        CharacterClass::new("Guardian", 7, 9)
    }

    #[test]
    fn new_character_starts_at_level_one_with_class_hp() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let character = Character::new(CharacterName::new("Bryn").unwrap(), &guardian(), now);

        assert_eq!(character.level(), Level::MIN);
        assert_eq!(character.max_hp(), 7);
        assert_eq!(character.class_name(), "Guardian");
        assert!(!character.marked_traits().any_marked());
    }

    #[test]
    fn mutations_touch_updated_at() {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2025, 3, 2, 12, 0, 0).unwrap();
        let mut character =
            Character::new(CharacterName::new("Bryn").unwrap(), &guardian(), created);

        character.mark_trait(CharacterTrait::Strength, later);
        assert!(character.marked_traits().is_marked(CharacterTrait::Strength));
        assert_eq!(character.updated_at(), later);
        assert_eq!(character.created_at(), created);
    }
}
