//! CharacterLevel - the record that a level's advancement decision was made

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{CharacterId, CharacterLevelId};
use crate::value_objects::{AdvancementOption, Level};

/// Every completed level records exactly this many choices.
pub const CHOICES_PER_LEVEL: usize = 2;

/// A completed advancement at one level (2-10). Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterLevel {
    id: CharacterLevelId,
    character_id: CharacterId,
    level: Level,
    choices: [AdvancementOption; CHOICES_PER_LEVEL],
    created_at: DateTime<Utc>,
}

impl CharacterLevel {
    /// Record a completed level.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for level 1, which is never recorded.
    pub fn new(
        character_id: CharacterId,
        level: Level,
        choices: [AdvancementOption; CHOICES_PER_LEVEL],
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        Self::from_storage(CharacterLevelId::new(), character_id, level, choices, now)
    }

    pub fn from_storage(
        id: CharacterLevelId,
        character_id: CharacterId,
        level: Level,
        choices: [AdvancementOption; CHOICES_PER_LEVEL],
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if level < Level::FIRST_ADVANCEMENT {
            return Err(DomainError::validation(
                "Level 1 has no advancement record",
            ));
        }
        Ok(Self {
            id,
            character_id,
            level,
            choices,
            created_at,
        })
    }

    pub fn id(&self) -> CharacterLevelId {
        self.id
    }

    pub fn character_id(&self) -> CharacterId {
        self.character_id
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn choices(&self) -> &[AdvancementOption; CHOICES_PER_LEVEL] {
        &self.choices
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn count(&self, option: AdvancementOption) -> usize {
        self.choices.iter().filter(|c| **c == option).count()
    }

    pub fn contains(&self, option: AdvancementOption) -> bool {
        self.choices.contains(&option)
    }
}
