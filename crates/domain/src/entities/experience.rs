//! Experience - a narrative specialty the character rolls with

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, ExperienceId};
use crate::value_objects::ExperienceDescription;

/// Modifier a newly gained experience starts with.
pub const DEFAULT_EXPERIENCE_MODIFIER: i8 = 2;

/// How many experiences survive a reset to level 1 (the creation ones).
pub const STARTING_EXPERIENCES: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: ExperienceId,
    pub character_id: CharacterId,
    pub description: ExperienceDescription,
    pub modifier: i8,
    pub created_at: DateTime<Utc>,
}

impl Experience {
    pub fn new(
        character_id: CharacterId,
        description: ExperienceDescription,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ExperienceId::new(),
            character_id,
            description,
            modifier: DEFAULT_EXPERIENCE_MODIFIER,
            created_at: now,
        }
    }
}
