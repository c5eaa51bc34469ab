//! SelectedCard - a domain card a character has picked

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CharacterId, SelectedCardId};

/// A (character, card name) selection. Unique per character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedCard {
    pub id: SelectedCardId,
    pub character_id: CharacterId,
    pub card_name: String,
    pub created_at: DateTime<Utc>,
}

impl SelectedCard {
    pub fn new(
        character_id: CharacterId,
        card_name: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: SelectedCardId::new(),
            character_id,
            card_name: card_name.into(),
            created_at: now,
        }
    }
}
