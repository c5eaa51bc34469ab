//! Character CRUD operations.

use std::sync::Arc;

use ascendant_domain::{
    Character, CharacterId, CharacterName, CharacterProgress, Experience, ExperienceDescription,
    STARTING_EXPERIENCES,
};
use tracing::{info, instrument};

use crate::infrastructure::ports::{CharacterStore, ClassCatalog, ClockPort};

use super::ManagementError;

pub struct CharacterCrud {
    store: Arc<dyn CharacterStore>,
    classes: Arc<dyn ClassCatalog>,
    clock: Arc<dyn ClockPort>,
}

impl CharacterCrud {
    pub fn new(
        store: Arc<dyn CharacterStore>,
        classes: Arc<dyn ClassCatalog>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            store,
            classes,
            clock,
        }
    }

    pub async fn get(
        &self,
        character_id: CharacterId,
    ) -> Result<Option<Character>, ManagementError> {
        Ok(self
            .store
            .load(character_id)
            .await?
            .map(|progress| progress.character().clone()))
    }

    /// Create a level 1 character with max HP equal to the class base.
    #[instrument(skip(self, experiences))]
    pub async fn create(
        &self,
        name: &str,
        class_name: &str,
        experiences: &[String],
    ) -> Result<Character, ManagementError> {
        let name = CharacterName::new(name)?;
        if experiences.len() > STARTING_EXPERIENCES {
            return Err(ManagementError::InvalidInput(format!(
                "A new character starts with at most {STARTING_EXPERIENCES} experiences, got {}",
                experiences.len()
            )));
        }
        let descriptions = experiences
            .iter()
            .map(|text| ExperienceDescription::new(text.as_str()))
            .collect::<Result<Vec<_>, _>>()?;

        let class = self
            .classes
            .get(class_name)
            .await?
            .ok_or_else(|| ManagementError::NotFound {
                entity_type: "CharacterClass",
                id: class_name.to_string(),
            })?;

        let now = self.clock.now();
        let character = Character::new(name, &class, now);
        let experiences = descriptions
            .into_iter()
            .map(|description| Experience::new(character.id(), description, now))
            .collect();
        self.store
            .create(&CharacterProgress::fresh(character.clone(), experiences))
            .await?;

        info!(
            character_id = %character.id(),
            class = %class.name,
            max_hp = character.max_hp(),
            "Character created"
        );
        Ok(character)
    }
}
