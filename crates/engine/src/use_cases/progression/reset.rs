//! Reset to level 1 use case.

use std::sync::Arc;

use ascendant_domain::{Character, CharacterId};
use tracing::{info, instrument};

use crate::infrastructure::ports::{CharacterStore, ClassCatalog, ClockPort};

use super::{class_base_hp, ProgressionError};

/// Drops every level record and selected card and trims experiences back to
/// the starting two. Resetting a level 1 character is a no-op apart from the
/// write.
pub struct ResetToLevelOne {
    store: Arc<dyn CharacterStore>,
    classes: Arc<dyn ClassCatalog>,
    clock: Arc<dyn ClockPort>,
}

impl ResetToLevelOne {
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

    #[instrument(skip(self), fields(character_id = %character_id))]
    pub async fn execute(&self, character_id: CharacterId) -> Result<Character, ProgressionError> {
        let mut uow = self
            .store
            .begin(character_id)
            .await?
            .ok_or_else(|| ProgressionError::character_not_found(character_id))?;
        let mut progress = uow.snapshot().clone();

        let base_hp = class_base_hp(self.classes.as_ref(), &progress).await?;
        let outcome = progress.reset_to_level_one(base_hp, self.clock.now());

        uow.delete_levels_above(progress.character().level()).await?;
        uow.delete_all_cards().await?;
        uow.retain_first_experiences(progress.experiences().len()).await?;
        uow.save_character(progress.character()).await?;
        uow.commit().await?;

        info!(
            removed_levels = outcome.removed_levels,
            removed_cards = outcome.removed_cards,
            removed_experiences = outcome.removed_experiences,
            "Character reset to level 1"
        );
        Ok(progress.character().clone())
    }
}
