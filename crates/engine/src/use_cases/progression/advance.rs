//! Advance level use case.
//!
//! Records the two advancement choices for the character's next eligible
//! level, with the HP, marked-trait and experience side effects.

use std::sync::Arc;

use ascendant_domain::{
    AdvancementOption, AdvancementRequest, Character, CharacterId, CharacterLevel, Experience,
    ExperienceDescription, Level,
};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::infrastructure::ports::{CharacterStore, ClassCatalog, ClockPort};

use super::{class_base_hp, ProgressionError};

#[derive(Debug, Clone, Default)]
pub struct AdvanceLevelInput {
    pub choices: Vec<AdvancementOption>,
    /// Level the caller expects to complete. Must match the next eligible level.
    pub requested_level: Option<u8>,
    pub new_experience: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancementOutcome {
    pub character_level: CharacterLevel,
    pub character: Character,
    pub experience: Option<Experience>,
}

pub struct AdvanceLevel {
    store: Arc<dyn CharacterStore>,
    classes: Arc<dyn ClassCatalog>,
    clock: Arc<dyn ClockPort>,
}

impl AdvanceLevel {
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

    /// Execute the advance level use case.
    ///
    /// # Returns
    /// * `Ok(AdvancementOutcome)` - The new level record and updated character
    /// * `Err(ProgressionError::Validation)` - The request broke a progression rule;
    ///   nothing was written
    #[instrument(skip(self, input), fields(character_id = %character_id))]
    pub async fn execute(
        &self,
        character_id: CharacterId,
        input: AdvanceLevelInput,
    ) -> Result<AdvancementOutcome, ProgressionError> {
        let mut uow = self
            .store
            .begin(character_id)
            .await?
            .ok_or_else(|| ProgressionError::character_not_found(character_id))?;
        let mut progress = uow.snapshot().clone();

        let mut request = AdvancementRequest::new(input.choices);
        request.requested_level = input.requested_level;
        // Experience text is only validated at levels that record it.
        let target = progress.next_eligible_level();
        if target.is_some_and(Level::requires_new_experience) {
            request.new_experience =
                ExperienceDescription::from_optional(input.new_experience.as_deref())?;
        } else if input.new_experience.is_some() {
            debug!(level = ?target, "Level grants no experience, ignoring experience text");
        }

        let plan = progress
            .plan_advancement(&request)
            .inspect_err(|e| warn!(error = %e, "Advancement rejected"))?;

        let base_hp = class_base_hp(self.classes.as_ref(), &progress).await?;
        let applied = progress.apply_advancement(plan, base_hp, self.clock.now())?;

        uow.insert_level(&applied.level_record).await?;
        uow.save_character(progress.character()).await?;
        if let Some(experience) = &applied.experience {
            uow.insert_experience(experience).await?;
        }
        uow.commit().await?;

        info!(
            level = %applied.level_record.level(),
            choices = ?applied.level_record.choices(),
            max_hp = progress.character().max_hp(),
            traits_cleared = applied.traits_cleared,
            "Level advanced"
        );

        Ok(AdvancementOutcome {
            character_level: applied.level_record,
            character: progress.character().clone(),
            experience: applied.experience,
        })
    }
}
