//! Progression view use case.

use std::sync::Arc;

use ascendant_domain::{CharacterId, ProgressionView};
use tracing::{debug, instrument};

use crate::infrastructure::ports::CharacterStore;

use super::ProgressionError;

pub struct GetProgressionView {
    store: Arc<dyn CharacterStore>,
}

impl GetProgressionView {
    pub fn new(store: Arc<dyn CharacterStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self), fields(character_id = %character_id))]
    pub async fn execute(
        &self,
        character_id: CharacterId,
    ) -> Result<ProgressionView, ProgressionError> {
        let progress = self
            .store
            .load(character_id)
            .await?
            .ok_or_else(|| ProgressionError::character_not_found(character_id))?;

        let view = progress.progression_view();
        debug!(next_eligible_level = ?view.next_eligible_level, "Progression view built");
        Ok(view)
    }
}
