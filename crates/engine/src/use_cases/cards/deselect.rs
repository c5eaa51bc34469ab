//! Deselect card use case.

use std::sync::Arc;

use ascendant_domain::{CharacterId, SelectedCard};
use tracing::{info, instrument, warn};

use crate::infrastructure::ports::CharacterStore;

use super::CardError;

pub struct DeselectCard {
    store: Arc<dyn CharacterStore>,
}

impl DeselectCard {
    pub fn new(store: Arc<dyn CharacterStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self), fields(character_id = %character_id))]
    pub async fn execute(
        &self,
        character_id: CharacterId,
        card_name: &str,
    ) -> Result<SelectedCard, CardError> {
        let mut uow = self
            .store
            .begin(character_id)
            .await?
            .ok_or_else(|| CardError::character_not_found(character_id))?;
        let mut progress = uow.snapshot().clone();

        let removed = progress
            .deselect_card(card_name)
            .inspect_err(|e| warn!(card_name, error = %e, "Card removal rejected"))?;

        uow.delete_card(card_name).await?;
        uow.commit().await?;

        info!(card_name, "Card deselected");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::InMemoryCharacterStore;
    use crate::test_fixtures::{progress, progress_with_history, seed};
    use ascendant_domain::ValidationError;

    #[tokio::test]
    async fn removes_a_held_card() {
        let store = Arc::new(InMemoryCharacterStore::new());
        let id = seed(
            store.as_ref(),
            progress_with_history("Ranger", 1, &[], &["Rootbind", "Soft Step"]),
        )
        .await;

        let removed = DeselectCard::new(store.clone())
            .execute(id, "Rootbind")
            .await
            .unwrap();
        assert_eq!(removed.card_name, "Rootbind");

        let stored = store.load(id).await.unwrap().unwrap();
        let names: Vec<&str> = stored.cards().iter().map(|c| c.card_name.as_str()).collect();
        assert_eq!(names, vec!["Soft Step"]);
    }

    #[tokio::test]
    async fn card_not_held_is_rejected() {
        let store = Arc::new(InMemoryCharacterStore::new());
        let id = seed(store.as_ref(), progress("Ranger", 1)).await;

        let err = DeselectCard::new(store)
            .execute(id, "Rootbind")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CardError::Validation(ValidationError::CardNotSelected { .. })
        ));
    }
}
