//! Slot view use case.

use std::sync::Arc;

use ascendant_domain::{CharacterId, SlotView};
use tracing::{debug, instrument};

use crate::infrastructure::ports::{AbilityCatalog, CharacterStore};

use super::{held_cards, CardError};

pub struct GetSlotView {
    store: Arc<dyn CharacterStore>,
    abilities: Arc<dyn AbilityCatalog>,
}

impl GetSlotView {
    pub fn new(store: Arc<dyn CharacterStore>, abilities: Arc<dyn AbilityCatalog>) -> Self {
        Self { store, abilities }
    }

    #[instrument(skip(self), fields(character_id = %character_id))]
    pub async fn execute(&self, character_id: CharacterId) -> Result<SlotView, CardError> {
        let progress = self
            .store
            .load(character_id)
            .await?
            .ok_or_else(|| CardError::character_not_found(character_id))?;

        let held = held_cards(self.abilities.as_ref(), progress.cards()).await?;
        let view = progress.slot_view(&held);
        debug!(
            total_slots = view.total_slots,
            used_slots = view.used_slots,
            "Slot view built"
        );
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::InMemoryCharacterStore;
    use crate::test_fixtures::{catalog, progress_with_history, seed};
    use ascendant_domain::{AdvancementOption::*, Level};

    #[tokio::test]
    async fn domain_card_choice_adds_a_slot_at_its_level() {
        let store = Arc::new(InMemoryCharacterStore::new());
        let seeded = progress_with_history(
            "Ranger",
            3,
            &[[DomainCard, TraitBonus], [StressSlot, TraitBonus]],
            &["Rootbind", "Pack Instinct", "Verdant Mend"],
        );
        let id = seed(store.as_ref(), seeded).await;

        let view = GetSlotView::new(store, catalog()).execute(id).await.unwrap();

        assert_eq!(view.total_slots, 5);
        assert_eq!(view.used_slots, 3);
        assert!(view.unplaced_cards.is_empty());
        let level_two = view
            .actual_slots_by_level
            .iter()
            .find(|s| s.level == Level::new(2).unwrap())
            .unwrap();
        assert_eq!(level_two.total, 2);
        assert_eq!(level_two.used, 1);
    }
}
