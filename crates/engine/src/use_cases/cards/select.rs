//! Select card use case.

use std::sync::Arc;

use ascendant_domain::{CharacterId, SelectedCard};
use tracing::{info, instrument, warn};

use crate::infrastructure::ports::{AbilityCatalog, CharacterStore, ClockPort};

use super::{held_cards, CardError};

/// Adds a domain card to a character's selection when a slot at or above the
/// card's level is free. The check and the insert share one unit of work, so
/// two concurrent selections cannot both take the last slot.
pub struct SelectCard {
    store: Arc<dyn CharacterStore>,
    abilities: Arc<dyn AbilityCatalog>,
    clock: Arc<dyn ClockPort>,
}

impl SelectCard {
    pub fn new(
        store: Arc<dyn CharacterStore>,
        abilities: Arc<dyn AbilityCatalog>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            store,
            abilities,
            clock,
        }
    }

    #[instrument(skip(self), fields(character_id = %character_id))]
    pub async fn execute(
        &self,
        character_id: CharacterId,
        card_name: &str,
    ) -> Result<SelectedCard, CardError> {
        let ability = self
            .abilities
            .get(card_name)
            .await?
            .ok_or_else(|| CardError::ability_not_found(card_name))?;

        let mut uow = self
            .store
            .begin(character_id)
            .await?
            .ok_or_else(|| CardError::character_not_found(character_id))?;
        let mut progress = uow.snapshot().clone();

        let held = held_cards(self.abilities.as_ref(), progress.cards()).await?;
        let card = progress
            .select_card(&ability, &held, self.clock.now())
            .inspect_err(|e| warn!(card_name, error = %e, "Card selection rejected"))?;

        uow.insert_card(&card).await?;
        uow.commit().await?;

        info!(card_name, card_level = %ability.level, "Card selected");
        Ok(card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::{InMemoryCharacterStore, SqliteCharacterStore};
    use crate::infrastructure::ports::{MockAbilityCatalog, MockClockPort};
    use crate::test_fixtures::{catalog, fixed_clock, progress_with_history, seed, seed_character};
    use crate::use_cases::cards::GetSlotView;
    use ascendant_domain::{AdvancementOption::*, Level, ValidationError};

    fn use_case(store: Arc<dyn CharacterStore>) -> SelectCard {
        SelectCard::new(store, catalog(), fixed_clock())
    }

    #[tokio::test]
    async fn fills_level_one_slots_then_rejects() {
        let store = Arc::new(InMemoryCharacterStore::new());
        let id = seed_character(store.as_ref(), "Ranger", 1).await;
        let select = use_case(store.clone());

        select.execute(id, "Rootbind").await.unwrap();
        select.execute(id, "Soft Step").await.unwrap();
        let err = select.execute(id, "Steady Footing").await.unwrap_err();

        match err {
            CardError::Validation(ValidationError::NoFreeSlot { card_level, slots }) => {
                assert_eq!(card_level, 1);
                assert_eq!(slots[0].used, 2);
                assert_eq!(slots[0].available, 0);
            }
            other => panic!("expected NoFreeSlot, got {other:?}"),
        }
        assert_eq!(store.load(id).await.unwrap().unwrap().cards().len(), 2);
    }

    #[tokio::test]
    async fn low_card_may_use_a_higher_slot() {
        let store = Arc::new(InMemoryCharacterStore::new());
        let seeded = progress_with_history("Ranger", 2, &[[StressSlot, EvasionBonus]], &[]);
        let id = seed(store.as_ref(), seeded).await;
        let select = use_case(store.clone());

        for name in ["Rootbind", "Soft Step", "Steady Footing"] {
            select.execute(id, name).await.unwrap();
        }
        let err = select.execute(id, "Pack Instinct").await.unwrap_err();
        assert!(matches!(
            err,
            CardError::Validation(ValidationError::NoFreeSlot { card_level: 2, .. })
        ));
    }

    #[tokio::test]
    async fn selection_takes_exactly_one_slot_at_its_level() {
        let store = Arc::new(InMemoryCharacterStore::new());
        let seeded = progress_with_history("Ranger", 2, &[[StressSlot, EvasionBonus]], &[]);
        let id = seed(store.as_ref(), seeded).await;
        let select = use_case(store.clone());
        let slots = GetSlotView::new(store, catalog());

        for (name, card_level) in [("Rootbind", 1), ("Pack Instinct", 2), ("Soft Step", 1)] {
            let level = Level::new(card_level).unwrap();
            let before = slots.execute(id).await.unwrap().available_slots_by_level[&level];
            select.execute(id, name).await.unwrap();
            let after = slots.execute(id).await.unwrap().available_slots_by_level[&level];
            assert_eq!(after, before - 1, "selecting {name}");
        }
    }

    #[tokio::test]
    async fn rejects_duplicates_and_high_level_cards() {
        let store = Arc::new(InMemoryCharacterStore::new());
        let id = seed_character(store.as_ref(), "Ranger", 1).await;
        let select = use_case(store);

        select.execute(id, "Rootbind").await.unwrap();
        assert!(matches!(
            select.execute(id, "Rootbind").await.unwrap_err(),
            CardError::Validation(ValidationError::CardAlreadySelected { .. })
        ));
        assert!(matches!(
            select.execute(id, "Pack Instinct").await.unwrap_err(),
            CardError::Validation(ValidationError::CardLevelTooHigh {
                card_level: 2,
                character_level: 1,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn unknown_card_is_not_found() {
        let mut abilities = MockAbilityCatalog::new();
        abilities.expect_get().returning(|_| Ok(None));
        let mut clock = MockClockPort::new();
        clock.expect_now().never();
        let store = Arc::new(InMemoryCharacterStore::new());
        let id = seed_character(store.as_ref(), "Ranger", 1).await;

        let err = SelectCard::new(store, Arc::new(abilities), Arc::new(clock))
            .execute(id, "Nonexistent")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CardError::NotFound {
                entity_type: "Ability",
                ..
            }
        ));
    }

    async fn race_for_last_slot(store: Arc<dyn CharacterStore>) {
        let id = seed_character(store.as_ref(), "Ranger", 1).await;
        let select = Arc::new(use_case(store.clone()));
        select.execute(id, "Rootbind").await.unwrap();

        let first = {
            let select = select.clone();
            tokio::spawn(async move { select.execute(id, "Soft Step").await })
        };
        let second = {
            let select = select.clone();
            tokio::spawn(async move { select.execute(id, "Steady Footing").await })
        };
        let (first, second) = tokio::join!(first, second);
        let results = [first.unwrap(), second.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(CardError::Validation(ValidationError::NoFreeSlot { .. }))
        )));
        assert_eq!(store.load(id).await.unwrap().unwrap().cards().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_selections_take_one_slot_in_memory() {
        race_for_last_slot(Arc::new(InMemoryCharacterStore::new())).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_selections_take_one_slot_in_sqlite() {
        race_for_last_slot(Arc::new(SqliteCharacterStore::temporary().await.unwrap())).await;
    }
}
