//! Set level use case.
//!
//! Moves a character straight to a level. Lowering the level removes the
//! level records above it and any held card too high for it.

use std::sync::Arc;

use ascendant_domain::{Character, CharacterId, Level};
use tracing::{info, instrument};

use crate::infrastructure::ports::{AbilityCatalog, CharacterStore, ClassCatalog, ClockPort};
use crate::use_cases::cards::held_cards;

use super::{class_base_hp, ProgressionError};

pub struct SetLevel {
    store: Arc<dyn CharacterStore>,
    classes: Arc<dyn ClassCatalog>,
    abilities: Arc<dyn AbilityCatalog>,
    clock: Arc<dyn ClockPort>,
}

impl SetLevel {
    pub fn new(
        store: Arc<dyn CharacterStore>,
        classes: Arc<dyn ClassCatalog>,
        abilities: Arc<dyn AbilityCatalog>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            store,
            classes,
            abilities,
            clock,
        }
    }

    #[instrument(skip(self), fields(character_id = %character_id))]
    pub async fn execute(
        &self,
        character_id: CharacterId,
        level: u8,
    ) -> Result<Character, ProgressionError> {
        let level = Level::new(level)?;

        let mut uow = self
            .store
            .begin(character_id)
            .await?
            .ok_or_else(|| ProgressionError::character_not_found(character_id))?;
        let mut progress = uow.snapshot().clone();

        let base_hp = class_base_hp(self.classes.as_ref(), &progress).await?;
        let held = held_cards(self.abilities.as_ref(), progress.cards()).await?;
        let change = progress.set_level(level, base_hp, &held, self.clock.now());

        if !change.removed_levels.is_empty() {
            uow.delete_levels_above(level).await?;
        }
        for card_name in &change.removed_cards {
            uow.delete_card(card_name).await?;
        }
        uow.save_character(progress.character()).await?;
        uow.commit().await?;

        info!(
            previous = %change.previous,
            current = %change.current,
            removed_levels = ?change.removed_levels,
            removed_cards = ?change.removed_cards,
            "Character level set"
        );
        Ok(progress.character().clone())
    }
}
