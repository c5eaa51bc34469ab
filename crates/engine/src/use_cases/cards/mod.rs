//! Domain card use cases.
//!
//! Selecting and removing cards, the slot view, and the card listing. Slot
//! checks always run against the character's stored selection, reloaded
//! inside the unit of work.

mod deselect;
mod list;
mod select;
mod slots;

use std::sync::Arc;

use ascendant_domain::{CharacterId, DomainError, HeldCard, SelectedCard, ValidationError};
use tracing::warn;

use crate::infrastructure::ports::{AbilityCatalog, RepoError};

pub use deselect::DeselectCard;
pub use list::ListCards;
pub use select::SelectCard;
pub use slots::GetSlotView;

/// Container for card use cases.
pub struct CardUseCases {
    pub select: Arc<SelectCard>,
    pub deselect: Arc<DeselectCard>,
    pub slots: Arc<GetSlotView>,
    pub list: Arc<ListCards>,
}

impl CardUseCases {
    pub fn new(
        select: Arc<SelectCard>,
        deselect: Arc<DeselectCard>,
        slots: Arc<GetSlotView>,
        list: Arc<ListCards>,
    ) -> Self {
        Self {
            select,
            deselect,
            slots,
            list,
        }
    }
}

/// Errors that can occur during card operations.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Invalid input: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl CardError {
    pub(crate) fn character_not_found(id: CharacterId) -> Self {
        Self::NotFound {
            entity_type: "Character",
            id: id.to_string(),
        }
    }

    pub(crate) fn ability_not_found(name: &str) -> Self {
        Self::NotFound {
            entity_type: "Ability",
            id: name.to_string(),
        }
    }
}

/// Resolve the levels of a character's selected cards.
///
/// Cards that are no longer in the catalog cannot be placed, so they are
/// logged and left out.
pub(crate) async fn held_cards(
    abilities: &dyn AbilityCatalog,
    cards: &[SelectedCard],
) -> Result<Vec<HeldCard>, RepoError> {
    let mut held = Vec::with_capacity(cards.len());
    for card in cards {
        match abilities.get(&card.card_name).await? {
            Some(ability) => held.push(HeldCard::new(ability.name, ability.level)),
            None => warn!(card_name = %card.card_name, "Selected card missing from catalog"),
        }
    }
    Ok(held)
}
