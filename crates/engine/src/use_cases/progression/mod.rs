//! Progression use cases.
//!
//! Level advancement, direct level changes, reset, and the read-only
//! progression view. Every write runs inside one unit of work.

mod advance;
mod reset;
mod set_level;
mod view;

use std::sync::Arc;

use ascendant_domain::{CharacterId, CharacterProgress, DomainError, ValidationError};

use crate::infrastructure::ports::{ClassCatalog, RepoError};

pub use advance::{AdvanceLevel, AdvanceLevelInput, AdvancementOutcome};
pub use reset::ResetToLevelOne;
pub use set_level::SetLevel;
pub use view::GetProgressionView;

/// Container for progression use cases.
pub struct ProgressionUseCases {
    pub advance: Arc<AdvanceLevel>,
    pub reset: Arc<ResetToLevelOne>,
    pub set_level: Arc<SetLevel>,
    pub view: Arc<GetProgressionView>,
}

impl ProgressionUseCases {
    pub fn new(
        advance: Arc<AdvanceLevel>,
        reset: Arc<ResetToLevelOne>,
        set_level: Arc<SetLevel>,
        view: Arc<GetProgressionView>,
    ) -> Self {
        Self {
            advance,
            reset,
            set_level,
            view,
        }
    }
}

/// Errors that can occur during progression operations.
#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
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

impl ProgressionError {
    pub(crate) fn character_not_found(id: CharacterId) -> Self {
        Self::NotFound {
            entity_type: "Character",
            id: id.to_string(),
        }
    }
}

/// Base HP of the character's class.
async fn class_base_hp(
    classes: &dyn ClassCatalog,
    progress: &CharacterProgress,
) -> Result<u8, ProgressionError> {
    let class_name = progress.character().class_name();
    classes
        .get(class_name)
        .await?
        .map(|class| class.base_hp)
        .ok_or_else(|| ProgressionError::NotFound {
            entity_type: "CharacterClass",
            id: class_name.to_string(),
        })
}
