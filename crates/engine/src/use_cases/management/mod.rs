//! Management use cases for CRUD-style operations.

mod character;

use ascendant_domain::DomainError;

use crate::infrastructure::ports::RepoError;

pub use character::CharacterCrud;

/// Shared error type for management use cases.
#[derive(Debug, thiserror::Error)]
pub enum ManagementError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

/// Container for management use cases.
pub struct ManagementUseCases {
    pub character: CharacterCrud,
}

impl ManagementUseCases {
    pub fn new(character: CharacterCrud) -> Self {
        Self { character }
    }
}
