//! Read-only content the progression rules consult.

use ascendant_domain::{Ability, CharacterClass, Level};
use async_trait::async_trait;

use super::error::RepoError;

/// Domain card lookup by exact name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AbilityCatalog: Send + Sync {
    async fn get(&self, name: &str) -> Result<Option<Ability>, RepoError>;

    /// Every card, optionally limited to cards of `max_level` or lower.
    async fn list(&self, max_level: Option<Level>) -> Result<Vec<Ability>, RepoError>;
}

/// Class lookup by exact name.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClassCatalog: Send + Sync {
    async fn get(&self, name: &str) -> Result<Option<CharacterClass>, RepoError>;
}
