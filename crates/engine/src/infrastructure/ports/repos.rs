//! Character storage ports.
//!
//! Reads go through `CharacterStore::load`. Every write goes through a
//! `CharacterUnitOfWork`: the store hands one out holding that character's
//! write lock, the caller validates against `snapshot()` and issues writes,
//! and nothing is visible until `commit`. Dropping a unit of work without
//! committing discards its writes.

use ascendant_domain::{
    Character, CharacterId, CharacterLevel, CharacterProgress, Experience, Level, SelectedCard,
};
use async_trait::async_trait;

use super::error::RepoError;

#[async_trait]
pub trait CharacterStore: Send + Sync {
    /// Current committed state, or `None` for an unknown character.
    async fn load(&self, id: CharacterId) -> Result<Option<CharacterProgress>, RepoError>;

    /// Open a unit of work for one character. Waits while another unit of
    /// work for the same character is open. `None` for an unknown character.
    async fn begin(
        &self,
        id: CharacterId,
    ) -> Result<Option<Box<dyn CharacterUnitOfWork>>, RepoError>;

    /// Store a new character with its starting experiences.
    async fn create(&self, progress: &CharacterProgress) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CharacterUnitOfWork: Send {
    /// State as of `begin`, unaffected by writes made through this unit.
    fn snapshot(&self) -> &CharacterProgress;

    async fn save_character(&mut self, character: &Character) -> Result<(), RepoError>;

    async fn insert_level(&mut self, level: &CharacterLevel) -> Result<(), RepoError>;

    /// Delete level records above `cap`. Returns how many were removed.
    async fn delete_levels_above(&mut self, cap: Level) -> Result<u64, RepoError>;

    async fn insert_card(&mut self, card: &SelectedCard) -> Result<(), RepoError>;

    /// Returns false when no card by that name was selected.
    async fn delete_card(&mut self, card_name: &str) -> Result<bool, RepoError>;

    async fn delete_all_cards(&mut self) -> Result<u64, RepoError>;

    async fn insert_experience(&mut self, experience: &Experience) -> Result<(), RepoError>;

    /// Keep the first `keep` experiences by creation order, delete the rest.
    async fn retain_first_experiences(&mut self, keep: usize) -> Result<u64, RepoError>;

    async fn commit(self: Box<Self>) -> Result<(), RepoError>;
}
