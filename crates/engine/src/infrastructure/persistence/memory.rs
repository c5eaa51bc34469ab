//! In-memory character store.
//!
//! A unit of work edits a private copy of the character's records and swaps
//! it into the map on commit.

use std::collections::HashMap;
use std::sync::Arc;

use ascendant_domain::{
    Character, CharacterId, CharacterLevel, CharacterProgress, Experience, Level, SelectedCard,
};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::infrastructure::locks::{CharacterLockGuard, CharacterLocks};
use crate::infrastructure::ports::{CharacterStore, CharacterUnitOfWork, RepoError};

/// Raw records for one character, as a database would hold them.
#[derive(Debug, Clone)]
struct StoredCharacter {
    character: Character,
    levels: Vec<CharacterLevel>,
    cards: Vec<SelectedCard>,
    experiences: Vec<Experience>,
}

impl StoredCharacter {
    fn from_progress(progress: &CharacterProgress) -> Self {
        Self {
            character: progress.character().clone(),
            levels: progress.levels().to_vec(),
            cards: progress.cards().to_vec(),
            experiences: progress.experiences().to_vec(),
        }
    }

    fn to_progress(&self) -> CharacterProgress {
        CharacterProgress::new(
            self.character.clone(),
            self.levels.clone(),
            self.cards.clone(),
            self.experiences.clone(),
        )
    }
}

type Records = Arc<RwLock<HashMap<CharacterId, StoredCharacter>>>;

#[derive(Default)]
pub struct InMemoryCharacterStore {
    records: Records,
    locks: Arc<CharacterLocks>,
}

impl InMemoryCharacterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CharacterStore for InMemoryCharacterStore {
    async fn load(&self, id: CharacterId) -> Result<Option<CharacterProgress>, RepoError> {
        let records = self.records.read().await;
        Ok(records.get(&id).map(StoredCharacter::to_progress))
    }

    async fn begin(
        &self,
        id: CharacterId,
    ) -> Result<Option<Box<dyn CharacterUnitOfWork>>, RepoError> {
        let guard = self.locks.acquire(id).await;
        let Some(stored) = self.records.read().await.get(&id).cloned() else {
            return Ok(None);
        };

        Ok(Some(Box::new(InMemoryUnitOfWork {
            snapshot: stored.to_progress(),
            working: stored,
            records: self.records.clone(),
            _guard: guard,
        })))
    }

    async fn create(&self, progress: &CharacterProgress) -> Result<(), RepoError> {
        let id = progress.character().id();
        let mut records = self.records.write().await;
        if records.contains_key(&id) {
            return Err(RepoError::constraint(format!("character {id} already exists")));
        }
        records.insert(id, StoredCharacter::from_progress(progress));
        Ok(())
    }
}

struct InMemoryUnitOfWork {
    snapshot: CharacterProgress,
    working: StoredCharacter,
    records: Records,
    _guard: CharacterLockGuard,
}

#[async_trait]
impl CharacterUnitOfWork for InMemoryUnitOfWork {
    fn snapshot(&self) -> &CharacterProgress {
        &self.snapshot
    }

    async fn save_character(&mut self, character: &Character) -> Result<(), RepoError> {
        if character.id() != self.working.character.id() {
            return Err(RepoError::constraint("unit of work is bound to another character"));
        }
        self.working.character = character.clone();
        Ok(())
    }

    async fn insert_level(&mut self, level: &CharacterLevel) -> Result<(), RepoError> {
        if self.working.levels.iter().any(|l| l.level() == level.level()) {
            return Err(RepoError::constraint(format!(
                "level {} already recorded",
                level.level()
            )));
        }
        self.working.levels.push(level.clone());
        Ok(())
    }

    async fn delete_levels_above(&mut self, cap: Level) -> Result<u64, RepoError> {
        let before = self.working.levels.len();
        self.working.levels.retain(|l| l.level() <= cap);
        Ok((before - self.working.levels.len()) as u64)
    }

    async fn insert_card(&mut self, card: &SelectedCard) -> Result<(), RepoError> {
        if self.working.cards.iter().any(|c| c.card_name == card.card_name) {
            return Err(RepoError::constraint(format!(
                "card '{}' already selected",
                card.card_name
            )));
        }
        self.working.cards.push(card.clone());
        Ok(())
    }

    async fn delete_card(&mut self, card_name: &str) -> Result<bool, RepoError> {
        let before = self.working.cards.len();
        self.working.cards.retain(|c| c.card_name != card_name);
        Ok(self.working.cards.len() < before)
    }

    async fn delete_all_cards(&mut self) -> Result<u64, RepoError> {
        let removed = self.working.cards.len() as u64;
        self.working.cards.clear();
        Ok(removed)
    }

    async fn insert_experience(&mut self, experience: &Experience) -> Result<(), RepoError> {
        self.working.experiences.push(experience.clone());
        Ok(())
    }

    async fn retain_first_experiences(&mut self, keep: usize) -> Result<u64, RepoError> {
        let removed = self.working.experiences.len().saturating_sub(keep) as u64;
        self.working.experiences.truncate(keep);
        Ok(removed)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        let this = *self;
        let id = this.working.character.id();
        this.records.write().await.insert(id, this.working);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ascendant_domain::{
        AdvancementOption, CharacterClass, CharacterName, ExperienceDescription,
    };
    use chrono::{TimeZone, Utc};

    fn seeded() -> CharacterProgress {
        let now = Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap();
        let class = CharacterClass::new("Seraph", 7, 9);
        let mut character = Character::new(CharacterName::new("Ilse").unwrap(), &class, now);
        character.set_level(Level::new(3).unwrap(), now);
        let id = character.id();
        CharacterProgress::fresh(
            character,
            vec![Experience::new(
                id,
                ExperienceDescription::new("Battle Medic").unwrap(),
                now,
            )],
        )
    }

    #[tokio::test]
    async fn unknown_character_has_no_unit_of_work() {
        let store = InMemoryCharacterStore::new();
        assert!(store.begin(CharacterId::new()).await.unwrap().is_none());
        assert!(store.load(CharacterId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn dropped_unit_of_work_discards_writes() {
        let store = InMemoryCharacterStore::new();
        let progress = seeded();
        let id = progress.character().id();
        store.create(&progress).await.unwrap();

        {
            let mut uow = store.begin(id).await.unwrap().unwrap();
            let level = CharacterLevel::new(
                id,
                Level::new(2).unwrap(),
                [AdvancementOption::TraitBonus, AdvancementOption::StressSlot],
                Utc::now(),
            )
            .unwrap();
            uow.insert_level(&level).await.unwrap();
            uow.delete_all_cards().await.unwrap();
        }

        assert_eq!(store.load(id).await.unwrap().unwrap(), progress);
    }

    #[tokio::test]
    async fn committed_writes_are_visible() {
        let store = InMemoryCharacterStore::new();
        let progress = seeded();
        let id = progress.character().id();
        store.create(&progress).await.unwrap();

        let mut uow = store.begin(id).await.unwrap().unwrap();
        uow.insert_card(&SelectedCard::new(id, "Rune Ward", Utc::now()))
            .await
            .unwrap();
        assert!(uow.snapshot().cards().is_empty());
        uow.commit().await.unwrap();

        let loaded = store.load(id).await.unwrap().unwrap();
        assert!(loaded.has_card("Rune Ward"));
    }

    #[tokio::test]
    async fn finished_units_of_work_release_their_locks() {
        let store = InMemoryCharacterStore::new();
        let first = seeded();
        let second = seeded();
        store.create(&first).await.unwrap();
        store.create(&second).await.unwrap();

        let uow = store.begin(first.character().id()).await.unwrap().unwrap();
        uow.commit().await.unwrap();
        drop(store.begin(second.character().id()).await.unwrap());

        assert!(store.locks.is_empty());
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected() {
        let store = InMemoryCharacterStore::new();
        let progress = seeded();
        store.create(&progress).await.unwrap();

        let err = store.create(&progress).await.unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation(_)));
    }
}
