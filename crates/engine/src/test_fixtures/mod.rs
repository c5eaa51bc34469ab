//! Common test helpers for use case and adapter tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::{seed_character, fixed_time};
//!
//! #[tokio::test]
//! async fn test_ranger_can_advance() {
//!     let store = InMemoryCharacterStore::new();
//!     let id = seed_character(&store, "Ranger", 3).await;
//!     // ... test logic
//! }
//! ```

use std::sync::Arc;

use ascendant_domain::{
    AdvancementOption, Character, CharacterId, CharacterLevel, CharacterName, CharacterProgress,
    Experience, ExperienceDescription, Level, SelectedCard,
};
use chrono::{DateTime, TimeZone, Utc};

use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::content_sources::ContentCatalog;
use crate::infrastructure::ports::{CharacterStore, ClockPort};

/// The instant every fixture is stamped with.
pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 18, 30, 0).unwrap()
}

pub fn fixed_clock() -> Arc<dyn ClockPort> {
    Arc::new(FixedClock(fixed_time()))
}

/// Catalog built from the bundled content file.
pub fn catalog() -> Arc<ContentCatalog> {
    Arc::new(ContentCatalog::embedded().expect("bundled content should parse"))
}

// =============================================================================
// Character seeding
// =============================================================================

/// Build a character of `class_name` at `level` with its two starting
/// experiences and no level records or cards.
pub fn progress(class_name: &str, level: u8) -> CharacterProgress {
    let catalog = catalog();
    let class = catalog
        .class(class_name)
        .unwrap_or_else(|| panic!("unknown fixture class {class_name}"));
    let now = fixed_time();
    let mut character = Character::new(CharacterName::new("Kaelen Ashgrove").unwrap(), class, now);
    character.set_level(Level::new(level).unwrap(), now);

    let experiences = ["Former Guard", "Wilderness Guide"]
        .into_iter()
        .map(|text| {
            Experience::new(
                character.id(),
                ExperienceDescription::new(text).unwrap(),
                now,
            )
        })
        .collect();
    CharacterProgress::fresh(character, experiences)
}

/// Like [`progress`], with completed levels starting at 2 and the given cards held.
pub fn progress_with_history(
    class_name: &str,
    level: u8,
    history: &[[AdvancementOption; 2]],
    cards: &[&str],
) -> CharacterProgress {
    let base = progress(class_name, level);
    let id = base.character().id();
    let now = fixed_time();
    let levels = history
        .iter()
        .zip(2u8..)
        .map(|(choices, level)| {
            CharacterLevel::new(id, Level::new(level).unwrap(), *choices, now).unwrap()
        })
        .collect();
    let cards = cards
        .iter()
        .map(|name| SelectedCard::new(id, *name, now))
        .collect();
    CharacterProgress::new(
        base.character().clone(),
        levels,
        cards,
        base.experiences().to_vec(),
    )
}

/// Store a fresh character and return its id.
pub async fn seed_character(
    store: &dyn CharacterStore,
    class_name: &str,
    level: u8,
) -> CharacterId {
    seed(store, progress(class_name, level)).await
}

pub async fn seed(store: &dyn CharacterStore, progress: CharacterProgress) -> CharacterId {
    let id = progress.character().id();
    store.create(&progress).await.expect("seeding the store should succeed");
    id
}
