//! Application state and composition.

use std::sync::Arc;

use tracing::info;

use crate::infrastructure::{
    clock::SystemClock,
    config::{AppConfig, StoreKind},
    content_sources::{ContentCatalog, ContentError},
    persistence::{InMemoryCharacterStore, SqliteCharacterStore},
    ports::{AbilityCatalog, CharacterStore, ClassCatalog, ClockPort, RepoError},
};
use crate::use_cases::{
    cards, management, progression, CardUseCases, ManagementUseCases, ProgressionUseCases,
};

/// Main application state.
///
/// Holds the character store and all use cases wired against it.
pub struct App {
    pub store: Arc<dyn CharacterStore>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub progression: ProgressionUseCases,
    pub cards: CardUseCases,
    pub management: ManagementUseCases,
}

/// Failures while assembling the application from configuration.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Failed to load content: {0}")]
    Content(#[from] ContentError),
    #[error("Failed to open character store: {0}")]
    Store(#[from] RepoError),
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        store: Arc<dyn CharacterStore>,
        abilities: Arc<dyn AbilityCatalog>,
        classes: Arc<dyn ClassCatalog>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let progression = ProgressionUseCases::new(
            Arc::new(progression::AdvanceLevel::new(
                store.clone(),
                classes.clone(),
                clock.clone(),
            )),
            Arc::new(progression::ResetToLevelOne::new(
                store.clone(),
                classes.clone(),
                clock.clone(),
            )),
            Arc::new(progression::SetLevel::new(
                store.clone(),
                classes.clone(),
                abilities.clone(),
                clock.clone(),
            )),
            Arc::new(progression::GetProgressionView::new(store.clone())),
        );

        let cards = CardUseCases::new(
            Arc::new(cards::SelectCard::new(
                store.clone(),
                abilities.clone(),
                clock.clone(),
            )),
            Arc::new(cards::DeselectCard::new(store.clone())),
            Arc::new(cards::GetSlotView::new(store.clone(), abilities.clone())),
            Arc::new(cards::ListCards::new(abilities)),
        );

        let management = ManagementUseCases::new(management::CharacterCrud::new(
            store.clone(),
            classes,
            clock,
        ));

        Self {
            store,
            use_cases: UseCases {
                progression,
                cards,
                management,
            },
        }
    }

    /// Build the application described by `config`: the content catalog
    /// (embedded unless a path is configured) and the selected store.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let catalog = match &config.content_path {
            Some(path) => ContentCatalog::load(path).await?,
            None => ContentCatalog::embedded()?,
        };
        let catalog = Arc::new(catalog);

        let store: Arc<dyn CharacterStore> = match config.store {
            StoreKind::Sqlite => {
                info!(database_url = %config.database_url, "Opening SQLite character store");
                Arc::new(SqliteCharacterStore::connect(&config.database_url).await?)
            }
            StoreKind::Memory => {
                info!("Using in-memory character store");
                Arc::new(InMemoryCharacterStore::new())
            }
        };

        Ok(Self::new(
            store,
            catalog.clone(),
            catalog,
            Arc::new(SystemClock::new()),
        ))
    }
}
