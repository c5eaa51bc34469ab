//! JSON-backed ability and class catalog.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ascendant_domain::{Ability, CharacterClass, Level};
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tokio::fs;

use crate::infrastructure::ports::{AbilityCatalog, ClassCatalog, RepoError};

const DEFAULT_CONTENT: &str = include_str!("default_content.json");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate {kind} '{name}'")]
    Duplicate { kind: &'static str, name: String },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentFile {
    #[serde(default)]
    classes: Vec<CharacterClass>,
    #[serde(default)]
    abilities: Vec<Ability>,
}

/// Cards and classes keyed by exact name.
#[derive(Debug, Clone, Default)]
pub struct ContentCatalog {
    abilities: HashMap<String, Ability>,
    classes: HashMap<String, CharacterClass>,
}

impl ContentCatalog {
    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self, ContentError> {
        Self::from_json(DEFAULT_CONTENT)
    }

    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let file: ContentFile = serde_json::from_str(json)?;
        Self::from_parts(file.classes, file.abilities)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .await
            .map_err(|source| ContentError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            abilities = catalog.abilities.len(),
            classes = catalog.classes.len(),
            "Loaded content catalog"
        );
        Ok(catalog)
    }

    pub fn from_parts(
        classes: impl IntoIterator<Item = CharacterClass>,
        abilities: impl IntoIterator<Item = Ability>,
    ) -> Result<Self, ContentError> {
        let mut catalog = Self::default();
        for class in classes {
            if catalog.classes.contains_key(&class.name) {
                return Err(ContentError::Duplicate {
                    kind: "class",
                    name: class.name,
                });
            }
            catalog.classes.insert(class.name.clone(), class);
        }
        for ability in abilities {
            if catalog.abilities.contains_key(&ability.name) {
                return Err(ContentError::Duplicate {
                    kind: "ability",
                    name: ability.name,
                });
            }
            catalog.abilities.insert(ability.name.clone(), ability);
        }
        Ok(catalog)
    }

    pub fn ability(&self, name: &str) -> Option<&Ability> {
        self.abilities.get(name)
    }

    pub fn class(&self, name: &str) -> Option<&CharacterClass> {
        self.classes.get(name)
    }

    /// Cards sorted by level, then name.
    pub fn abilities_up_to(&self, max_level: Option<Level>) -> Vec<Ability> {
        let mut abilities: Vec<Ability> = self
            .abilities
            .values()
            .filter(|a| max_level.map_or(true, |max| a.level <= max))
            .cloned()
            .collect();
        abilities.sort_by(|a, b| a.level.cmp(&b.level).then_with(|| a.name.cmp(&b.name)));
        abilities
    }
}

#[async_trait]
impl AbilityCatalog for ContentCatalog {
    async fn get(&self, name: &str) -> Result<Option<Ability>, RepoError> {
        Ok(self.ability(name).cloned())
    }

    async fn list(&self, max_level: Option<Level>) -> Result<Vec<Ability>, RepoError> {
        Ok(self.abilities_up_to(max_level))
    }
}

#[async_trait]
impl ClassCatalog for ContentCatalog {
    async fn get(&self, name: &str) -> Result<Option<CharacterClass>, RepoError> {
        Ok(self.class(name).cloned())
    }
}
