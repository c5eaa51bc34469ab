//! Application configuration

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DATABASE_URL_VAR: &str = "ASCENDANT_DATABASE_URL";
pub const CONTENT_PATH_VAR: &str = "ASCENDANT_CONTENT_PATH";
pub const STORE_VAR: &str = "ASCENDANT_STORE";

const DEFAULT_DATABASE_URL: &str = "sqlite:ascendant.db?mode=rwc";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}': {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Which character store backs the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StoreKind {
    #[default]
    Sqlite,
    /// Lost on exit
    Memory,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Sqlite => write!(f, "sqlite"),
            StoreKind::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreKind::Sqlite),
            "memory" | "in_memory" | "in-memory" => Ok(StoreKind::Memory),
            other => Err(format!("expected 'sqlite' or 'memory', got '{other}'")),
        }
    }
}

/// Application configuration loaded from environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite connection URL
    pub database_url: String,
    /// JSON catalog replacing the embedded content
    pub content_path: Option<PathBuf>,
    pub store: StoreKind,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            content_path: None,
            store: StoreKind::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store = match get(STORE_VAR) {
            Some(value) => value
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    key: STORE_VAR,
                    value,
                    reason,
                })?,
            None => StoreKind::default(),
        };

        Ok(Self {
            database_url: get(DATABASE_URL_VAR)
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            content_path: get(CONTENT_PATH_VAR).map(PathBuf::from),
            store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.database_url, "sqlite:ascendant.db?mode=rwc");
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (DATABASE_URL_VAR, "sqlite:/tmp/chars.db"),
            (CONTENT_PATH_VAR, "content/cards.json"),
            (STORE_VAR, " Memory "),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite:/tmp/chars.db");
        assert_eq!(config.content_path, Some(PathBuf::from("content/cards.json")));
        assert_eq!(config.store, StoreKind::Memory);
    }

    #[test]
    fn blank_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[(DATABASE_URL_VAR, "  ")])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn rejects_unknown_store() {
        let err = AppConfig::from_lookup(lookup(&[(STORE_VAR, "postgres")])).unwrap_err();
        assert!(err.to_string().contains(STORE_VAR));
        assert!(err.to_string().contains("postgres"));
    }
}
