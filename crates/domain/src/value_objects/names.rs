//! Validated text newtypes
//!
//! These newtypes ensure that text fields are valid by construction:
//! - Non-empty after trimming
//! - Within length limits
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for character names
const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for an experience description
const MAX_EXPERIENCE_LENGTH: usize = 200;

fn validated(value: String, label: &str, max: usize) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{} cannot be empty", label)));
    }
    if trimmed.chars().count() > max {
        return Err(DomainError::validation(format!(
            "{} cannot exceed {} characters",
            label, max
        )));
    }
    Ok(trimmed.to_string())
}

// ============================================================================
// CharacterName
// ============================================================================

/// A validated character name (non-empty, <=200 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CharacterName(String);

impl CharacterName {
    /// Create a new validated character name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is empty or longer than
    /// 200 characters after trimming.
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        validated(name.into(), "Character name", MAX_NAME_LENGTH).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CharacterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CharacterName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CharacterName> for String {
    fn from(name: CharacterName) -> String {
        name.0
    }
}

// ============================================================================
// ExperienceDescription
// ============================================================================

/// A validated experience description, e.g. "Raised by wolves"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExperienceDescription(String);

impl ExperienceDescription {
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        validated(text.into(), "Experience", MAX_EXPERIENCE_LENGTH).map(Self)
    }

    /// Parse optional caller input, treating blank text as absent.
    pub fn from_optional(text: Option<&str>) -> Result<Option<Self>, DomainError> {
        match text {
            Some(t) if !t.trim().is_empty() => Self::new(t).map(Some),
            _ => Ok(None),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExperienceDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ExperienceDescription {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ExperienceDescription> for String {
    fn from(text: ExperienceDescription) -> String {
        text.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_name_is_trimmed() {
        let name = CharacterName::new("  Marlowe Fairwind ").unwrap();
        assert_eq!(name.as_str(), "Marlowe Fairwind");
    }

    #[test]
    fn character_name_rejects_blank_and_long() {
        assert!(CharacterName::new("   ").is_err());
        assert!(CharacterName::new("x".repeat(201)).is_err());
        assert!(CharacterName::new("x".repeat(200)).is_ok());
    }

    #[test]
    fn optional_experience_treats_blank_as_absent() {
        assert_eq!(ExperienceDescription::from_optional(None).unwrap(), None);
        assert_eq!(ExperienceDescription::from_optional(Some("  ")).unwrap(), None);
        let parsed = ExperienceDescription::from_optional(Some("Sea captain"))
            .unwrap()
            .unwrap();
        assert_eq!(parsed.as_str(), "Sea captain");
    }
}
