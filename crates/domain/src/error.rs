//! Unified error types for the domain layer
//!
//! `DomainError` covers malformed input values (out-of-range levels, empty
//! names, unknown option text). `ValidationError` covers rejected progression
//! and card-selection requests; every variant carries the structured context a
//! caller needs to explain the rejection to a player.

use thiserror::Error;

use crate::slots::LevelSlots;
use crate::value_objects::AdvancementOption;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for malformed field values.
    ///
    /// # Example
    /// ```ignore
    /// if name.is_empty() {
    ///     return Err(DomainError::validation("Character name cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

/// A progression or card-selection request that breaks a rule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Exactly 2 advancement choices are required, got {got}")]
    WrongChoiceCount { got: usize },

    #[error("No level is eligible for advancement: levels 2-{character_level} are all completed")]
    NoEligibleLevel { character_level: u8 },

    #[error("Requested level {requested} does not match the next eligible level {expected}")]
    TargetLevelMismatch { requested: u8, expected: u8 },

    #[error("Level {level} has already been completed")]
    LevelAlreadyCompleted { level: u8 },

    #[error("Level {requested} is above the character's level {character_level}")]
    LevelAboveCharacter { requested: u8, character_level: u8 },

    #[error("Level {level} requires a new experience")]
    ExperienceRequired { level: u8 },

    #[error(
        "{option} can be taken {limit} time(s) in the bracket starting at level {bracket_start}: \
         {used} already used, {requested} requested, {remaining} remaining"
    )]
    BracketLimitExceeded {
        option: AdvancementOption,
        limit: u8,
        used: u8,
        requested: u8,
        remaining: u8,
        bracket_start: u8,
    },

    #[error("Card '{card_name}' is already selected")]
    CardAlreadySelected { card_name: String },

    #[error("Card '{card_name}' is not selected")]
    CardNotSelected { card_name: String },

    #[error("Card '{card_name}' is level {card_level}, above the character's level {character_level}")]
    CardLevelTooHigh {
        card_name: String,
        card_level: u8,
        character_level: u8,
    },

    #[error("No free domain card slot for a level {card_level} card")]
    NoFreeSlot {
        card_level: u8,
        slots: Vec<LevelSlots>,
    },
}

impl ValidationError {
    /// True for rejections caused by a duplicate or missing card selection.
    pub fn is_selection_conflict(&self) -> bool {
        matches!(
            self,
            Self::CardAlreadySelected { .. } | Self::CardNotSelected { .. }
        )
    }
}
