//! Character level and advancement bracket value objects

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// A validated character level (1-10)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    /// Starting level; never goes through the advancement flow.
    pub const MIN: Level = Level(1);
    /// Level cap.
    pub const MAX: Level = Level(10);
    /// First level that records a `CharacterLevel`.
    pub const FIRST_ADVANCEMENT: Level = Level(2);

    /// Create a validated level.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the value is outside 1-10.
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if !(Self::MIN.0..=Self::MAX.0).contains(&value) {
            return Err(DomainError::validation(format!(
                "Level must be between {} and {}, got {}",
                Self::MIN.0,
                Self::MAX.0,
                value
            )));
        }
        Ok(Self(value))
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// All levels from 1 up to and including this one.
    pub fn up_to(self) -> impl Iterator<Item = Level> {
        (Self::MIN.0..=self.0).map(Level)
    }

    /// Levels that can hold a `CharacterLevel` record, 2 up to and including this one.
    pub fn advancement_levels(self) -> impl Iterator<Item = Level> {
        (Self::FIRST_ADVANCEMENT.0..=self.0).map(Level)
    }

    /// Levels 2, 5 and 8 grant a new experience.
    pub fn requires_new_experience(self) -> bool {
        matches!(self.0, 2 | 5 | 8)
    }

    /// Levels 5 and 8 open a new bracket and clear marked traits.
    pub fn is_bracket_transition(self) -> bool {
        matches!(self.0, 5 | 8)
    }

    pub fn bracket(self) -> AdvancementBracket {
        AdvancementBracket::for_level(self)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Level {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

/// A fixed level range sharing per-option advancement limits.
///
/// - `Initial`: level 1, creation choices only
/// - `Early`: levels 2-4
/// - `Middle`: levels 5-7
/// - `Late`: levels 8-10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvancementBracket {
    Initial,
    Early,
    Middle,
    Late,
}

impl AdvancementBracket {
    pub fn for_level(level: Level) -> Self {
        match level.get() {
            1 => Self::Initial,
            2..=4 => Self::Early,
            5..=7 => Self::Middle,
            _ => Self::Late,
        }
    }

    pub fn start(self) -> Level {
        match self {
            Self::Initial => Level(1),
            Self::Early => Level(2),
            Self::Middle => Level(5),
            Self::Late => Level(8),
        }
    }
}

/// First level of the bracket a target level belongs to.
///
/// `None` for level 1 and anything above the cap: no bracket limit applies there.
pub fn bracket_start(target_level: u8) -> Option<Level> {
    match target_level {
        2..=4 => Some(Level(2)),
        5..=7 => Some(Level(5)),
        8..=10 => Some(Level(8)),
        _ => None,
    }
}
