//! Character traits and their "marked" flags

use serde::{Deserialize, Serialize};
use std::fmt;

/// The six character traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterTrait {
    Agility,
    Strength,
    Finesse,
    Instinct,
    Presence,
    Knowledge,
}

impl CharacterTrait {
    pub const ALL: [CharacterTrait; 6] = [
        Self::Agility,
        Self::Strength,
        Self::Finesse,
        Self::Instinct,
        Self::Presence,
        Self::Knowledge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agility => "agility",
            Self::Strength => "strength",
            Self::Finesse => "finesse",
            Self::Instinct => "instinct",
            Self::Presence => "presence",
            Self::Knowledge => "knowledge",
        }
    }
}

impl fmt::Display for CharacterTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which traits have already been raised in the current bracket.
///
/// A marked trait cannot take another trait bonus until the flags are cleared
/// at a bracket transition (levels 5 and 8).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkedTraits {
    #[serde(default)]
    agility: bool,
    #[serde(default)]
    strength: bool,
    #[serde(default)]
    finesse: bool,
    #[serde(default)]
    instinct: bool,
    #[serde(default)]
    presence: bool,
    #[serde(default)]
    knowledge: bool,
}

impl MarkedTraits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_marked(&self, t: CharacterTrait) -> bool {
        match t {
            CharacterTrait::Agility => self.agility,
            CharacterTrait::Strength => self.strength,
            CharacterTrait::Finesse => self.finesse,
            CharacterTrait::Instinct => self.instinct,
            CharacterTrait::Presence => self.presence,
            CharacterTrait::Knowledge => self.knowledge,
        }
    }

    pub fn set(&mut self, t: CharacterTrait, marked: bool) {
        let flag = match t {
            CharacterTrait::Agility => &mut self.agility,
            CharacterTrait::Strength => &mut self.strength,
            CharacterTrait::Finesse => &mut self.finesse,
            CharacterTrait::Instinct => &mut self.instinct,
            CharacterTrait::Presence => &mut self.presence,
            CharacterTrait::Knowledge => &mut self.knowledge,
        };
        *flag = marked;
    }

    pub fn with_marked(mut self, t: CharacterTrait) -> Self {
        self.set(t, true);
        self
    }

    /// Clear all six flags.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    pub fn any_marked(&self) -> bool {
        CharacterTrait::ALL.iter().any(|t| self.is_marked(*t))
    }

    pub fn marked(&self) -> Vec<CharacterTrait> {
        CharacterTrait::ALL
            .into_iter()
            .filter(|t| self.is_marked(*t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_all_unmarks_every_trait() {
        let mut traits = MarkedTraits::new()
            .with_marked(CharacterTrait::Agility)
            .with_marked(CharacterTrait::Knowledge);
        assert_eq!(
            traits.marked(),
            vec![CharacterTrait::Agility, CharacterTrait::Knowledge]
        );

        traits.clear_all();
        assert!(!traits.any_marked());
    }

    #[test]
    fn missing_fields_deserialize_unmarked() {
        let traits: MarkedTraits = serde_json::from_str(r#"{"presence":true}"#).unwrap();
        assert!(traits.is_marked(CharacterTrait::Presence));
        assert!(!traits.is_marked(CharacterTrait::Strength));
    }
}
