//! Ability and class definitions from the read-only reference catalog

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Level;

/// What sort of domain card an ability is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    #[default]
    Ability,
    Spell,
    Grimoire,
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ability => "ability",
            Self::Spell => "spell",
            Self::Grimoire => "grimoire",
        };
        f.write_str(s)
    }
}

/// A domain card definition. The card's level is the minimum slot level it can occupy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ability {
    pub name: String,
    pub level: Level,
    pub domain: String,
    #[serde(default)]
    pub kind: CardKind,
    /// Stress paid to swap the card in from the vault
    #[serde(default)]
    pub recall_cost: u8,
    pub text: String,
}

impl Ability {
    pub fn new(
        name: impl Into<String>,
        level: Level,
        domain: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            domain: domain.into(),
            kind: CardKind::default(),
            recall_cost: 0,
            text: text.into(),
        }
    }

    pub fn with_kind(mut self, kind: CardKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_recall_cost(mut self, cost: u8) -> Self {
        self.recall_cost = cost;
        self
    }
}

/// A character class definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterClass {
    pub name: String,
    /// Hit points before any hit point slot advancement
    pub base_hp: u8,
    pub base_evasion: u8,
    /// Domains the class draws cards from
    #[serde(default)]
    pub domains: Vec<String>,
}

impl CharacterClass {
    pub fn new(name: impl Into<String>, base_hp: u8, base_evasion: u8) -> Self {
        Self {
            name: name.into(),
            base_hp,
            base_evasion,
            domains: Vec::new(),
        }
    }

    pub fn with_domains(mut self, domains: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.domains = domains.into_iter().map(Into::into).collect();
        self
    }
}
