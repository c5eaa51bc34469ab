//! Advancement options recorded against a completed level

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// One of the fixed advancement options a player picks when completing a level.
///
/// Each option may only be taken a limited number of times within a single
/// advancement bracket (see [`AdvancementOption::bracket_limit`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdvancementOption {
    /// +1 to two unmarked traits; marks them
    TraitBonus,
    /// One more hit point slot
    HitPointSlot,
    /// One more stress slot
    StressSlot,
    /// +1 to two experiences
    ExperienceBonus,
    /// One more domain card slot at the level being completed
    DomainCard,
    /// +1 evasion
    EvasionBonus,
}

impl AdvancementOption {
    pub const ALL: [AdvancementOption; 6] = [
        Self::TraitBonus,
        Self::HitPointSlot,
        Self::StressSlot,
        Self::ExperienceBonus,
        Self::DomainCard,
        Self::EvasionBonus,
    ];

    /// Maximum selections per advancement bracket.
    pub fn bracket_limit(self) -> u8 {
        match self {
            Self::TraitBonus => 3,
            Self::HitPointSlot | Self::StressSlot => 2,
            Self::ExperienceBonus | Self::DomainCard | Self::EvasionBonus => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TraitBonus => "TRAIT_BONUS",
            Self::HitPointSlot => "HIT_POINT_SLOT",
            Self::StressSlot => "STRESS_SLOT",
            Self::ExperienceBonus => "EXPERIENCE_BONUS",
            Self::DomainCard => "DOMAIN_CARD",
            Self::EvasionBonus => "EVASION_BONUS",
        }
    }
}

impl fmt::Display for AdvancementOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdvancementOption {
    type Err = DomainError;

    /// Accepts `TRAIT_BONUS`, `trait_bonus` and `trait-bonus` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_").to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|option| option.as_str() == normalized)
            .ok_or_else(|| DomainError::parse(format!("Unknown advancement option: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_limits_match_option_table() {
        let limits: Vec<(AdvancementOption, u8)> = AdvancementOption::ALL
            .into_iter()
            .map(|o| (o, o.bracket_limit()))
            .collect();
        assert_eq!(
            limits,
            vec![
                (AdvancementOption::TraitBonus, 3),
                (AdvancementOption::HitPointSlot, 2),
                (AdvancementOption::StressSlot, 2),
                (AdvancementOption::ExperienceBonus, 1),
                (AdvancementOption::DomainCard, 1),
                (AdvancementOption::EvasionBonus, 1),
            ]
        );
    }

    #[test]
    fn parses_alternate_spellings() {
        assert_eq!(
            "HIT_POINT_SLOT".parse::<AdvancementOption>().unwrap(),
            AdvancementOption::HitPointSlot
        );
        assert_eq!(
            "domain-card".parse::<AdvancementOption>().unwrap(),
            AdvancementOption::DomainCard
        );
        assert_eq!(
            " evasion_bonus ".parse::<AdvancementOption>().unwrap(),
            AdvancementOption::EvasionBonus
        );
        assert!("armor_bonus".parse::<AdvancementOption>().is_err());
    }

    #[test]
    fn serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&AdvancementOption::ExperienceBonus).unwrap();
        assert_eq!(json, "\"EXPERIENCE_BONUS\"");
    }
}
