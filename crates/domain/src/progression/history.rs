//! Level history - the read view the tracker and allocator derive from

use serde::Serialize;
use std::collections::BTreeMap;

use crate::entities::{CharacterLevel, CHOICES_PER_LEVEL};
use crate::value_objects::{bracket_start, AdvancementOption, Level};

/// Completed levels and their choices, keyed by level.
///
/// Built fresh from stored `CharacterLevel` records for every query; nothing
/// here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelHistory {
    levels: BTreeMap<Level, [AdvancementOption; CHOICES_PER_LEVEL]>,
}

impl LevelHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a CharacterLevel>) -> Self {
        let levels = records
            .into_iter()
            .map(|r| (r.level(), *r.choices()))
            .collect();
        Self { levels }
    }

    /// Builder used to describe a history inline.
    pub fn with_level(
        mut self,
        level: Level,
        choices: [AdvancementOption; CHOICES_PER_LEVEL],
    ) -> Self {
        self.levels.insert(level, choices);
        self
    }

    pub fn is_completed(&self, level: Level) -> bool {
        self.levels.contains_key(&level)
    }

    pub fn choices_at(&self, level: Level) -> Option<&[AdvancementOption; CHOICES_PER_LEVEL]> {
        self.levels.get(&level)
    }

    pub fn completed_levels(&self) -> Vec<Level> {
        self.levels.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Whether the level's record includes the given option.
    pub fn has_choice_at(&self, level: Level, option: AdvancementOption) -> bool {
        self.choices_at(level)
            .map(|choices| choices.contains(&option))
            .unwrap_or(false)
    }

    /// Occurrences of an option across the whole history.
    pub fn total_count(&self, option: AdvancementOption) -> usize {
        self.levels
            .values()
            .flat_map(|choices| choices.iter())
            .filter(|c| **c == option)
            .count()
    }

    /// Smallest level in 2..=character_level without a record.
    pub fn next_eligible_level(&self, character_level: Level) -> Option<Level> {
        character_level
            .advancement_levels()
            .find(|level| !self.is_completed(*level))
    }

    /// Uses of `option` in the target level's bracket, at levels below the target.
    ///
    /// Returns 0 where no bracket applies.
    pub fn bracket_usage(&self, option: AdvancementOption, target: Level) -> u8 {
        let Some(start) = bracket_start(target.get()) else {
            return 0;
        };
        let count = self
            .levels
            .range(start..target)
            .flat_map(|(_, choices)| choices.iter())
            .filter(|c| **c == option)
            .count();
        u8::try_from(count).unwrap_or(u8::MAX)
    }

    /// Per-option usage for the bracket containing `target`.
    ///
    /// `None` when the target level has no bracket limits.
    pub fn usage_for(&self, target: Level) -> Option<BracketUsage> {
        let start = bracket_start(target.get())?;
        let options = AdvancementOption::ALL
            .into_iter()
            .map(|option| {
                let used = self.bracket_usage(option, target);
                let limit = option.bracket_limit();
                OptionUsage {
                    option,
                    used,
                    limit,
                    remaining: limit.saturating_sub(used),
                }
            })
            .collect();
        Some(BracketUsage {
            target_level: target,
            bracket_start: start,
            options,
        })
    }
}

/// Option usage inside one bracket, as of a target level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketUsage {
    pub target_level: Level,
    pub bracket_start: Level,
    pub options: Vec<OptionUsage>,
}

impl BracketUsage {
    pub fn get(&self, option: AdvancementOption) -> Option<&OptionUsage> {
        self.options.iter().find(|u| u.option == option)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionUsage {
    pub option: AdvancementOption,
    pub used: u8,
    pub limit: u8,
    pub remaining: u8,
}
