//! Advancement validation
//!
//! The target level is always recomputed from history. A caller-supplied
//! target is honored only when it equals the recomputed one.

use crate::entities::CHOICES_PER_LEVEL;
use crate::error::ValidationError;
use crate::value_objects::{bracket_start, AdvancementOption, ExperienceDescription, Level};

use super::LevelHistory;

/// What the player asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvancementRequest {
    pub choices: Vec<AdvancementOption>,
    /// Level the caller believes it is completing
    pub requested_level: Option<u8>,
    pub new_experience: Option<ExperienceDescription>,
}

impl AdvancementRequest {
    pub fn new(choices: impl Into<Vec<AdvancementOption>>) -> Self {
        Self {
            choices: choices.into(),
            requested_level: None,
            new_experience: None,
        }
    }

    pub fn at_level(mut self, level: u8) -> Self {
        self.requested_level = Some(level);
        self
    }

    pub fn with_experience(mut self, experience: ExperienceDescription) -> Self {
        self.new_experience = Some(experience);
        self
    }
}

/// A validated advancement, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvancementPlan {
    pub level: Level,
    pub choices: [AdvancementOption; CHOICES_PER_LEVEL],
    /// Present only when the level grants an experience
    pub new_experience: Option<ExperienceDescription>,
}

impl AdvancementPlan {
    pub fn clears_marked_traits(&self) -> bool {
        self.level.is_bracket_transition()
    }

    pub fn adds_hit_point_slot(&self) -> bool {
        self.choices.contains(&AdvancementOption::HitPointSlot)
    }
}

/// Validate a request against the character's level and history.
pub fn plan_advancement(
    character_level: Level,
    history: &LevelHistory,
    request: &AdvancementRequest,
) -> Result<AdvancementPlan, ValidationError> {
    let choices: [AdvancementOption; CHOICES_PER_LEVEL] = request
        .choices
        .as_slice()
        .try_into()
        .map_err(|_| ValidationError::WrongChoiceCount {
            got: request.choices.len(),
        })?;

    let next = history.next_eligible_level(character_level);

    if let Some(requested) = request.requested_level {
        if Level::new(requested).is_ok_and(|l| history.is_completed(l)) {
            return Err(ValidationError::LevelAlreadyCompleted { level: requested });
        }
        if requested > character_level.get() {
            return Err(ValidationError::LevelAboveCharacter {
                requested,
                character_level: character_level.get(),
            });
        }
    }

    let level = next.ok_or(ValidationError::NoEligibleLevel {
        character_level: character_level.get(),
    })?;

    if let Some(requested) = request.requested_level {
        if requested != level.get() {
            return Err(ValidationError::TargetLevelMismatch {
                requested,
                expected: level.get(),
            });
        }
    }

    let new_experience = if level.requires_new_experience() {
        Some(
            request
                .new_experience
                .clone()
                .ok_or(ValidationError::ExperienceRequired { level: level.get() })?,
        )
    } else {
        None
    };

    check_bracket_limits(history, level, &choices)?;

    Ok(AdvancementPlan {
        level,
        choices,
        new_experience,
    })
}

fn check_bracket_limits(
    history: &LevelHistory,
    level: Level,
    choices: &[AdvancementOption; CHOICES_PER_LEVEL],
) -> Result<(), ValidationError> {
    let Some(start) = bracket_start(level.get()) else {
        return Ok(());
    };

    for option in AdvancementOption::ALL {
        let requested = choices.iter().filter(|c| **c == option).count() as u8;
        if requested == 0 {
            continue;
        }
        let used = history.bracket_usage(option, level);
        let limit = option.bracket_limit();
        if used.saturating_add(requested) > limit {
            return Err(ValidationError::BracketLimitExceeded {
                option,
                limit,
                used,
                requested,
                remaining: limit.saturating_sub(used),
                bracket_start: start.get(),
            });
        }
    }
    Ok(())
}

/// Class base HP plus one per hit point slot anywhere in the history.
pub fn max_hp(base_hp: u8, history: &LevelHistory) -> u8 {
    let slots = history.total_count(AdvancementOption::HitPointSlot);
    base_hp.saturating_add(u8::try_from(slots).unwrap_or(u8::MAX))
}
