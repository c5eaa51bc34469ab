//! CharacterProgress aggregate - a character with its level history, card
//! selections and experiences
//!
//! Every rule check works from the records held here. Nothing derived
//! (eligibility, bracket usage, slot allocation) is stored.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::{
    Ability, Character, CharacterLevel, Experience, SelectedCard, STARTING_EXPERIENCES,
};
use crate::error::{DomainError, ValidationError};
use crate::progression::{
    max_hp, plan_advancement, AdvancementPlan, AdvancementRequest, BracketUsage, LevelHistory,
};
use crate::slots::{allocate, Allocation, BaseSlots, HeldCard, SlotView};
use crate::value_objects::Level;

/// Loaded state of one character.
///
/// # Invariants
///
/// - `levels` is sorted by level with no gaps starting from 2
/// - no level record sits above the character's level
/// - card names are unique
/// - `experiences` are in creation order
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterProgress {
    character: Character,
    levels: Vec<CharacterLevel>,
    cards: Vec<SelectedCard>,
    experiences: Vec<Experience>,
}

/// Read model for the progression tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionView {
    pub character_level: Level,
    pub next_eligible_level: Option<Level>,
    pub completed_levels: Vec<Level>,
    /// Usage in the bracket of the next eligible level
    pub bracket_usage: Option<BracketUsage>,
    pub max_hp: u8,
}

/// Records produced by a successful advancement.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvancementApplied {
    pub level_record: CharacterLevel,
    pub experience: Option<Experience>,
    pub max_hp_changed: bool,
    pub traits_cleared: bool,
}

/// What a reset removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetOutcome {
    pub removed_levels: usize,
    pub removed_cards: usize,
    pub removed_experiences: usize,
}

/// What a direct level change removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelChange {
    pub previous: Level,
    pub current: Level,
    pub removed_levels: Vec<Level>,
    pub removed_cards: Vec<String>,
}

impl CharacterProgress {
    pub fn new(
        character: Character,
        mut levels: Vec<CharacterLevel>,
        cards: Vec<SelectedCard>,
        experiences: Vec<Experience>,
    ) -> Self {
        levels.sort_by_key(|l| l.level());
        Self {
            character,
            levels,
            cards,
            experiences,
        }
    }

    /// A freshly created character with no history.
    pub fn fresh(character: Character, experiences: Vec<Experience>) -> Self {
        Self::new(character, Vec::new(), Vec::new(), experiences)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn character(&self) -> &Character {
        &self.character
    }

    #[inline]
    pub fn levels(&self) -> &[CharacterLevel] {
        &self.levels
    }

    #[inline]
    pub fn cards(&self) -> &[SelectedCard] {
        &self.cards
    }

    #[inline]
    pub fn experiences(&self) -> &[Experience] {
        &self.experiences
    }

    pub fn history(&self) -> LevelHistory {
        LevelHistory::from_records(&self.levels)
    }

    pub fn has_card(&self, card_name: &str) -> bool {
        self.cards.iter().any(|c| c.card_name == card_name)
    }

    // =========================================================================
    // Progression
    // =========================================================================

    pub fn next_eligible_level(&self) -> Option<Level> {
        self.history().next_eligible_level(self.character.level())
    }

    pub fn progression_view(&self) -> ProgressionView {
        let history = self.history();
        let next = history.next_eligible_level(self.character.level());
        ProgressionView {
            character_level: self.character.level(),
            next_eligible_level: next,
            completed_levels: history.completed_levels(),
            bracket_usage: next.and_then(|level| history.usage_for(level)),
            max_hp: self.character.max_hp(),
        }
    }

    pub fn plan_advancement(
        &self,
        request: &AdvancementRequest,
    ) -> Result<AdvancementPlan, ValidationError> {
        plan_advancement(self.character.level(), &self.history(), request)
    }

    /// Apply a validated plan.
    ///
    /// # Errors
    ///
    /// `DomainError::Validation` if the plan no longer matches this
    /// character's next eligible level.
    pub fn apply_advancement(
        &mut self,
        plan: AdvancementPlan,
        base_hp: u8,
        now: DateTime<Utc>,
    ) -> Result<AdvancementApplied, DomainError> {
        if self.next_eligible_level() != Some(plan.level) {
            return Err(DomainError::validation(format!(
                "Level {} is not the next eligible level",
                plan.level
            )));
        }

        let traits_cleared = plan.clears_marked_traits();
        let record = CharacterLevel::new(self.character.id(), plan.level, plan.choices, now)?;
        let position = self.levels.partition_point(|l| l.level() < plan.level);
        self.levels.insert(position, record.clone());

        let previous_hp = self.character.max_hp();
        self.recompute_max_hp(base_hp, now);
        if traits_cleared {
            self.character.clear_marked_traits(now);
        }

        let experience = plan
            .new_experience
            .map(|description| Experience::new(self.character.id(), description, now));
        if let Some(experience) = &experience {
            self.experiences.push(experience.clone());
        }

        Ok(AdvancementApplied {
            level_record: record,
            experience,
            max_hp_changed: previous_hp != self.character.max_hp(),
            traits_cleared,
        })
    }

    /// Back to level 1 with no level records, no cards and only the starting
    /// experiences. Applying it twice changes nothing the second time.
    pub fn reset_to_level_one(&mut self, base_hp: u8, now: DateTime<Utc>) -> ResetOutcome {
        let outcome = ResetOutcome {
            removed_levels: self.levels.len(),
            removed_cards: self.cards.len(),
            removed_experiences: self.experiences.len().saturating_sub(STARTING_EXPERIENCES),
        };

        self.levels.clear();
        self.cards.clear();
        self.experiences.truncate(STARTING_EXPERIENCES);
        self.character.set_level(Level::MIN, now);
        self.recompute_max_hp(base_hp, now);
        outcome
    }

    /// Set the level directly.
    ///
    /// Lowering drops level records above the new level and any held card
    /// whose level is above it. Cards missing from `held` are left alone.
    pub fn set_level(
        &mut self,
        level: Level,
        base_hp: u8,
        held: &[HeldCard],
        now: DateTime<Utc>,
    ) -> LevelChange {
        let previous = self.character.level();

        let removed_levels: Vec<Level> = self
            .levels
            .iter()
            .map(CharacterLevel::level)
            .filter(|l| *l > level)
            .collect();
        self.levels.retain(|l| l.level() <= level);

        let removed_cards: Vec<String> = held
            .iter()
            .filter(|card| card.level > level && self.has_card(&card.name))
            .map(|card| card.name.clone())
            .collect();
        self.cards.retain(|c| !removed_cards.contains(&c.card_name));

        self.character.set_level(level, now);
        self.recompute_max_hp(base_hp, now);

        LevelChange {
            previous,
            current: level,
            removed_levels,
            removed_cards,
        }
    }

    fn recompute_max_hp(&mut self, base_hp: u8, now: DateTime<Utc>) {
        let hp = max_hp(base_hp, &self.history());
        if hp != self.character.max_hp() {
            self.character.set_max_hp(hp, now);
        }
    }

    // =========================================================================
    // Domain cards
    // =========================================================================

    pub fn base_slots(&self) -> BaseSlots {
        BaseSlots::derive(self.character.level(), &self.history())
    }

    pub fn slot_allocation(&self, held: &[HeldCard]) -> Allocation {
        allocate(&self.base_slots(), held)
    }

    pub fn slot_view(&self, held: &[HeldCard]) -> SlotView {
        self.slot_allocation(held).view(self.character.level())
    }

    /// Check that `ability` can be added to the current selection.
    pub fn check_card_selection(
        &self,
        ability: &Ability,
        held: &[HeldCard],
    ) -> Result<(), ValidationError> {
        if self.has_card(&ability.name) {
            return Err(ValidationError::CardAlreadySelected {
                card_name: ability.name.clone(),
            });
        }

        let character_level = self.character.level();
        if ability.level > character_level {
            return Err(ValidationError::CardLevelTooHigh {
                card_name: ability.name.clone(),
                card_level: ability.level.get(),
                character_level: character_level.get(),
            });
        }

        let allocation = self.slot_allocation(held);
        if !allocation.can_add(ability.level) {
            return Err(ValidationError::NoFreeSlot {
                card_level: ability.level.get(),
                slots: allocation.level_slots(),
            });
        }
        Ok(())
    }

    pub fn select_card(
        &mut self,
        ability: &Ability,
        held: &[HeldCard],
        now: DateTime<Utc>,
    ) -> Result<SelectedCard, ValidationError> {
        self.check_card_selection(ability, held)?;
        let card = SelectedCard::new(self.character.id(), ability.name.clone(), now);
        self.cards.push(card.clone());
        Ok(card)
    }

    pub fn deselect_card(&mut self, card_name: &str) -> Result<SelectedCard, ValidationError> {
        let position = self
            .cards
            .iter()
            .position(|c| c.card_name == card_name)
            .ok_or_else(|| ValidationError::CardNotSelected {
                card_name: card_name.to_string(),
            })?;
        Ok(self.cards.remove(position))
    }
}
