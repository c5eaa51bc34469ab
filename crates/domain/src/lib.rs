pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod progression;
pub mod slots;
pub mod value_objects;

// Re-export aggregates
pub use aggregates::{
    AdvancementApplied, CharacterProgress, LevelChange, ProgressionView, ResetOutcome,
};

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{
    Ability, CardKind, Character, CharacterClass, CharacterLevel, Experience, SelectedCard,
    CHOICES_PER_LEVEL, DEFAULT_EXPERIENCE_MODIFIER, STARTING_EXPERIENCES,
};

pub use error::{DomainError, ValidationError};

// Re-export ID types
pub use ids::{CharacterId, CharacterLevelId, ExperienceId, SelectedCardId};

pub use progression::{
    max_hp, plan_advancement, AdvancementPlan, AdvancementRequest, BracketUsage, LevelHistory,
    OptionUsage,
};

pub use slots::{allocate, Allocation, BaseSlots, HeldCard, LevelSlots, Placement, SlotView};

pub use value_objects::{
    bracket_start, AdvancementBracket, AdvancementOption, CharacterName, CharacterTrait,
    ExperienceDescription, Level, MarkedTraits,
};
