//! Aggregate roots - domain objects that own their related data
//!
//! An aggregate is loaded whole, mutated through methods that enforce its
//! rules, and hands back the records each mutation produced so the caller can
//! persist exactly those inside one unit of work.

pub mod character_progress;

pub use character_progress::{
    AdvancementApplied, CharacterProgress, LevelChange, ProgressionView, ResetOutcome,
};
