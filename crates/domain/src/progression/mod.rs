//! Progression tracker
//!
//! Pure functions over a character's level and its completed-level history:
//! which level is next, how much of each bracket-limited option is left, and
//! whether a proposed pair of choices is legal.

mod advancement;
mod history;

pub use advancement::{max_hp, plan_advancement, AdvancementPlan, AdvancementRequest};
pub use history::{BracketUsage, LevelHistory, OptionUsage};
