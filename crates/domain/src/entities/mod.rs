//! Domain entities - Core business objects with identity

mod ability;
mod character;
mod character_level;
mod experience;
mod selected_card;

pub use ability::{Ability, CardKind, CharacterClass};
pub use character::Character;
pub use character_level::{CharacterLevel, CHOICES_PER_LEVEL};
pub use experience::{Experience, DEFAULT_EXPERIENCE_MODIFIER, STARTING_EXPERIENCES};
pub use selected_card::SelectedCard;
