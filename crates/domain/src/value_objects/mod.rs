//! Value objects - Immutable objects defined by their attributes

mod advancement;
mod level;
mod names;
mod traits;

pub use advancement::AdvancementOption;
pub use level::{bracket_start, AdvancementBracket, Level};
pub use names::{CharacterName, ExperienceDescription};
pub use traits::{CharacterTrait, MarkedTraits};
