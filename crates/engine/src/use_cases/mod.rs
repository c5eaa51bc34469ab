//! Use cases - User story orchestration.
//!
//! Each module contains use cases for a specific domain area. Mutating use
//! cases open one unit of work per call and commit it only after every write
//! succeeded.

pub mod cards;
pub mod management;
pub mod progression;

pub use cards::{CardError, CardUseCases};
pub use management::{ManagementError, ManagementUseCases};
pub use progression::{ProgressionError, ProgressionUseCases};
