//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Character storage (SQLite or in-memory)
//! - The read-only ability and class catalog
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{CharacterStore, CharacterUnitOfWork};

// =============================================================================
// External Content Ports
// =============================================================================
pub use external::{AbilityCatalog, ClassCatalog};

#[cfg(test)]
pub use external::{MockAbilityCatalog, MockClassCatalog};

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
