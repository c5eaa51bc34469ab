//! Ascendant engine library.
//!
//! Character advancement and domain card management on top of the pure rules
//! in `ascendant-domain`.
//!
//! ## Structure
//!
//! - `use_cases/` - User story orchestration, one unit of work per mutation
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

/// Shared helpers for unit tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
