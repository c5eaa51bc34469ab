//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod config;
pub mod content_sources;
pub mod locks;
pub mod persistence;
pub mod ports;
