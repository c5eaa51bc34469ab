//! Character store adapters
//!
//! Both implement `CharacterStore` with the same unit-of-work semantics:
//! per-character locking, snapshot taken under the lock, all-or-nothing commit.

mod memory;
mod sqlite;

pub use memory::InMemoryCharacterStore;
pub use sqlite::SqliteCharacterStore;
