//! Key/value store implementations - SQLite and in-memory.

mod memory;

#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConfig, SqliteStore};
