//! Offline-first data cache.

mod cache;

pub use cache::{DEFAULT_API_TTL, Fetched, OfflineCache, OfflineError};
