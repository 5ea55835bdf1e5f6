//! # Mumii Infrastructure
//!
//! Concrete implementations of the ports defined in `mumii-core`:
//! key/value stores, the offline cache, auth services, the user repository,
//! the demo catalog, and geofence platform adapters.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `sqlite` - Durable key/value store via SeaORM on SQLite
//! - `auth` - JWT + bcrypt authentication

pub mod catalog;
pub mod clock;
pub mod geofence;
pub mod offline;
pub mod repository;
pub mod store;

#[cfg(feature = "auth")]
pub mod auth;

// Re-exports - In-Memory
pub use catalog::MockCatalog;
pub use clock::{ManualClock, SystemClock};
pub use geofence::{ChannelPositionWatcher, TracingNotifier};
pub use offline::{DEFAULT_API_TTL, Fetched, OfflineCache, OfflineError};
pub use repository::{InMemoryUserRepository, mask_email};
pub use store::InMemoryStore;

#[cfg(feature = "sqlite")]
pub use store::{SqliteConfig, SqliteStore};

#[cfg(feature = "auth")]
pub use auth::{BcryptPasswordService, JwtConfig, JwtTokenService};
