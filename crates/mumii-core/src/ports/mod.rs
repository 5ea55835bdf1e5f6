//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod clock;
mod location;
mod repository;
mod store;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use clock::Clock;
pub use location::{Notifier, Permission, PositionStream, PositionUpdate, PositionWatcher};
pub use repository::UserRepository;
pub use store::{
    CollectionDef, KeyValueStore, Record, StorageError, StoreSchema, collections,
};
