use async_trait::async_trait;

use crate::domain::{FavoriteChange, NewUser, User};
use crate::error::RepoError;

/// User storage. Implementations must keep email unique and apply each
/// favorites change atomically.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepoError>;

    /// Exact, case-sensitive email lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Insert a new user and assign its id.
    /// Fails with [`RepoError::Constraint`] if the email is taken.
    async fn insert(&self, user: NewUser) -> Result<User, RepoError>;

    /// Apply a favorites change and return the resulting list.
    /// Fails with [`RepoError::NotFound`] if the user does not exist.
    async fn update_favorites(
        &self,
        id: &str,
        change: FavoriteChange,
    ) -> Result<Vec<String>, RepoError>;
}
