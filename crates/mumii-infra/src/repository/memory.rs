//! In-memory user repository.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::RwLock;

use mumii_core::domain::{FavoriteChange, NewUser, User, avatar_for};
use mumii_core::error::RepoError;
use mumii_core::ports::{AuthError, PasswordService, UserRepository};

use super::mask_email;

/// Password of both demo accounts.
pub const DEMO_PASSWORD: &str = "password123";

struct Users {
    rows: Vec<User>,
    next_id: u64,
}

/// User repository backed by a vector behind an async RwLock.
///
/// Ids are assigned sequentially ("1", "2", ...). Every mutation runs
/// inside one write-lock section, so concurrent favorites updates never
/// lose each other's changes.
pub struct InMemoryUserRepository {
    users: RwLock<Users>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::from_users(Vec::new())
    }

    /// Repository pre-populated with the demo accounts `user@mumii.com`
    /// and `foodie@mumii.com`, hashed with the given service.
    pub fn seeded(passwords: &dyn PasswordService) -> Result<Self, AuthError> {
        let hash = passwords.hash(DEMO_PASSWORD)?;

        let users = vec![
            demo_user("1", "user@mumii.com", "John Doe", "john", &[], &hash, day(1)),
            demo_user(
                "2",
                "foodie@mumii.com",
                "Jane Smith",
                "jane",
                &["1", "3"],
                &hash,
                day(2),
            ),
        ];

        Ok(Self::from_users(users))
    }

    fn from_users(rows: Vec<User>) -> Self {
        let next_id = rows
            .iter()
            .filter_map(|u| u.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            users: RwLock::new(Users { rows, next_id }),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn day(n: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, n, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn demo_user(
    id: &str,
    email: &str,
    name: &str,
    avatar_seed: &str,
    favorites: &[&str],
    password_hash: &str,
    created_at: DateTime<Utc>,
) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        name: name.to_string(),
        avatar: avatar_for(avatar_seed),
        favorites: favorites.iter().map(|f| f.to_string()).collect(),
        created_at,
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.rows.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let users = self.users.read().await;
        Ok(users.rows.iter().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        if users.rows.iter().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("email already registered".to_string()));
        }

        let id = users.next_id.to_string();
        users.next_id += 1;

        let created = User::from_new(id, user);
        users.rows.push(created.clone());

        tracing::debug!(user_id = %created.id, "User inserted");
        Ok(created)
    }

    async fn update_favorites(
        &self,
        id: &str,
        change: FavoriteChange,
    ) -> Result<Vec<String>, RepoError> {
        let mut users = self.users.write().await;
        let user = users
            .rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RepoError::NotFound)?;

        user.apply_favorite(change);
        Ok(user.favorites.clone())
    }
}
