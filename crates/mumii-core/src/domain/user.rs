use chrono::{DateTime, Utc};

/// User entity - an account of the Mumii API.
///
/// Not `Serialize`: the password hash must never reach a response body.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub avatar: String,
    pub favorites: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to register a user; the repository assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// A single mutation of a user's favorites list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoriteChange {
    Add(String),
    Remove(String),
}

/// Generated avatar URL for an email seed.
pub fn avatar_for(seed: &str) -> String {
    format!("https://api.dicebear.com/7.x/avataaars/svg?seed={seed}")
}

impl User {
    /// Build a user record from registration data.
    pub fn from_new(id: String, new_user: NewUser) -> Self {
        Self {
            id,
            avatar: avatar_for(&new_user.email),
            email: new_user.email,
            password_hash: new_user.password_hash,
            name: new_user.name,
            favorites: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Apply a favorites change. Adding a present id and removing an absent
    /// one both leave the list untouched.
    pub fn apply_favorite(&mut self, change: FavoriteChange) {
        match change {
            FavoriteChange::Add(id) => {
                if !self.favorites.contains(&id) {
                    self.favorites.push(id);
                }
            }
            FavoriteChange::Remove(id) => self.favorites.retain(|f| *f != id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::from_new(
            "7".to_string(),
            NewUser {
                name: "Linh".to_string(),
                email: "linh@mumii.com".to_string(),
                password_hash: "hash".to_string(),
            },
        )
    }

    #[test]
    fn test_avatar_seeded_by_email() {
        assert!(user().avatar.ends_with("seed=linh@mumii.com"));
    }

    #[test]
    fn test_add_favorite_deduplicates() {
        let mut user = user();
        user.apply_favorite(FavoriteChange::Add("1".to_string()));
        user.apply_favorite(FavoriteChange::Add("1".to_string()));
        assert_eq!(user.favorites, vec!["1".to_string()]);
    }

    #[test]
    fn test_add_then_remove_restores_list() {
        let mut user = user();
        user.apply_favorite(FavoriteChange::Add("3".to_string()));
        let before = user.favorites.clone();

        user.apply_favorite(FavoriteChange::Add("2".to_string()));
        user.apply_favorite(FavoriteChange::Remove("2".to_string()));
        assert_eq!(user.favorites, before);

        user.apply_favorite(FavoriteChange::Remove("missing".to_string()));
        assert_eq!(user.favorites, before);
    }
}
