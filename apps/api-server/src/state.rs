//! Application state - shared across all handlers.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use mumii_core::ports::{AuthError, PasswordService, TokenService, UserRepository};
use mumii_infra::{BcryptPasswordService, InMemoryUserRepository, JwtTokenService, MockCatalog};

use crate::config::AppConfig;

/// A browser push subscription registered through the API.
#[derive(Debug, Clone)]
pub struct PushSubscription {
    pub user_id: Option<String>,
    pub subscription: Value,
}

impl PushSubscription {
    pub fn endpoint(&self) -> Option<&str> {
        self.subscription.get("endpoint").and_then(Value::as_str)
    }

    /// Same browser registration: matching endpoints, or matching user ids
    /// when the new subscription carries no endpoint.
    fn supersedes(&self, existing: &PushSubscription) -> bool {
        match self.endpoint() {
            Some(endpoint) => existing.endpoint() == Some(endpoint),
            None => self.user_id.is_some() && existing.user_id == self.user_id,
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub catalog: Arc<MockCatalog>,
    pub subscriptions: Arc<RwLock<Vec<PushSubscription>>>,
}

impl AppState {
    /// Build the application state. Demo accounts are hashed with the
    /// configured bcrypt cost, so this is slow at cost 12.
    pub fn new(config: &AppConfig) -> Result<Self, AuthError> {
        let passwords = Arc::new(BcryptPasswordService::with_cost(config.bcrypt_cost));
        let users = Arc::new(InMemoryUserRepository::seeded(passwords.as_ref())?);
        let tokens = Arc::new(JwtTokenService::new(config.jwt.clone()));

        tracing::info!(bcrypt_cost = config.bcrypt_cost, "Application state initialized");

        Ok(Self {
            users,
            tokens,
            passwords,
            catalog: Arc::new(MockCatalog::default()),
            subscriptions: Arc::new(RwLock::new(Vec::new())),
        })
    }

    /// Record a push subscription, replacing an earlier registration of the
    /// same browser. Returns the number of stored subscriptions.
    pub async fn save_subscription(&self, subscription: PushSubscription) -> usize {
        let mut subscriptions = self.subscriptions.write().await;
        subscriptions.retain(|existing| !subscription.supersedes(existing));
        subscriptions.push(subscription);
        subscriptions.len()
    }
}
