//! Application configuration loaded from environment variables.

use std::env;

use mumii_infra::{BcryptPasswordService, JwtConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Browser origin allowed to call the API with credentials.
    pub frontend_url: String,
    pub jwt: JwtConfig,
    /// Bcrypt work factor for account passwords.
    pub bcrypt_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            frontend_url: "http://localhost:3000".to_string(),
            jwt: JwtConfig::default(),
            bcrypt_cost: BcryptPasswordService::DEFAULT_COST,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            frontend_url: env::var("FRONTEND_URL")
                .ok()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.frontend_url),
            jwt: JwtConfig::from_env(),
            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|c| c.parse().ok())
                .filter(|c| (4..=31).contains(c))
                .unwrap_or(defaults.bcrypt_cost),
        }
    }
}
