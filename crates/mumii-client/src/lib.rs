//! # Mumii Client
//!
//! Offline-first HTTP client for the Mumii API. Catalog reads are served
//! from the local cache while fresh and fall back to it when the network
//! is down; favorites are written locally first and synced best-effort.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use mumii_core::domain::CachedRestaurant;
use mumii_core::ports::{KeyValueStore, StorageError, StoreSchema};
use mumii_infra::{DEFAULT_API_TTL, Fetched, InMemoryStore, OfflineCache, OfflineError};
use mumii_shared::ErrorResponse;
use mumii_shared::dto::{
    ChallengesResponse, FavoriteRequest, FavoritesResponse, HealthResponse, RestaurantQuery,
    RestaurantsResponse, SigninRequest, SigninResponse,
};

const SESSION_KEY: &str = "auth_token";

/// Client errors.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Offline(#[from] OfflineError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct MumiiClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// SQLite cache file; `None` keeps the cache in memory.
    pub cache_path: Option<String>,
    pub cache_ttl: Duration,
}

impl Default for MumiiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            timeout: Duration::from_secs(10),
            cache_path: None,
            cache_ttl: DEFAULT_API_TTL,
        }
    }
}

impl MumiiClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("MUMII_API_URL").unwrap_or(defaults.base_url),
            cache_path: std::env::var("MUMII_CACHE_PATH").ok(),
            ..defaults
        }
    }
}

/// Offline-first Mumii API client.
pub struct MumiiClient {
    http: Client,
    base_url: Url,
    cache: OfflineCache,
    cache_ttl: Duration,
    token: RwLock<Option<String>>,
}

impl MumiiClient {
    /// Client over an existing cache.
    pub fn new(config: MumiiClientConfig, cache: OfflineCache) -> Result<Self, ClientError> {
        let base_url =
            Url::parse(&config.base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url,
            cache,
            cache_ttl: config.cache_ttl,
            token: RwLock::new(None),
        })
    }

    /// Client with a cache built from the config: SQLite when a path is set
    /// (and the `sqlite` feature is on), memory otherwise.
    pub async fn open(config: MumiiClientConfig) -> Result<Self, ClientError> {
        let store = open_store(config.cache_path.as_deref()).await?;
        let client = Self::new(config, OfflineCache::new(store))?;
        client.restore_session().await?;
        Ok(client)
    }

    pub fn cache(&self) -> &OfflineCache {
        &self.cache
    }

    pub async fn is_signed_in(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Reload a token saved by an earlier [`MumiiClient::signin`].
    pub async fn restore_session(&self) -> Result<bool, ClientError> {
        // Signing out stores null rather than deleting the slot.
        let saved: Option<Option<String>> = self.cache.get_user_data(SESSION_KEY).await?;
        let saved = saved.flatten();
        let restored = saved.is_some();
        *self.token.write().await = saved;
        Ok(restored)
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let url = self.endpoint("/api/health")?;
        self.send(Method::GET, url, None::<&()>).await
    }

    /// Restaurant listing, cached per full URL.
    pub async fn restaurants(
        &self,
        query: &RestaurantQuery,
    ) -> Result<Fetched<RestaurantsResponse>, ClientError> {
        let mut url = self.endpoint("/api/restaurants")?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(mood) = &query.mood {
                pairs.append_pair("mood", mood);
            }
            if let Some(cuisine) = &query.cuisine {
                pairs.append_pair("cuisine", cuisine);
            }
            if let Some(radius) = query.radius {
                pairs.append_pair("radius", &radius.to_string());
            }
            if let Some(lat) = query.lat {
                pairs.append_pair("lat", &lat.to_string());
            }
            if let Some(lng) = query.lng {
                pairs.append_pair("lng", &lng.to_string());
            }
        }
        strip_empty_query(&mut url);

        self.cached_get(url).await
    }

    /// Challenge listing, cached per full URL.
    pub async fn challenges(
        &self,
        status: Option<&str>,
    ) -> Result<Fetched<ChallengesResponse>, ClientError> {
        let mut url = self.endpoint("/api/challenges")?;
        if let Some(status) = status {
            url.query_pairs_mut().append_pair("status", status);
        }

        self.cached_get(url).await
    }

    /// Sign in and keep the token for later favorites syncs.
    pub async fn signin(&self, email: &str, password: &str) -> Result<SigninResponse, ClientError> {
        let url = self.endpoint("/api/auth/signin")?;
        let body = SigninRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        };

        let response: SigninResponse = self.send(Method::POST, url, Some(&body)).await?;

        self.cache.set_user_data(SESSION_KEY, &response.token).await?;
        *self.token.write().await = Some(response.token.clone());
        tracing::info!(user_id = %response.user.id, "Signed in");

        Ok(response)
    }

    pub async fn signout(&self) -> Result<(), ClientError> {
        *self.token.write().await = None;
        self.cache
            .set_user_data(SESSION_KEY, &Option::<String>::None)
            .await?;
        Ok(())
    }

    /// Save a favorite locally, then sync it to the account if signed in.
    /// A failed sync is logged; the local write stands.
    pub async fn add_favorite(&self, restaurant: CachedRestaurant) -> Result<(), ClientError> {
        let id = restaurant.id.clone();
        self.cache.save_favorite_restaurant(restaurant).await?;

        if self.is_signed_in().await {
            let body = FavoriteRequest {
                restaurant_id: Some(id.clone()),
            };
            let result = match self.endpoint("/api/user/favorites") {
                Ok(url) => {
                    self.send::<FavoritesResponse, _>(Method::POST, url, Some(&body))
                        .await
                }
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                tracing::warn!(
                    restaurant_id = %id,
                    error = %e,
                    "Favorite saved locally, sync failed"
                );
            }
        }

        Ok(())
    }

    /// Remove a favorite locally, then from the account if signed in.
    pub async fn remove_favorite(&self, restaurant_id: &str) -> Result<(), ClientError> {
        self.cache.remove_favorite_restaurant(restaurant_id).await?;

        if self.is_signed_in().await {
            let path = format!("/api/user/favorites/{restaurant_id}");
            let result = match self.endpoint(&path) {
                Ok(url) => {
                    self.send::<FavoritesResponse, ()>(Method::DELETE, url, None)
                        .await
                }
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                tracing::warn!(
                    restaurant_id = %restaurant_id,
                    error = %e,
                    "Favorite removed locally, sync failed"
                );
            }
        }

        Ok(())
    }

    /// Locally saved favorites; empty if the cache cannot be read.
    pub async fn favorites(&self) -> Vec<CachedRestaurant> {
        self.cache
            .get_favorite_restaurants()
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Could not read cached favorites");
                Vec::new()
            })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))
    }

    async fn cached_get<T>(&self, url: Url) -> Result<Fetched<T>, ClientError>
    where
        T: Serialize + DeserializeOwned,
    {
        let key = url.to_string();
        let fetched = self
            .cache
            .fetch_with_cache(&key, self.cache_ttl, || {
                self.send::<T, ()>(Method::GET, url, None)
            })
            .await?;

        if fetched.from_cache {
            tracing::debug!(url = %key, "Served from offline cache");
        }
        Ok(fetched)
    }

    async fn send<T, B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(token) = self.token.read().await.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => status.canonical_reason().unwrap_or("Unknown error").to_string(),
            };
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

fn strip_empty_query(url: &mut Url) {
    if url.query() == Some("") {
        url.set_query(None);
    }
}

#[cfg(feature = "sqlite")]
async fn open_store(path: Option<&str>) -> Result<Arc<dyn KeyValueStore>, ClientError> {
    use mumii_infra::{SqliteConfig, SqliteStore};

    match path {
        Some(path) => {
            let store = SqliteStore::open(SqliteConfig::file(path), StoreSchema::default()).await?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(InMemoryStore::new(&StoreSchema::default()))),
    }
}

#[cfg(not(feature = "sqlite"))]
async fn open_store(path: Option<&str>) -> Result<Arc<dyn KeyValueStore>, ClientError> {
    if path.is_some() {
        tracing::warn!("Built without sqlite support, cache path ignored");
    }
    Ok(Arc::new(InMemoryStore::new(&StoreSchema::default())))
}
