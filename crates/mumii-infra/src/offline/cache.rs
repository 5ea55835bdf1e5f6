//! Offline cache - favorites, saved restaurants and itineraries, and
//! TTL-bounded API response snapshots on top of a [`KeyValueStore`].

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;

use mumii_core::domain::{ApiCacheEntry, CachedItinerary, CachedRestaurant};
use mumii_core::ports::{Clock, KeyValueStore, StorageError, collections};

use crate::clock::SystemClock;

/// Default lifetime of a cached API response.
pub const DEFAULT_API_TTL: Duration = Duration::from_secs(5 * 60);

const FAVORITES_KEY: &str = "favorites";

/// Offline cache errors.
#[derive(Debug, thiserror::Error)]
pub enum OfflineError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("No internet connection and no cached data available: {0}")]
    Unavailable(String),
}

/// Slot in the `user_data` collection.
#[derive(Debug, Serialize, Deserialize)]
struct UserDataRecord {
    key: String,
    value: Value,
}

/// Result of an offline-aware fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub data: T,
    pub from_cache: bool,
}

/// Local-first cache shared by everything that needs offline data.
///
/// Owns its store handle; construct one per process and pass it around.
#[derive(Clone)]
pub struct OfflineCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl OfflineCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// The underlying store, for direct collection access.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    // --- API response cache -------------------------------------------------

    /// Store a response snapshot for `url`, replacing any previous one.
    pub async fn cache_api_response(
        &self,
        url: &str,
        payload: Value,
        ttl: Duration,
    ) -> Result<(), StorageError> {
        let entry = ApiCacheEntry::new(
            url,
            payload,
            self.clock.now_millis(),
            ttl.as_millis() as i64,
        );
        self.store
            .put(collections::API_CACHE, serde_json::to_value(entry)?)
            .await
    }

    /// Cached payload for `url` if still fresh. Expired entries are evicted.
    pub async fn get_cached_api_response(&self, url: &str) -> Result<Option<Value>, StorageError> {
        let Some(record) = self.store.get(collections::API_CACHE, url).await? else {
            return Ok(None);
        };

        let entry: ApiCacheEntry = serde_json::from_value(record)?;
        if entry.is_fresh(self.clock.now_millis()) {
            return Ok(Some(entry.data));
        }

        tracing::debug!(url = %url, "Evicting expired API cache entry");
        self.store.delete(collections::API_CACHE, url).await?;
        Ok(None)
    }

    /// Remove every expired API cache entry; returns how many were removed.
    pub async fn clean_expired_cache(&self) -> Result<usize, StorageError> {
        let now = self.clock.now_millis();
        let mut removed = 0;

        for record in self.store.get_all(collections::API_CACHE).await? {
            let entry: ApiCacheEntry = serde_json::from_value(record)?;
            if !entry.is_fresh(now) {
                self.store.delete(collections::API_CACHE, &entry.url).await?;
                removed += 1;
            }
        }

        Ok(removed)
    }

    /// Sweep expired entries every `period` on the current tokio runtime.
    pub fn spawn_sweeper(&self, period: Duration) -> JoinHandle<()> {
        let cache = self.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The first tick completes immediately.
            interval.tick().await;

            loop {
                interval.tick().await;
                match cache.clean_expired_cache().await {
                    Ok(0) => {}
                    Ok(removed) => tracing::debug!(removed, "Swept expired API cache entries"),
                    Err(e) => tracing::warn!(error = %e, "API cache sweep failed"),
                }
            }
        })
    }

    /// Offline-first fetch: a fresh cached payload wins, otherwise the
    /// fetcher runs and its result is cached for `ttl`.
    ///
    /// Cache read/write failures are logged and skipped; only a failing
    /// fetcher with nothing cached is an error.
    pub async fn fetch_with_cache<T, E, F, Fut>(
        &self,
        url: &str,
        ttl: Duration,
        fetcher: F,
    ) -> Result<Fetched<T>, OfflineError>
    where
        T: Serialize + DeserializeOwned,
        E: Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.get_cached_api_response(url).await {
            Ok(Some(payload)) => match serde_json::from_value(payload) {
                Ok(data) => {
                    return Ok(Fetched {
                        data,
                        from_cache: true,
                    });
                }
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Ignoring undecodable cache entry")
                }
            },
            Ok(None) => {}
            Err(e) => tracing::warn!(url = %url, error = %e, "API cache read failed"),
        }

        let data = fetcher()
            .await
            .map_err(|e| OfflineError::Unavailable(e.to_string()))?;

        match serde_json::to_value(&data) {
            Ok(payload) => {
                if let Err(e) = self.cache_api_response(url, payload, ttl).await {
                    tracing::warn!(url = %url, error = %e, "API cache write failed");
                }
            }
            Err(e) => tracing::warn!(url = %url, error = %e, "Response not cacheable"),
        }

        Ok(Fetched {
            data,
            from_cache: false,
        })
    }

    // --- User data ----------------------------------------------------------

    pub async fn set_user_data<T: Serialize>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let record = UserDataRecord {
            key: key.to_string(),
            value: serde_json::to_value(value)?,
        };
        self.store
            .put(collections::USER_DATA, serde_json::to_value(record)?)
            .await
    }

    pub async fn get_user_data<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        match self.store.get(collections::USER_DATA, key).await? {
            Some(record) => {
                let record: UserDataRecord = serde_json::from_value(record)?;
                Ok(Some(serde_json::from_value(record.value)?))
            }
            None => Ok(None),
        }
    }

    // --- Favorites ----------------------------------------------------------

    /// Add or replace a favorite (matched by id); the saved record moves to the end.
    pub async fn save_favorite_restaurant(
        &self,
        restaurant: CachedRestaurant,
    ) -> Result<(), StorageError> {
        let mut favorites = self.get_favorite_restaurants().await?;
        favorites.retain(|r| r.id != restaurant.id);
        favorites.push(restaurant);
        self.set_user_data(FAVORITES_KEY, &favorites).await
    }

    pub async fn remove_favorite_restaurant(
        &self,
        restaurant_id: &str,
    ) -> Result<(), StorageError> {
        let mut favorites = self.get_favorite_restaurants().await?;
        favorites.retain(|r| r.id != restaurant_id);
        self.set_user_data(FAVORITES_KEY, &favorites).await
    }

    pub async fn get_favorite_restaurants(&self) -> Result<Vec<CachedRestaurant>, StorageError> {
        Ok(self
            .get_user_data::<Vec<CachedRestaurant>>(FAVORITES_KEY)
            .await?
            .unwrap_or_default())
    }

    pub async fn is_favorite(&self, restaurant_id: &str) -> Result<bool, StorageError> {
        Ok(self
            .get_favorite_restaurants()
            .await?
            .iter()
            .any(|r| r.id == restaurant_id))
    }

    // --- Saved restaurants and itineraries ---------------------------------

    /// Persist a restaurant for offline browsing, marking it as cached.
    pub async fn cache_restaurant(
        &self,
        mut restaurant: CachedRestaurant,
    ) -> Result<(), StorageError> {
        restaurant.cached = true;
        self.store
            .put(collections::RESTAURANTS, serde_json::to_value(restaurant)?)
            .await
    }

    pub async fn cached_restaurants(&self) -> Result<Vec<CachedRestaurant>, StorageError> {
        decode_all(self.store.get_all(collections::RESTAURANTS).await?)
    }

    pub async fn clear_cached_restaurants(&self) -> Result<(), StorageError> {
        self.store.clear(collections::RESTAURANTS).await
    }

    pub async fn save_itinerary(&self, itinerary: &CachedItinerary) -> Result<(), StorageError> {
        self.store
            .put(collections::ITINERARIES, serde_json::to_value(itinerary)?)
            .await
    }

    pub async fn itineraries(&self) -> Result<Vec<CachedItinerary>, StorageError> {
        decode_all(self.store.get_all(collections::ITINERARIES).await?)
    }

    pub async fn remove_itinerary(&self, id: &str) -> Result<(), StorageError> {
        self.store.delete(collections::ITINERARIES, id).await
    }
}

fn decode_all<T: DeserializeOwned>(records: Vec<Value>) -> Result<Vec<T>, StorageError> {
    records
        .into_iter()
        .map(|r| serde_json::from_value(r).map_err(StorageError::from))
        .collect()
}
