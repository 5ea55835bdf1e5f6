//! In-memory key/value store - used in tests and when no durable path is configured.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use mumii_core::ports::{CollectionDef, KeyValueStore, Record, StorageError, StoreSchema};

struct Collection {
    def: CollectionDef,
    records: BTreeMap<String, Record>,
}

/// In-memory store using a map of collections behind an async RwLock.
///
/// Note: Data is lost on process restart.
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryStore {
    pub fn new(schema: &StoreSchema) -> Self {
        let collections = schema
            .collections
            .iter()
            .map(|def| {
                (
                    def.name.clone(),
                    Collection {
                        def: def.clone(),
                        records: BTreeMap::new(),
                    },
                )
            })
            .collect();

        Self {
            collections: RwLock::new(collections),
        }
    }

    fn unknown(collection: &str) -> StorageError {
        StorageError::UnknownCollection(collection.to_string())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(&StoreSchema::default())
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn put(&self, collection: &str, record: Record) -> Result<(), StorageError> {
        let mut store = self.collections.write().await;
        let target = store
            .get_mut(collection)
            .ok_or_else(|| Self::unknown(collection))?;

        let key = target.def.key_of(&record)?;
        target.records.insert(key, record);
        Ok(())
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Record>, StorageError> {
        let store = self.collections.read().await;
        let target = store
            .get(collection)
            .ok_or_else(|| Self::unknown(collection))?;

        Ok(target.records.get(key).cloned())
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<Record>, StorageError> {
        let store = self.collections.read().await;
        let target = store
            .get(collection)
            .ok_or_else(|| Self::unknown(collection))?;

        Ok(target.records.values().cloned().collect())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StorageError> {
        let mut store = self.collections.write().await;
        let target = store
            .get_mut(collection)
            .ok_or_else(|| Self::unknown(collection))?;

        target.records.remove(key);
        Ok(())
    }

    async fn clear(&self, collection: &str) -> Result<(), StorageError> {
        let mut store = self.collections.write().await;
        let target = store
            .get_mut(collection)
            .ok_or_else(|| Self::unknown(collection))?;

        target.records.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_put_and_get() {
        let store = InMemoryStore::default();
        let record = json!({"id": "1", "name": "Bánh Mì Phượng", "tags": ["street-food"]});

        store.put("restaurants", record.clone()).await.unwrap();

        assert_eq!(store.get("restaurants", "1").await.unwrap(), Some(record));
        assert_eq!(store.get("restaurants", "2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = InMemoryStore::default();
        store.put("challenges", json!({"id": "1", "progress": 0})).await.unwrap();
        store.put("challenges", json!({"id": "1", "progress": 60})).await.unwrap();

        let all = store.get_all("challenges").await.unwrap();
        assert_eq!(all, vec![json!({"id": "1", "progress": 60})]);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryStore::default();
        store.put("user_data", json!({"key": "k", "value": 1})).await.unwrap();

        store.delete("user_data", "k").await.unwrap();
        store.delete("user_data", "k").await.unwrap();

        assert_eq!(store.get("user_data", "k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_only_touches_one_collection() {
        let store = InMemoryStore::default();
        store.put("restaurants", json!({"id": "1"})).await.unwrap();
        store.put("itineraries", json!({"id": "1"})).await.unwrap();

        store.clear("restaurants").await.unwrap();

        assert!(store.get_all("restaurants").await.unwrap().is_empty());
        assert_eq!(store.get_all("itineraries").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_collection_and_missing_key() {
        let store = InMemoryStore::default();

        assert!(matches!(
            store.get("sessions", "x").await,
            Err(StorageError::UnknownCollection(_))
        ));
        assert!(matches!(
            store.put("api_cache", json!({"data": 1})).await,
            Err(StorageError::MissingKey { .. })
        ));
    }
}
