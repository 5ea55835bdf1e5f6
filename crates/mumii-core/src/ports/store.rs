//! Key/value store port - named collections of JSON records.

use async_trait::async_trait;
use serde_json::Value;

/// A stored record: a JSON object carrying its own key.
pub type Record = Value;

/// Collection names of the Mumii offline cache.
pub mod collections {
    pub const RESTAURANTS: &str = "restaurants";
    pub const ITINERARIES: &str = "itineraries";
    pub const CHALLENGES: &str = "challenges";
    pub const USER_DATA: &str = "user_data";
    pub const API_CACHE: &str = "api_cache";
}

/// Key/value store trait - abstraction over storage backends (SQLite, in-memory).
///
/// "Not found" is never an error; errors mean the backend failed or the
/// request does not fit the schema.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Insert or overwrite a record, keyed by the collection's key path.
    async fn put(&self, collection: &str, record: Record) -> Result<(), StorageError>;

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Record>, StorageError>;

    /// Every record of the collection, in key order.
    async fn get_all(&self, collection: &str) -> Result<Vec<Record>, StorageError>;

    /// Remove a record. Absent keys are fine.
    async fn delete(&self, collection: &str, key: &str) -> Result<(), StorageError>;

    async fn clear(&self, collection: &str) -> Result<(), StorageError>;
}

/// One named collection and the record field that holds its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDef {
    pub name: String,
    pub key_path: String,
}

impl CollectionDef {
    pub fn new(name: impl Into<String>, key_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_path: key_path.into(),
        }
    }

    /// Extract the key of a record. Strings are used as-is, numbers are
    /// rendered in decimal.
    pub fn key_of(&self, record: &Record) -> Result<String, StorageError> {
        match record.get(&self.key_path) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(StorageError::MissingKey {
                collection: self.name.clone(),
                key_path: self.key_path.clone(),
            }),
        }
    }
}

/// Versioned store layout.
///
/// Opening a store with a higher version than the persisted one creates the
/// missing collections and leaves existing ones untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSchema {
    pub name: String,
    pub version: u32,
    pub collections: Vec<CollectionDef>,
}

impl StoreSchema {
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
            collections: Vec::new(),
        }
    }

    pub fn with_collection(mut self, name: &str, key_path: &str) -> Self {
        self.collections.push(CollectionDef::new(name, key_path));
        self
    }

    pub fn collection(&self, name: &str) -> Option<&CollectionDef> {
        self.collections.iter().find(|c| c.name == name)
    }
}

impl Default for StoreSchema {
    fn default() -> Self {
        Self::new("MumiiCache", 1)
            .with_collection(collections::RESTAURANTS, "id")
            .with_collection(collections::ITINERARIES, "id")
            .with_collection(collections::CHALLENGES, "id")
            .with_collection(collections::USER_DATA, "key")
            .with_collection(collections::API_CACHE, "url")
    }
}

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to open store: {0}")]
    Open(String),

    #[error("Store is at version {stored}, cannot open at older version {requested}")]
    VersionConflict { stored: u32, requested: u32 },

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Record for '{collection}' has no usable key at '{key_path}'")]
    MissingKey { collection: String, key_path: String },

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_schema_collections() {
        let schema = StoreSchema::default();
        assert_eq!(schema.version, 1);
        assert_eq!(schema.collections.len(), 5);
        assert_eq!(schema.collection("api_cache").unwrap().key_path, "url");
        assert_eq!(schema.collection("user_data").unwrap().key_path, "key");
        assert!(schema.collection("sessions").is_none());
    }

    #[test]
    fn test_key_of() {
        let def = CollectionDef::new("restaurants", "id");
        assert_eq!(def.key_of(&json!({"id": "7"})).unwrap(), "7");
        assert_eq!(def.key_of(&json!({"id": 7})).unwrap(), "7");
        assert!(matches!(
            def.key_of(&json!({"name": "no id"})),
            Err(StorageError::MissingKey { .. })
        ));
        assert!(def.key_of(&json!({"id": null})).is_err());
    }
}
