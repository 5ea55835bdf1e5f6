//! SQLite key/value store via SeaORM.
//!
//! All collections share one table keyed by `(collection, key)`; the set of
//! collections and the schema version live alongside the data so a later
//! schema version can add collections without touching existing records.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Statement,
    TransactionTrait, Value,
};
use tokio::sync::OnceCell;

use mumii_core::ports::{CollectionDef, KeyValueStore, Record, StorageError, StoreSchema};

const SCHEMA_DDL: [&str; 3] = [
    "CREATE TABLE IF NOT EXISTS store_meta (
        name TEXT PRIMARY KEY,
        version INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS store_collections (
        name TEXT PRIMARY KEY,
        key_path TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS store_records (
        collection TEXT NOT NULL,
        key TEXT NOT NULL,
        value TEXT NOT NULL,
        PRIMARY KEY (collection, key)
    )",
];

/// SQLite store configuration.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// SQLx connection URL, e.g. `sqlite://mumii-cache.db?mode=rwc`.
    pub url: String,
    pub connect_timeout: Duration,
}

impl SqliteConfig {
    /// Database file at `path`, created if missing.
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path.as_ref().display()),
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Private in-memory database, gone when the store is dropped.
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let path =
            std::env::var("MUMII_CACHE_PATH").unwrap_or_else(|_| "mumii-cache.db".to_string());
        Self::file(path)
    }
}

struct Opened {
    db: DatabaseConnection,
    collections: HashMap<String, CollectionDef>,
}

/// Durable store backed by a single SQLite connection.
///
/// The connection is opened on first use and reused afterwards. One pooled
/// connection means write transactions are serialized.
pub struct SqliteStore {
    config: SqliteConfig,
    schema: StoreSchema,
    opened: OnceCell<Opened>,
}

fn db_err(e: DbErr) -> StorageError {
    StorageError::Transaction(e.to_string())
}

fn stmt(sql: &str, values: Vec<Value>) -> Statement {
    Statement::from_sql_and_values(DbBackend::Sqlite, sql, values)
}

impl SqliteStore {
    /// Create a store that opens lazily on the first operation.
    pub fn new(config: SqliteConfig, schema: StoreSchema) -> Self {
        Self {
            config,
            schema,
            opened: OnceCell::new(),
        }
    }

    /// Create a store and open it right away, surfacing open errors early.
    pub async fn open(config: SqliteConfig, schema: StoreSchema) -> Result<Self, StorageError> {
        let store = Self::new(config, schema);
        store.connection().await?;
        Ok(store)
    }

    /// Close the underlying connection if it was opened.
    pub async fn close(self) -> Result<(), StorageError> {
        match self.opened.into_inner() {
            Some(opened) => opened.db.close().await.map_err(db_err),
            None => Ok(()),
        }
    }

    async fn connection(&self) -> Result<&Opened, StorageError> {
        // A failed open leaves the cell empty, so the next call retries.
        self.opened
            .get_or_try_init(|| Self::connect(&self.config, &self.schema))
            .await
    }

    async fn connect(config: &SqliteConfig, schema: &StoreSchema) -> Result<Opened, StorageError> {
        let options = ConnectOptions::new(&config.url)
            .max_connections(1)
            .min_connections(1)
            .connect_timeout(config.connect_timeout)
            .sqlx_logging(false)
            .to_owned();

        let db = Database::connect(options)
            .await
            .map_err(|e| StorageError::Open(e.to_string()))?;

        let collections = Self::upgrade(&db, schema).await?;

        tracing::info!(
            store = %schema.name,
            version = schema.version,
            collections = collections.len(),
            "Opened SQLite store"
        );

        Ok(Opened { db, collections })
    }

    /// Bring the persisted schema up to `schema.version` and load the
    /// collection definitions.
    async fn upgrade(
        db: &DatabaseConnection,
        schema: &StoreSchema,
    ) -> Result<HashMap<String, CollectionDef>, StorageError> {
        for ddl in SCHEMA_DDL {
            db.execute_unprepared(ddl)
                .await
                .map_err(|e| StorageError::Open(e.to_string()))?;
        }

        let txn = db.begin().await.map_err(db_err)?;

        let stored = txn
            .query_one(stmt(
                "SELECT version FROM store_meta WHERE name = ?",
                vec![schema.name.clone().into()],
            ))
            .await
            .map_err(db_err)?
            .map(|row| row.try_get::<i64>("", "version"))
            .transpose()
            .map_err(db_err)?
            .map(|v| v as u32);

        match stored {
            Some(stored) if stored > schema.version => {
                return Err(StorageError::VersionConflict {
                    stored,
                    requested: schema.version,
                });
            }
            Some(stored) if stored == schema.version => {}
            _ => {
                for def in &schema.collections {
                    txn.execute(stmt(
                        "INSERT OR IGNORE INTO store_collections (name, key_path) VALUES (?, ?)",
                        vec![def.name.clone().into(), def.key_path.clone().into()],
                    ))
                    .await
                    .map_err(db_err)?;
                }

                txn.execute(stmt(
                    "INSERT INTO store_meta (name, version) VALUES (?, ?)
                     ON CONFLICT(name) DO UPDATE SET version = excluded.version",
                    vec![schema.name.clone().into(), i64::from(schema.version).into()],
                ))
                .await
                .map_err(db_err)?;

                tracing::info!(
                    store = %schema.name,
                    from = ?stored,
                    to = schema.version,
                    "Upgraded store schema"
                );
            }
        }

        txn.commit().await.map_err(db_err)?;

        let rows = db
            .query_all(stmt("SELECT name, key_path FROM store_collections", vec![]))
            .await
            .map_err(db_err)?;

        rows.into_iter()
            .map(|row| {
                let name: String = row.try_get("", "name").map_err(db_err)?;
                let key_path: String = row.try_get("", "key_path").map_err(db_err)?;
                Ok((name.clone(), CollectionDef::new(name, key_path)))
            })
            .collect()
    }

    async fn collection<'a>(
        &'a self,
        name: &str,
    ) -> Result<(&'a DatabaseConnection, &'a CollectionDef), StorageError> {
        let opened = self.connection().await?;
        let def = opened
            .collections
            .get(name)
            .ok_or_else(|| StorageError::UnknownCollection(name.to_string()))?;
        Ok((&opened.db, def))
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn put(&self, collection: &str, record: Record) -> Result<(), StorageError> {
        let (db, def) = self.collection(collection).await?;
        let key = def.key_of(&record)?;
        let value = serde_json::to_string(&record)?;

        db.execute(stmt(
            "INSERT INTO store_records (collection, key, value) VALUES (?, ?, ?)
             ON CONFLICT(collection, key) DO UPDATE SET value = excluded.value",
            vec![collection.into(), key.into(), value.into()],
        ))
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn get(&self, collection: &str, key: &str) -> Result<Option<Record>, StorageError> {
        let (db, _) = self.collection(collection).await?;

        let row = db
            .query_one(stmt(
                "SELECT value FROM store_records WHERE collection = ? AND key = ?",
                vec![collection.into(), key.into()],
            ))
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => {
                let value: String = row.try_get("", "value").map_err(db_err)?;
                Ok(Some(serde_json::from_str(&value)?))
            }
            None => Ok(None),
        }
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<Record>, StorageError> {
        let (db, _) = self.collection(collection).await?;

        let rows = db
            .query_all(stmt(
                "SELECT value FROM store_records WHERE collection = ? ORDER BY key",
                vec![collection.into()],
            ))
            .await
            .map_err(db_err)?;

        rows.into_iter()
            .map(|row| {
                let value: String = row.try_get("", "value").map_err(db_err)?;
                Ok(serde_json::from_str(&value)?)
            })
            .collect()
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StorageError> {
        let (db, _) = self.collection(collection).await?;

        db.execute(stmt(
            "DELETE FROM store_records WHERE collection = ? AND key = ?",
            vec![collection.into(), key.into()],
        ))
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn clear(&self, collection: &str) -> Result<(), StorageError> {
        let (db, _) = self.collection(collection).await?;

        db.execute(stmt(
            "DELETE FROM store_records WHERE collection = ?",
            vec![collection.into()],
        ))
        .await
        .map_err(db_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn memory_store() -> SqliteStore {
        SqliteStore::open(SqliteConfig::in_memory(), StoreSchema::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_round_trip() {
        let store = memory_store().await;
        let record = json!({
            "id": "1",
            "name": "Cơm Tấm Sài Gòn",
            "coordinates": {"lat": 21.0245, "lng": 105.8412},
            "features": ["grilled-pork"],
            "cached": true
        });

        store.put("restaurants", record.clone()).await.unwrap();

        assert_eq!(store.get("restaurants", "1").await.unwrap(), Some(record));
        assert_eq!(store.get("restaurants", "404").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_all_delete_clear() {
        let store = memory_store().await;
        store.put("itineraries", json!({"id": "b"})).await.unwrap();
        store.put("itineraries", json!({"id": "a"})).await.unwrap();
        store.put("itineraries", json!({"id": "a", "v": 2})).await.unwrap();

        let all = store.get_all("itineraries").await.unwrap();
        assert_eq!(all, vec![json!({"id": "a", "v": 2}), json!({"id": "b"})]);

        store.delete("itineraries", "a").await.unwrap();
        store.delete("itineraries", "a").await.unwrap();
        assert_eq!(store.get_all("itineraries").await.unwrap().len(), 1);

        store.clear("itineraries").await.unwrap();
        assert!(store.get_all("itineraries").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lazy_open_and_unknown_collection() {
        let store = SqliteStore::new(SqliteConfig::in_memory(), StoreSchema::default());
        assert!(store.opened.get().is_none());

        let result = store.get_all("sessions").await;

        assert!(matches!(result, Err(StorageError::UnknownCollection(_))));
        assert!(store.opened.get().is_some());
    }

    #[tokio::test]
    async fn test_open_failure_is_reported() {
        let config = SqliteConfig {
            url: "sqlite:///nonexistent-dir/mumii/cache.db?mode=ro".to_string(),
            connect_timeout: Duration::from_secs(1),
        };
        let store = SqliteStore::new(config, StoreSchema::default());

        assert!(matches!(
            store.get("restaurants", "1").await,
            Err(StorageError::Open(_))
        ));
    }

    #[tokio::test]
    async fn test_version_upgrade_keeps_existing_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");

        let v1 = StoreSchema::new("MumiiCache", 1).with_collection("restaurants", "id");
        let store = SqliteStore::open(SqliteConfig::file(&path), v1.clone())
            .await
            .unwrap();
        store.put("restaurants", json!({"id": "1"})).await.unwrap();
        assert!(store.get_all("api_cache").await.is_err());
        store.close().await.unwrap();

        let v2 = v1.clone().with_collection("api_cache", "url");
        let v2 = StoreSchema { version: 2, ..v2 };
        let store = SqliteStore::open(SqliteConfig::file(&path), v2).await.unwrap();
        assert_eq!(store.get_all("restaurants").await.unwrap().len(), 1);
        store
            .put("api_cache", json!({"url": "/api/health", "data": {}}))
            .await
            .unwrap();
        store.close().await.unwrap();

        let result = SqliteStore::open(SqliteConfig::file(&path), v1).await;
        assert!(matches!(
            result,
            Err(StorageError::VersionConflict {
                stored: 2,
                requested: 1
            })
        ));
    }
}
