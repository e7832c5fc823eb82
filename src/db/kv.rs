use async_trait::async_trait;
use serde_json::Value;
use sqlx::{Pool, Postgres, Row};
use std::fmt;
use tracing::debug;

/// Errors surfaced by the key-value substrate
#[derive(Debug)]
pub enum StoreError {
    /// Underlying database operation failed
    Database(sqlx::Error),

    /// Stored value did not match the expected record shape
    Serialization(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Database(e) => write!(f, "Database error: {}", e),
            StoreError::Serialization(e) => write!(f, "Stored value error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e)
    }
}

/// Generic key-value persistence consumed by the entity repositories.
///
/// Every entity and index list lives behind this trait, keyed by strings
/// of the shape `<entityKind>:<id>` or `<ownerKind>:<ownerId>:<relation>`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored at `key`, if any
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Store `value` at `key`, replacing any previous value
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Fetch the values for `keys`, preserving request order.
    /// Keys with no stored value are skipped.
    async fn mget(&self, keys: &[String]) -> Result<Vec<Value>, StoreError>;

    /// Fetch every (key, value) pair whose key starts with `prefix`
    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, StoreError>;

    /// Append `element` to the JSON array stored at `key`, creating the
    /// array if the key is absent. Must be atomic per key: concurrent
    /// appends may not lose elements.
    async fn append_to_list(&self, key: &str, element: &str) -> Result<(), StoreError>;
}

/// Read an index list (a JSON array of entity ids). An absent key is an
/// empty index.
pub async fn read_id_list(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<String>, StoreError> {
    match store.get(key).await? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(Vec::new()),
    }
}

/// Postgres-backed store over the single `kv_store` table
pub struct PgKvStore {
    pool: Pool<Postgres>,
}

impl PgKvStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueStore for PgKvStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        debug!("kv get: key={}", key);

        let row = sqlx::query("SELECT value FROM kv_store WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get::<Value, _>("value")))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        debug!("kv set: key={}", key);

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE
            SET value = EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Value>, StoreError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        debug!("kv mget: {} keys", keys.len());

        let rows = sqlx::query("SELECT key, value FROM kv_store WHERE key = ANY($1)")
            .bind(keys)
            .fetch_all(&self.pool)
            .await?;

        let mut found: std::collections::HashMap<String, Value> = rows
            .into_iter()
            .map(|r| (r.get::<String, _>("key"), r.get::<Value, _>("value")))
            .collect();

        // ANY($1) returns rows in storage order; callers expect request order
        Ok(keys.iter().filter_map(|k| found.remove(k)).collect())
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, StoreError> {
        debug!("kv prefix scan: prefix={}", prefix);

        let rows = sqlx::query("SELECT key, value FROM kv_store WHERE key LIKE $1 || '%'")
            .bind(prefix)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| (r.get::<String, _>("key"), r.get::<Value, _>("value")))
            .collect())
    }

    async fn append_to_list(&self, key: &str, element: &str) -> Result<(), StoreError> {
        debug!("kv append: key={}", key);

        // Single-statement JSONB concat keeps concurrent appends from
        // losing elements; there is no read-modify-write on index lists.
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO UPDATE
            SET value = kv_store.value || EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(key)
        .bind(Value::Array(vec![Value::String(element.to_string())]))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

/// In-memory store used by the unit tests
#[cfg(test)]
pub struct MemoryKv {
    entries: std::sync::Mutex<std::collections::BTreeMap<String, Value>>,
}

#[cfg(test)]
impl MemoryKv {
    pub fn new() -> Self {
        Self {
            entries: std::sync::Mutex::new(std::collections::BTreeMap::new()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl KeyValueStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Value>, StoreError> {
        let entries = self.entries.lock().unwrap();
        Ok(keys.iter().filter_map(|k| entries.get(k).cloned()).collect())
    }

    async fn get_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Value)>, StoreError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    async fn append_to_list(&self, key: &str, element: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        let list = entries
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match list {
            Value::Array(items) => items.push(Value::String(element.to_string())),
            _ => *list = Value::Array(vec![Value::String(element.to_string())]),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn prefix_scan_returns_only_matching_keys() {
        let store = MemoryKv::new();
        store.set("job:1", json!({"id": "1"})).await.unwrap();
        store.set("job:2", json!({"id": "2"})).await.unwrap();
        store.set("user:9", json!({"id": "9"})).await.unwrap();

        let jobs = store.get_by_prefix("job:").await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert!(jobs.iter().all(|(k, _)| k.starts_with("job:")));
    }

    #[tokio::test]
    async fn append_creates_then_extends_list() {
        let store = MemoryKv::new();
        store.append_to_list("job:1:applicants", "a").await.unwrap();
        store.append_to_list("job:1:applicants", "b").await.unwrap();

        let list = store.get("job:1:applicants").await.unwrap().unwrap();
        assert_eq!(list, json!(["a", "b"]));
    }

    #[tokio::test]
    async fn mget_preserves_order_and_skips_missing() {
        let store = MemoryKv::new();
        store.set("application:1", json!(1)).await.unwrap();
        store.set("application:3", json!(3)).await.unwrap();

        let keys = vec![
            "application:3".to_string(),
            "application:2".to_string(),
            "application:1".to_string(),
        ];
        let values = store.mget(&keys).await.unwrap();
        assert_eq!(values, vec![json!(3), json!(1)]);
    }
}
