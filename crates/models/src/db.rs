use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, QueryResult,
    Statement,
};
use serde_json::{Map, Number, Value as JsonValue};
use tracing::{error, info};

use crate::errors::StorageError;

/// Long-lived handle to the SQLite store.
///
/// Opened once at startup and shared by reference; queries are independent
/// reads, so no locking is needed. An open failure is not fatal: the handle
/// stays in a degraded state and every query reports the retained open error
/// until the process is restarted.
pub struct Storage {
    inner: Result<DatabaseConnection, String>,
}

impl Storage {
    /// Open the store at the configured path, creating the file if missing.
    pub async fn open(cfg: &configs::DatabaseConfig) -> Self {
        let mut opts = ConnectOptions::new(cfg.connection_url());
        opts.max_connections(cfg.max_connections)
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .sqlx_logging(cfg.sqlx_logging);
        match Database::connect(opts).await {
            Ok(db) => {
                info!(path = %cfg.path, "database opened");
                Self { inner: Ok(db) }
            }
            Err(e) => {
                error!(path = %cfg.path, error = %e, "failed to open database; queries will fail until restart");
                Self {
                    inner: Err(e.to_string()),
                }
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.inner.is_ok()
    }

    pub fn connection(&self) -> Result<&DatabaseConnection, StorageError> {
        self.inner
            .as_ref()
            .map_err(|msg| StorageError::Unavailable(msg.clone()))
    }

    /// Run a read-only statement and return each row as a JSON object keyed
    /// by column name. Rows come back in whatever order the store yields
    /// them; nothing here sorts or reshapes them.
    pub async fn query_all(&self, sql: &str) -> Result<Vec<JsonValue>, StorageError> {
        let db = self.connection()?;
        let stmt = Statement::from_string(DatabaseBackend::Sqlite, sql);
        let rows = db
            .query_all(stmt)
            .await
            .map_err(|e| StorageError::Query(e.to_string()))?;
        Ok(rows.iter().map(row_to_json).collect())
    }
}

/// Project a row into a JSON object without assuming a schema.
fn row_to_json(row: &QueryResult) -> JsonValue {
    let mut object = Map::new();
    for (idx, name) in row.column_names().into_iter().enumerate() {
        object.insert(name, column_to_json(row, idx));
    }
    JsonValue::Object(object)
}

/// SQLite values carry their storage class at runtime, so probe the classes
/// in turn. Integers are tried before floats so they stay integral, and REAL
/// decodes through f64 to keep its full precision.
fn column_to_json(row: &QueryResult, idx: usize) -> JsonValue {
    if let Ok(v) = row.try_get_by_index::<Option<i64>>(idx) {
        return v.map_or(JsonValue::Null, |i| JsonValue::Number(i.into()));
    }
    if let Ok(v) = row.try_get_by_index::<Option<f64>>(idx) {
        return v
            .and_then(Number::from_f64)
            .map_or(JsonValue::Null, JsonValue::Number);
    }
    if let Ok(v) = row.try_get_by_index::<Option<String>>(idx) {
        return v.map_or(JsonValue::Null, JsonValue::String);
    }
    if let Ok(v) = row.try_get_by_index::<Option<Vec<u8>>>(idx) {
        return v.map_or(JsonValue::Null, |bytes| {
            JsonValue::Array(bytes.into_iter().map(|b| JsonValue::Number(b.into())).collect())
        });
    }
    JsonValue::Null
}
