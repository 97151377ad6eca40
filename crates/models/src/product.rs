use serde_json::Value as JsonValue;

use crate::db::Storage;
use crate::errors::StorageError;

/// The one statement this service issues. No user input ever reaches it.
pub const LIST_PRODUCTS_SQL: &str = "SELECT * FROM products";

/// Fetch every row of the products table as dynamic JSON objects. The field
/// set is whatever the table schema defines; nothing is validated or
/// transformed on the way through.
pub async fn list_all(storage: &Storage) -> Result<Vec<JsonValue>, StorageError> {
    storage.query_all(LIST_PRODUCTS_SQL).await
}
