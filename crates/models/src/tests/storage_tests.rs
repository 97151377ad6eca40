use sea_orm::ConnectionTrait;
use serde_json::json;

use crate::db::Storage;
use crate::errors::StorageError;
use crate::product;

/// Isolated per-run store file under target/, like the server e2e tests.
fn temp_db_config() -> configs::DatabaseConfig {
    let dir = format!("target/test-data/{}", uuid::Uuid::new_v4());
    std::fs::create_dir_all(&dir).expect("create test data dir");
    configs::DatabaseConfig {
        path: format!("{dir}/products.sqlite"),
        ..Default::default()
    }
}

async fn open_temp_storage() -> Storage {
    let storage = Storage::open(&temp_db_config()).await;
    assert!(storage.is_open());
    storage
}

async fn seed_products(storage: &Storage) {
    let db = storage.connection().expect("open");
    db.execute_unprepared(
        "CREATE TABLE products (id INTEGER PRIMARY KEY, name TEXT NOT NULL, price REAL NOT NULL)",
    )
    .await
    .expect("create table");
    db.execute_unprepared(
        "INSERT INTO products (id, name, price) VALUES (1, 'Widget', 9.99), (2, 'Gadget', 19.99)",
    )
    .await
    .expect("insert rows");
}

#[tokio::test]
async fn list_all_returns_rows_keyed_by_column_name() {
    let storage = open_temp_storage().await;
    seed_products(&storage).await;

    let rows = product::list_all(&storage).await.expect("query");
    assert_eq!(
        rows,
        vec![
            json!({"id": 1, "name": "Widget", "price": 9.99}),
            json!({"id": 2, "name": "Gadget", "price": 19.99}),
        ]
    );
}

#[tokio::test]
async fn real_columns_keep_full_f64_precision() {
    let storage = open_temp_storage().await;
    let db = storage.connection().expect("open");
    db.execute_unprepared(
        "CREATE TABLE products (id INTEGER PRIMARY KEY, name TEXT, price REAL, note TEXT)",
    )
    .await
    .expect("create table");
    // 1234.5678 is not representable in f32; a narrowed decode would come
    // back as 1234.5677490234375.
    db.execute_unprepared(
        "INSERT INTO products (id, name, price, note) VALUES (1, 'Widget', 1234.5678, NULL)",
    )
    .await
    .expect("insert row");

    let rows = product::list_all(&storage).await.expect("query");
    assert_eq!(
        rows,
        vec![json!({"id": 1, "name": "Widget", "price": 1234.5678, "note": null})]
    );
}

#[tokio::test]
async fn list_all_on_empty_table_is_empty_not_error() {
    let storage = open_temp_storage().await;
    let db = storage.connection().expect("open");
    db.execute_unprepared("CREATE TABLE products (id INTEGER PRIMARY KEY, name TEXT)")
        .await
        .expect("create table");

    let rows = product::list_all(&storage).await.expect("query");
    assert!(rows.is_empty());
    assert_eq!(serde_json::to_string(&rows).expect("serialize"), "[]");
}

#[tokio::test]
async fn missing_table_surfaces_driver_message() {
    let storage = open_temp_storage().await;

    let err = product::list_all(&storage).await.expect_err("no table");
    match err {
        StorageError::Query(msg) => assert!(msg.contains("no such table"), "got: {msg}"),
        other => panic!("expected query error, got: {other}"),
    }
}

#[tokio::test]
async fn open_failure_is_degraded_not_fatal() {
    // Parent directory does not exist, so SQLite cannot create the file.
    let cfg = configs::DatabaseConfig {
        path: format!("target/test-data/{}/missing/products.sqlite", uuid::Uuid::new_v4()),
        ..Default::default()
    };

    let storage = Storage::open(&cfg).await;
    assert!(!storage.is_open());

    let err = product::list_all(&storage).await.expect_err("unavailable");
    match err {
        StorageError::Unavailable(msg) => assert!(!msg.is_empty()),
        other => panic!("expected unavailable error, got: {other}"),
    }
}

#[tokio::test]
async fn repeated_reads_are_identical() {
    let storage = open_temp_storage().await;
    seed_products(&storage).await;

    let first = product::list_all(&storage).await.expect("first read");
    let second = product::list_all(&storage).await.expect("second read");
    assert_eq!(first, second);
}
