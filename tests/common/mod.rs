use std::str::FromStr;

use crewtrack::config::Config;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

/// One-connection in-memory database with the schema applied. A single
/// connection keeps every query on the same memory database.
pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    crewtrack::db::migrate(&pool).await.unwrap();
    pool
}

/// File-backed pool with several connections, for tests that need real
/// write concurrency; the single-connection memory pool serializes
/// everything before the database even sees it.
#[allow(dead_code)]
pub async fn file_pool(connections: u32) -> (SqlitePool, std::path::PathBuf) {
    let path = std::env::temp_dir().join(format!(
        "crewtrack-test-{}-{}.db",
        std::process::id(),
        uuid::Uuid::new_v4()
    ));

    let options = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(connections)
        .connect_with(options)
        .await
        .unwrap();

    crewtrack::db::migrate(&pool).await.unwrap();
    (pool, path)
}

#[allow(dead_code)]
pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        access_token_ttl: 900,
        refresh_token_ttl: 604800,
        rate_login_per_min: 1000,
        rate_register_per_min: 1000,
        rate_refresh_per_min: 1000,
        rate_protected_per_min: 1000,
        api_prefix: "/api/v1".to_string(),
        admin_email: "admin@example.com".to_string(),
        admin_password: "admin123".to_string(),
    }
}
