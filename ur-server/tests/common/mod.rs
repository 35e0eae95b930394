#![allow(dead_code)]

//! Test infrastructure for ur-server API tests

use std::sync::Arc;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use ur_core::SystemClock;
use ur_server::AppState;
use ur_service::UserService;

/// Create a test pool with in-memory SQLite
pub async fn create_test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1) // In-memory needs single connection
        .connect_with(options)
        .await
        .expect("Failed to create test database");

    sqlx::migrate!("../crates/ur-db/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Create AppState for testing
pub async fn create_test_app_state() -> AppState {
    let pool = create_test_pool().await;
    let service = UserService::new(pool.clone(), Arc::new(SystemClock));

    AppState { pool, service }
}

/// Seed a user row directly, returning its id
pub async fn seed_user(pool: &SqlitePool, name: &str) -> i64 {
    let now = chrono::Utc::now().timestamp_micros();

    let result = sqlx::query("INSERT INTO users (name, created_at, updated_at) VALUES (?, ?, ?)")
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await
        .expect("Failed to seed user");

    result.last_insert_rowid()
}
