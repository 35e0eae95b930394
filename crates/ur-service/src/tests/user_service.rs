use crate::{CONFLICT_MESSAGE, ServiceError, UserService};

use ur_core::{Clock, User};

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Deterministic clock: starts at a fixed instant and advances one second
/// per call.
struct SteppingClock {
    start: DateTime<Utc>,
    ticks: Mutex<i64>,
}

impl SteppingClock {
    fn new() -> Self {
        Self {
            start: Utc.with_ymd_and_hms(2021, 1, 1, 12, 0, 0).unwrap(),
            ticks: Mutex::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut ticks = self.ticks.lock().unwrap();
        let now = self.start + Duration::seconds(*ticks);
        *ticks += 1;
        now
    }
}

async fn create_test_service() -> UserService {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1) // In-memory needs single connection
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    ur_db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    UserService::new(pool, Arc::new(SteppingClock::new()))
}

#[tokio::test]
async fn test_create_user_stamps_both_timestamps() {
    let service = create_test_service().await;

    // Caller-supplied timestamps must be ignored
    let submitted = User {
        id: None,
        name: "Taro".to_string(),
        created_at: Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
        deleted_at: None,
    };

    let created = service.create_user(submitted).await.unwrap();

    assert!(created.id.is_some());
    assert_eq!(created.name, "Taro");
    assert_eq!(created.created_at, created.updated_at);
    assert_eq!(
        created.created_at,
        Utc.with_ymd_and_hms(2021, 1, 1, 12, 0, 0).unwrap()
    );
    assert_eq!(created.deleted_at, None);
}

#[tokio::test]
async fn test_update_user_success_advances_updated_at() {
    let service = create_test_service().await;
    let created = service.create_user(User::new("Taro".to_string())).await.unwrap();

    let mut submitted = created.clone();
    submitted.name = "Jiro".to_string();

    let updated = service.update_user(submitted).await.unwrap();

    assert_eq!(updated.name, "Jiro");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);

    // The committed state matches what update_user returned
    let stored = service.search(created.id.unwrap()).await.unwrap();
    assert_eq!(stored, updated);
}

#[tokio::test]
async fn test_update_user_preserves_submitted_deleted_at() {
    let service = create_test_service().await;
    let created = service.create_user(User::new("Taro".to_string())).await.unwrap();

    let stamp = Utc.with_ymd_and_hms(2021, 2, 1, 0, 0, 0).unwrap();
    let mut submitted = created.clone();
    submitted.deleted_at = Some(stamp);

    let updated = service.update_user(submitted).await.unwrap();

    assert_eq!(updated.deleted_at, Some(stamp));
}

#[tokio::test]
async fn test_update_user_preserves_stored_created_at() {
    let service = create_test_service().await;
    let created = service.create_user(User::new("Taro".to_string())).await.unwrap();

    // A garbled created_at in the submission must not stick
    let mut submitted = created.clone();
    submitted.created_at = Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap();

    let updated = service.update_user(submitted).await.unwrap();

    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn test_update_user_with_stale_token_fails_without_writing() {
    let service = create_test_service().await;
    let created = service.create_user(User::new("Taro".to_string())).await.unwrap();

    // Another actor updates the record after the caller's read
    let mut other = created.clone();
    other.name = "Jiro".to_string();
    let committed = service.update_user(other).await.unwrap();

    // The caller submits with the now-stale token
    let mut stale = created.clone();
    stale.name = "Saburo".to_string();
    let result = service.update_user(stale).await;

    match result {
        Err(ServiceError::Conflict { message, .. }) => {
            assert_eq!(message, CONFLICT_MESSAGE);
        }
        other => panic!("Expected Conflict, got {:?}", other),
    }

    // Store state is unchanged from the concurrent actor's write
    let stored = service.search(created.id.unwrap()).await.unwrap();
    assert_eq!(stored, committed);
}

#[tokio::test]
async fn test_update_user_missing_record_fails_with_not_found() {
    let service = create_test_service().await;

    let mut ghost = User::new("Taro".to_string());
    ghost.id = Some(42);

    let result = service.update_user(ghost).await;

    assert!(matches!(result, Err(ServiceError::NotFound { .. })));
}

#[tokio::test]
async fn test_update_user_without_id_fails_with_not_found() {
    let service = create_test_service().await;

    let result = service.update_user(User::new("Taro".to_string())).await;

    assert!(matches!(result, Err(ServiceError::NotFound { .. })));
}

#[tokio::test]
async fn test_search_missing_record_fails_with_not_found() {
    let service = create_test_service().await;

    let result = service.search(42).await;

    assert!(matches!(result, Err(ServiceError::NotFound { .. })));
}

#[tokio::test]
async fn test_search_all_returns_every_user() {
    let service = create_test_service().await;
    service.create_user(User::new("Taro".to_string())).await.unwrap();
    service.create_user(User::new("Hanako".to_string())).await.unwrap();

    let users = service.search_all().await.unwrap();

    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn test_delete_user_is_idempotent() {
    let service = create_test_service().await;
    let created = service.create_user(User::new("Taro".to_string())).await.unwrap();
    let id = created.id.unwrap();

    service.delete_user(id).await.unwrap();
    service.delete_user(id).await.unwrap();

    let result = service.search(id).await;
    assert!(matches!(result, Err(ServiceError::NotFound { .. })));
}
