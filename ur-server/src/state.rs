use sqlx::SqlitePool;
use ur_service::UserService;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub service: UserService,
}
