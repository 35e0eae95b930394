//! User REST API handlers
//!
//! HTTP access to the user registry. The update handler carries the
//! caller's `updated_at` token through to the service layer, which
//! rejects the write when the record changed since the caller's read.

use crate::{
    ApiError, ApiResult, CreateUserRequest, DeleteResponse, UpdateUserRequest, UserDto,
    UserListResponse, UserResponse,
};

use ur_core::{ErrorLocation, User};

use std::panic::Location;

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};

use crate::AppState;

// =============================================================================
// Handlers
// =============================================================================

/// GET /api/v1/users
///
/// List all users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UserListResponse>> {
    let users = state.service.search_all().await?;

    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserDto::from).collect(),
    }))
}

/// GET /api/v1/users/:id
///
/// Get a single user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    let user_id = parse_user_id(&id)?;

    let user = state.service.search(user_id).await?;

    Ok(Json(UserResponse { user: user.into() }))
}

/// POST /api/v1/users
///
/// Create a new user. The server stamps both timestamps.
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation {
            message: "name must not be empty".to_string(),
            field: Some("name".into()),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let created = state.service.create_user(User::new(req.name)).await?;

    Ok(Json(UserResponse {
        user: created.into(),
    }))
}

/// PUT /api/v1/users/:id
///
/// Update a user. Rejected with 409 CONFLICT when the submitted
/// `updated_at` no longer matches the stored record.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user_id = parse_user_id(&id)?;

    if req.name.trim().is_empty() {
        return Err(ApiError::Validation {
            message: "name must not be empty".to_string(),
            field: Some("name".into()),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let updated_at = micros_to_datetime(req.updated_at, "updated_at")?;
    let deleted_at = req
        .deleted_at
        .map(|micros| micros_to_datetime(micros, "deleted_at"))
        .transpose()?;

    let submitted = User {
        id: Some(user_id),
        name: req.name,
        // Overwritten by the service from the stored row
        created_at: updated_at,
        updated_at,
        deleted_at,
    };

    let updated = state.service.update_user(submitted).await?;

    Ok(Json(UserResponse {
        user: updated.into(),
    }))
}

/// DELETE /api/v1/users/:id
///
/// Delete a user. Idempotent: deleting an absent id also succeeds.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let user_id = parse_user_id(&id)?;

    state.service.delete_user(user_id).await?;

    Ok(Json(DeleteResponse { deleted: true }))
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_user_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>().map_err(|_| ApiError::Validation {
        message: format!("Invalid user id: {}", raw),
        field: Some("id".into()),
        location: ErrorLocation::from(Location::caller()),
    })
}

fn micros_to_datetime(micros: i64, field: &str) -> ApiResult<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or_else(|| ApiError::Validation {
        message: format!("Invalid timestamp for {}: {}", field, micros),
        field: Some(field.to_string()),
        location: ErrorLocation::from(Location::caller()),
    })
}
