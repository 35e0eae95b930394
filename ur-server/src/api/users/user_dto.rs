use ur_core::User;

use serde::Serialize;

/// User DTO for JSON serialization.
///
/// Timestamps are integer microseconds since the epoch - the same values
/// the store compares as version tokens, so a client can echo
/// `updated_at` back verbatim on update.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id.unwrap_or_default(),
            name: u.name,
            created_at: u.created_at.timestamp_micros(),
            updated_at: u.updated_at.timestamp_micros(),
            deleted_at: u.deleted_at.map(|dt| dt.timestamp_micros()),
        }
    }
}
