use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// Display name (required)
    pub name: String,

    /// The `updated_at` value the caller read when fetching the record,
    /// in microseconds since the epoch. Required for conflict detection.
    pub updated_at: i64,

    /// Soft-delete marker, microseconds since the epoch. Persisted as
    /// submitted; omit to keep the record live.
    #[serde(default)]
    pub deleted_at: Option<i64>,
}
