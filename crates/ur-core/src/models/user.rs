//! User entity - the single record type of the registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user.
///
/// `updated_at` doubles as the version token for conflict detection on
/// updates: it is compared by exact equality against the value the caller
/// read, so it must round-trip through storage unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned row id. `None` until the record is first persisted.
    pub id: Option<i64>,
    pub name: String,
    /// Set exactly once, at creation.
    pub created_at: DateTime<Utc>,
    /// Reset on every successful update.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker. Set and cleared by higher-level logic; the
    /// update path carries it through as submitted.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create an unsaved user with both timestamps stamped from one instant.
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Check if the user is soft-deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Check if the user has been persisted
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
