use ur_core::ErrorLocation;
use ur_db::DbError;

use std::panic::Location;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// Requested id has no corresponding record. Surfaced as-is, never
    /// masked as a null result.
    #[error("Not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    /// Version mismatch on update: the record changed since the caller's
    /// read. Carries the fixed user-facing message; the caller must
    /// re-fetch and resubmit.
    #[error("Conflict: {message} {location}")]
    Conflict {
        message: String,
        location: ErrorLocation,
    },

    /// Store failure, passed through unmodified.
    #[error("Store error: {source} {location}")]
    Db {
        #[source]
        source: DbError,
        location: ErrorLocation,
    },
}

impl From<DbError> for ServiceError {
    #[track_caller]
    fn from(source: DbError) -> Self {
        Self::Db {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
