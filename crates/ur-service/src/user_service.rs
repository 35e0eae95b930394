//! User service: creation stamping and the optimistic-concurrency update
//! protocol on top of the user repository.
//!
//! `updated_at` is used as an implicit version counter. An update re-reads
//! the record under the store's write lock and only persists when the
//! caller's token still equals the stored value; otherwise the record was
//! concurrently modified and the update is rejected without writing.

use crate::{Result as ServiceErrorResult, ServiceError};

use ur_core::{Clock, ErrorLocation, User};
use ur_db::{DbError, UserRepository};

use std::panic::Location;
use std::sync::Arc;

use log::info;
use sqlx::SqlitePool;

/// Fixed user-facing message returned on a lost-update conflict.
pub const CONFLICT_MESSAGE: &str =
    "The record was updated by someone else. Go back to the list and try again.";

#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Every stored user, store-default order.
    pub async fn search_all(&self) -> ServiceErrorResult<Vec<User>> {
        let repo = UserRepository::new(self.pool.clone());
        Ok(repo.find_all().await?)
    }

    /// Absence is an explicit `NotFound`, never a silent null.
    pub async fn search(&self, id: i64) -> ServiceErrorResult<User> {
        let repo = UserRepository::new(self.pool.clone());
        repo.find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound {
                message: format!("User {} not found", id),
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Persist a new user. Caller-supplied timestamps are ignored: both
    /// `created_at` and `updated_at` are stamped from the injected clock.
    /// `deleted_at` is carried through as submitted.
    pub async fn create_user(&self, user: User) -> ServiceErrorResult<User> {
        let now = self.clock.now();
        let user = User {
            id: None,
            created_at: now,
            updated_at: now,
            ..user
        };

        let repo = UserRepository::new(self.pool.clone());
        let saved = repo.save(&user).await?;

        if let Some(id) = saved.id {
            info!("Created user {} ({})", id, saved.name);
        }

        Ok(saved)
    }

    /// Optimistic-concurrency update.
    ///
    /// The submitted `updated_at` is the version token the caller read when
    /// it fetched the record for editing. The stored value is re-read under
    /// the write lock and compared by exact equality; any concurrent commit
    /// in between changes it and rejects this update with `Conflict`.
    /// `created_at` always keeps the stored value.
    pub async fn update_user(&self, user: User) -> ServiceErrorResult<User> {
        let id = user.id.ok_or_else(|| ServiceError::NotFound {
            message: "User has no assigned id".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let current = UserRepository::find_by_id_for_update(&mut tx, id)
            .await?
            .ok_or_else(|| ServiceError::NotFound {
                message: format!("User {} not found", id),
                location: ErrorLocation::from(Location::caller()),
            })?;

        if current.updated_at != user.updated_at {
            tx.rollback().await.map_err(DbError::from)?;
            return Err(ServiceError::Conflict {
                message: CONFLICT_MESSAGE.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let stamped = User {
            created_at: current.created_at,
            updated_at: self.clock.now(),
            ..user
        };

        let saved = UserRepository::save_in_tx(&mut tx, &stamped).await?;
        tx.commit().await.map_err(DbError::from)?;

        info!("Updated user {}", id);

        Ok(saved)
    }

    /// Unconditional hard delete, no version check: a delete can discard a
    /// concurrent edit. Idempotent.
    pub async fn delete_user(&self, id: i64) -> ServiceErrorResult<()> {
        let repo = UserRepository::new(self.pool.clone());
        repo.delete_by_id(id).await?;

        info!("Deleted user {}", id);

        Ok(())
    }
}
