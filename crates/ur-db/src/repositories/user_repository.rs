//! User repository for CRUD operations on the registry.
//!
//! `updated_at` is the version token the service layer compares by exact
//! equality, so every read returns timestamps exactly as stored (INTEGER
//! microseconds) and `save` returns the record rebuilt from the stored
//! values rather than the caller's sub-microsecond instants.

use crate::{DbError, Result as DbErrorResult};

use ur_core::{ErrorLocation, User};

use std::panic::Location;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> DbErrorResult<Vec<User>> {
        let rows = sqlx::query(
            r#"
                SELECT id, name, created_at, updated_at, deleted_at
                FROM users
                ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(map_user_row).collect()
    }

    pub async fn find_by_id(&self, id: i64) -> DbErrorResult<Option<User>> {
        let row = sqlx::query(
            r#"
                SELECT id, name, created_at, updated_at, deleted_at
                FROM users
                WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(map_user_row).transpose()
    }

    /// Same lookup as `find_by_id`, but inside an update transaction.
    ///
    /// CRITICAL: This method REQUIRES a Transaction. The type system
    /// enforces this.
    ///
    /// The row is touched with a no-op write before it is read, which
    /// promotes the transaction to a writer and takes the database write
    /// lock. A concurrent updater of the same record blocks here (up to the
    /// pool's busy timeout) until this transaction commits or rolls back,
    /// so nothing can be interleaved between this read and the write that
    /// follows it.
    pub async fn find_by_id_for_update(
        tx: &mut Transaction<'_, Sqlite>,
        id: i64,
    ) -> DbErrorResult<Option<User>> {
        let touched = sqlx::query("UPDATE users SET id = id WHERE id = ?")
            .bind(id)
            .execute(&mut **tx)
            .await?;

        if touched.rows_affected() == 0 {
            return Ok(None);
        }

        let row = sqlx::query(
            r#"
                SELECT id, name, created_at, updated_at, deleted_at
                FROM users
                WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(Some(map_user_row(row)?))
    }

    /// Insert when the record has no assigned id, otherwise overwrite the
    /// full row matching on id. Returns the record as persisted, id
    /// included.
    pub async fn save(&self, user: &User) -> DbErrorResult<User> {
        let created_at = user.created_at.timestamp_micros();
        let updated_at = user.updated_at.timestamp_micros();
        let deleted_at = user.deleted_at.map(|dt| dt.timestamp_micros());

        match user.id {
            None => {
                let result = sqlx::query(
                    r#"
                        INSERT INTO users (name, created_at, updated_at, deleted_at)
                        VALUES (?, ?, ?, ?)
                    "#,
                )
                .bind(&user.name)
                .bind(created_at)
                .bind(updated_at)
                .bind(deleted_at)
                .execute(&self.pool)
                .await?;

                persisted_user(
                    result.last_insert_rowid(),
                    &user.name,
                    created_at,
                    updated_at,
                    deleted_at,
                )
            }
            Some(id) => {
                sqlx::query(
                    r#"
                        UPDATE users
                        SET name = ?, created_at = ?, updated_at = ?, deleted_at = ?
                        WHERE id = ?
                    "#,
                )
                .bind(&user.name)
                .bind(created_at)
                .bind(updated_at)
                .bind(deleted_at)
                .bind(id)
                .execute(&self.pool)
                .await?;

                persisted_user(id, &user.name, created_at, updated_at, deleted_at)
            }
        }
    }

    /// Overwrite path of `save`, inside the caller's update transaction.
    /// The record must already have an assigned id.
    pub async fn save_in_tx(
        tx: &mut Transaction<'_, Sqlite>,
        user: &User,
    ) -> DbErrorResult<User> {
        let id = user.id.ok_or_else(|| DbError::Initialization {
            message: "Cannot overwrite a user without an assigned id".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let created_at = user.created_at.timestamp_micros();
        let updated_at = user.updated_at.timestamp_micros();
        let deleted_at = user.deleted_at.map(|dt| dt.timestamp_micros());

        sqlx::query(
            r#"
                UPDATE users
                SET name = ?, created_at = ?, updated_at = ?, deleted_at = ?
                WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(created_at)
        .bind(updated_at)
        .bind(deleted_at)
        .bind(id)
        .execute(&mut **tx)
        .await?;

        persisted_user(id, &user.name, created_at, updated_at, deleted_at)
    }

    /// Idempotent: deleting an absent id is not an error.
    pub async fn delete_by_id(&self, id: i64) -> DbErrorResult<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn map_user_row(row: SqliteRow) -> DbErrorResult<User> {
    let id: i64 = row.try_get("id")?;
    let name: String = row.try_get("name")?;
    let created_at: i64 = row.try_get("created_at")?;
    let updated_at: i64 = row.try_get("updated_at")?;
    let deleted_at: Option<i64> = row.try_get("deleted_at")?;

    Ok(User {
        id: Some(id),
        name,
        created_at: micros_to_datetime(created_at, "users.created_at")?,
        updated_at: micros_to_datetime(updated_at, "users.updated_at")?,
        deleted_at: deleted_at
            .map(|micros| micros_to_datetime(micros, "users.deleted_at"))
            .transpose()?,
    })
}

fn persisted_user(
    id: i64,
    name: &str,
    created_at: i64,
    updated_at: i64,
    deleted_at: Option<i64>,
) -> DbErrorResult<User> {
    Ok(User {
        id: Some(id),
        name: name.to_string(),
        created_at: micros_to_datetime(created_at, "users.created_at")?,
        updated_at: micros_to_datetime(updated_at, "users.updated_at")?,
        deleted_at: deleted_at
            .map(|micros| micros_to_datetime(micros, "users.deleted_at"))
            .transpose()?,
    })
}

fn micros_to_datetime(micros: i64, column: &str) -> DbErrorResult<DateTime<Utc>> {
    DateTime::from_timestamp_micros(micros).ok_or_else(|| DbError::Initialization {
        message: format!("Invalid timestamp in {}: {}", column, micros),
        location: ErrorLocation::from(Location::caller()),
    })
}
