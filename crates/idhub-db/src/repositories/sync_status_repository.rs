use crate::{DbError, error::Result as DbErrorResult};

use idhub_core::SyncStatus;

use std::str::FromStr;

use chrono::Utc;
use sqlx::{Row, SqlitePool};

pub struct SyncStatusRepository {
    pool: SqlitePool,
}

impl SyncStatusRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Missing rows read as unsynced.
    pub async fn get(&self, user_id: &str) -> DbErrorResult<SyncStatus> {
        let row = sqlx::query("SELECT status FROM sync_status WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(SyncStatus::Unsynced);
        };

        let status: String = row.try_get("status")?;
        SyncStatus::from_str(&status)
            .map_err(|e| DbError::corrupt(format!("Invalid sync status: {}", e)))
    }

    pub async fn set(&self, user_id: &str, status: SyncStatus) -> DbErrorResult<()> {
        sqlx::query(
            r#"
              INSERT INTO sync_status (user_id, status, updated_at)
              VALUES (?, ?, ?)
              ON CONFLICT(user_id) DO UPDATE SET
                  status = excluded.status,
                  updated_at = excluded.updated_at
              "#,
        )
        .bind(user_id)
        .bind(status.as_str())
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
