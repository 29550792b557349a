//! Durable delivery queue on a brand node.

use crate::repositories::{json_column, timestamp_column};
use crate::{DbError, error::Result as DbErrorResult};

use idhub_core::{SyncAction, SyncJob};

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

pub struct SyncJobRepository {
    pool: SqlitePool,
}

impl SyncJobRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Enqueue a job. The deterministic job_id collapses duplicate scheduling
    /// within the same second; returns false when the job already exists.
    pub async fn insert(&self, job: &SyncJob) -> DbErrorResult<bool> {
        let payload = serde_json::to_string(&job.payload)
            .map_err(|e| DbError::corrupt(format!("Failed to encode payload: {}", e)))?;

        let result = sqlx::query(
            r#"
              INSERT INTO sync_jobs (job_id, user_id, action, attempt, payload, run_at, created_at)
              VALUES (?, ?, ?, ?, ?, ?, ?)
              ON CONFLICT(job_id) DO NOTHING
              "#,
        )
        .bind(&job.job_id)
        .bind(&job.user_id)
        .bind(job.action.as_str())
        .bind(job.attempt)
        .bind(&payload)
        .bind(job.run_at.timestamp())
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Jobs whose run_at has passed, oldest first, capped to one batch.
    pub async fn due_jobs(&self, now: DateTime<Utc>, limit: i64) -> DbErrorResult<Vec<SyncJob>> {
        let rows = sqlx::query(
            r#"
              SELECT job_id, user_id, action, attempt, payload, run_at
              FROM sync_jobs
              WHERE run_at <= ?
              ORDER BY run_at, job_id
              LIMIT ?
              "#,
        )
        .bind(now.timestamp())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(decode_job).collect()
    }

    /// Push a failed job back into the future with its attempt count bumped.
    pub async fn reschedule(
        &self,
        job_id: &str,
        attempt: i32,
        run_at: DateTime<Utc>,
    ) -> DbErrorResult<()> {
        sqlx::query("UPDATE sync_jobs SET attempt = ?, run_at = ? WHERE job_id = ?")
            .bind(attempt)
            .bind(run_at.timestamp())
            .bind(job_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete(&self, job_id: &str) -> DbErrorResult<()> {
        sqlx::query("DELETE FROM sync_jobs WHERE job_id = ?")
            .bind(job_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn pending_for_user(&self, user_id: &str) -> DbErrorResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sync_jobs WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn decode_job(row: &sqlx::sqlite::SqliteRow) -> DbErrorResult<SyncJob> {
    let action: String = row.try_get("action")?;

    Ok(SyncJob {
        job_id: row.try_get("job_id")?,
        user_id: row.try_get("user_id")?,
        action: SyncAction::from_str(&action)
            .map_err(|e| DbError::corrupt(format!("Invalid action: {}", e)))?,
        attempt: row.try_get("attempt")?,
        payload: json_column(row, "payload")?,
        run_at: timestamp_column(row, "run_at")?,
    })
}
