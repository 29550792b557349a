//! Change request persistence on a brand node.

use crate::repositories::{json_column, timestamp_column};
use crate::{DbError, error::Result as DbErrorResult};

use idhub_core::{ChangeRequest, ChangeRequestStatus, ErrorLocation};

use std::panic::Location;
use std::str::FromStr;

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Filters for listing requests.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub status: Option<ChangeRequestStatus>,
    pub search: Option<String>,
}

pub struct ChangeRequestRepository {
    pool: SqlitePool,
}

impl ChangeRequestRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a new pending request unless the user already has one.
    ///
    /// First-pending-wins: when a pending request exists the new one is
    /// dropped and false is returned; no second row is ever created.
    pub async fn create_pending(&self, request: &ChangeRequest) -> DbErrorResult<bool> {
        let mut tx = self.pool.begin().await?;

        let pending: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM change_requests WHERE user_id = ? AND status = 'pending'",
        )
        .bind(&request.user_id)
        .fetch_one(&mut *tx)
        .await?;

        if pending > 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        let data = serde_json::to_string(&request.data)
            .map_err(|e| DbError::corrupt(format!("Failed to encode data: {}", e)))?;
        let metadata = serde_json::to_string(&request.metadata)
            .map_err(|e| DbError::corrupt(format!("Failed to encode metadata: {}", e)))?;

        sqlx::query(
            r#"
              INSERT INTO change_requests
                  (id, user_id, status, comment, data, metadata, requested_by, created_at, updated_at)
              VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
              "#,
        )
        .bind(request.id.to_string())
        .bind(&request.user_id)
        .bind(request.status.as_str())
        .bind(&request.comment)
        .bind(&data)
        .bind(&metadata)
        .bind(&request.requested_by)
        .bind(request.created_at.timestamp())
        .bind(request.updated_at.timestamp())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbErrorResult<Option<ChangeRequest>> {
        let row = sqlx::query("SELECT * FROM change_requests WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(decode_request).transpose()
    }

    pub async fn find_pending_for_user(
        &self,
        user_id: &str,
    ) -> DbErrorResult<Option<ChangeRequest>> {
        let row = sqlx::query(
            "SELECT * FROM change_requests WHERE user_id = ? AND status = 'pending' LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(decode_request).transpose()
    }

    /// List requests newest-first with a total count for pagination.
    pub async fn list(
        &self,
        filter: &RequestFilter,
        offset: i64,
        limit: i64,
    ) -> DbErrorResult<(Vec<ChangeRequest>, i64)> {
        let status = filter.status.map(|s| s.as_str().to_string());
        let search = filter
            .search
            .as_ref()
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let total: i64 = sqlx::query_scalar(
            r#"
              SELECT COUNT(*) FROM change_requests
              WHERE (?1 IS NULL OR status = ?1)
                AND (?2 IS NULL OR user_id LIKE ?2 OR requested_by LIKE ?2 OR data LIKE ?2)
              "#,
        )
        .bind(&status)
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query(
            r#"
              SELECT * FROM change_requests
              WHERE (?1 IS NULL OR status = ?1)
                AND (?2 IS NULL OR user_id LIKE ?2 OR requested_by LIKE ?2 OR data LIKE ?2)
              ORDER BY created_at DESC, id
              LIMIT ?3 OFFSET ?4
              "#,
        )
        .bind(&status)
        .bind(&search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let items = rows
            .iter()
            .map(decode_request)
            .collect::<DbErrorResult<Vec<_>>>()?;

        Ok((items, total))
    }

    pub async fn count_pending(&self) -> DbErrorResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM change_requests WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Transition pending -> approved. Fails with RequestNotPending when the
    /// request is missing or already resolved; resolving twice never
    /// silently succeeds.
    pub async fn approve(&self, id: Uuid) -> DbErrorResult<ChangeRequest> {
        self.resolve(id, ChangeRequestStatus::Approved, None).await
    }

    /// Transition pending -> rejected, storing the decision comment.
    pub async fn reject(&self, id: Uuid, comment: &str) -> DbErrorResult<ChangeRequest> {
        self.resolve(id, ChangeRequestStatus::Rejected, Some(comment))
            .await
    }

    async fn resolve(
        &self,
        id: Uuid,
        status: ChangeRequestStatus,
        comment: Option<&str>,
    ) -> DbErrorResult<ChangeRequest> {
        let id_str = id.to_string();
        let now = Utc::now().timestamp();

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
              UPDATE change_requests
              SET status = ?, comment = COALESCE(?, comment), updated_at = ?
              WHERE id = ? AND status = 'pending'
              "#,
        )
        .bind(status.as_str())
        .bind(comment)
        .bind(now)
        .bind(&id_str)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DbError::RequestNotPending {
                request_id: id_str,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let row = sqlx::query("SELECT * FROM change_requests WHERE id = ?")
            .bind(&id_str)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        decode_request(&row)
    }
}

fn decode_request(row: &sqlx::sqlite::SqliteRow) -> DbErrorResult<ChangeRequest> {
    let id: String = row.try_get("id")?;
    let status: String = row.try_get("status")?;

    Ok(ChangeRequest {
        id: Uuid::parse_str(&id)
            .map_err(|e| DbError::corrupt(format!("Invalid UUID in change_requests.id: {}", e)))?,
        user_id: row.try_get("user_id")?,
        status: ChangeRequestStatus::from_str(&status)
            .map_err(|e| DbError::corrupt(format!("Invalid status: {}", e)))?,
        comment: row.try_get("comment")?,
        data: json_column(row, "data")?,
        metadata: json_column(row, "metadata")?,
        requested_by: row.try_get("requested_by")?,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}
