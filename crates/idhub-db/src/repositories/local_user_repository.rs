use crate::repositories::{json_column, timestamp_column};
use crate::{DbError, error::Result as DbErrorResult};

use idhub_core::LocalUser;

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub struct LocalUserRepository {
    pool: SqlitePool,
}

impl LocalUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &LocalUser) -> DbErrorResult<()> {
        let (roles, meta) = encode_json_fields(user)?;

        sqlx::query(
            r#"
              INSERT INTO local_users
                  (id, email, username, display_name, url, first_name, last_name,
                   roles, meta, created_at, updated_at)
              VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
              "#,
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.display_name)
        .bind(&user.url)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&roles)
        .bind(&meta)
        .bind(user.created_at.timestamp())
        .bind(user.updated_at.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, user: &LocalUser) -> DbErrorResult<()> {
        let (roles, meta) = encode_json_fields(user)?;

        sqlx::query(
            r#"
              UPDATE local_users
              SET email = ?, username = ?, display_name = ?, url = ?,
                  first_name = ?, last_name = ?, roles = ?, meta = ?, updated_at = ?
              WHERE id = ?
              "#,
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.display_name)
        .bind(&user.url)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&roles)
        .bind(&meta)
        .bind(user.updated_at.timestamp())
        .bind(user.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbErrorResult<Option<LocalUser>> {
        let row = sqlx::query("SELECT * FROM local_users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(decode_user).transpose()
    }

    pub async fn count(&self) -> DbErrorResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM local_users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// One fixed-size page of the whole user set, in stable id order.
    /// Used by the full backfill.
    pub async fn page(&self, offset: i64, limit: i64) -> DbErrorResult<Vec<LocalUser>> {
        let rows = sqlx::query("SELECT * FROM local_users ORDER BY created_at, id LIMIT ? OFFSET ?")
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(decode_user).collect()
    }
}

fn encode_json_fields(user: &LocalUser) -> DbErrorResult<(String, String)> {
    let roles = serde_json::to_string(&user.roles)
        .map_err(|e| DbError::corrupt(format!("Failed to encode roles: {}", e)))?;
    let meta = serde_json::to_string(&user.meta)
        .map_err(|e| DbError::corrupt(format!("Failed to encode meta: {}", e)))?;
    Ok((roles, meta))
}

fn decode_user(row: &sqlx::sqlite::SqliteRow) -> DbErrorResult<LocalUser> {
    let id: String = row.try_get("id")?;
    Ok(LocalUser {
        id: Uuid::parse_str(&id)
            .map_err(|e| DbError::corrupt(format!("Invalid UUID in local_users.id: {}", e)))?,
        email: row.try_get("email")?,
        username: row.try_get("username")?,
        display_name: row.try_get("display_name")?,
        url: row.try_get("url")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        roles: json_column(row, "roles")?,
        meta: json_column(row, "meta")?,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}
