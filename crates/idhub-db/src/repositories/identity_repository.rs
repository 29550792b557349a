//! The deduplicated identity store.
//!
//! Every mutation is a single read-modify-write transaction. SQLite holds a
//! single writer lock per database, so concurrent upserts for the same email
//! serialize at the transaction level: last write wins per site membership,
//! never per whole record.

use crate::repositories::{json_column, timestamp_column};
use crate::{DbError, error::Result as DbErrorResult};

use idhub_core::{DeduplicatedIdentity, IdentityFilter, SiteMembership, normalize_site_url};

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub struct IdentityRepository {
    pool: SqlitePool,
}

impl IdentityRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create-or-merge the membership for one (email, site) pair.
    ///
    /// Absent email: a new identity with one membership. Present email and a
    /// new site: one more membership. Present email and a known site: that
    /// membership is replaced in place. Names are refreshed on every call, so
    /// re-applying an unchanged record is a no-op by value.
    pub async fn upsert_membership(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        membership: SiteMembership,
    ) -> DbErrorResult<()> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now().timestamp();

        let existing = sqlx::query("SELECT id FROM identities WHERE email = ?")
            .bind(email)
            .fetch_optional(&mut *tx)
            .await?;

        let identity_id = match existing {
            Some(row) => {
                let id: String = row.try_get("id")?;
                sqlx::query(
                    "UPDATE identities SET first_name = ?, last_name = ?, updated_at = ? WHERE id = ?",
                )
                .bind(first_name)
                .bind(last_name)
                .bind(now)
                .bind(&id)
                .execute(&mut *tx)
                .await?;
                id
            }
            None => {
                let id = Uuid::new_v4().to_string();
                sqlx::query(
                    r#"
                      INSERT INTO identities (id, email, first_name, last_name, created_at, updated_at)
                      VALUES (?, ?, ?, ?, ?, ?)
                      "#,
                )
                .bind(&id)
                .bind(email)
                .bind(first_name)
                .bind(last_name)
                .bind(now)
                .bind(now)
                .execute(&mut *tx)
                .await?;
                id
            }
        };

        let roles = serde_json::to_string(&membership.roles)
            .map_err(|e| DbError::corrupt(format!("Failed to encode roles: {}", e)))?;

        sqlx::query(
            r#"
              INSERT INTO memberships (identity_id, site_name, site_url, local_user_id, roles)
              VALUES (?, ?, ?, ?, ?)
              ON CONFLICT(identity_id, site_url) DO UPDATE SET
                  site_name = excluded.site_name,
                  local_user_id = excluded.local_user_id,
                  roles = excluded.roles
              "#,
        )
        .bind(&identity_id)
        .bind(&membership.site_name)
        .bind(&membership.site_url)
        .bind(&membership.local_user_id)
        .bind(&roles)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Replace the role set of one membership. Returns false when the
    /// identity or membership does not exist.
    pub async fn update_role(
        &self,
        email: &str,
        site_url: &str,
        roles: &[String],
    ) -> DbErrorResult<bool> {
        let normalized = normalize_site_url(site_url);
        let encoded = serde_json::to_string(roles)
            .map_err(|e| DbError::corrupt(format!("Failed to encode roles: {}", e)))?;
        let now = Utc::now().timestamp();

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
              UPDATE memberships SET roles = ?
              WHERE site_url = ?
                AND identity_id = (SELECT id FROM identities WHERE email = ?)
              "#,
        )
        .bind(&encoded)
        .bind(&normalized)
        .bind(email)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE identities SET updated_at = ? WHERE email = ?")
            .bind(now)
            .bind(email)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Remove one membership; delete the identity row entirely when its
    /// membership set becomes empty. Returns false when nothing matched.
    pub async fn remove_membership(&self, email: &str, site_url: &str) -> DbErrorResult<bool> {
        let normalized = normalize_site_url(site_url);
        let now = Utc::now().timestamp();

        let mut tx = self.pool.begin().await?;

        let identity = sqlx::query("SELECT id FROM identities WHERE email = ?")
            .bind(email)
            .fetch_optional(&mut *tx)
            .await?;

        let identity_id: String = match identity {
            Some(row) => row.try_get("id")?,
            None => {
                tx.rollback().await?;
                return Ok(false);
            }
        };

        let result = sqlx::query("DELETE FROM memberships WHERE identity_id = ? AND site_url = ?")
            .bind(&identity_id)
            .bind(&normalized)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        let remaining: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM memberships WHERE identity_id = ?")
                .bind(&identity_id)
                .fetch_one(&mut *tx)
                .await?;

        if remaining == 0 {
            sqlx::query("DELETE FROM identities WHERE id = ?")
                .bind(&identity_id)
                .execute(&mut *tx)
                .await?;
        } else {
            sqlx::query("UPDATE identities SET updated_at = ? WHERE id = ?")
                .bind(now)
                .bind(&identity_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    pub async fn find_by_email(&self, email: &str) -> DbErrorResult<Option<DeduplicatedIdentity>> {
        let row = sqlx::query(
            "SELECT id, email, first_name, last_name, created_at, updated_at FROM identities WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut identity = decode_identity(&row)?;
        identity.sites = self.memberships_for(&identity.id.to_string()).await?;
        Ok(Some(identity))
    }

    /// Filtered, paginated query over the whole store.
    ///
    /// Search is a substring match across email and names; role matches when
    /// any membership carries it; site matches URL or name substrings. The
    /// store holds thousands of rows, not millions, so filtering happens
    /// in memory over a single scan.
    pub async fn query(
        &self,
        filter: &IdentityFilter,
        page: i64,
        page_size: i64,
    ) -> DbErrorResult<(Vec<DeduplicatedIdentity>, i64)> {
        let rows = sqlx::query(
            "SELECT id, email, first_name, last_name, created_at, updated_at FROM identities ORDER BY email",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut identities = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut identity = decode_identity(row)?;
            identity.sites = self.memberships_for(&identity.id.to_string()).await?;
            if filter.matches(&identity) {
                identities.push(identity);
            }
        }

        let total = identities.len() as i64;
        let offset = (page.max(1) - 1) * page_size;
        let items = identities
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(page_size.max(0) as usize)
            .collect();

        Ok((items, total))
    }

    async fn memberships_for(&self, identity_id: &str) -> DbErrorResult<Vec<SiteMembership>> {
        let rows = sqlx::query(
            r#"
              SELECT site_name, site_url, local_user_id, roles
              FROM memberships
              WHERE identity_id = ?
              ORDER BY site_url
              "#,
        )
        .bind(identity_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> DbErrorResult<SiteMembership> {
                Ok(SiteMembership {
                    site_name: row.try_get("site_name")?,
                    site_url: row.try_get("site_url")?,
                    local_user_id: row.try_get("local_user_id")?,
                    roles: json_column(row, "roles")?,
                })
            })
            .collect()
    }
}

fn decode_identity(row: &sqlx::sqlite::SqliteRow) -> DbErrorResult<DeduplicatedIdentity> {
    let id: String = row.try_get("id")?;
    Ok(DeduplicatedIdentity {
        id: Uuid::parse_str(&id)
            .map_err(|e| DbError::corrupt(format!("Invalid UUID in identities.id: {}", e)))?,
        email: row.try_get("email")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        sites: Vec::new(),
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}
