use crate::{DbError, error::Result as DbErrorResult};

use idhub_core::{ErrorLocation, SiteRegistration, normalize_site_url};

use std::panic::Location;

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub struct SiteRegistrationRepository {
    pool: SqlitePool,
}

impl SiteRegistrationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a brand node. URLs are unique under normalization.
    pub async fn create(&self, registration: &SiteRegistration) -> DbErrorResult<()> {
        let result = sqlx::query(
            r#"
              INSERT INTO site_registrations (id, name, url, api_key)
              VALUES (?, ?, ?, ?)
              ON CONFLICT(url) DO NOTHING
              "#,
        )
        .bind(registration.id.to_string())
        .bind(&registration.name)
        .bind(&registration.url)
        .bind(&registration.api_key)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::DuplicateSiteUrl {
                url: registration.url.clone(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }

    pub async fn list(&self) -> DbErrorResult<Vec<SiteRegistration>> {
        let rows = sqlx::query("SELECT id, name, url, api_key FROM site_registrations ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(decode_registration).collect()
    }

    pub async fn find_by_url(&self, url: &str) -> DbErrorResult<Option<SiteRegistration>> {
        let row = sqlx::query("SELECT id, name, url, api_key FROM site_registrations WHERE url = ?")
            .bind(normalize_site_url(url))
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(decode_registration).transpose()
    }

    pub async fn delete(&self, id: Uuid) -> DbErrorResult<bool> {
        let result = sqlx::query("DELETE FROM site_registrations WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn decode_registration(row: &sqlx::sqlite::SqliteRow) -> DbErrorResult<SiteRegistration> {
    let id: String = row.try_get("id")?;
    Ok(SiteRegistration {
        id: Uuid::parse_str(&id).map_err(|e| {
            DbError::corrupt(format!("Invalid UUID in site_registrations.id: {}", e))
        })?,
        name: row.try_get("name")?,
        url: row.try_get("url")?,
        api_key: row.try_get("api_key")?,
    })
}
