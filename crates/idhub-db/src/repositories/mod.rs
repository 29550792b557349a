pub mod change_request_repository;
pub mod identity_repository;
pub mod local_user_repository;
pub mod site_registration_repository;
pub mod sync_job_repository;
pub mod sync_status_repository;

use crate::error::Result as DbErrorResult;

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

/// Decode a unix-seconds column into a DateTime.
pub(crate) fn timestamp_column(row: &SqliteRow, column: &str) -> DbErrorResult<DateTime<Utc>> {
    let secs: i64 = row.try_get(column)?;
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| crate::DbError::corrupt(format!("Invalid timestamp in {}", column)))
}

/// Decode a JSON TEXT column.
pub(crate) fn json_column<T: serde::de::DeserializeOwned>(
    row: &SqliteRow,
    column: &str,
) -> DbErrorResult<T> {
    let raw: String = row.try_get(column)?;
    serde_json::from_str(&raw)
        .map_err(|e| crate::DbError::corrupt(format!("Invalid JSON in {}: {}", column, e)))
}
