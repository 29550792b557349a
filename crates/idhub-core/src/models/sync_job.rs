use crate::{CoreError, ErrorLocation, UserRecord};

use std::panic::Location;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a sync payload asks the governing node to do with the record.
/// Jobs are only ever scheduled with Create or Update; Delete and RoleChange
/// flow through the same ingest payload for removal/role propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncAction {
    Create,
    Update,
    Delete,
    RoleChange,
}

impl SyncAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::Create => "create",
            SyncAction::Update => "update",
            SyncAction::Delete => "delete",
            SyncAction::RoleChange => "role-change",
        }
    }
}

impl FromStr for SyncAction {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(SyncAction::Create),
            "update" => Ok(SyncAction::Update),
            "delete" => Ok(SyncAction::Delete),
            "role-change" => Ok(SyncAction::RoleChange),
            _ => Err(CoreError::InvalidSyncAction {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for SyncAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled delivery of a user snapshot to the governing node.
///
/// The id is deterministic per (user, action, second) so duplicate scheduling
/// calls within the same tick collapse to one job: exactly-once scheduling,
/// not exactly-once delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncJob {
    pub job_id: String,
    pub user_id: String,
    pub action: SyncAction,
    /// Starts at 0, incremented by each delivery attempt.
    pub attempt: i32,
    /// Snapshot taken at scheduling time.
    pub payload: UserRecord,
    pub run_at: DateTime<Utc>,
}

impl SyncJob {
    pub fn new(user_id: String, action: SyncAction, payload: UserRecord) -> Self {
        let now = Utc::now();
        Self {
            job_id: Self::deterministic_id(&user_id, action, now),
            user_id,
            action,
            attempt: 0,
            payload,
            run_at: now,
        }
    }

    pub fn deterministic_id(user_id: &str, action: SyncAction, at: DateTime<Utc>) -> String {
        format!("{}:{}:{}", user_id, action.as_str(), at.timestamp())
    }
}
