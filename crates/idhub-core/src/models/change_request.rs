//! Change request - a proposed profile edit pending governing-node approval.

use crate::ChangeRequestStatus;

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An old/new value pair for one field or metadata key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub old: String,
    pub new: String,
}

impl FieldChange {
    pub fn new(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            old: old.into(),
            new: new.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub id: Uuid,
    pub user_id: String,
    pub status: ChangeRequestStatus,
    /// Required iff rejected.
    pub comment: Option<String>,
    /// Identity fields (email, url, display name, username), keyed by the
    /// patchable field name.
    pub data: BTreeMap<String, FieldChange>,
    /// Arbitrary profile attributes.
    pub metadata: BTreeMap<String, FieldChange>,
    pub requested_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChangeRequest {
    pub fn new_pending(
        user_id: String,
        data: BTreeMap<String, FieldChange>,
        metadata: BTreeMap<String, FieldChange>,
        requested_by: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            status: ChangeRequestStatus::Pending,
            comment: None,
            data,
            metadata,
            requested_by,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ChangeRequestStatus::Pending
    }

    /// A request with no field and no metadata changes carries nothing to
    /// approve; raise() never persists one.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.metadata.is_empty()
    }
}
