//! Wire types shared between nodes.

use std::collections::BTreeMap;

use idhub_core::FieldChange;
use serde::{Deserialize, Serialize};

/// Ingest acknowledgement from the governing node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestAck {
    pub success: bool,
    #[serde(default)]
    pub users_processed: u64,
}

/// Approve/reject acknowledgement from a brand node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionAck {
    pub success: bool,
}

/// A change request as a brand node reports it. The aggregator stamps
/// site_name/site_url before handing the request to callers; brand nodes
/// leave them empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteChangeRequest {
    pub id: String,
    pub user_id: String,
    pub status: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub data: BTreeMap<String, FieldChange>,
    #[serde(default)]
    pub metadata: BTreeMap<String, FieldChange>,
    #[serde(default)]
    pub requested_by: String,
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub site_url: String,
}

/// One page of a brand node's local change-request listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteRequestPage {
    pub profile_requests: Vec<RemoteChangeRequest>,
    #[serde(default)]
    pub total_count: i64,
    #[serde(default)]
    pub pending_count: i64,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<i64>,
}
