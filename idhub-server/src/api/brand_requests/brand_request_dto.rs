use idhub_core::{ChangeRequest, FieldChange};

use std::collections::BTreeMap;

use serde::Serialize;

/// Change request DTO in the node-to-node wire shape: string ids, lowercase
/// status, unix-second timestamps. The governing node's aggregator consumes
/// exactly this.
#[derive(Debug, Serialize)]
pub struct BrandRequestDto {
    pub id: String,
    pub user_id: String,
    pub status: String,
    pub comment: Option<String>,
    pub data: BTreeMap<String, FieldChange>,
    pub metadata: BTreeMap<String, FieldChange>,
    pub requested_by: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<ChangeRequest> for BrandRequestDto {
    fn from(r: ChangeRequest) -> Self {
        Self {
            id: r.id.to_string(),
            user_id: r.user_id,
            status: r.status.as_str().to_string(),
            comment: r.comment,
            data: r.data,
            metadata: r.metadata,
            requested_by: r.requested_by,
            created_at: r.created_at.timestamp(),
            updated_at: r.updated_at.timestamp(),
        }
    }
}
