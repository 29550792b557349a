use idhub_core::DeduplicatedIdentity;

use serde::Serialize;

/// One page of the identity store
#[derive(Debug, Serialize)]
pub struct IdentityListResponse {
    pub users: Vec<DeduplicatedIdentity>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
}
