use crate::api::brand_requests::brand_request_dto::BrandRequestDto;

use serde::Serialize;

/// One page of the local change-request listing, in the shape the governing
/// node's drain loop follows (`has_more`/`next_cursor`).
#[derive(Debug, Serialize)]
pub struct BrandRequestListResponse {
    pub profile_requests: Vec<BrandRequestDto>,
    pub total_count: i64,
    pub pending_count: i64,
    pub has_more: bool,
    pub next_cursor: Option<i64>,
}
