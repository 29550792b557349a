use serde::Deserialize;

/// Query string of the aggregated change-request listing
#[derive(Debug, Default, Deserialize)]
pub struct ListRequestsQuery {
    /// Site name or URL; restricts the main result, not the pending badge
    pub site: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    /// Offset into the merged, globally-ordered result
    pub cursor: Option<i64>,
}
