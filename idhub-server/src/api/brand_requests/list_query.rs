use serde::Deserialize;

/// Query string of a brand node's local change-request listing
#[derive(Debug, Default, Deserialize)]
pub struct ListBrandRequestsQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    /// Offset into the newest-first local order
    pub cursor: Option<i64>,
}
