use serde::Serialize;

/// Result of a full backfill run
#[derive(Debug, Serialize)]
pub struct BackfillResponse {
    /// False when at least one page failed
    pub success: bool,
    pub pages_sent: usize,
    pub users_sent: u64,
    pub page_errors: Vec<PageError>,
}

#[derive(Debug, Serialize)]
pub struct PageError {
    pub page: usize,
    pub message: String,
}
