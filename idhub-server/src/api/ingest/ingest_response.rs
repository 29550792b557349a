use serde::Serialize;

/// Ingest acknowledgement: how many records of the batch were applied
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    pub users_processed: u64,
}
