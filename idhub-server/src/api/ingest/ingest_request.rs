use idhub_core::UserRecord;

use serde::Deserialize;

/// One inbound batch of user records from a brand node
#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    pub users: Vec<UserRecord>,
}
