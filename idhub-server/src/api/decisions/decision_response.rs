use serde::Serialize;

/// Approve/reject acknowledgement
#[derive(Debug, Serialize)]
pub struct DecisionResponse {
    pub success: bool,
}
