use serde::Serialize;

/// Outcome of an intercepted profile edit
#[derive(Debug, Serialize)]
pub struct EditProfileResponse {
    /// False when nothing changed or a pending request already exists
    pub request_raised: bool,
    pub request_id: Option<String>,
}
