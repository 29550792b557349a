use serde::Deserialize;

/// Approve/reject request body.
///
/// `site_url` names the brand node owning the request; the governing proxy
/// requires it, a brand node resolving its own request ignores it.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    pub request_id: String,
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}
