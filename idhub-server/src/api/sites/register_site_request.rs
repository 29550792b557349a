use serde::Deserialize;

/// New brand node registration
#[derive(Debug, Deserialize)]
pub struct RegisterSiteRequest {
    pub name: String,
    pub url: String,
    pub api_key: String,
}
