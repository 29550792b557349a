use crate::normalize_site_url;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A brand node registered with the governing node.
///
/// The api_key authorizes inbound calls from the node and authenticates
/// outbound calls to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRegistration {
    pub id: Uuid,
    pub name: String,
    /// Stored normalized, unique across registrations.
    pub url: String,
    pub api_key: String,
}

impl SiteRegistration {
    pub fn new(name: String, url: &str, api_key: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            url: normalize_site_url(url),
            api_key,
        }
    }
}
