use idhub_core::SiteRegistration;

use serde::Serialize;

/// Site registration DTO. The api_key is write-only and never echoed back.
#[derive(Debug, Serialize)]
pub struct SiteDto {
    pub id: String,
    pub name: String,
    pub url: String,
}

impl From<SiteRegistration> for SiteDto {
    fn from(s: SiteRegistration) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name,
            url: s.url,
        }
    }
}

/// Single site response
#[derive(Debug, Serialize)]
pub struct SiteResponse {
    pub site: SiteDto,
}

/// List of registered sites
#[derive(Debug, Serialize)]
pub struct SiteListResponse {
    pub sites: Vec<SiteDto>,
}
