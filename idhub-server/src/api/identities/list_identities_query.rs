use serde::Deserialize;

/// Query string of the identity listing
#[derive(Debug, Default, Deserialize)]
pub struct ListIdentitiesQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub search: Option<String>,
    pub role: Option<String>,
    pub site: Option<String>,
}
