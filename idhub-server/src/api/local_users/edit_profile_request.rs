use std::collections::BTreeMap;

use serde::Deserialize;

/// A profile edit to intercept. Absent fields are left alone; present fields
/// are diffed against the stored profile.
#[derive(Debug, Default, Deserialize)]
pub struct EditProfileRequest {
    pub email: Option<String>,
    pub url: Option<String>,
    pub display_name: Option<String>,
    pub username: Option<String>,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
    /// Who is asking; defaults to the profile's own username
    pub requested_by: Option<String>,
}
