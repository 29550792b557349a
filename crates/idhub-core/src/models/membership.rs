use crate::normalize_site_url;

use serde::{Deserialize, Serialize};

/// One identity's presence on a single brand node: the node's display name,
/// its normalized URL, the user id local to that node, and the role set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteMembership {
    pub site_name: String,
    /// Stored normalized (trailing-slash-insensitive).
    pub site_url: String,
    pub local_user_id: String,
    pub roles: Vec<String>,
}

impl SiteMembership {
    pub fn new(site_name: String, site_url: &str, local_user_id: String, roles: Vec<String>) -> Self {
        Self {
            site_name,
            site_url: normalize_site_url(site_url),
            local_user_id,
            roles: dedupe_roles(roles),
        }
    }

    /// Whether this membership belongs to the given site URL.
    pub fn is_for_site(&self, site_url: &str) -> bool {
        self.site_url == normalize_site_url(site_url)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Roles are a set: duplicates collapse, first occurrence order is kept.
fn dedupe_roles(roles: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(roles.len());
    for role in roles {
        if !out.contains(&role) {
            out.push(role);
        }
    }
    out
}
