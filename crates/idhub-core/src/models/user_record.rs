//! The wire record a brand node sends to the governing node's ingestion
//! endpoint, one per local user per batch.

use crate::{LocalUser, SiteMembership, SyncAction};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub site_name: String,
    pub site_url: String,
    pub action: SyncAction,
}

impl UserRecord {
    pub fn from_local_user(
        user: &LocalUser,
        site_name: &str,
        site_url: &str,
        action: SyncAction,
    ) -> Self {
        Self {
            user_id: user.id.to_string(),
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            roles: user.roles.clone(),
            site_name: site_name.to_string(),
            site_url: site_url.to_string(),
            action,
        }
    }

    /// Boundary validation for inbound records. Invalid records are dropped
    /// from the batch silently; only the aggregate processed count surfaces.
    pub fn is_valid(&self) -> bool {
        !self.user_id.trim().is_empty()
            && is_well_formed_email(&self.email)
            && !self.site_url.trim().is_empty()
    }

    /// The membership this record contributes to the deduplicated identity.
    pub fn membership(&self) -> SiteMembership {
        SiteMembership::new(
            self.site_name.clone(),
            &self.site_url,
            self.user_id.clone(),
            self.roles.clone(),
        )
    }
}

/// Minimal well-formedness check: non-empty, exactly one '@' with a non-empty
/// local part and a dot-bearing domain, no whitespace.
pub fn is_well_formed_email(email: &str) -> bool {
    if email.is_empty() || email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let (local, domain) = match (parts.next(), parts.next()) {
        (Some(l), Some(d)) => (l, d),
        _ => return false,
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
