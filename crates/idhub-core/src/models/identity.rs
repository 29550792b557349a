//! Deduplicated identity - the governing node's merged view of one person
//! across all brand-node memberships. Keyed by email (unique).

use crate::SiteMembership;
use crate::normalize_site_url;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeduplicatedIdentity {
    pub id: Uuid,
    /// Unique key. Comparison is case-sensitive.
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub sites: Vec<SiteMembership>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DeduplicatedIdentity {
    /// Create a new identity with a single membership.
    pub fn new(
        email: String,
        first_name: String,
        last_name: String,
        membership: SiteMembership,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            first_name,
            last_name,
            sites: vec![membership],
            created_at: now,
            updated_at: now,
        }
    }

    pub fn membership_for(&self, site_url: &str) -> Option<&SiteMembership> {
        let normalized = normalize_site_url(site_url);
        self.sites.iter().find(|m| m.site_url == normalized)
    }

    /// Add or replace the membership for the membership's site.
    ///
    /// At most one membership per normalized URL: a membership for an
    /// already-present site overwrites that entry in place instead of
    /// appending a duplicate.
    pub fn upsert_site(&mut self, membership: SiteMembership) {
        match self
            .sites
            .iter_mut()
            .find(|m| m.site_url == membership.site_url)
        {
            Some(existing) => *existing = membership,
            None => self.sites.push(membership),
        }
        self.updated_at = Utc::now();
    }

    /// Remove the membership for `site_url`. Returns true if one was removed.
    /// The caller deletes the whole identity when `sites` becomes empty.
    pub fn remove_site(&mut self, site_url: &str) -> bool {
        let normalized = normalize_site_url(site_url);
        let before = self.sites.len();
        self.sites.retain(|m| m.site_url != normalized);
        let removed = self.sites.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.sites.iter().any(|m| m.has_role(role))
    }

    /// Substring search across email and names.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.email.to_lowercase().contains(&needle)
            || self.first_name.to_lowercase().contains(&needle)
            || self.last_name.to_lowercase().contains(&needle)
    }

    /// Site filter: matches by site URL or site name substring.
    pub fn matches_site(&self, site: &str) -> bool {
        let needle = site.to_lowercase();
        self.sites.iter().any(|m| {
            m.site_url.to_lowercase().contains(&needle)
                || m.site_name.to_lowercase().contains(&needle)
        })
    }
}

/// Filters for querying the identity store.
#[derive(Debug, Clone, Default)]
pub struct IdentityFilter {
    pub search: Option<String>,
    pub role: Option<String>,
    pub site: Option<String>,
}

impl IdentityFilter {
    pub fn matches(&self, identity: &DeduplicatedIdentity) -> bool {
        if let Some(ref search) = self.search
            && !identity.matches_search(search)
        {
            return false;
        }
        if let Some(ref role) = self.role
            && !identity.has_role(role)
        {
            return false;
        }
        if let Some(ref site) = self.site
            && !identity.matches_site(site)
        {
            return false;
        }
        true
    }
}
