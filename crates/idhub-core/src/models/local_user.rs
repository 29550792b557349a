//! The authoritative local user account on a brand node.
//!
//! This row is the minimal profile the change-request workflow intercepts
//! edits against and applies approved patches to.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub url: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
    /// Arbitrary profile attributes (metadata keys in change requests).
    pub meta: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LocalUser {
    pub fn new(email: String, username: String, display_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            display_name,
            url: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            roles: Vec::new(),
            meta: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn meta_value(&self, key: &str) -> &str {
        self.meta.get(key).map(String::as_str).unwrap_or("")
    }
}
