//! Field-level diffing of a proposed profile edit against stored values.
//!
//! Only the fixed allow-list of identity fields (PatchField::ALL) lands in
//! `data`; every proposed metadata key lands in `metadata`. Unchanged values
//! produce no entry.

use crate::{FieldChange, LocalUser, PatchField};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The edit a user attempted, before it is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedProfile {
    pub email: Option<String>,
    pub url: Option<String>,
    pub display_name: Option<String>,
    pub username: Option<String>,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl ProposedProfile {
    fn value_for(&self, field: PatchField) -> Option<&str> {
        match field {
            PatchField::Email => self.email.as_deref(),
            PatchField::Url => self.url.as_deref(),
            PatchField::DisplayName => self.display_name.as_deref(),
            PatchField::Username => self.username.as_deref(),
        }
    }
}

/// Compute (data, metadata) change maps for a change request.
pub fn compute_profile_diff(
    current: &LocalUser,
    proposed: &ProposedProfile,
) -> (BTreeMap<String, FieldChange>, BTreeMap<String, FieldChange>) {
    let mut data = BTreeMap::new();
    for field in PatchField::ALL {
        if let Some(new_value) = proposed.value_for(field) {
            let old_value = field.current_value(current);
            if new_value != old_value {
                data.insert(
                    field.as_str().to_string(),
                    FieldChange::new(old_value, new_value),
                );
            }
        }
    }

    let mut metadata = BTreeMap::new();
    for (key, new_value) in &proposed.meta {
        let old_value = current.meta_value(key);
        if new_value != old_value {
            metadata.insert(key.clone(), FieldChange::new(old_value, new_value.clone()));
        }
    }

    (data, metadata)
}
