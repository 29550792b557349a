//! The closed set of identity-affecting profile fields a change request may
//! patch. Unknown field names are rejected rather than dispatched by name.

use crate::{CoreError, ErrorLocation, LocalUser};

use std::panic::Location;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchField {
    Email,
    Url,
    DisplayName,
    Username,
}

impl PatchField {
    /// The allow-list used when diffing a proposed profile edit.
    pub const ALL: [PatchField; 4] = [
        PatchField::Email,
        PatchField::Url,
        PatchField::DisplayName,
        PatchField::Username,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatchField::Email => "email",
            PatchField::Url => "url",
            PatchField::DisplayName => "display_name",
            PatchField::Username => "username",
        }
    }

    /// Current value of this field on a user.
    pub fn current_value<'a>(&self, user: &'a LocalUser) -> &'a str {
        match self {
            PatchField::Email => &user.email,
            PatchField::Url => &user.url,
            PatchField::DisplayName => &user.display_name,
            PatchField::Username => &user.username,
        }
    }

    /// Apply an approved value to the live user record.
    ///
    /// Identity-affecting fields go through their own setter arms; callers
    /// resolve the field from the stored name first, so a request carrying an
    /// unknown field fails before any change is applied.
    pub fn apply(&self, user: &mut LocalUser, value: &str) {
        match self {
            PatchField::Email => user.email = value.to_string(),
            PatchField::Url => user.url = value.to_string(),
            PatchField::DisplayName => user.display_name = value.to_string(),
            PatchField::Username => user.username = value.to_string(),
        }
    }
}

impl FromStr for PatchField {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(PatchField::Email),
            "url" => Ok(PatchField::Url),
            "display_name" => Ok(PatchField::DisplayName),
            "username" => Ok(PatchField::Username),
            _ => Err(CoreError::UnknownPatchField {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
