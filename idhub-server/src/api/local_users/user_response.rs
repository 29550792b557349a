use idhub_core::LocalUser;

use serde::Serialize;

/// Single local user response
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: LocalUser,
}
