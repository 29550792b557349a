pub use error_location::ErrorLocation;

use std::result::Result as StdResult;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {message} {location}")]
    Validation {
        message: String,
        location: ErrorLocation,
    },

    #[error("Invalid sync action: {value} {location}")]
    InvalidSyncAction {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid change request status: {value} {location}")]
    InvalidRequestStatus {
        value: String,
        location: ErrorLocation,
    },

    #[error("Invalid sync status: {value} {location}")]
    InvalidSyncStatus {
        value: String,
        location: ErrorLocation,
    },

    #[error("Unknown patchable field: {value} {location}")]
    UnknownPatchField {
        value: String,
        location: ErrorLocation,
    },
}

pub type Result<T> = StdResult<T, CoreError>;
