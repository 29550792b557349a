use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing access token {location}")]
    MissingToken { location: ErrorLocation },

    #[error("Invalid access token {location}")]
    InvalidToken { location: ErrorLocation },

    #[error("No registration matches the caller {location}")]
    UnknownCaller { location: ErrorLocation },
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingToken { .. } => "MISSING_TOKEN",
            Self::InvalidToken { .. } => "INVALID_TOKEN",
            Self::UnknownCaller { .. } => "UNKNOWN_CALLER",
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
