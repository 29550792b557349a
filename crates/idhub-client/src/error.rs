use error_location::ErrorLocation;
use std::panic::Location;
use thiserror::Error;

/// Errors from node-to-node API calls.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error: {message} (code: {code}, status: {status}) {location}")]
    Api {
        code: String,
        message: String,
        status: u16,
        location: ErrorLocation,
    },

    #[error("Malformed response body: {message} {location}")]
    MalformedBody {
        message: String,
        location: ErrorLocation,
    },
}

impl ClientError {
    #[track_caller]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        ClientError::Http {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        ClientError::MalformedBody {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Whether a retry could plausibly succeed. Timeouts, connection
    /// failures and 5xx responses are transient; 4xx responses and bodies
    /// the remote node produced wrongly are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { source, .. } => {
                source.is_timeout()
                    || source.is_connect()
                    || source.status().is_none_or(|s| s.is_server_error())
            }
            Self::Api { status, .. } => *status >= 500,
            Self::MalformedBody { .. } => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        ClientError::from_reqwest(err)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
