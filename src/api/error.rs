//! API error types for the AC management API client.

use thiserror::Error;

/// Error type for every client operation.
///
/// Callers are expected to branch on the variant. [`ApiError::Remote`] carries
/// the appliance's own message, localized when the client was built with
/// `localized_errors(true)`, and is meant for direct display.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection failure, timeout, or I/O error while reading the body
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The appliance answered with a zero-length body
    #[error("Empty response body")]
    EmptyResponse,

    /// Malformed JSON, or `data` did not match the requested shape
    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// The appliance reported a failure (`code != 0`)
    #[error("Appliance error {code}: {message}")]
    Remote { code: i64, message: String },

    /// A required argument was missing or invalid; no request was sent
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ApiError {
    /// The appliance's error code, if this is a [`ApiError::Remote`].
    pub fn remote_code(&self) -> Option<i64> {
        match self {
            ApiError::Remote { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the failure happened before a response envelope was decoded.
    pub fn is_transport(&self) -> bool {
        match self {
            #[cfg(feature = "http")]
            ApiError::Http(_) => true,
            ApiError::EmptyResponse => true,
            _ => false,
        }
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
