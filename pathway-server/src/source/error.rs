//! Upstream source error types.

use crate::encode::EncodeError;

/// Errors from fetching or publishing upstream facility data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check ACCESSIBILITY_CLOUD_TOKEN")]
    Unauthorized,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Fetched data could not be encoded
    #[error("snapshot rejected: {0}")]
    Rejected(#[from] EncodeError),
}
