//! Client construction errors and HTTP error mapping.

use fieldmap_editor::ApiError;
use thiserror::Error;

/// Errors raised while building a [`MappingClient`](crate::MappingClient).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The configured base URL cannot carry endpoint paths.
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl {
        /// URL as configured.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The HTTP client could not be initialized.
    #[error("failed to create HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

/// Result type alias for client construction.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Maps a transport-level failure onto the editor's error type.
pub(crate) fn api_error(err: &reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}
