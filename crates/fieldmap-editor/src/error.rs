//! Error types for the mapping editor.
//!
//! Remote failures are terminal for the operation that triggered them. None
//! of them are retried automatically; the editor state is left as it was so
//! the user can try again.

use thiserror::Error;

use crate::row::RowId;

/// Failure talking to the mapping backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response body did not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The server answered with success but reported that it did not apply
    /// the change.
    #[error("server rejected the request: {0}")]
    Rejected(String),
}

impl ApiError {
    /// Whether a manual retry has a chance of succeeding.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Decode(_) | Self::Rejected(_) => false,
        }
    }
}

/// Errors from editor operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EditorError {
    /// The field catalog could not be retrieved. The previous cache is kept.
    #[error("failed to fetch field catalog")]
    Fetch(#[source] ApiError),

    /// Persisted mappings could not be retrieved. Rows are left untouched.
    #[error("failed to load field mappings")]
    Load(#[source] ApiError),

    /// The full-replacement write was rejected. Rows are left untouched.
    #[error("failed to save field mappings")]
    Save(#[source] ApiError),

    /// No rendered row carries this id.
    #[error("row {0} does not exist")]
    UnknownRow(RowId),

    /// The value is not among the row's current options.
    #[error("{value:?} is not an available option for row {row}")]
    UnknownOption {
        /// Row that received the selection.
        row: RowId,
        /// Rejected value.
        value: String,
    },

    /// Target fields cannot be chosen before an entity type.
    #[error("row {0} has no entity type selected")]
    TargetDisabled(RowId),

    /// Saving now would drop rows whose target was never checked against
    /// the field catalog.
    #[error("{pending} row(s) wait for the field catalog; load fields before saving")]
    CatalogNotLoaded {
        /// Rows holding a persisted target that is not selected yet.
        pending: usize,
    },
}

impl EditorError {
    /// Returns a user-facing message suitable for an alert.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Fetch(_) => "Could not load the CRM field list. Please try again.",
            Self::Load(_) => "Could not load the saved field mappings.",
            Self::Save(_) => "Could not save the field mappings. Your changes are still here.",
            Self::UnknownRow(_) => "That mapping row no longer exists.",
            Self::UnknownOption { .. } => "That field is not available for this row.",
            Self::TargetDisabled(_) => "Select an entity type before choosing a CRM field.",
            Self::CatalogNotLoaded { .. } => {
                "The CRM field list is not loaded yet. Load it before saving."
            }
        }
    }

    /// The underlying backend error, if any.
    #[must_use]
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Fetch(err) | Self::Load(err) | Self::Save(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;
