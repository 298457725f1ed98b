//! Error types for keymint core.

use thiserror::Error;

/// Core errors that can occur while building token records.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An input field is malformed or out of range.
    #[error("invalid argument {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    /// The entropy source could not produce identifier or secret bytes.
    #[error("credential generation failed: {0}")]
    Generation(String),

    /// A stored id or secret could not be parsed.
    #[error("decoding error: {0}")]
    DecodingError(String),
}

impl CoreError {
    /// Shorthand for an [`CoreError::InvalidArgument`].
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CoreError::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
