//! Error types for the permissions module.

use thiserror::Error;

/// Errors that can occur while encoding permissions.
#[derive(Debug, Error)]
pub enum PermsError {
    /// Entry matches neither integer syntax nor a catalog level.
    #[error("permission name {0:?} is invalid")]
    UnknownPermissionName(String),

    /// Raw seed or bit position out of range.
    #[error("invalid argument {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    /// Catalog definition is inconsistent.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Catalog file could not be parsed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Catalog file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<keymint_core::CoreError> for PermsError {
    fn from(e: keymint_core::CoreError) -> Self {
        match e {
            keymint_core::CoreError::InvalidArgument { field, reason } => {
                PermsError::InvalidArgument { field, reason }
            }
            other => PermsError::InvalidArgument {
                field: "permissions",
                reason: other.to_string(),
            },
        }
    }
}

/// Result type for permission operations.
pub type Result<T> = std::result::Result<T, PermsError>;
