//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Identifier or secret generation failed.
    #[error("credential generation failed: {0}")]
    Generation(String),

    /// Identifier or secret already belongs to another token.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A re-save tried to change an immutable field or clear permission bits.
    #[error("token {id} cannot be modified: {reason}")]
    Immutable { id: String, reason: String },

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Lock poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    Poisoned(String),
}

impl From<keymint_core::CoreError> for StoreError {
    fn from(e: keymint_core::CoreError) -> Self {
        match e {
            keymint_core::CoreError::Generation(msg) => StoreError::Generation(msg),
            other => StoreError::InvalidData(other.to_string()),
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
