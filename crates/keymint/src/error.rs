//! Error types for token issuance.

use std::fmt;

use keymint_core::{CoreError, TokenId};
use keymint_perms::PermsError;
use keymint_store::StoreError;
use thiserror::Error;

/// Which of the two saves of an issuance failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStep {
    /// The initial save. No record exists.
    First,
    /// The save adding list-derived bits. The record exists with only the
    /// seed mask.
    Second,
}

impl fmt::Display for SaveStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveStep::First => f.write_str("first save"),
            SaveStep::Second => f.write_str("second save (permissions may be incomplete)"),
        }
    }
}

/// Errors that can occur while issuing a token.
#[derive(Debug, Error)]
pub enum IssueError {
    /// Malformed or out-of-range input.
    #[error("invalid argument {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    /// A permission list entry is neither an integer nor a catalog level.
    #[error("permission name {0:?} is invalid")]
    UnknownPermissionName(String),

    /// Identifier or secret generation failed. Nothing was persisted.
    #[error("token generation failed: {0}")]
    GenerationFailure(String),

    /// The store rejected a save.
    #[error("{step} of token {token} failed: {source}")]
    PersistenceFailure {
        step: SaveStep,
        token: TokenId,
        source: StoreError,
    },
}

impl IssueError {
    /// Whether a token record may exist despite the error.
    pub fn record_exists(&self) -> bool {
        matches!(
            self,
            IssueError::PersistenceFailure {
                step: SaveStep::Second,
                ..
            }
        )
    }
}

impl From<CoreError> for IssueError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidArgument { field, reason } => {
                IssueError::InvalidArgument { field, reason }
            }
            CoreError::Generation(msg) => IssueError::GenerationFailure(msg),
            CoreError::DecodingError(msg) => IssueError::InvalidArgument {
                field: "token",
                reason: msg,
            },
        }
    }
}

impl From<PermsError> for IssueError {
    fn from(e: PermsError) -> Self {
        match e {
            PermsError::UnknownPermissionName(name) => IssueError::UnknownPermissionName(name),
            PermsError::InvalidArgument { field, reason } => {
                IssueError::InvalidArgument { field, reason }
            }
            other => IssueError::InvalidArgument {
                field: "permissions",
                reason: other.to_string(),
            },
        }
    }
}

/// Result type for issuance.
pub type Result<T> = std::result::Result<T, IssueError>;
