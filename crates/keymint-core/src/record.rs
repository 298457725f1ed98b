//! Token record: the persisted form of one issued credential.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::expiry::Expiry;
use crate::permissions::Permissions;
use crate::types::{TokenId, TokenSecret};

/// An issued access token.
///
/// Fields are private so a record can only change by gaining permission
/// bits through [`TokenRecord::grant`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    id: TokenId,
    secret: TokenSecret,
    expires_at: Option<i64>,
    permissions: Permissions,
    created_at: i64,
}

impl TokenRecord {
    /// Assemble a record.
    ///
    /// Fails if the expiry is not strictly after `created_at`.
    pub fn new(
        id: TokenId,
        secret: TokenSecret,
        expiry: Expiry,
        permissions: Permissions,
        created_at: i64,
    ) -> Result<Self> {
        let expires_at = expiry.timestamp();
        if let Some(ts) = expires_at {
            if ts <= created_at {
                return Err(CoreError::invalid(
                    "expires_at",
                    format!("{} is not after creation time {}", ts, created_at),
                ));
            }
        }

        Ok(Self {
            id,
            secret,
            expires_at,
            permissions,
            created_at,
        })
    }

    /// Rebuild a record from stored columns without re-validating.
    pub fn from_parts(
        id: TokenId,
        secret: TokenSecret,
        expires_at: Option<i64>,
        permissions: Permissions,
        created_at: i64,
    ) -> Self {
        Self {
            id,
            secret,
            expires_at,
            permissions,
            created_at,
        }
    }

    pub fn id(&self) -> &TokenId {
        &self.id
    }

    pub fn secret(&self) -> &TokenSecret {
        &self.secret
    }

    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// OR additional bits into the mask. Bits are never cleared.
    ///
    /// Returns true if any new bit was set.
    pub fn grant(&mut self, extra: Permissions) -> bool {
        let before = self.permissions;
        self.permissions |= extra;
        self.permissions != before
    }

    /// Whether the token has expired at `now` (Unix milliseconds).
    pub fn is_expired(&self, now: i64) -> bool {
        matches!(self.expires_at, Some(ts) if now >= ts)
    }
}
