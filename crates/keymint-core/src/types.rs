//! Strong type definitions for keymint.
//!
//! Identifiers and secrets are newtypes so one can never be passed where the
//! other is expected.

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// Length of a token secret in bytes.
pub const SECRET_LEN: usize = 32;

/// A token identifier: a random (v4) UUID.
///
/// This is the value printed to the administrator after issuance.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub Uuid);

impl TokenId {
    /// Generate a fresh identifier from the OS entropy source.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; 16];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CoreError::Generation(format!("token id: {}", e)))?;
        Ok(Self(uuid::Builder::from_random_bytes(bytes).into_uuid()))
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse from the hyphenated string form.
    pub fn parse(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| CoreError::DecodingError(format!("token id {:?}: {}", s, e)))
    }

    /// The nil identifier, never produced by [`TokenId::generate`].
    pub const NIL: Self = Self(Uuid::nil());

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({})", self.0)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl From<Uuid> for TokenId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// The bearer secret of a token: 32 random bytes.
///
/// Written once at issuance. `Debug` never prints the bytes.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenSecret([u8; SECRET_LEN]);

impl TokenSecret {
    /// Generate a fresh secret from the OS entropy source.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; SECRET_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CoreError::Generation(format!("token secret: {}", e)))?;
        Ok(Self(bytes))
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; SECRET_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; SECRET_LEN] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s).map_err(|e| CoreError::DecodingError(e.to_string()))?;
        let arr: [u8; SECRET_LEN] = bytes.try_into().map_err(|_| {
            CoreError::DecodingError(format!("secret must be {} bytes", SECRET_LEN))
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret(<redacted>)")
    }
}
