//! Store trait: the abstract interface for token persistence.
//!
//! This trait keeps the issuer storage-agnostic. Implementations include
//! SQLite (primary) and in-memory (for tests).

use keymint_core::{TokenId, TokenRecord, TokenSecret};

use crate::error::{Result, StoreError};

/// Result of saving a token record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// New record written.
    Inserted,
    /// Existing record gained permission bits.
    Updated,
    /// Existing record already matched (idempotent, not an error).
    Unchanged,
}

/// The Store trait: synchronous interface for token persistence.
///
/// # Design Notes
///
/// - **Unique identifiers**: `save` rejects a record whose id or secret
///   already belongs to a different token with `Conflict`.
/// - **Grow-only permissions**: re-saving an existing id may only add
///   permission bits. Changing the secret, expiry or creation time, or
///   clearing a bit, fails with `Immutable`.
/// - **Concurrency**: implementations must make the uniqueness check and
///   the write atomic, so independent processes can issue concurrently.
pub trait Store: Send + Sync {
    /// Insert a new record, or persist added permission bits for an
    /// existing one.
    fn save(&self, record: &TokenRecord) -> Result<SaveResult>;

    /// Get a record by id.
    fn get(&self, id: &TokenId) -> Result<Option<TokenRecord>>;

    /// Check if a record exists.
    fn has(&self, id: &TokenId) -> Result<bool>;

    /// Number of stored records.
    fn count(&self) -> Result<usize>;

    /// Generate a fresh, currently unused identifier and secret.
    ///
    /// The store still enforces uniqueness on `save`; this only avoids
    /// handing out an id that is already taken.
    fn generate_credentials(&self) -> Result<(TokenId, TokenSecret)> {
        let id = TokenId::generate()?;
        let secret = TokenSecret::generate()?;

        if self.has(&id)? {
            return Err(StoreError::Generation(format!(
                "generated id {} is already taken",
                id
            )));
        }

        Ok((id, secret))
    }
}

impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    fn save(&self, record: &TokenRecord) -> Result<SaveResult> {
        (**self).save(record)
    }

    fn get(&self, id: &TokenId) -> Result<Option<TokenRecord>> {
        (**self).get(id)
    }

    fn has(&self, id: &TokenId) -> Result<bool> {
        (**self).has(id)
    }

    fn count(&self) -> Result<usize> {
        (**self).count()
    }

    fn generate_credentials(&self) -> Result<(TokenId, TokenSecret)> {
        (**self).generate_credentials()
    }
}

/// Decide how a re-save of `existing` as `incoming` is applied.
///
/// Both backends share this rule so they agree on conflict semantics.
pub fn check_resave(existing: &TokenRecord, incoming: &TokenRecord) -> Result<SaveResult> {
    let immutable = |reason: &str| StoreError::Immutable {
        id: incoming.id().to_string(),
        reason: reason.to_string(),
    };

    if existing.secret() != incoming.secret() {
        return Err(StoreError::Conflict(format!(
            "token id {} already issued with a different secret",
            incoming.id()
        )));
    }
    if existing.expires_at() != incoming.expires_at() {
        return Err(immutable("expiry is fixed at issuance"));
    }
    if existing.created_at() != incoming.created_at() {
        return Err(immutable("creation time is fixed at issuance"));
    }
    if !incoming.permissions().contains(existing.permissions()) {
        return Err(immutable("permission bits can only be added"));
    }

    if incoming.permissions() == existing.permissions() {
        Ok(SaveResult::Unchanged)
    } else {
        Ok(SaveResult::Updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keymint_core::{Expiry, Permissions, SECRET_LEN};

    fn record(secret: u8, perms: u64, created_at: i64) -> TokenRecord {
        TokenRecord::new(
            TokenId::NIL,
            TokenSecret::from_bytes([secret; SECRET_LEN]),
            Expiry::Never,
            Permissions::from_bits(perms),
            created_at,
        )
        .unwrap()
    }

    #[test]
    fn test_resave_adds_bits() {
        let r = check_resave(&record(1, 0b01, 0), &record(1, 0b11, 0)).unwrap();
        assert_eq!(r, SaveResult::Updated);
    }

    #[test]
    fn test_resave_unchanged() {
        let r = check_resave(&record(1, 0b01, 0), &record(1, 0b01, 0)).unwrap();
        assert_eq!(r, SaveResult::Unchanged);
    }

    #[test]
    fn test_resave_cannot_clear_bits() {
        let r = check_resave(&record(1, 0b11, 0), &record(1, 0b10, 0));
        assert!(matches!(r, Err(StoreError::Immutable { .. })));
    }

    #[test]
    fn test_resave_different_secret_conflicts() {
        let r = check_resave(&record(1, 0, 0), &record(2, 0, 0));
        assert!(matches!(r, Err(StoreError::Conflict(_))));
    }

    #[test]
    fn test_resave_created_at_fixed() {
        let r = check_resave(&record(1, 0, 0), &record(1, 0, 5));
        assert!(matches!(r, Err(StoreError::Immutable { .. })));
    }
}
