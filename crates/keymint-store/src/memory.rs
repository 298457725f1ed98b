//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use keymint_core::{TokenId, TokenRecord, TokenSecret};

use crate::error::{Result, StoreError};
use crate::traits::{check_resave, SaveResult, Store};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Records indexed by id.
    tokens: HashMap<TokenId, TokenRecord>,

    /// Secret index: secret -> owning id.
    secrets: HashMap<TokenSecret, TokenId>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::Poisoned(e.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn save(&self, record: &TokenRecord) -> Result<SaveResult> {
        let mut inner = self.write()?;

        if let Some(existing) = inner.tokens.get(record.id()) {
            let result = check_resave(existing, record)?;
            if result == SaveResult::Updated {
                inner.tokens.insert(*record.id(), record.clone());
            }
            return Ok(result);
        }

        if let Some(owner) = inner.secrets.get(record.secret()) {
            return Err(StoreError::Conflict(format!(
                "secret already belongs to token {}",
                owner
            )));
        }

        inner.secrets.insert(record.secret().clone(), *record.id());
        inner.tokens.insert(*record.id(), record.clone());

        Ok(SaveResult::Inserted)
    }

    fn get(&self, id: &TokenId) -> Result<Option<TokenRecord>> {
        Ok(self.read()?.tokens.get(id).cloned())
    }

    fn has(&self, id: &TokenId) -> Result<bool> {
        Ok(self.read()?.tokens.contains_key(id))
    }

    fn count(&self) -> Result<usize> {
        Ok(self.read()?.tokens.len())
    }
}
