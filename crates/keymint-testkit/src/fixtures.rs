//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::{Arc, Mutex};

use keymint::{IssueRequest, Issuer, IssuerConfig, SaveMode};
use keymint_core::{TokenId, TokenRecord, TokenSecret};
use keymint_perms::StaticCatalog;
use keymint_store::{MemoryStore, Result, SaveResult, Store, StoreError};

/// A memory store that records every save and can inject failures.
pub struct RecordingStore {
    inner: MemoryStore,
    saves: Mutex<Vec<TokenRecord>>,
    generations: Mutex<usize>,
    /// 1-based index of the save call that should fail.
    fail_save_at: Option<usize>,
    fail_generation: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            saves: Mutex::new(Vec::new()),
            generations: Mutex::new(0),
            fail_save_at: None,
            fail_generation: false,
        }
    }

    /// Fail the `n`th call to `save` (1-based).
    pub fn failing_save(mut self, n: usize) -> Self {
        self.fail_save_at = Some(n);
        self
    }

    /// Fail every call to `generate_credentials`.
    pub fn failing_generation(mut self) -> Self {
        self.fail_generation = true;
        self
    }

    /// Every record passed to `save`, in call order, including failed calls.
    pub fn saves(&self) -> Vec<TokenRecord> {
        self.saves.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn save_count(&self) -> usize {
        self.saves().len()
    }

    pub fn generation_count(&self) -> usize {
        self.generations.lock().map(|g| *g).unwrap_or_default()
    }
}

impl Default for RecordingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for RecordingStore {
    fn save(&self, record: &TokenRecord) -> Result<SaveResult> {
        let call = {
            let mut saves = self
                .saves
                .lock()
                .map_err(|e| StoreError::Poisoned(e.to_string()))?;
            saves.push(record.clone());
            saves.len()
        };

        if self.fail_save_at == Some(call) {
            return Err(StoreError::InvalidData(format!(
                "injected failure on save {}",
                call
            )));
        }

        self.inner.save(record)
    }

    fn get(&self, id: &TokenId) -> Result<Option<TokenRecord>> {
        self.inner.get(id)
    }

    fn has(&self, id: &TokenId) -> Result<bool> {
        self.inner.has(id)
    }

    fn count(&self) -> Result<usize> {
        self.inner.count()
    }

    fn generate_credentials(&self) -> Result<(TokenId, TokenSecret)> {
        *self
            .generations
            .lock()
            .map_err(|e| StoreError::Poisoned(e.to_string()))? += 1;

        if self.fail_generation {
            return Err(StoreError::Generation("injected entropy failure".into()));
        }

        self.inner.generate_credentials()
    }
}

/// A test fixture with an issuer over a recording store and the built-in
/// catalog.
pub struct TestFixture {
    pub store: Arc<RecordingStore>,
    pub issuer: Issuer<Arc<RecordingStore>, StaticCatalog>,
}

impl TestFixture {
    /// Two-phase issuer over a healthy store.
    pub fn new() -> Self {
        Self::with_store(RecordingStore::new(), SaveMode::TwoPhase)
    }

    pub fn with_mode(mode: SaveMode) -> Self {
        Self::with_store(RecordingStore::new(), mode)
    }

    pub fn with_store(store: RecordingStore, mode: SaveMode) -> Self {
        let store = Arc::new(store);
        let issuer = Issuer::new(
            Arc::clone(&store),
            StaticCatalog::builtin(),
            IssuerConfig { save_mode: mode },
        );
        Self { store, issuer }
    }

    pub fn issue(&self, request: &IssueRequest) -> keymint::Result<TokenRecord> {
        self.issuer.issue(request)
    }

    /// Bit value of a built-in level.
    pub fn level_bits(&self, name: &str) -> u64 {
        use keymint_perms::PermissionCatalog;
        self.issuer
            .codec()
            .catalog()
            .lookup(name)
            .map(|bit| 1u64 << bit)
            .unwrap_or_default()
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
