//! # keymint Store
//!
//! Storage abstraction for keymint. Provides a trait-based interface for
//! token persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The store module abstracts token storage behind the [`Store`] trait,
//! allowing the issuer to be storage-agnostic. The primary implementation
//! is [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`Store`] - The trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`SaveResult`] - Result of saving a token record
//!
//! ## Usage
//!
//! ```rust,no_run
//! use keymint_store::{SqliteStore, Store};
//!
//! // Open a SQLite database
//! let store = SqliteStore::open("keymint.db").unwrap();
//!
//! // Or use an in-memory database for testing
//! let store = SqliteStore::open_memory().unwrap();
//!
//! let (_id, _secret) = store.generate_credentials().unwrap();
//! // let record = TokenRecord::new(id, secret, ...);
//! // store.save(&record).unwrap();
//! ```
//!
//! ## Design Notes
//!
//! - **Idempotent saves**: Saving the same record twice returns `Unchanged`
//! - **Conflict detection**: A reused id or secret returns `Conflict`
//! - **Grow-only permissions**: Re-saves may add bits but never clear them

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{check_resave, SaveResult, Store};
