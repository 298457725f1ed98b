//! # keymint
//!
//! The unified API for keymint: issue opaque access tokens with an expiry
//! horizon and a permission bitmask.
//!
//! ## Overview
//!
//! One issuance composes three steps:
//!
//! - **Expiry**: a day offset becomes an absolute timestamp, or "never"
//!   for `-1`
//! - **Permissions**: a raw seed mask and a list of bit positions and level
//!   names become one bitmask
//! - **Persistence**: a fresh identifier and secret are generated and the
//!   record is saved to a [`store::Store`]
//!
//! ## Key Concepts
//!
//! - **Validation first**: nothing is generated or saved for a request that
//!   fails validation.
//! - **Two-phase save**: by default the record is saved with the seed mask,
//!   then saved again if the list added bits. A failure between the two is
//!   reported as [`SaveStep::Second`]. [`SaveMode::Single`] saves once.
//! - **Grow-only permissions**: bits are never cleared once set.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use keymint::{IssueRequest, Issuer, IssuerConfig};
//! use keymint::perms::StaticCatalog;
//! use keymint::store::SqliteStore;
//!
//! let store = SqliteStore::open("keymint.db").unwrap();
//! let issuer = Issuer::new(store, StaticCatalog::builtin(), IssuerConfig::default());
//!
//! let request = IssueRequest::new(30).raw_permissions(4).permission_list("read, admin");
//! let record = issuer.issue(&request).unwrap();
//! println!("{}", record.id());
//! ```
//!
//! ## Re-exports
//!
//! - `keymint::core` - Core primitives (TokenRecord, TokenId, Permissions)
//! - `keymint::perms` - Permission catalog and codec
//! - `keymint::store` - Storage abstraction and SQLite

pub mod error;
pub mod issuer;

// Re-export component crates
pub use keymint_core as core;
pub use keymint_perms as perms;
pub use keymint_store as store;

// Re-export main types for convenience
pub use error::{IssueError, Result, SaveStep};
pub use issuer::{IssueRequest, Issuer, IssuerConfig, SaveMode, ValidatedRequest};

// Re-export commonly used core types
pub use keymint_core::{Expiry, Permissions, TokenId, TokenRecord, TokenSecret};
