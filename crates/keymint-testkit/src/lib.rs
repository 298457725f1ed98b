//! # keymint Testkit
//!
//! Testing utilities for keymint.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known permission lists with the masks they must encode to
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: An issuer over a store that records saves and injects failures
//!
//! ## Golden Vectors
//!
//! ```rust
//! use keymint_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches) in verify_all_vectors() {
//!     assert!(matches, "{}", name);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use keymint_testkit::{RequestParams, TestFixture};
//!
//! proptest! {
//!     #[test]
//!     fn issued_mask_is_expected(params: RequestParams) {
//!         let fixture = TestFixture::new();
//!         let record = fixture.issue(&params.to_request()).unwrap();
//!         prop_assert_eq!(record.permissions(), params.expected_mask());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use keymint::IssueRequest;
//! use keymint_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let read = fixture.level_bits("read");
//!
//! // The list adds a bit beyond the seed, so the record is saved twice.
//! let record = fixture.issue(&IssueRequest::new(-1).permission("read")).unwrap();
//! assert_eq!(fixture.store.save_count(), 2);
//! assert_eq!(record.permissions().bits(), read);
//!
//! // A seed that already covers the list needs a single save.
//! let fixture = TestFixture::new();
//! let request = IssueRequest::new(-1).raw_permissions(read as i64).permission("read");
//! fixture.issue(&request).unwrap();
//! assert_eq!(fixture.store.save_count(), 1);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{RecordingStore, TestFixture};
pub use generators::RequestParams;
pub use vectors::{all_vectors, encode_vector, verify_all_vectors, GoldenVector};
