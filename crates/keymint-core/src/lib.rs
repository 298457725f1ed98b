//! # keymint Core
//!
//! Pure primitives for keymint: token identifiers, secrets, permission
//! masks, expiry calculation and the token record.
//!
//! This crate contains no storage and no output formatting. The only I/O is
//! reading the OS entropy source and the wall clock.
//!
//! ## Key Types
//!
//! - [`TokenRecord`] - One issued credential
//! - [`TokenId`] - Random UUID identifying a token
//! - [`TokenSecret`] - The bearer secret, redacted in `Debug`
//! - [`Permissions`] - Bitmask of granted capabilities
//! - [`Expiry`] - Absolute expiry or "never"

pub mod error;
pub mod expiry;
pub mod permissions;
pub mod record;
pub mod types;

pub use error::{CoreError, Result};
pub use expiry::{compute_expiry, now_millis, parse_days, Expiry, DAY_MILLIS, DEFAULT_DAYS, NEVER_EXPIRES};
pub use permissions::{Permissions, MAX_BIT};
pub use record::TokenRecord;
pub use types::{TokenId, TokenSecret, SECRET_LEN};
