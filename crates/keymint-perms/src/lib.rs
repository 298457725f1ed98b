//! # keymint Permissions
//!
//! Permission catalog and the codec that turns permission lists into a
//! bitmask.
//!
//! ## Overview
//!
//! A permission list mixes two kinds of entries:
//!
//! - **Bit positions**: integers such as `"2"`, which set `1 << 2`
//! - **Level names**: strings such as `"admin"`, resolved through a
//!   [`PermissionCatalog`]
//!
//! A separate raw seed is accepted as an exact mask and OR-ed in verbatim.
//!
//! ## Usage
//!
//! ```rust
//! use keymint_perms::{PermissionCodec, StaticCatalog};
//!
//! let catalog = StaticCatalog::builtin();
//! let codec = PermissionCodec::new(&catalog);
//!
//! let encoded = codec.encode_list(Some(4), Some("read, 5")).unwrap();
//! assert_eq!(encoded.base.bits(), 4);
//! assert_eq!(encoded.mask.bits(), 4 | 2 | 32);
//! ```

pub mod catalog;
pub mod codec;
pub mod error;

pub use catalog::{PermissionCatalog, PermissionLevel, StaticCatalog, DEFAULT_LEVELS};
pub use codec::{split_permission_list, EncodedPermissions, PermissionCodec, PermissionEntry};
pub use error::{PermsError, Result};
