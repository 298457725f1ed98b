//! Permission-level catalog.
//!
//! The catalog maps level names to fixed bit positions. It is owned by the
//! surrounding system and read-only here, so it is passed in rather than
//! looked up from a global.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use keymint_core::MAX_BIT;

use crate::codec::is_integer;
use crate::error::{PermsError, Result};

/// A named capability bound to a bit position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionLevel {
    pub name: String,
    pub bit: u8,
}

impl PermissionLevel {
    pub fn new(name: impl Into<String>, bit: u8) -> Self {
        Self {
            name: name.into(),
            bit,
        }
    }
}

/// Read-only lookup of permission levels by name.
pub trait PermissionCatalog {
    /// Bit position for an exact, case-sensitive name match.
    fn lookup(&self, name: &str) -> Option<u8>;

    /// Name of the level at `bit`, if any.
    fn name_of(&self, bit: u8) -> Option<&str>;
}

impl<C: PermissionCatalog + ?Sized> PermissionCatalog for &C {
    fn lookup(&self, name: &str) -> Option<u8> {
        (**self).lookup(name)
    }

    fn name_of(&self, bit: u8) -> Option<&str> {
        (**self).name_of(bit)
    }
}

impl<C: PermissionCatalog + ?Sized> PermissionCatalog for std::sync::Arc<C> {
    fn lookup(&self, name: &str) -> Option<u8> {
        (**self).lookup(name)
    }

    fn name_of(&self, bit: u8) -> Option<&str> {
        (**self).name_of(bit)
    }
}

/// Levels shipped with keymint when no catalog file is configured.
pub const DEFAULT_LEVELS: &[(&str, u8)] = &[
    ("admin", 0),
    ("read", 1),
    ("write", 2),
    ("create", 3),
    ("delete", 4),
    ("execute", 5),
    ("tokens", 6),
];

/// An in-memory catalog.
///
/// Names and bit positions are both unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCatalog {
    by_name: BTreeMap<String, u8>,
    by_bit: BTreeMap<u8, String>,
}

impl StaticCatalog {
    /// Build a catalog from a list of levels.
    pub fn new(levels: impl IntoIterator<Item = PermissionLevel>) -> Result<Self> {
        let mut catalog = Self::default();

        for level in levels {
            if level.name.is_empty() || level.name.trim() != level.name {
                return Err(PermsError::InvalidCatalog(format!(
                    "level name {:?} must be non-empty without surrounding whitespace",
                    level.name
                )));
            }
            if is_integer(&level.name) {
                return Err(PermsError::InvalidCatalog(format!(
                    "level name {:?} would be read as a bit position",
                    level.name
                )));
            }
            if level.bit > MAX_BIT {
                return Err(PermsError::InvalidCatalog(format!(
                    "level {} uses bit {} (maximum {})",
                    level.name, level.bit, MAX_BIT
                )));
            }
            if let Some(existing) = catalog.by_bit.get(&level.bit) {
                return Err(PermsError::InvalidCatalog(format!(
                    "bit {} assigned to both {} and {}",
                    level.bit, existing, level.name
                )));
            }
            if catalog.by_name.contains_key(&level.name) {
                return Err(PermsError::InvalidCatalog(format!(
                    "level {} defined twice",
                    level.name
                )));
            }

            catalog.by_bit.insert(level.bit, level.name.clone());
            catalog.by_name.insert(level.name, level.bit);
        }

        Ok(catalog)
    }

    /// The built-in levels.
    pub fn builtin() -> Self {
        Self::new(
            DEFAULT_LEVELS
                .iter()
                .map(|(name, bit)| PermissionLevel::new(*name, *bit)),
        )
        .unwrap_or_default()
    }

    /// Parse a JSON object of `name -> bit`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, u8> = serde_json::from_str(json)?;
        Self::new(raw.into_iter().map(|(name, bit)| PermissionLevel::new(name, bit)))
    }

    /// Load a JSON catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// All levels ordered by bit position.
    pub fn levels(&self) -> Vec<PermissionLevel> {
        self.by_bit
            .iter()
            .map(|(bit, name)| PermissionLevel::new(name.clone(), *bit))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl PermissionCatalog for StaticCatalog {
    fn lookup(&self, name: &str) -> Option<u8> {
        self.by_name.get(name).copied()
    }

    fn name_of(&self, bit: u8) -> Option<&str> {
        self.by_bit.get(&bit).map(String::as_str)
    }
}
