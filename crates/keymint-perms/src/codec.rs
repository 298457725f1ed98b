//! Permission codec: mixed name / bit-position lists to a bitmask.
//!
//! Each entry of a permission list is either an integer, read as a bit
//! position, or the name of a catalog level. Entries are classified up
//! front into [`PermissionEntry`] values and only applied once every entry
//! has resolved, so a bad entry never leaves a partial mask behind.

use keymint_core::{Permissions, MAX_BIT};

use crate::catalog::PermissionCatalog;
use crate::error::{PermsError, Result};

/// A classified permission list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionEntry {
    /// An integer entry: set the bit at this position.
    Bit(u8),
    /// A catalog level matched by name.
    Level { name: String, bit: u8 },
}

impl PermissionEntry {
    /// The bit position this entry turns on.
    pub fn bit(&self) -> u8 {
        match self {
            PermissionEntry::Bit(bit) => *bit,
            PermissionEntry::Level { bit, .. } => *bit,
        }
    }
}

/// Result of encoding a seed and a permission list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedPermissions {
    /// The raw seed mask alone (0 when absent).
    pub base: Permissions,
    /// The seed OR-ed with every resolved entry.
    pub mask: Permissions,
}

impl EncodedPermissions {
    /// Bits contributed by the list beyond the seed.
    pub fn extra(&self) -> Permissions {
        self.mask.difference(self.base)
    }

    pub fn has_extra(&self) -> bool {
        !self.extra().is_empty()
    }
}

/// Split a comma-separated permission string into trimmed entries.
///
/// A blank string has no entries. Empty entries inside a non-blank list
/// are kept and later rejected as unknown names.
pub fn split_permission_list(list: &str) -> Vec<String> {
    if list.trim().is_empty() {
        return Vec::new();
    }
    list.split(',').map(|entry| entry.trim().to_string()).collect()
}

/// True if `entry` is an optional sign followed by ASCII digits, whatever
/// its magnitude.
pub(crate) fn is_integer(entry: &str) -> bool {
    let digits = entry.strip_prefix(['+', '-']).unwrap_or(entry);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Encodes permission lists against a catalog.
pub struct PermissionCodec<C> {
    catalog: C,
}

impl<C: PermissionCatalog> PermissionCodec<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Classify one entry after trimming it.
    pub fn classify(&self, entry: &str) -> Result<PermissionEntry> {
        let entry = entry.trim();

        if is_integer(entry) {
            return match entry.parse::<i64>() {
                Ok(index) if (0..=i64::from(MAX_BIT)).contains(&index) => {
                    Ok(PermissionEntry::Bit(index as u8))
                }
                _ => Err(PermsError::InvalidArgument {
                    field: "permissions",
                    reason: format!("bit position {} is outside 0..={}", entry, MAX_BIT),
                }),
            };
        }

        match self.catalog.lookup(entry) {
            Some(bit) => Ok(PermissionEntry::Level {
                name: entry.to_string(),
                bit,
            }),
            None => Err(PermsError::UnknownPermissionName(entry.to_string())),
        }
    }

    /// Encode an optional raw seed mask and a permission list.
    pub fn encode<S: AsRef<str>>(
        &self,
        raw_seed: Option<i64>,
        names: &[S],
    ) -> Result<EncodedPermissions> {
        let base = match raw_seed {
            Some(raw) => Permissions::from_raw(raw)?,
            None => Permissions::NONE,
        };

        let entries = names
            .iter()
            .map(|name| self.classify(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let mut mask = base;
        for entry in &entries {
            mask |= Permissions::bit(entry.bit())?;
        }

        Ok(EncodedPermissions { base, mask })
    }

    /// Encode from a comma-separated list string.
    pub fn encode_list(&self, raw_seed: Option<i64>, list: Option<&str>) -> Result<EncodedPermissions> {
        let names = list.map(split_permission_list).unwrap_or_default();
        self.encode(raw_seed, &names[..])
    }

    /// Render a mask as level names, falling back to bit positions for
    /// bits the catalog does not name.
    pub fn describe(&self, mask: Permissions) -> Vec<String> {
        mask.iter_bits()
            .map(|bit| match self.catalog.name_of(bit) {
                Some(name) => name.to_string(),
                None => bit.to_string(),
            })
            .collect()
    }
}
