//! Permission bitmask.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::error::{CoreError, Result};

/// Highest valid bit position in a [`Permissions`] mask.
pub const MAX_BIT: u8 = 63;

/// A permission bitmask. Each set bit is one granted capability.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(pub u64);

impl Permissions {
    /// The empty mask.
    pub const NONE: Self = Self(0);

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u64 {
        self.0
    }

    /// A mask with exactly one bit set.
    pub fn bit(index: u8) -> Result<Self> {
        if index > MAX_BIT {
            return Err(CoreError::invalid(
                "permissions",
                format!("bit position {} exceeds {}", index, MAX_BIT),
            ));
        }
        Ok(Self(1u64 << index))
    }

    /// Build a mask from a caller-supplied raw value.
    ///
    /// The value is a mask, not a bit position, and must be non-negative.
    pub fn from_raw(raw: i64) -> Result<Self> {
        if raw < 0 {
            return Err(CoreError::invalid(
                "raw_permissions",
                "must be greater than or equal to zero",
            ));
        }
        Ok(Self(raw as u64))
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set in `self`.
    pub const fn contains(&self, other: Permissions) -> bool {
        self.0 & other.0 == other.0
    }

    /// Bits set in `self` that are not set in `other`.
    pub const fn difference(&self, other: Permissions) -> Self {
        Self(self.0 & !other.0)
    }

    /// Positions of the set bits, lowest first.
    pub fn iter_bits(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=MAX_BIT).filter(move |i| self.0 & (1u64 << i) != 0)
    }
}

impl BitOr for Permissions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Permissions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl From<u64> for Permissions {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl fmt::Debug for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Permissions({:#b})", self.0)
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_bounds() {
        assert_eq!(Permissions::bit(0).unwrap().bits(), 1);
        assert_eq!(Permissions::bit(63).unwrap().bits(), 1u64 << 63);
        assert!(matches!(
            Permissions::bit(64),
            Err(CoreError::InvalidArgument { field: "permissions", .. })
        ));
    }

    #[test]
    fn test_from_raw_rejects_negative() {
        assert_eq!(Permissions::from_raw(0).unwrap(), Permissions::NONE);
        assert_eq!(Permissions::from_raw(12).unwrap().bits(), 12);
        assert!(matches!(
            Permissions::from_raw(-1),
            Err(CoreError::InvalidArgument { field: "raw_permissions", .. })
        ));
    }

    #[test]
    fn test_contains_and_difference() {
        let full = Permissions(0b1110);
        let base = Permissions(0b0100);
        assert!(full.contains(base));
        assert!(!base.contains(full));
        assert_eq!(full.difference(base), Permissions(0b1010));
    }

    #[test]
    fn test_iter_bits() {
        let mask = Permissions(0b1001) | Permissions::bit(63).unwrap();
        let bits: Vec<u8> = mask.iter_bits().collect();
        assert_eq!(bits, vec![0, 3, 63]);
    }
}
