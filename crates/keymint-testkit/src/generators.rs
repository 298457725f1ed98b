//! Proptest generators for property-based testing.

use proptest::prelude::*;

use keymint::IssueRequest;
use keymint_core::{Permissions, MAX_BIT, NEVER_EXPIRES};
use keymint_perms::DEFAULT_LEVELS;

/// A name from the built-in catalog.
pub fn level_name() -> impl Strategy<Value = String> {
    prop::sample::select(DEFAULT_LEVELS.iter().map(|(n, _)| n.to_string()).collect::<Vec<_>>())
}

/// A valid bit position.
pub fn bit_position() -> impl Strategy<Value = u8> {
    0u8..=MAX_BIT
}

/// A permission list entry: a built-in name or a bit position, optionally
/// padded with whitespace.
pub fn permission_entry() -> impl Strategy<Value = String> {
    let bare = prop_oneof![level_name(), bit_position().prop_map(|b| b.to_string())];
    (bare, " {0,2}", " {0,2}").prop_map(|(entry, pre, post)| format!("{}{}{}", pre, entry, post))
}

/// A name guaranteed not to be in the built-in catalog.
pub fn unknown_name() -> impl Strategy<Value = String> {
    "[a-z]{1,12}".prop_filter("must not be a built-in level", |s| {
        !DEFAULT_LEVELS.iter().any(|(n, _)| *n == s.as_str())
    })
}

/// A valid raw seed mask.
pub fn raw_seed() -> impl Strategy<Value = i64> {
    0i64..=i64::MAX
}

/// A valid day offset: positive or the never-expires sentinel.
pub fn valid_days() -> impl Strategy<Value = i64> {
    prop_oneof![Just(NEVER_EXPIRES), 1i64..=36_500]
}

/// An invalid day offset.
pub fn invalid_days() -> impl Strategy<Value = i64> {
    (i64::MIN..=0).prop_filter("-1 is valid", |d| *d != NEVER_EXPIRES)
}

/// Parameters for generating a valid issuance request.
#[derive(Debug, Clone)]
pub struct RequestParams {
    pub days: i64,
    pub raw_permissions: Option<i64>,
    pub permissions: Vec<String>,
}

impl RequestParams {
    pub fn to_request(&self) -> IssueRequest {
        IssueRequest {
            days: self.days,
            raw_permissions: self.raw_permissions,
            permissions: self.permissions.clone(),
        }
    }

    /// The mask a correct issuer must produce for these parameters.
    pub fn expected_mask(&self) -> Permissions {
        let mut mask = Permissions::from_bits(self.raw_permissions.unwrap_or(0) as u64);
        for entry in &self.permissions {
            let entry = entry.trim();
            let bit = match entry.parse::<u8>() {
                Ok(bit) => bit,
                Err(_) => DEFAULT_LEVELS
                    .iter()
                    .find(|(n, _)| *n == entry)
                    .map(|(_, b)| *b)
                    .unwrap_or_default(),
            };
            mask |= Permissions::from_bits(1u64 << bit);
        }
        mask
    }
}

impl Arbitrary for RequestParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            valid_days(),
            prop::option::of(raw_seed()),
            prop::collection::vec(permission_entry(), 0..8),
        )
            .prop_map(|(days, raw_permissions, permissions)| RequestParams {
                days,
                raw_permissions,
                permissions,
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keymint_perms::{PermissionCodec, StaticCatalog};

    proptest! {
        #[test]
        fn test_generated_entries_encode(entries in prop::collection::vec(permission_entry(), 0..10)) {
            let catalog = StaticCatalog::builtin();
            let codec = PermissionCodec::new(&catalog);
            prop_assert!(codec.encode(None, &entries[..]).is_ok());
        }

        #[test]
        fn test_unknown_names_rejected(name in unknown_name()) {
            let catalog = StaticCatalog::builtin();
            let codec = PermissionCodec::new(&catalog);
            prop_assert!(codec.encode(None, &[name]).is_err());
        }

        #[test]
        fn test_expected_mask_matches_codec(params: RequestParams) {
            let catalog = StaticCatalog::builtin();
            let codec = PermissionCodec::new(&catalog);
            let encoded = codec.encode(params.raw_permissions, &params.permissions[..]).unwrap();
            prop_assert_eq!(encoded.mask, params.expected_mask());
        }
    }
}
