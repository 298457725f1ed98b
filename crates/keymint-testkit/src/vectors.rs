//! Golden vectors for the permission codec.
//!
//! Each vector pairs a raw seed and a comma-separated list with the mask the
//! built-in catalog must produce, or `None` when the input must be rejected.

use keymint_perms::{PermissionCodec, StaticCatalog};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Raw seed mask.
    pub seed: Option<i64>,
    /// Comma-separated permission list.
    pub list: Option<&'static str>,
    /// Expected seed-only mask.
    pub expected_base: Option<u64>,
    /// Expected full mask.
    pub expected_mask: Option<u64>,
}

const fn accept(
    name: &'static str,
    seed: Option<i64>,
    list: Option<&'static str>,
    base: u64,
    mask: u64,
) -> GoldenVector {
    GoldenVector {
        name,
        seed,
        list,
        expected_base: Some(base),
        expected_mask: Some(mask),
    }
}

const fn reject(name: &'static str, seed: Option<i64>, list: Option<&'static str>) -> GoldenVector {
    GoldenVector {
        name,
        seed,
        list,
        expected_base: None,
        expected_mask: None,
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        accept("nothing", None, None, 0, 0),
        accept("blank list", None, Some("   "), 0, 0),
        accept("seed only", Some(4), None, 4, 4),
        accept("seed and name", Some(4), Some("read"), 4, 6),
        accept("names and bits", None, Some("admin, 3"), 0, 0b1001),
        accept("padded entries", None, Some(" write ,\t5 "), 0, 0b10_0100),
        accept("duplicate entries", Some(2), Some("read,1,read"), 2, 2),
        accept("highest bit", None, Some("63"), 0, 1 << 63),
        accept("max seed", Some(i64::MAX), Some("63"), i64::MAX as u64, u64::MAX),
        accept("every level", None, Some("admin,read,write,create,delete,execute,tokens"), 0, 0x7f),
        reject("negative seed", Some(-1), None),
        reject("unknown name", Some(4), Some("read,superuser")),
        reject("wrong case", None, Some("Admin")),
        reject("empty entry", None, Some("read,,write")),
        reject("bit too high", None, Some("64")),
        reject("negative bit", None, Some("-2")),
        reject("bit beyond i64", Some(1), Some("read, 99999999999999999999")),
    ]
}

/// Encode a vector with the built-in catalog, returning `(base, mask)`.
pub fn encode_vector(vector: &GoldenVector) -> Option<(u64, u64)> {
    let catalog = StaticCatalog::builtin();
    let codec = PermissionCodec::new(&catalog);
    codec
        .encode_list(vector.seed, vector.list)
        .ok()
        .map(|encoded| (encoded.base.bits(), encoded.mask.bits()))
}

/// Verify all golden vectors against the codec.
///
/// Returns `(name, matches)` for each vector.
pub fn verify_all_vectors() -> Vec<(String, bool)> {
    all_vectors()
        .iter()
        .map(|v| {
            let expected = v.expected_base.zip(v.expected_mask);
            (v.name.to_string(), encode_vector(v) == expected)
        })
        .collect()
}
