//! Canonical serialization and content fingerprints.
//!
//! Derived layer indices are memoized by a fingerprint of the records they
//! were built from. The fingerprint is an xxh64 over canonical JSON:
//!
//! - Struct fields serialize in declaration order
//! - Vectors serialize in index order, so reordering an input changes the
//!   fingerprint (first-match order is part of the identity)
//! - Maps in hashed records are `BTreeMap`, never `HashMap`

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes.
///
/// Domain records contain only strings, integers, vectors and string-keyed
/// `BTreeMap`s, none of which can fail to serialize.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// Compute the canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// Compute the canonical hash as a 16-digit hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

/// Fingerprint of an ordered list of fill colors, used to compare
/// recoloring passes.
pub fn fill_fingerprint<S: AsRef<str>>(fills: &[S]) -> u64 {
    let joined: Vec<&str> = fills.iter().map(AsRef::as_ref).collect();
    canonical_hash(&joined)
}
