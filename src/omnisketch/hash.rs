//! Hash primitive for the sketch engine
//!
//! A single deterministic 32-bit non-cryptographic hash,
//! `H(key, seed) -> u32`, with xxHash-32 semantics (per spec §4.1).
//! Replacing the hash function changes the on-disk bytes produced by
//! [`crate::omnisketch::dump`] and the bucket contents of every
//! [`crate::omnisketch::OmniSketch`]; that is accepted.

use xxhash_rust::xxh32::xxh32;

/// Seed used to derive the sampling key `itemHash` from a synthesized item
/// id. Chosen to differ from every row seed (`0..d-1`) used by [`row_hash`].
pub const FIXED_ITEM_SEED: u32 = 0xFFFF_FFFF;

/// `H(key, seed) -> u32`: the sole hash primitive the engine depends on.
///
/// `key` is hashed as its 4 little-endian bytes, mirroring the original
/// `XXH32(&key, sizeof(uint32), seed)` call.
#[inline]
pub fn h(key: u32, seed: u32) -> u32 {
    xxh32(&key.to_le_bytes(), seed)
}

/// `itemHash(id) = H(id, FIXED_ITEM_SEED)`: the sampling key for an item id.
#[inline]
pub fn item_hash(id: u32) -> u32 {
    h(id, FIXED_ITEM_SEED)
}

/// `rowHash(attrHash, i) = H(attrHash, i)`: selects the column within row
/// `i` of a plane. `attr_hash` is the external 64-bit attribute hash with
/// its low 32 bits used, per spec §4.1.
#[inline]
pub fn row_hash(attr_hash: u64, row: u32) -> u32 {
    h(attr_hash as u32, row)
}
