//! Binary wire format: the engine's storage/transport contract (spec §1,
//! §6, §9 "Serialization glue"). The layout follows spec §6 exactly —
//! header fields, then the bucket array row-major `[plane][row][col]`,
//! then the sample array in the same order with `sampleSize` slots each —
//! all written in the host's native byte order, matching the original's
//! single `palloc`'d allocation reinterpreted as bytes rather than
//! serialized through pointer arithmetic (see `storage.rs`).
//!
//! Per spec §6/§7, only the serialize-out direction is implemented
//! (`omnisketch_send`/`omnisketch_out` in the original both delegate to
//! the raw bytea machinery, i.e. "dump the bytes as they are"). Building a
//! sketch back up from bytes (`omnisketch_recv`) and parsing one from text
//! (`omnisketch_in`) are both rejected with `UnsupportedOperation`, exactly
//! as the original's two `ereport(ERROR, ...)` stubs reject them.

use super::sketch::OmniSketch;
use crate::common::SketchError;

/// Number of `u32` header fields: flags, numSketches, sketchWidth,
/// sketchHeight, sampleSize, itemSize, count, seed (spec §6).
const HEADER_WORDS: usize = 8;
const HEADER_BYTES: usize = HEADER_WORDS * 4;

/// Per-bucket encoded size: `totalCount: u32`, `sampleCount: u16`,
/// `maxIndex: u16`, `maxHash: u32`, `isSorted: u8` plus 3 padding bytes to
/// keep every bucket record 4-byte aligned.
const BUCKET_BYTES: usize = 16;

/// Serialize `sketch` to its raw wire bytes, prefixed by a 4-byte payload
/// length (spec §6: "the raw allocation bytes, prefixed by a length
/// header, host endianness"). Calling this twice on the same sketch value
/// yields byte-for-byte identical output.
pub fn to_bytes(sketch: &OmniSketch) -> Vec<u8> {
    let geometry = sketch.geometry();
    let total_buckets = geometry.num_attributes * geometry.height * geometry.width;
    let payload_len = HEADER_BYTES + total_buckets * BUCKET_BYTES
        + total_buckets * geometry.sample_size * 4;

    let mut out = Vec::with_capacity(4 + payload_len);
    out.extend_from_slice(&(payload_len as u32).to_ne_bytes());

    out.extend_from_slice(&sketch.flags().to_ne_bytes());
    out.extend_from_slice(&(geometry.num_attributes as u32).to_ne_bytes());
    out.extend_from_slice(&(geometry.width as u32).to_ne_bytes());
    out.extend_from_slice(&(geometry.height as u32).to_ne_bytes());
    out.extend_from_slice(&(geometry.sample_size as u32).to_ne_bytes());
    out.extend_from_slice(&geometry.item_bits.to_ne_bytes());
    out.extend_from_slice(&(sketch.count() as u32).to_ne_bytes());
    out.extend_from_slice(&sketch.seed().to_ne_bytes());

    let storage = sketch.storage();
    for (a, i, j) in storage.iter_indices() {
        let bucket = storage.bucket(a, i, j);
        out.extend_from_slice(&bucket.total_count.to_ne_bytes());
        out.extend_from_slice(&bucket.sample_count.to_ne_bytes());
        out.extend_from_slice(&bucket.max_index.to_ne_bytes());
        out.extend_from_slice(&bucket.max_hash.to_ne_bytes());
        out.push(bucket.is_sorted as u8);
        out.extend_from_slice(&[0u8; 3]);
    }
    for (a, i, j) in storage.iter_indices() {
        for &id in storage.sample(a, i, j) {
            out.extend_from_slice(&id.to_ne_bytes());
        }
    }

    debug_assert_eq!(out.len(), 4 + payload_len);
    out
}

/// `omnisketch_send`: identical to [`to_bytes`] — the binary transport
/// contract is "hand back the blob" (spec §6: "Binary send returns the
/// blob").
pub fn send(sketch: &OmniSketch) -> Vec<u8> {
    to_bytes(sketch)
}

/// `omnisketch_recv`: rejected unconditionally. The original never
/// implements binary deserialization for this type; reconstructing a
/// sketch from an arbitrary byte blob would bypass every invariant the
/// add/merge paths maintain, so this crate does not attempt it either
/// (spec §6: "binary recv is unsupported"; §7: `UnsupportedOperation`).
pub fn recv(_bytes: &[u8]) -> Result<OmniSketch, SketchError> {
    Err(SketchError::UnsupportedOperation(
        "binary recv is not supported for omnisketch".to_string(),
    ))
}

/// `omnisketch_in`: rejected unconditionally (spec §6: "Text input
/// parsing is unsupported").
pub fn parse_text(_text: &str) -> Result<OmniSketch, SketchError> {
    Err(SketchError::UnsupportedOperation(
        "text input parsing is not supported for omnisketch".to_string(),
    ))
}
