//! OmniSketch: a compact, mergeable, multi-attribute sketch answering
//! approximate filtered-count queries over a stream of composite records.
//!
//! See the crate-level documentation for the overall shape; this module
//! groups the engine's components the way the spec's component table
//! does: hashing, bucket sampling, flat storage, sizing, the
//! add/finalize/combine/estimate algorithms, and dump formatters.

mod bucket;
mod dimensions;
pub mod dump;
pub mod error;
pub mod hash;
pub mod record;
mod sketch;
mod storage;
pub mod wire;

pub use bucket::Bucket;
pub use dimensions::Dimensions;
pub use dump::{dump_json, dump_text};
pub use record::{AttributeSource, RandomSource, ThreadRandomSource};
pub use sketch::{OmniSketch, State};
pub use storage::Geometry;
pub use wire::{parse_text, recv, send, to_bytes};
