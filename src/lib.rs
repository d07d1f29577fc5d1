//! omnisketch: a compact, mergeable, multi-attribute sketch for
//! approximate filtered-count queries
//!
//! Given a stream of records with a fixed number of attributes, `OmniSketch`
//! supports two operations: incrementally absorbing a new record, and
//! estimating how many previously absorbed records match an equality
//! conjunction that pins one value per attribute. Partial sketches built
//! over disjoint stream shards combine into a sketch equivalent to one
//! built over the concatenated stream.
//!
//! Based on "OmniSketch: Efficient Multi-Dimensional High-Velocity Stream
//! Analytics with Arbitrary Predicates" (Punter, Papapetrou, Garofalakis).
//!
//! # Example
//! ```
//! use omnisketch::{AttributeSource, OmniSketch, ThreadRandomSource};
//!
//! let mut rng = ThreadRandomSource;
//! let mut sketch: Option<OmniSketch> = None;
//!
//! for value in 0u64..1000 {
//!     let record = [value];
//!     sketch = Some(OmniSketch::add(sketch, 0.05, 0.01, record.as_slice(), &mut rng).unwrap());
//! }
//!
//! let mut sketch = sketch.unwrap();
//! let est = OmniSketch::estimate(Some(&mut sketch), [42u64].as_slice())
//!     .unwrap()
//!     .unwrap();
//! assert!((0..=2).contains(&est));
//! assert_eq!(sketch.count(), 1000);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod common;
pub mod omnisketch;

/// Error types and result alias for sketch operations.
pub mod error {
    pub use crate::common::{Result, SketchError};
}

pub use common::{Mergeable, SketchError};
pub use omnisketch::{
    parse_text, recv, send, to_bytes, AttributeSource, OmniSketch, RandomSource, State,
    ThreadRandomSource,
};
