//! Re-export of the shared error type under the `omnisketch` namespace,
//! mirroring `sketch_oxide`'s `pub mod error { pub use crate::common::{...}; }`
//! convenience shim.

pub use crate::common::{Result, SketchError};
