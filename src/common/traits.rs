//! Core trait shared by mergeable sketch implementations

use super::error::SketchError;

/// Trait for sketches that support in-place merging of two already-existing
/// (non-null) instances.
///
/// Grounded on `sketch_oxide`'s `Mergeable` trait, trimmed to drop its
/// `Sketch` supertrait: that trait's `update`/`is_empty`/`serialize`/
/// `deserialize` methods assume an infallible, always-owned sketch value,
/// which does not fit `OmniSketch`'s null-accumulator lifecycle (spec
/// §4.8) where the very first `add` can fail on invalid configuration and
/// has no existing instance to call a method on. `OmniSketch::add` and
/// `OmniSketch::combine` are the null-handling entry points (free
/// associated functions over `Option<OmniSketch>`); `Mergeable::merge` is
/// the narrower, infallible-shape convenience for the case both sketches
/// already exist.
pub trait Mergeable: Sized {
    /// Merge another sketch into this one in place.
    ///
    /// # Errors
    /// Returns `SketchError::ShapeMismatch` if the two sketches have
    /// incompatible geometry.
    fn merge(&mut self, other: &Self) -> Result<(), SketchError>;
}
