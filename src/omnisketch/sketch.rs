//! The `OmniSketch` type: lifecycle state machine, add, finalize, combine,
//! estimate, count (spec §4.4-§4.8).

use super::bucket::{admit, merge_into, sort_stable};
use super::dimensions;
use super::hash::{h, row_hash};
use super::record::{AttributeSource, RandomSource};
use super::storage::{Geometry, Storage};
use crate::common::validation;
use crate::common::{Mergeable, SketchError};

/// Lifecycle state of a sketch (spec §4.8). The "Empty" state from the
/// spec's `Empty -> Mutable -> Finalized` machine is represented externally
/// as `Option<OmniSketch>::None` — there is no sketch instance before the
/// first `add`, so this enum only needs the two post-creation states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// At least one `add` or `combine` has happened since the last
    /// `finalize`; bucket samples may be unsorted.
    Mutable,
    /// Every bucket sample is in canonical `(itemHash, id)` order.
    Finalized,
}

/// A compact, mergeable, multi-attribute sketch over a stream of composite
/// records (spec §2-§4).
#[derive(Clone, Debug)]
pub struct OmniSketch {
    /// Reserved for future use (versioning, ...), always `0` today —
    /// carried from the original header's `flags` field.
    flags: u32,
    geometry: Geometry,
    storage: Storage,
    /// Number of records absorbed so far.
    count: u32,
    /// Random seed used only to diversify synthesized item ids between
    /// sketch instances.
    seed: u32,
    state: State,
}

impl OmniSketch {
    fn new(
        epsilon: f64,
        delta: f64,
        num_attributes: usize,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, SketchError> {
        validation::validate_probability(epsilon, "epsilon")?;
        validation::validate_probability(delta, "delta")?;
        validation::validate_attribute_count(num_attributes)?;

        let dims = dimensions::compute(epsilon, delta);
        validation::validate_dimensions(dims.width, dims.height, dims.sample_size)?;

        let geometry = Geometry {
            num_attributes,
            width: dims.width,
            height: dims.height,
            sample_size: dims.sample_size,
            item_bits: dims.item_bits,
        };

        Ok(OmniSketch {
            flags: 0,
            storage: Storage::new(geometry),
            geometry,
            count: 0,
            seed: rng.u32(),
            state: State::Mutable,
        })
    }

    /// Absorb a new record into `acc` (or create a sketch, sized from
    /// `epsilon`/`delta`, if `acc` is `None` — spec §4.4, §4.8).
    ///
    /// # Errors
    /// - `InvalidParameter` (`InvalidConfiguration`) if `acc` is `None` and
    ///   `epsilon`/`delta` are out of `(0.0, 1.0]`.
    /// - `ShapeMismatch` if `record`'s attribute arity does not match an
    ///   existing `acc`.
    /// - `HashFunctionMissing` if `record` cannot hash one of its
    ///   attributes.
    pub fn add(
        acc: Option<Self>,
        epsilon: f64,
        delta: f64,
        record: &dyn AttributeSource,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, SketchError> {
        let mut sketch = match acc {
            Some(sketch) => sketch,
            None => Self::new(epsilon, delta, record.len(), rng)?,
        };

        if record.len() != sketch.geometry.num_attributes {
            return Err(SketchError::ShapeMismatch {
                reason: format!(
                    "record has {} attributes, sketch was built for {}",
                    record.len(),
                    sketch.geometry.num_attributes
                ),
            });
        }

        sketch.count += 1;
        let id = h(sketch.count, sketch.seed);

        let (width, height, sample_size) = (
            sketch.geometry.width,
            sketch.geometry.height,
            sketch.geometry.sample_size,
        );

        for a in 0..sketch.geometry.num_attributes {
            let attr_hash = record.attr_hash(a)?;
            for i in 0..height {
                let col = (row_hash(attr_hash, i as u32) as usize) % width;
                let (bucket, sample) = sketch.storage.bucket_and_sample_mut(a, i, col);
                bucket.total_count += 1;
                admit(bucket, sample, sample_size, id);
            }
        }

        sketch.state = State::Mutable;

        #[cfg(debug_assertions)]
        sketch.debug_check_invariants();

        Ok(sketch)
    }

    /// Combine `acc` with `other`, per the null-handling rules of spec §4.6:
    /// `combine(None, None) = None`, `combine(None, Some(x)) = copy(x)`,
    /// `combine(Some(x), None) = x`, and otherwise a bucket-wise merge with
    /// `acc.count += other.count`.
    ///
    /// # Errors
    /// `ShapeMismatch` if both sketches are non-null and their geometry
    /// (`numSketches`, `width`, `height`, `sampleSize`, `itemSize`) differs.
    pub fn combine(acc: Option<Self>, other: Option<&Self>) -> Result<Option<Self>, SketchError> {
        let mut dst = match (acc, other) {
            (None, None) => return Ok(None),
            (None, Some(src)) => return Ok(Some(src.clone())),
            (Some(dst), None) => return Ok(Some(dst)),
            (Some(dst), Some(_)) => dst,
        };
        let src = other.expect("other is Some in this branch");

        if dst.geometry != src.geometry {
            return Err(SketchError::ShapeMismatch {
                reason: format!(
                    "geometry mismatch: {:?} vs {:?}",
                    dst.geometry, src.geometry
                ),
            });
        }

        for (a, i, j) in dst.storage.iter_indices() {
            let src_bucket = *src.storage.bucket(a, i, j);
            let src_sample = src.storage.sample(a, i, j).to_vec();
            let (dst_bucket, dst_sample) = dst.storage.bucket_and_sample_mut(a, i, j);
            merge_into(
                dst_bucket,
                dst_sample,
                &src_bucket,
                &src_sample,
                dst.geometry.sample_size,
            );
        }

        dst.count += src.count;
        dst.state = State::Mutable;

        #[cfg(debug_assertions)]
        dst.debug_check_invariants();

        Ok(Some(dst))
    }

    /// Sort every bucket's sample into canonical `(itemHash, id)` order.
    /// Idempotent: `finalize(finalize(s))` is bitwise identical to
    /// `finalize(s)` (spec §4.5, §8 property 7).
    pub fn finalize(mut self) -> Self {
        self.finalize_in_place();
        self
    }

    fn finalize_in_place(&mut self) {
        for (a, i, j) in self.storage.iter_indices() {
            let (bucket, sample) = self.storage.bucket_and_sample_mut(a, i, j);
            sort_stable(bucket, sample);
        }
        self.state = State::Finalized;
    }

    /// Estimate the number of absorbed records matching the equality
    /// conjunction `record[0] = ... ∧ record[A-1] = ...` (spec §4.7).
    ///
    /// Returns `None` if `sketch` is `None` (the null-sketch case); returns
    /// `Some(0)` for a sketch that has not yet absorbed any record (every
    /// bucket is empty, so the conjunction can have no matches).
    ///
    /// Finalizes lazily: if `sketch` is not yet `Finalized`, this sorts its
    /// samples as a side effect before estimating (spec §4.8 permits this).
    ///
    /// # Errors
    /// - `ShapeMismatch` if `record`'s attribute arity does not match
    ///   `sketch`'s.
    /// - `HashFunctionMissing` if `record` cannot hash one of its
    ///   attributes.
    pub fn estimate(
        sketch: Option<&mut Self>,
        record: &dyn AttributeSource,
    ) -> Result<Option<i64>, SketchError> {
        let sketch = match sketch {
            None => return Ok(None),
            Some(sketch) => sketch,
        };

        if record.len() != sketch.geometry.num_attributes {
            return Err(SketchError::ShapeMismatch {
                reason: format!(
                    "record has {} attributes, sketch was built for {}",
                    record.len(),
                    sketch.geometry.num_attributes
                ),
            });
        }

        if sketch.state != State::Finalized {
            sketch.finalize_in_place();
        }

        if record.is_empty() {
            return Ok(Some(0));
        }

        let mut max_total: u32 = 0;
        let mut items: Option<Vec<u32>> = None;

        for a in 0..record.len() {
            let attr_hash = record.attr_hash(a)?;
            for i in 0..sketch.geometry.height {
                let col = (row_hash(attr_hash, i as u32) as usize) % sketch.geometry.width;
                let bucket = sketch.storage.bucket(a, i, col);
                let sample = sketch.storage.sample(a, i, col);

                max_total = max_total.max(bucket.total_count);

                let current: Vec<u32> = sample[..bucket.sample_count as usize].to_vec();
                items = Some(match items {
                    None => current,
                    Some(existing) => intersect(&existing, &current),
                });
            }
        }

        let items = items.unwrap_or_default();
        let estimate = (max_total as i64 / sketch.geometry.sample_size as i64)
            * items.len() as i64;
        Ok(Some(estimate))
    }

    /// Number of records absorbed so far.
    pub fn count(&self) -> i64 {
        self.count as i64
    }

    /// Reserved header flags (always `0` today).
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// This sketch's geometry, for introspection and testing.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// The random seed used to synthesize this sketch's item ids.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub(super) fn storage(&self) -> &Storage {
        &self.storage
    }

    #[cfg(debug_assertions)]
    fn debug_check_invariants(&self) {
        for a in 0..self.geometry.num_attributes {
            for i in 0..self.geometry.height {
                let mut row_total: u64 = 0;
                for j in 0..self.geometry.width {
                    let bucket = self.storage.bucket(a, i, j);
                    let sample = self.storage.sample(a, i, j);

                    debug_assert!(bucket.sample_count as usize <= self.geometry.sample_size);
                    debug_assert!(bucket.total_count >= bucket.sample_count as u32);
                    debug_assert!(bucket.total_count <= self.count);

                    if bucket.sample_count > 0 {
                        debug_assert!(bucket.total_count > 0);
                        debug_assert!((bucket.max_index as usize) < bucket.sample_count as usize);
                        let cached = super::hash::item_hash(sample[bucket.max_index as usize]);
                        debug_assert_eq!(bucket.max_hash, cached);

                        let mut seen = std::collections::HashSet::new();
                        for k in 0..bucket.sample_count as usize {
                            debug_assert!(seen.insert(sample[k]));
                        }
                    } else {
                        debug_assert_eq!(bucket.total_count, 0);
                    }

                    if bucket.is_sorted && bucket.sample_count >= 2 {
                        for k in 1..bucket.sample_count as usize {
                            let prev = super::hash::item_hash(sample[k - 1]);
                            let cur = super::hash::item_hash(sample[k]);
                            debug_assert!(
                                prev < cur || (prev == cur && sample[k - 1] < sample[k])
                            );
                        }
                        debug_assert_eq!(bucket.max_index as usize, bucket.sample_count as usize - 1);
                    }

                    row_total += bucket.total_count as u64;
                }
                debug_assert_eq!(row_total, self.count as u64);
            }
        }
    }
}

impl Mergeable for OmniSketch {
    /// In-place convenience form of [`OmniSketch::combine`] for the case
    /// both sketches already exist: `self.merge(&other)` is equivalent to
    /// `self = OmniSketch::combine(Some(self), Some(&other))?.unwrap()`.
    fn merge(&mut self, other: &Self) -> Result<(), SketchError> {
        let merged = Self::combine(Some(self.clone()), Some(other))?
            .expect("combining two non-null sketches never yields None");
        *self = merged;
        Ok(())
    }
}

/// Sorted two-pointer intersection of two samples, keyed by `(itemHash,
/// id)`. Keeps only ids present in both; checks id equality first (item
/// equality implies hash equality for the same underlying item), matching
/// the original `intersect_items`' shortcut (spec §4.7; see DESIGN.md).
fn intersect(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let mut i = 0usize;
    let mut j = 0usize;
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            out.push(a[i]);
            i += 1;
            j += 1;
            continue;
        }
        let ha = super::hash::item_hash(a[i]);
        let hb = super::hash::item_hash(b[j]);
        if ha < hb {
            i += 1;
        } else {
            j += 1;
        }
    }
    out
}
