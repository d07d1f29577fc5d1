//! Flat contiguous storage for a sketch: one owned buffer with two typed
//! views — a bucket array and a sample array — indexed by
//! `(plane, row, column)` (spec §2, §4.3, §9).
//!
//! The original C implementation lays out one `palloc`'d allocation with
//! pointer arithmetic (`SKETCH_BUCKETS`/`SKETCH_SAMPLES` macros). Per spec
//! §9's design note, this crate keeps the "single owned buffer, typed
//! accessors" shape without raw pointer arithmetic: an owned `Vec<Bucket>`
//! and an owned flattened `Vec<u32>` sample array, both addressed through
//! the same `(plane, row, col)` index.

use super::bucket::Bucket;

/// Geometry shared by a sketch's bucket array and sample array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    /// Number of attribute planes (`A` / `numSketches`).
    pub num_attributes: usize,
    /// Columns per row (`w` / `sketchWidth`).
    pub width: usize,
    /// Rows per plane (`d` / `sketchHeight`).
    pub height: usize,
    /// Sample capacity per bucket (`B` / `sampleSize`).
    pub sample_size: usize,
    /// Item bit width (`b` / `itemSize`). Always 32 in this implementation
    /// (spec §4.4: "fix b = 32 regardless for storage"), but carried as a
    /// distinct field because shape-mismatch checks compare it alongside
    /// the other four configuration fields (spec §4.6, §8 property 9).
    pub item_bits: u32,
}

impl Geometry {
    /// Number of buckets in a single plane (`d * w`).
    #[inline]
    pub fn plane_size(&self) -> usize {
        self.width * self.height
    }

    /// Total number of buckets across all planes (`A * d * w`).
    #[inline]
    pub fn total_buckets(&self) -> usize {
        self.num_attributes * self.plane_size()
    }

    /// Flat bucket index for `(plane, row, col)`.
    #[inline]
    pub fn bucket_index(&self, plane: usize, row: usize, col: usize) -> usize {
        debug_assert!(plane < self.num_attributes);
        debug_assert!(row < self.height);
        debug_assert!(col < self.width);
        plane * self.plane_size() + row * self.width + col
    }
}

/// Owned bucket array plus flattened sample array for a sketch.
#[derive(Clone, Debug)]
pub struct Storage {
    geometry: Geometry,
    buckets: Vec<Bucket>,
    samples: Vec<u32>,
}

impl Storage {
    /// Allocate zeroed storage for the given geometry.
    pub fn new(geometry: Geometry) -> Self {
        let total = geometry.total_buckets();
        Storage {
            geometry,
            buckets: vec![Bucket::zeroed(); total],
            samples: vec![0u32; total * geometry.sample_size],
        }
    }

    /// This storage's geometry.
    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Immutable reference to bucket `(plane, row, col)`.
    #[inline]
    pub fn bucket(&self, plane: usize, row: usize, col: usize) -> &Bucket {
        &self.buckets[self.geometry.bucket_index(plane, row, col)]
    }

    /// Mutable reference to bucket `(plane, row, col)`.
    #[inline]
    pub fn bucket_mut(&mut self, plane: usize, row: usize, col: usize) -> &mut Bucket {
        let idx = self.geometry.bucket_index(plane, row, col);
        &mut self.buckets[idx]
    }

    /// Immutable sample slot for bucket `(plane, row, col)`, length
    /// `sampleSize`.
    #[inline]
    pub fn sample(&self, plane: usize, row: usize, col: usize) -> &[u32] {
        let idx = self.geometry.bucket_index(plane, row, col);
        let start = idx * self.geometry.sample_size;
        &self.samples[start..start + self.geometry.sample_size]
    }

    /// Mutable sample slot for bucket `(plane, row, col)`, length
    /// `sampleSize`.
    #[inline]
    pub fn sample_mut(&mut self, plane: usize, row: usize, col: usize) -> &mut [u32] {
        let idx = self.geometry.bucket_index(plane, row, col);
        let start = idx * self.geometry.sample_size;
        &mut self.samples[start..start + self.geometry.sample_size]
    }

    /// Both the bucket and its sample slot for `(plane, row, col)`,
    /// borrowed simultaneously (needed by `add`/`merge`).
    #[inline]
    pub fn bucket_and_sample_mut(
        &mut self,
        plane: usize,
        row: usize,
        col: usize,
    ) -> (&mut Bucket, &mut [u32]) {
        let idx = self.geometry.bucket_index(plane, row, col);
        let sample_size = self.geometry.sample_size;
        let sample_start = idx * sample_size;
        let bucket = &mut self.buckets[idx];
        let sample = &mut self.samples[sample_start..sample_start + sample_size];
        (bucket, sample)
    }

    /// Iterate over every `(plane, row, col)` bucket in row-major order.
    pub fn iter_indices(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        let geometry = self.geometry;
        (0..geometry.num_attributes).flat_map(move |a| {
            (0..geometry.height)
                .flat_map(move |i| (0..geometry.width).map(move |j| (a, i, j)))
        })
    }
}
