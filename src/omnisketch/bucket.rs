//! Bounded min-hash bucket sample: insert with cached max, sort on demand,
//! merge two sorted samples (spec §4.2).
//!
//! A bucket's sample is the bottom-B (KMV) set of item ids observed by that
//! bucket, ordered by `itemHash`. The sample array backing a bucket lives
//! outside this module (see [`crate::omnisketch::storage`]); every function
//! here takes the bucket's fixed-capacity slot as a `&mut [u32]` / `&[u32]`
//! slice of length `sampleSize` (only the first `sample_count` entries are
//! meaningful).

use super::hash::item_hash;

/// One `(plane, row, column)` cell: a running total and a cached-max
/// bottom-B sample descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bucket {
    /// Total number of records that landed in this bucket.
    pub total_count: u32,
    /// Current occupancy of the bucket's sample (`<= sampleSize`).
    pub sample_count: u16,
    /// Index into the sample slot of the entry with the largest `itemHash`.
    /// Meaningful only when `sample_count > 0`.
    pub max_index: u16,
    /// `itemHash(sample[max_index])`, cached as the admission threshold.
    pub max_hash: u32,
    /// True exactly when the sample is in ascending `(itemHash, id)` order.
    pub is_sorted: bool,
}

impl Bucket {
    /// A freshly zeroed bucket, as produced by sketch allocation.
    pub const fn zeroed() -> Self {
        Bucket {
            total_count: 0,
            sample_count: 0,
            max_index: 0,
            max_hash: 0,
            is_sorted: true,
        }
    }
}

impl Default for Bucket {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Admit `id` into `bucket`'s sample, subject to the bottom-B rule.
///
/// If the sample is not full, the item is always appended. If it is full,
/// the item replaces the current maximum iff its `itemHash` is *strictly*
/// less than `maxHash` — ties lose admission, by design (spec §9, open
/// question on tie-breaking).
pub fn admit(bucket: &mut Bucket, sample: &mut [u32], capacity: usize, id: u32) {
    let h = item_hash(id);

    if (bucket.sample_count as usize) < capacity {
        let slot = bucket.sample_count as usize;
        if bucket.sample_count == 0 || h >= bucket.max_hash {
            bucket.max_index = bucket.sample_count;
            bucket.max_hash = h;
        }
        sample[slot] = id;
        bucket.sample_count += 1;
        bucket.is_sorted = false;
    } else if h < bucket.max_hash {
        sample[bucket.max_index as usize] = id;

        // The replaced entry may no longer be the maximum; recompute by a
        // full linear scan, tie-breaking by the larger id on equal hashes.
        let mut new_max_hash = 0u32;
        let mut new_max_index = 0u16;
        for k in 0..bucket.sample_count as usize {
            let hk = item_hash(sample[k]);
            if hk > new_max_hash || (hk == new_max_hash && sample[k] > sample[new_max_index as usize])
            {
                new_max_hash = hk;
                new_max_index = k as u16;
            }
        }
        bucket.max_hash = new_max_hash;
        bucket.max_index = new_max_index;
        bucket.is_sorted = false;
    }
    // else: hash >= maxHash while full, candidate is not admitted.
}

/// Sort `bucket`'s sample ascending by `(itemHash, id)`, idempotently.
pub fn sort_stable(bucket: &mut Bucket, sample: &mut [u32]) {
    if bucket.is_sorted || bucket.sample_count < 2 {
        return;
    }

    let n = bucket.sample_count as usize;
    sample[..n].sort_unstable_by_key(|&id| (item_hash(id), id));

    bucket.max_index = bucket.sample_count - 1;
    bucket.max_hash = item_hash(sample[n - 1]);
    bucket.is_sorted = true;
}

/// Return the bucket's sample as `(itemHash, id)` pairs, sorted ascending.
/// Does not mutate the bucket; used by merge and estimate, which both need
/// a sorted read-only view without forcing `finalize` first.
fn sorted_items(bucket: &Bucket, sample: &[u32]) -> Vec<(u32, u32)> {
    let n = bucket.sample_count as usize;
    let mut items: Vec<(u32, u32)> = sample[..n].iter().map(|&id| (item_hash(id), id)).collect();
    if !bucket.is_sorted {
        items.sort_unstable();
    }
    items
}

/// Merge `src`'s sample into `dst`'s, keeping the bottom-`capacity`
/// `(itemHash, id)` pairs of the union; equal pairs present on both sides
/// collapse to a single output (the same record observed by both shards).
/// `dst.total_count` is increased by `src.total_count`.
pub fn merge_into(
    dst: &mut Bucket,
    dst_sample: &mut [u32],
    src: &Bucket,
    src_sample: &[u32],
    capacity: usize,
) {
    if src.sample_count == 0 {
        return;
    }

    let dst_items = sorted_items(dst, dst_sample);
    let src_items = sorted_items(src, src_sample);

    let mut i = 0usize;
    let mut j = 0usize;
    let mut k = 0usize;
    let mut last_hash = 0u32;

    while k < capacity && (i < dst_items.len() || j < src_items.len()) {
        let take_dst = if i == dst_items.len() {
            false
        } else if j == src_items.len() {
            true
        } else if dst_items[i] == src_items[j] {
            // Same (hash, id) present on both sides: collapse to one output.
            j += 1;
            true
        } else {
            dst_items[i] < src_items[j]
        };

        let (h, id) = if take_dst {
            let pair = dst_items[i];
            i += 1;
            pair
        } else {
            let pair = src_items[j];
            j += 1;
            pair
        };

        dst_sample[k] = id;
        last_hash = h;
        k += 1;
    }

    dst.total_count += src.total_count;
    dst.sample_count = k as u16;
    dst.is_sorted = true;
    if k > 0 {
        dst.max_index = (k - 1) as u16;
        dst.max_hash = last_hash;
    } else {
        dst.max_index = 0;
        dst.max_hash = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids_in(sample: &[u32], n: u16) -> Vec<u32> {
        sample[..n as usize].to_vec()
    }

    #[test]
    fn admit_appends_below_capacity() {
        let mut bucket = Bucket::zeroed();
        let mut sample = vec![0u32; 4];
        admit(&mut bucket, &mut sample, 4, 10);
        admit(&mut bucket, &mut sample, 4, 20);
        assert_eq!(bucket.sample_count, 2);
        assert_eq!(ids_in(&sample, bucket.sample_count), vec![10, 20]);
        assert!(!bucket.is_sorted);
    }

    #[test]
    fn admit_replaces_max_when_full_and_smaller() {
        let mut bucket = Bucket::zeroed();
        let mut sample = vec![0u32; 2];
        // fill to capacity
        for id in 0..2000u32 {
            admit(&mut bucket, &mut sample, 2, id);
            if bucket.sample_count == 2 {
                break;
            }
        }
        assert_eq!(bucket.sample_count, 2);

        // Max hash/index invariant must hold after every admission.
        let n = bucket.sample_count as usize;
        let actual_max = (0..n).map(|k| item_hash(sample[k])).max().unwrap();
        assert_eq!(bucket.max_hash, actual_max);
        assert_eq!(item_hash(sample[bucket.max_index as usize]), bucket.max_hash);
    }

    #[test]
    fn sort_stable_is_idempotent_and_orders_by_hash_then_id() {
        let mut bucket = Bucket::zeroed();
        let mut sample = vec![0u32; 8];
        for id in [5u32, 1, 9, 3] {
            admit(&mut bucket, &mut sample, 8, id);
        }
        sort_stable(&mut bucket, &mut sample);
        assert!(bucket.is_sorted);
        let n = bucket.sample_count as usize;
        for w in sample[..n].windows(2) {
            assert!(item_hash(w[0]) <= item_hash(w[1]));
        }
        let before = sample.clone();
        let before_bucket = bucket;
        sort_stable(&mut bucket, &mut sample);
        assert_eq!(sample, before);
        assert_eq!(bucket, before_bucket);
    }

    #[test]
    fn merge_is_bottom_k_of_union() {
        let capacity = 4usize;
        let mut dst = Bucket::zeroed();
        let mut dst_sample = vec![0u32; capacity];
        for id in [1u32, 2, 3, 4] {
            admit(&mut dst, &mut dst_sample, capacity, id);
        }
        dst.total_count = 10;

        let mut src = Bucket::zeroed();
        let mut src_sample = vec![0u32; capacity];
        for id in [5u32, 6, 7, 8] {
            admit(&mut src, &mut src_sample, capacity, id);
        }
        src.total_count = 7;

        merge_into(&mut dst, &mut dst_sample, &src, &src_sample, capacity);

        assert_eq!(dst.total_count, 17);
        assert!(dst.is_sorted);
        assert_eq!(dst.sample_count as usize, capacity);

        let mut all: Vec<u32> = [1u32, 2, 3, 4, 5, 6, 7, 8].to_vec();
        all.sort_unstable_by_key(|&id| item_hash(id));
        let expected_bottom_k: std::collections::HashSet<u32> =
            all.into_iter().take(capacity).collect();
        let got: std::collections::HashSet<u32> = ids_in(&dst_sample, dst.sample_count)
            .into_iter()
            .collect();
        assert_eq!(got, expected_bottom_k);
    }

    #[test]
    fn merge_collapses_duplicate_ids() {
        let capacity = 4usize;
        let mut dst = Bucket::zeroed();
        let mut dst_sample = vec![0u32; capacity];
        for id in [1u32, 2] {
            admit(&mut dst, &mut dst_sample, capacity, id);
        }
        dst.total_count = 2;

        let mut src = Bucket::zeroed();
        let mut src_sample = vec![0u32; capacity];
        for id in [1u32, 2] {
            admit(&mut src, &mut src_sample, capacity, id);
        }
        src.total_count = 2;

        merge_into(&mut dst, &mut dst_sample, &src, &src_sample, capacity);

        assert_eq!(dst.sample_count, 2);
        assert_eq!(dst.total_count, 4);
    }

    #[test]
    fn merge_with_empty_source_is_noop_on_sample() {
        let capacity = 4usize;
        let mut dst = Bucket::zeroed();
        let mut dst_sample = vec![0u32; capacity];
        admit(&mut dst, &mut dst_sample, capacity, 1);
        dst.total_count = 1;

        let src = Bucket::zeroed();
        let src_sample = vec![0u32; capacity];

        merge_into(&mut dst, &mut dst_sample, &src, &src_sample, capacity);
        assert_eq!(dst.sample_count, 1);
        assert_eq!(dst.total_count, 1);
    }
}
