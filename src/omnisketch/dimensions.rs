//! Sketch sizing rule, derived once from `(epsilon, delta)` on the first
//! absorbed record (spec §4.4, matching `omnisketch_add`'s sizing block in
//! the original implementation byte for byte).

/// Euler's number, matching the original's `EULER_NUMBER` literal rather
/// than `std::f64::consts::E`, so the computed `(d, w)` pair is identical
/// to the source this spec distills.
const EULER_NUMBER: f64 = 2.71828;

/// Computed sketch geometry for a given `(epsilon, delta)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Rows per plane.
    pub height: usize,
    /// Columns per row.
    pub width: usize,
    /// Sample capacity per bucket.
    pub sample_size: usize,
    /// Item bit width; fixed at 32 for storage regardless of the search
    /// below (spec §4.4: "fix b = 32 regardless for storage").
    pub item_bits: u32,
}

/// Derive `(d, w, B, b)` from accuracy `epsilon` and failure probability
/// `delta`, both already validated to be in `(0.0, 1.0]`.
pub fn compute(epsilon: f64, delta: f64) -> Dimensions {
    // d = ceil(ln(2/delta))
    let height = (2.0 / delta).ln().ceil().max(1.0) as usize;

    // w = 1 + ceil(e * ((epsilon+1)/epsilon)^(1/d))
    let width =
        1 + (EULER_NUMBER * ((epsilon + 1.0) / epsilon).powf(1.0 / height as f64)).ceil() as usize;

    // Search for the smallest B (and its matching b) such that b >= 32 or
    // B >= 1024, whichever comes first; storage always uses b = 32.
    let mut sample_size = 0usize;
    let mut item_bits = 0u32;
    while item_bits < 32 && sample_size < 1024 {
        sample_size += 1;
        item_bits = (4.0 * (sample_size as f64).powf(2.5) / delta).ln().ceil() as u32;
    }

    Dimensions {
        height,
        width,
        sample_size,
        item_bits: 32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_grows_as_delta_shrinks() {
        let loose = compute(0.1, 0.5);
        let tight = compute(0.1, 0.01);
        assert!(tight.height >= loose.height);
    }

    #[test]
    fn width_grows_as_epsilon_shrinks() {
        let loose = compute(0.5, 0.1);
        let tight = compute(0.01, 0.1);
        assert!(tight.width >= loose.width);
    }

    #[test]
    fn sample_size_is_nonzero_and_bounded() {
        let dims = compute(0.1, 0.1);
        assert!(dims.sample_size >= 1);
        assert!(dims.sample_size <= 1024);
        assert_eq!(dims.item_bits, 32);
    }

    #[test]
    fn deterministic_for_same_inputs() {
        assert_eq!(compute(0.05, 0.05), compute(0.05, 0.05));
    }
}
