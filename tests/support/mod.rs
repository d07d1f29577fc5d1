//! Deterministic `RandomSource` for integration tests, so estimate-accuracy
//! assertions don't depend on OS randomness between runs.

use omnisketch::RandomSource;

/// Produces a fixed sequence of seeds from a linear congruential step.
/// Not suitable for anything security-sensitive; only used to make sketch
/// seeding reproducible across test runs.
pub struct DeterministicRandomSource {
    state: u32,
}

impl DeterministicRandomSource {
    pub fn new(seed: u32) -> Self {
        DeterministicRandomSource { state: seed }
    }
}

impl RandomSource for DeterministicRandomSource {
    fn u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        self.state
    }
}
