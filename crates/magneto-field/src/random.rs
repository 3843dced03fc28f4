//! Injectable uniform random source for particle spawning.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Source of uniform samples in `[0, 1)`.
///
/// Every `rand` generator implements this, so production code passes a seeded
/// [`ChaCha8Rng`] while tests can substitute a fixed sequence.
pub trait RandomSource {
    /// Next sample in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<R: rand::RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        rand::Rng::random::<f64>(self)
    }
}

/// Default generator for a given seed. Deterministic across platforms.
pub fn seeded(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
