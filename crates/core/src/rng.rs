use rand::Rng;
use std::ops::RangeInclusive;

// Randomness is a capability handed to callers so tests can pin exact outputs.
pub trait RandomSource: Send + Sync {
    fn int_in_range(&self, range: RangeInclusive<i64>) -> i64;

    // Uniform index into a collection of `len` elements; `len` must be non-zero.
    fn pick_index(&self, len: usize) -> usize;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn int_in_range(&self, range: RangeInclusive<i64>) -> i64 {
        rand::thread_rng().gen_range(range)
    }

    fn pick_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}
