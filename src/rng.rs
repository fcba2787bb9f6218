//! Random sources used to break ties and diversify candidate rounds.
//!
//! Every engine entry point takes a [`RandomSource`], so tests and replays can run on a seeded
//! or scripted sequence while production uses process entropy.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of the randomness consumed by round generation.
pub trait RandomSource {
    /// Uniform integer in `0..upper`. `upper` is never 0.
    fn below(&mut self, upper: usize) -> usize;

    /// Fisher–Yates shuffle of `slice`.
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.below(i + 1);
            slice.swap(i, j);
        }
    }
}

/// Process-wide entropy, not reproducible.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn below(&mut self, upper: usize) -> usize {
        rand::thread_rng().gen_range(0..upper)
    }
}

/// Reproducible sequence from a 64-bit seed.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    inner: StdRng,
}

impl SeededRandom {
    /// Same seed, same rounds.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn below(&mut self, upper: usize) -> usize {
        self.inner.gen_range(0..upper)
    }
}
