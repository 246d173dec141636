//! Thread-safe random number generation adapter.

use rand::Rng;

use crate::domain::services::RandomSource;

/// Production random number generator using thread-local RNG.
#[derive(Debug, Clone, Default)]
pub struct ThreadRngAdapter;

impl ThreadRngAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl RandomSource for ThreadRngAdapter {
    fn random_f64(&self) -> f64 {
        rand::thread_rng().gen()
    }

    fn random_range(&self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }
}
