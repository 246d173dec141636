//! Random number generation port.
//!
//! Services hold the game rules' random source behind this port so tests
//! can pin every roll.

use crate::domain::services::RandomSource;

/// Random number generation abstraction shared across request tasks
///
/// Any thread-safe [`RandomSource`] is a `RandomPort`.
///
/// # Implementations
///
/// - `ThreadRngAdapter` in infrastructure (production, uses `rand::thread_rng()`)
/// - `MockRandomSource` via mockall (testing)
/// - `FixedRandomPort` for deterministic testing (returns fixed values)
pub trait RandomPort: RandomSource + Send + Sync {}

impl<T: RandomSource + Send + Sync> RandomPort for T {}

/// Fixed random port for deterministic testing.
///
/// Returns values from a provided sequence, cycling if needed. `random_f64`
/// reads each value as a percentage.
#[cfg(test)]
#[derive(Debug)]
pub struct FixedRandomPort {
    values: Vec<i32>,
    index: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl FixedRandomPort {
    pub fn new(values: Vec<i32>) -> Self {
        Self {
            values,
            index: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Always return the same value
    pub fn constant(value: i32) -> Self {
        Self::new(vec![value])
    }

    fn next(&self) -> i32 {
        let idx = self
            .index
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.values[idx % self.values.len()]
    }
}

#[cfg(test)]
impl RandomSource for FixedRandomPort {
    fn random_f64(&self) -> f64 {
        (self.next() as f64 / 100.0).clamp(0.0, 0.999999)
    }

    fn random_range(&self, min: i32, max: i32) -> i32 {
        self.next().clamp(min, max)
    }
}
