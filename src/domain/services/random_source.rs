//! Source of the draws behind floor generation and combat rolls

/// Random draws used by the game rules
#[cfg_attr(test, mockall::automock)]
pub trait RandomSource {
    /// A value in `[0.0, 1.0)`
    fn random_f64(&self) -> f64;

    /// A value in `[min, max]`, both ends included
    fn random_range(&self, min: i32, max: i32) -> i32;
}
