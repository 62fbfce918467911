//! xorshift64* random number generator
//!
//! Fast, deterministic PRNG used by the reference cash-flow generator.
//!
//! # Determinism
//!
//! Same seed → same sequence of draws → same event sequence → same ledger.
//! This is what makes scenario demonstrations replayable.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use liquidity_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let u = rng.next_f64();
/// assert!((0.0..1.0).contains(&u));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with given seed
    ///
    /// A zero seed is mapped to 1 (xorshift cannot leave the zero state).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u64 value
    pub fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Current internal state (for replay)
    pub fn get_state(&self) -> u64 {
        self.state
    }

    /// Generate random f64 in range [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next();
        // Top 53 bits → mantissa-sized uniform
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Sample a standard normal variate with the Box-Muller transform.
    ///
    /// Consumes exactly two uniform draws.
    pub fn standard_normal(&mut self) -> f64 {
        // 1 - u keeps the log argument in (0, 1]
        let u1 = 1.0 - self.next_f64();
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// Sample a normal value centered on the midpoint of `[min, max]` with a
    /// standard deviation of one sixth of the width, clamped to the bounds.
    ///
    /// Out-of-range samples are clamped, not rejected.
    ///
    /// # Example
    /// ```
    /// use liquidity_simulator_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(7);
    /// for _ in 0..100 {
    ///     let v = rng.clamped_normal(1.0, 10.0);
    ///     assert!(v >= 1.0 && v <= 10.0);
    /// }
    /// ```
    pub fn clamped_normal(&mut self, min: f64, max: f64) -> f64 {
        let mean = (min + max) / 2.0;
        let std_dev = (max - min) / 6.0;
        let value = mean + std_dev * self.standard_normal();
        value.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let rng = RngManager::new(0);
        assert_ne!(rng.get_state(), 0, "Zero seed should be converted to 1");
    }

    #[test]
    fn test_next_f64_in_range() {
        let mut rng = RngManager::new(12345);

        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!(
                (0.0..1.0).contains(&val),
                "next_f64() produced value {} outside [0.0, 1.0)",
                val
            );
        }
    }

    #[test]
    fn test_standard_normal_is_finite() {
        let mut rng = RngManager::new(42);
        for _ in 0..10_000 {
            assert!(rng.standard_normal().is_finite());
        }
    }

    #[test]
    fn test_clamped_normal_mean_near_midpoint() {
        let mut rng = RngManager::new(2024);
        let n = 20_000;
        let sum: f64 = (0..n).map(|_| rng.clamped_normal(1.0, 10.0)).sum();
        let mean = sum / n as f64;
        assert!((mean - 5.5).abs() < 0.1, "sample mean {} too far from 5.5", mean);
    }

    #[test]
    fn test_clamped_normal_degenerate_range() {
        let mut rng = RngManager::new(3);
        assert_eq!(rng.clamped_normal(4.0, 4.0), 4.0);
    }
}
