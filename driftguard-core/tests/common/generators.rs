//! Series generators with sensor-like noise
//!
//! Noise comes from a seeded `StdRng` so every failure is reproducible.

use driftguard_core::HistoryEntry;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};

/// Seed used by the worked examples
pub const FIELD_SEED: u64 = 42;

/// `start + step·i` for `i in 0..n`
pub fn ramp(n: usize, start: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Flat at `level`, jumping by `jump` from index `at` onward
pub fn step_change(n: usize, level: f64, at: usize, jump: f64) -> Vec<f64> {
    (0..n).map(|i| if i < at { level } else { level + jump }).collect()
}

/// `n` draws from N(0, sigma²)
pub fn gaussian_noise(n: usize, sigma: f64, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, sigma).expect("sigma must be finite and non-negative");
    (0..n).map(|_| normal.sample(&mut rng)).collect()
}

/// Add seeded Gaussian noise to a clean series
pub fn with_noise(clean: &[f64], sigma: f64, seed: u64) -> Vec<f64> {
    clean
        .iter()
        .zip(gaussian_noise(clean.len(), sigma, seed))
        .map(|(c, e)| c + e)
        .collect()
}

/// Daily history with drift and noise given per entry index
pub fn daily_history(
    n: usize,
    drift: impl Fn(usize) -> f64,
    noise: impl Fn(usize) -> f64,
) -> Vec<HistoryEntry> {
    const START: u64 = 1_700_000_000;
    const DAY: u64 = 86_400;
    (0..n)
        .map(|i| HistoryEntry::new(START + i as u64 * DAY, drift(i), noise(i)))
        .collect()
}

/// Sample variance (N - 1)
pub fn sample_variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0)
}
