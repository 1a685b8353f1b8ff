//! Tabular CUSUM control chart
//!
//! Accumulates standardized deviations from a baseline in two one-sided sums:
//!
//! ```text
//! z_i  = (x_i - target) / σ
//! S+_i = max(0, S+_{i-1} + z_i - k)
//! S-_i = min(0, S-_{i-1} + z_i + k)
//! alarm ⇔ ∃i: S+_i > h  or  S-_i < -h
//! ```
//!
//! Target and σ come from the leading baseline window, so the chart asks
//! "has the signal moved away from where it started?". Both sums start at
//! zero on the first sample.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{CUSUM_BASELINE_WINDOW, CUSUM_H, CUSUM_K, STD_DEV_FLOOR};

use super::{mean, std_dev};

/// CUSUM tuning, in standardized units
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CusumParams {
    /// Reference value (slack per sample)
    pub k: f64,
    /// Decision interval
    pub h: f64,
    /// Leading samples used for target and σ
    pub baseline_window: usize,
}

impl Default for CusumParams {
    fn default() -> Self {
        Self {
            k: CUSUM_K,
            h: CUSUM_H,
            baseline_window: CUSUM_BASELINE_WINDOW,
        }
    }
}

/// CUSUM chart output
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CusumStatistics {
    /// Upper one-sided sums, one per sample
    pub cusum_positive: Vec<f64>,
    /// Lower one-sided sums, one per sample
    pub cusum_negative: Vec<f64>,
    /// Upper sum crossed +h
    pub positive_alarm: bool,
    /// Lower sum crossed -h
    pub negative_alarm: bool,
    /// Either side alarmed
    pub alarm_triggered: bool,
    /// Largest upper sum
    pub max_cusum_pos: f64,
    /// Smallest lower sum
    pub min_cusum_neg: f64,
    /// Baseline mean
    pub target: f64,
    /// Baseline σ after flooring
    pub std_dev: f64,
}

/// Run a CUSUM chart over `data`
pub fn cusum(data: &[f64], params: &CusumParams) -> CusumStatistics {
    let window = &data[..params.baseline_window.min(data.len())];
    let target = mean(window);
    let baseline_sigma = std_dev(window);
    let sigma = if !(baseline_sigma >= STD_DEV_FLOOR) {
        log_warn!("CUSUM baseline σ {:e} floored to {:e}", baseline_sigma, STD_DEV_FLOOR);
        STD_DEV_FLOOR
    } else {
        baseline_sigma
    };

    let n = data.len();
    let mut cusum_positive = Vec::with_capacity(n);
    let mut cusum_negative = Vec::with_capacity(n);

    let mut pos = 0.0_f64;
    let mut neg = 0.0_f64;
    for (i, &x) in data.iter().enumerate() {
        if i > 0 {
            let z = (x - target) / sigma;
            pos = (pos + z - params.k).max(0.0);
            neg = (neg + z + params.k).min(0.0);
        }
        cusum_positive.push(pos);
        cusum_negative.push(neg);
    }

    let max_cusum_pos = cusum_positive.iter().copied().fold(0.0, f64::max);
    let min_cusum_neg = cusum_negative.iter().copied().fold(0.0, f64::min);
    let positive_alarm = max_cusum_pos > params.h;
    let negative_alarm = min_cusum_neg < -params.h;

    CusumStatistics {
        cusum_positive,
        cusum_negative,
        positive_alarm,
        negative_alarm,
        alarm_triggered: positive_alarm || negative_alarm,
        max_cusum_pos,
        min_cusum_neg,
        target,
        std_dev: sigma,
    }
}
