//! Moving-range control chart
//!
//! Monitors short-term variability through successive absolute differences
//! `MR_i = |x_i - x_{i-1}|`, with Shewhart limits for subgroups of two:
//!
//! ```text
//! UCL = D4 · mean(MR)
//! LCL = max(0, D3 · mean(MR))
//! ```
//!
//! With these multipliers the band is narrow: any ordinary noisy signal
//! places some ranges below the LCL, so on its own this chart says more
//! about "the noise is uneven" than "the sensor drifted". The vote in
//! [`crate::drift`] is what gives it weight.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::{SHEWHART_D3, SHEWHART_D4};

use super::mean;

/// Moving-range chart output
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MovingRangeStatistics {
    /// Mean of the moving ranges
    pub mean_moving_range: f64,
    /// D4 · mean
    pub upper_control_limit: f64,
    /// max(0, D3 · mean)
    pub lower_control_limit: f64,
    /// Indices into the moving-range sequence that fall outside the limits
    pub out_of_control_points: Vec<usize>,
    /// At least one range outside the limits
    pub out_of_control: bool,
    /// Share of ranges outside the limits (%)
    pub percent_out_of_control: f64,
}

/// Successive absolute differences of `data`
pub fn moving_ranges(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| libm::fabs(w[1] - w[0])).collect()
}

/// Run a moving-range chart over `data`
pub fn moving_range(data: &[f64]) -> MovingRangeStatistics {
    let ranges = moving_ranges(data);
    let mean_mr = mean(&ranges);

    let ucl = SHEWHART_D4 * mean_mr;
    let lcl = (SHEWHART_D3 * mean_mr).max(0.0);

    let out_of_control_points: Vec<usize> = ranges
        .iter()
        .enumerate()
        .filter(|(_, &mr)| mr > ucl || mr < lcl)
        .map(|(i, _)| i)
        .collect();

    let percent_out_of_control = if ranges.is_empty() {
        0.0
    } else {
        out_of_control_points.len() as f64 / ranges.len() as f64 * 100.0
    };

    MovingRangeStatistics {
        mean_moving_range: mean_mr,
        upper_control_limit: ucl,
        lower_control_limit: lcl,
        out_of_control: !out_of_control_points.is_empty(),
        out_of_control_points,
        percent_out_of_control,
    }
}
