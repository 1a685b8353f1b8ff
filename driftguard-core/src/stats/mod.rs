//! Statistical Primitives for Drift Detection
//!
//! ## Overview
//!
//! Four independent detectors, each looking at a different symptom of a
//! sensor leaving calibration:
//!
//! ```text
//! Detector          | Watches for                    | Fires when
//! ------------------|--------------------------------|------------------------------
//! Linear trend      | steady ramp                    | |rate| > sensor threshold
//! CUSUM             | small sustained level shift    | one-sided sum beyond ±h
//! Moving range      | change in short-term noise     | any MR outside [LCL, UCL]
//! Individuals (SPC) | outliers and runs              | 3σ breach or 9-point run
//! ```
//!
//! All of them are pure functions over a borrowed slice. Statistics are
//! population statistics (divide by N). Denominators that can vanish on
//! constant input are floored instead of producing NaN.

pub mod cusum;
pub mod moving_range;
pub mod spc;
pub mod trend;

pub use cusum::{cusum, CusumParams, CusumStatistics};
pub use moving_range::{moving_range, MovingRangeStatistics};
pub use spc::{individuals_chart, SpcParams, SpcStatistics};
pub use trend::{linear_fit, linear_trend};

/// Arithmetic mean; 0 for an empty slice
///
/// Accumulated relative to the first sample, so a constant series returns
/// its value exactly.
pub fn mean(values: &[f64]) -> f64 {
    let Some(&origin) = values.first() else {
        return 0.0;
    };
    origin + values.iter().map(|v| v - origin).sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0 for an empty slice
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    libm::sqrt(variance)
}

/// Floor a magnitude, keeping its sign
pub(crate) fn floor_magnitude(value: f64, floor: f64) -> f64 {
    if libm::fabs(value) >= floor {
        return value;
    }
    log_warn!("degenerate denominator {:e} floored to {:e}", value, floor);
    if value < 0.0 {
        -floor
    } else {
        floor
    }
}

/// Pearson correlation coefficient
///
/// Zero when either vector has no variance, or when the lengths differ.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return 0.0;
    }
    let mx = mean(x);
    let my = mean(y);
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mx;
        let dy = b - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let denom = libm::sqrt(sxx * syy);
    if denom <= 0.0 {
        0.0
    } else {
        sxy / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn population_statistics() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&data), 5.0);
        assert_relative_eq!(std_dev(&data), 2.0);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
    }

    #[test]
    fn constant_series_is_exact() {
        let data = [3.3; 37];
        assert_eq!(mean(&data), 3.3);
        assert_eq!(std_dev(&data), 0.0);
    }

    #[test]
    fn correlation_bounds() {
        let x = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(pearson(&x, &[2.0, 4.0, 6.0, 8.0]), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pearson(&x, &[8.0, 6.0, 4.0, 2.0]), -1.0, epsilon = 1e-12);
        assert_eq!(pearson(&x, &[3.0; 4]), 0.0);
        assert_eq!(pearson(&x, &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn floor_keeps_sign() {
        assert_eq!(floor_magnitude(0.0, 1e-10), 1e-10);
        assert_eq!(floor_magnitude(-1e-12, 1e-10), -1e-10);
        assert_eq!(floor_magnitude(0.5, 1e-10), 0.5);
    }

    #[cfg(all(feature = "log", feature = "std"))]
    #[test]
    fn floors_are_logged() {
        use crate::logging::capture;
        capture::install();

        floor_magnitude(-2.5e-13, 1e-10);
        assert!(capture::warned("degenerate denominator -2.5e-13 floored"));

        cusum(&[7.25; 12], &CusumParams::default());
        assert!(capture::warned("CUSUM baseline σ 0e0 floored"));

        linear_fit(&[4.0, 4.0, 4.0], &[1.0, 2.0, 3.0]);
        assert!(capture::warned("least-squares fit over 3 points has no spread"));
    }
}
