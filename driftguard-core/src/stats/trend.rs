//! Least-squares trend

/// Slope of `y` against its index `0..n-1`, by ordinary least squares
///
/// Returns 0 for fewer than two points.
pub fn linear_trend(y: &[f64]) -> f64 {
    let n = y.len();
    if n < 2 {
        return 0.0;
    }

    // Slope is shift-invariant; centring on the first sample keeps a flat
    // series exactly flat.
    let origin = y[0];

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;

    for (i, &value) in y.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        let value = value - origin;
        sum_y += value;
        sum_xy += x * value;
        sum_xx += x * x;
    }

    let n_f = n as f64;
    // n ≥ 2 with distinct integer x, so the denominator is strictly positive
    (n_f * sum_xy - sum_x * sum_y) / (n_f * sum_xx - sum_x * sum_x)
}

/// `(slope, intercept)` of `y` against arbitrary `x`, by ordinary least squares
///
/// Slope is 0 and the intercept is the mean of `y` when the inputs are
/// shorter than two points, differ in length, or `x` has no spread.
pub fn linear_fit(x: &[f64], y: &[f64]) -> (f64, f64) {
    let n = x.len();
    if n < 2 || n != y.len() {
        return (0.0, super::mean(y));
    }

    let n_f = n as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_xx: f64 = x.iter().map(|a| a * a).sum();

    let denom = n_f * sum_xx - sum_x * sum_x;
    if libm::fabs(denom) < crate::constants::DENOMINATOR_FLOOR {
        log_warn!("least-squares fit over {} points has no spread in x", n);
        return (0.0, sum_y / n_f);
    }

    let slope = (n_f * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n_f;
    (slope, intercept)
}
