//! Predictive Maintenance Constants

/// Drift rate at which an electrode must be serviced.
pub const DRIFT_RATE_LIMIT: f64 = 0.05;

/// Noise level at which an electrode must be serviced.
pub const NOISE_LEVEL_LIMIT: f64 = 0.01;

/// Horizon reported when no metric is trending toward its limit (days).
pub const DEFAULT_MAINTENANCE_DAYS: f64 = 90.0;

/// Shortest estimate ever reported (days).
pub const MIN_MAINTENANCE_DAYS: f64 = 1.0;

/// Shortest history the forecaster will extrapolate from.
pub const MIN_HISTORY_ENTRIES: usize = 20;

/// Below this many days maintenance is critical.
pub const CRITICAL_WITHIN_DAYS: f64 = 7.0;

/// Below this many days maintenance is high priority.
pub const HIGH_WITHIN_DAYS: f64 = 30.0;
