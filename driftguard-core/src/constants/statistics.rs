//! Statistical Process Control Constants
//!
//! Constants for the CUSUM, moving-range and individuals charts, and for the
//! vote that combines them into a drift decision.

// ===== CUSUM =====

/// CUSUM reference value `k` (standardized units).
///
/// Half a standard deviation: the chart is tuned to pick up shifts of about
/// one sigma. Empirically chosen; no derivation is given in the field data.
pub const CUSUM_K: f64 = 0.5;

/// CUSUM decision interval `h` (standardized units).
///
/// A one-sided sum beyond ±h raises the alarm.
pub const CUSUM_H: f64 = 4.0;

/// Number of leading samples used to estimate the CUSUM target and sigma.
pub const CUSUM_BASELINE_WINDOW: usize = 10;

// ===== SHEWHART CONSTANTS (subgroup size 2) =====

/// d2 for n=2: expected range of two normal samples in sigma units.
///
/// Source: ASTM E2587 control chart factor tables
pub const SHEWHART_D2: f64 = 1.128;

/// d3 for n=2, used here as the moving-range lower control multiplier.
pub const SHEWHART_D3: f64 = 0.853;

/// Upper control multiplier for the moving-range chart.
pub const SHEWHART_D4: f64 = 1.693;

// ===== INDIVIDUALS CHART =====

/// Width of the individuals chart control band, in standard deviations.
pub const SPC_SIGMA_MULTIPLIER: f64 = 3.0;

/// Western Electric rule 2: this many consecutive points on one side of the
/// centre line signal a shift.
pub const SPC_RUN_LENGTH: usize = 9;

// ===== DRIFT VOTE =====

/// Minimum fraction of detectors that must fire to declare drift.
///
/// 0.4 of four detectors means two of them.
pub const DRIFT_CONFIDENCE_THRESHOLD: f64 = 0.4;

/// Confidence at or above which drift is treated as established rather
/// than suspected.
pub const ESTABLISHED_DRIFT_CONFIDENCE: f64 = 0.6;

/// Hourly drift rate above which established drift needs calibration now.
pub const IMMEDIATE_CALIBRATION_RATE: f64 = 0.01;

/// Shortest series the drift detector will analyse.
pub const MIN_DRIFT_SAMPLES: usize = 10;

/// Seconds per hour, used to rescale the per-sample slope.
pub const SECONDS_PER_HOUR: f64 = 3600.0;

// ===== NUMERIC FLOORS =====

/// Smallest standard deviation used when standardizing a series.
pub const STD_DEV_FLOOR: f64 = 1e-6;

/// Smallest magnitude used for any other denominator.
pub const DENOMINATOR_FLOOR: f64 = 1e-10;
