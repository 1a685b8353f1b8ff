//! Constants for DriftGuard Core
//!
//! Centralised numeric constants used by the detectors, the compensator and
//! the forecaster. Every value carries its unit and where it comes from.
//!
//! ## Organization
//!
//! - **Statistics**: control-chart constants, voting thresholds, epsilon floors
//! - **Electrochemistry**: Nernst slope, reference temperature, noise models
//! - **Maintenance**: forecast limits and urgency bands
//!
//! Values that a deployment may want to tune are also exposed through the
//! config structs (`DriftConfig`, `KalmanParams`, `ForecastConfig`); the
//! constants here are their defaults.

/// Control-chart and voting constants.
pub mod statistics;

/// Electrochemical and thermal constants.
pub mod electrochemistry;

/// Predictive maintenance limits.
pub mod maintenance;

pub use statistics::{
    CUSUM_K, CUSUM_H, CUSUM_BASELINE_WINDOW,
    SHEWHART_D2, SHEWHART_D3, SHEWHART_D4,
    SPC_SIGMA_MULTIPLIER, SPC_RUN_LENGTH,
    DRIFT_CONFIDENCE_THRESHOLD, MIN_DRIFT_SAMPLES,
    STD_DEV_FLOOR, DENOMINATOR_FLOOR,
};

pub use electrochemistry::{
    REFERENCE_TEMP_C, KELVIN_OFFSET, NERNST_SLOPE_25C_MV_PER_PH,
    PH_ANCHOR_VOLTAGE, GENERIC_TEMP_COEFFICIENT_V_PER_C,
};

pub use maintenance::{
    DRIFT_RATE_LIMIT, NOISE_LEVEL_LIMIT, DEFAULT_MAINTENANCE_DAYS,
    MIN_HISTORY_ENTRIES,
};
