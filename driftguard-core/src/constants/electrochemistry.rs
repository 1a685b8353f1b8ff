//! Electrochemical Constants
//!
//! Nernst slope, thermal reference points, and the noise models used by the
//! Kalman filter for each sensor family.

// ===== THERMAL REFERENCE =====

/// Temperature at which all reference responses are specified (°C).
pub const REFERENCE_TEMP_C: f64 = 25.0;

/// Offset between Celsius and Kelvin.
///
/// Source: NIST Special Publication 330 (2019)
pub const KELVIN_OFFSET: f64 = 273.15;

/// `REFERENCE_TEMP_C` in Kelvin.
pub const REFERENCE_TEMP_K: f64 = REFERENCE_TEMP_C + KELVIN_OFFSET;

// ===== NERNST =====

/// Ideal glass-electrode slope at 25 °C (mV/pH).
///
/// 2.303·R·T/F evaluated at 298.15 K.
pub const NERNST_SLOPE_25C_MV_PER_PH: f64 = -59.16;

/// Temperature dependence of the Nernst slope (mV/pH/°C).
pub const NERNST_SLOPE_TEMP_COEFFICIENT: f64 = -0.198;

/// Voltage the pH front end reports at the isopotential point (V).
///
/// pH compensation decomposes and recomposes readings around this anchor.
pub const PH_ANCHOR_VOLTAGE: f64 = 2.0;

/// Fixed pH drift threshold for the trend detector.
pub const PH_DRIFT_THRESHOLD: f64 = 1.0;

// ===== CONDUCTIVITY =====

/// Conductivity temperature coefficient (1/°C), roughly 2 %/°C for
/// natural waters.
pub const CONDUCTIVITY_TEMP_COEFFICIENT: f64 = 0.021;

/// Nominal conductivity cell constant (1/cm).
pub const CONDUCTIVITY_CELL_CONSTANT: f64 = 1.0;

/// Conductivity drift threshold (%/day).
pub const CONDUCTIVITY_DRIFT_THRESHOLD: f64 = 0.05;

// ===== GENERIC SENSORS =====

/// Linear thermal coefficient applied to sensors without a profile (V/°C).
pub const GENERIC_TEMP_COEFFICIENT_V_PER_C: f64 = -1.0e-3;

/// Trend threshold for sensors without a profile.
pub const DEFAULT_DRIFT_THRESHOLD: f64 = 0.01;

/// Days per month used to scale monthly aging rates.
pub const DAYS_PER_MONTH: f64 = 30.0;

// ===== KALMAN NOISE MODELS =====

/// Process noise for electrode channels (V²). Electrodes are the most stable.
pub const ELECTRODE_PROCESS_NOISE: f64 = 1e-6;

/// Measurement noise for electrode channels (V²).
pub const ELECTRODE_MEASUREMENT_NOISE: f64 = 1e-4;

/// Process noise for pH and other channels.
pub const DEFAULT_PROCESS_NOISE: f64 = 1e-5;

/// Measurement noise for pH and other channels.
pub const DEFAULT_MEASUREMENT_NOISE: f64 = 1e-3;

/// Starting error covariance for every filtering pass.
pub const INITIAL_COVARIANCE: f64 = 1.0;

// ===== CALIBRATION ACCEPTANCE =====

/// Minimum r² for a multipoint pH calibration to pass.
pub const PH_CALIBRATION_MIN_R_SQUARED: f64 = 0.998;

/// Largest per-buffer pH error allowed.
pub const PH_CALIBRATION_MAX_ERROR: f64 = 0.05;

/// Largest mean pH error allowed.
pub const PH_CALIBRATION_MEAN_ERROR: f64 = 0.02;

/// Largest electrode offset from its pH 7 reference response (V).
pub const ELECTRODE_OFFSET_TOLERANCE_V: f64 = 0.1;

/// Largest electrode coefficient of variation (%).
pub const ELECTRODE_MAX_CV_PCT: f64 = 2.0;
