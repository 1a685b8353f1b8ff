//! Calibration Checks
//!
//! Pure computation behind the factory calibration run. The operator
//! prompts and serial reads live with the caller; this module grades what
//! they measured.
//!
//! ## pH Curve
//!
//! Least-squares line of buffer pH against measured voltage. A curve passes
//! when:
//!
//! ```text
//! r²          > 0.998
//! max |error| < 0.05 pH
//! mean |error| < 0.02 pH
//! ```
//!
//! ## Electrode Stability
//!
//! An electrode soaked in pH 7 buffer is sampled over time. It passes when
//! its drift stays under its own mV/hour limit, its mean is within 100 mV of
//! the reference pH 7 response, and its coefficient of variation is under 2 %.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        electrochemistry::{
            ELECTRODE_MAX_CV_PCT, ELECTRODE_OFFSET_TOLERANCE_V, PH_CALIBRATION_MAX_ERROR,
            PH_CALIBRATION_MEAN_ERROR, PH_CALIBRATION_MIN_R_SQUARED, REFERENCE_TEMP_C,
        },
        DENOMINATOR_FLOOR,
    },
    errors::{Analysis, InsufficientReason},
    reference::{BufferLabel, ElectrodeType, PhBuffer, ReferenceTable},
    stats::{floor_magnitude, linear_fit, mean, std_dev},
};

/// Fewest points that define a line
pub const MIN_CALIBRATION_POINTS: usize = 2;

/// One buffer measured during a pH calibration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhCalibrationPoint {
    /// Buffer the probe sat in
    pub buffer: PhBuffer,
    /// Averaged probe voltage
    pub measured_voltage: f64,
    /// Averaged buffer temperature (°C)
    pub temperature_c: f64,
    /// Spread of the averaged voltage readings
    pub std_deviation: f64,
}

/// Graded calibration point
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GradedPoint {
    /// Buffer the probe sat in
    pub buffer: PhBuffer,
    /// Buffer pH
    pub ph_value: f64,
    /// Averaged probe voltage
    pub measured_voltage: f64,
    /// Nominal buffer voltage corrected to the measured temperature
    pub expected_voltage: f64,
    /// True if the measurement sits within the buffer's tolerance
    pub within_tolerance: bool,
    /// Buffer temperature (°C)
    pub temperature_c: f64,
    /// Spread of the averaged voltage readings
    pub std_deviation: f64,
    /// Spread relative to the voltage, percent
    pub repeatability_cv: f64,
    /// pH the fitted curve gives for this voltage
    pub predicted_ph: f64,
    /// |predicted - actual| pH
    pub residual: f64,
}

/// Fitted pH calibration curve
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhCalibration {
    /// All acceptance limits met
    pub passed: bool,
    /// pH per volt
    pub slope: f64,
    /// pH at 0 V
    pub intercept: f64,
    /// Coefficient of determination
    pub r_squared: f64,
    /// Largest residual (pH)
    pub max_error: f64,
    /// Mean residual (pH)
    pub mean_error: f64,
    /// Per-point detail, input order
    pub calibration_points: Vec<GradedPoint>,
}

impl PhCalibration {
    /// pH for a voltage on this curve
    pub fn ph_at(&self, voltage: f64) -> f64 {
        self.slope * voltage + self.intercept
    }
}

/// Fit and grade a multi-point pH calibration
pub fn fit_ph_calibration(
    table: &ReferenceTable,
    points: &[PhCalibrationPoint],
) -> Analysis<PhCalibration> {
    if points.len() < MIN_CALIBRATION_POINTS {
        log_warn!("pH calibration skipped: {} points", points.len());
        return Analysis::insufficient(
            InsufficientReason::TooFewCalibrationPoints,
            MIN_CALIBRATION_POINTS,
            points.len(),
        );
    }

    let voltages: Vec<f64> = points.iter().map(|p| p.measured_voltage).collect();
    let ph_values: Vec<f64> = points.iter().map(|p| p.buffer.ph()).collect();
    let (slope, intercept) = linear_fit(&voltages, &ph_values);

    let calibration_points: Vec<GradedPoint> = points
        .iter()
        .map(|p| {
            let standard = table.ph_buffer(p.buffer);
            let expected_voltage =
                standard.expected_voltage + standard.temp_coeff * (p.temperature_c - REFERENCE_TEMP_C);
            let predicted_ph = slope * p.measured_voltage + intercept;
            GradedPoint {
                buffer: p.buffer,
                ph_value: p.buffer.ph(),
                measured_voltage: p.measured_voltage,
                expected_voltage,
                within_tolerance: libm::fabs(p.measured_voltage - expected_voltage)
                    <= standard.tolerance,
                temperature_c: p.temperature_c,
                std_deviation: p.std_deviation,
                repeatability_cv: p.std_deviation
                    / floor_magnitude(p.measured_voltage, DENOMINATOR_FLOOR)
                    * 100.0,
                predicted_ph,
                residual: libm::fabs(predicted_ph - p.buffer.ph()),
            }
        })
        .collect();

    let residuals: Vec<f64> = calibration_points.iter().map(|p| p.residual).collect();
    let max_error = residuals.iter().copied().fold(0.0, f64::max);
    let mean_error = mean(&residuals);
    let r_squared = coefficient_of_determination(&ph_values, &residuals);

    let passed = r_squared > PH_CALIBRATION_MIN_R_SQUARED
        && max_error < PH_CALIBRATION_MAX_ERROR
        && mean_error < PH_CALIBRATION_MEAN_ERROR;

    log_debug!(
        "pH calibration: slope={:.4} intercept={:.4} r2={:.6} passed={}",
        slope,
        intercept,
        r_squared,
        passed
    );

    Analysis::Ready(PhCalibration {
        passed,
        slope,
        intercept,
        r_squared,
        max_error,
        mean_error,
        calibration_points,
    })
}

/// r² from observed values and absolute residuals
///
/// A target with no variance scores 1 on a perfect fit and 0 otherwise.
fn coefficient_of_determination(observed: &[f64], residuals: &[f64]) -> f64 {
    let m = mean(observed);
    let ss_tot: f64 = observed.iter().map(|y| (y - m) * (y - m)).sum();
    let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
    if ss_tot <= 0.0 {
        return if ss_res <= 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}

/// Stability run of one electrode in pH 7 buffer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElectrodeStability {
    /// Electrode assessed
    pub electrode: ElectrodeType,
    /// All three checks passed
    pub passed: bool,
    /// Mean voltage over the run
    pub mean_voltage: f64,
    /// Reference pH 7 response
    pub expected_voltage: f64,
    /// Mean minus reference (V)
    pub calibration_offset: f64,
    /// Population spread over the run
    pub std_deviation: f64,
    /// Coefficient of variation, percent
    pub cv_percent: f64,
    /// Fitted drift (mV/hour)
    pub drift_rate_mv_per_hour: f64,
    /// Drift under the electrode's limit
    pub drift_acceptable: bool,
    /// Offset under 100 mV
    pub offset_acceptable: bool,
    /// CV under 2 %
    pub noise_acceptable: bool,
}

/// Grade an electrode's stability run
///
/// `minutes` holds each reading's time since the start of the run. Readings
/// and times are paired up to the shorter of the two.
pub fn assess_electrode_stability(
    table: &ReferenceTable,
    electrode: ElectrodeType,
    readings: &[f64],
    minutes: &[f64],
) -> Analysis<ElectrodeStability> {
    let n = readings.len().min(minutes.len());
    if n < MIN_CALIBRATION_POINTS {
        log_warn!("{} stability run skipped: {} paired readings", electrode, n);
        return Analysis::insufficient(InsufficientReason::TooFewReadings, MIN_CALIBRATION_POINTS, n);
    }
    let readings = &readings[..n];
    let minutes = &minutes[..n];

    let standard = table.electrode(electrode);
    let mean_voltage = mean(readings);
    let std_deviation = std_dev(readings);
    let cv_percent = std_deviation / floor_magnitude(mean_voltage, DENOMINATOR_FLOOR) * 100.0;

    let (slope_v_per_min, _) = linear_fit(minutes, readings);
    let drift_rate_mv_per_hour = slope_v_per_min * 1000.0 * 60.0;

    let expected_voltage = standard.reference_responses.get(BufferLabel::Ph7);
    let calibration_offset = mean_voltage - expected_voltage;

    let drift_acceptable = libm::fabs(drift_rate_mv_per_hour) < standard.max_drift_mv_per_hour;
    let offset_acceptable = libm::fabs(calibration_offset) < ELECTRODE_OFFSET_TOLERANCE_V;
    let noise_acceptable = libm::fabs(cv_percent) < ELECTRODE_MAX_CV_PCT;
    let passed = drift_acceptable && offset_acceptable && noise_acceptable;

    log_debug!(
        "{}: {:.4}V (offset {:+.4}V, drift {:+.2}mV/h) passed={}",
        electrode,
        mean_voltage,
        calibration_offset,
        drift_rate_mv_per_hour,
        passed
    );

    Analysis::Ready(ElectrodeStability {
        electrode,
        passed,
        mean_voltage,
        expected_voltage,
        calibration_offset,
        std_deviation,
        cv_percent,
        drift_rate_mv_per_hour,
        drift_acceptable,
        offset_acceptable,
        noise_acceptable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn table() -> &'static ReferenceTable {
        ReferenceTable::builtin()
    }

    fn point(buffer: PhBuffer, measured_voltage: f64) -> PhCalibrationPoint {
        PhCalibrationPoint {
            buffer,
            measured_voltage,
            temperature_c: 25.0,
            std_deviation: 0.001,
        }
    }

    /// Points lying exactly on pH = -6·V + 20
    fn linear_points() -> Vec<PhCalibrationPoint> {
        PhBuffer::ALL
            .iter()
            .map(|&b| point(b, (20.0 - b.ph()) / 6.0))
            .collect()
    }

    #[test]
    fn one_point_is_not_a_curve() {
        let why = *fit_ph_calibration(table(), &[point(PhBuffer::Ph6_86, 2.0)])
            .insufficiency()
            .unwrap();
        assert_eq!(why.reason, InsufficientReason::TooFewCalibrationPoints);
        assert_eq!(why.required, 2);
    }

    #[test]
    fn exact_line_passes() {
        let cal = fit_ph_calibration(table(), &linear_points()).ready().unwrap();
        assert_relative_eq!(cal.slope, -6.0, epsilon = 1e-9);
        assert_relative_eq!(cal.intercept, 20.0, epsilon = 1e-9);
        assert_relative_eq!(cal.r_squared, 1.0, epsilon = 1e-9);
        assert!(cal.max_error < 1e-9);
        assert!(cal.passed);
        assert_relative_eq!(cal.ph_at(2.0), 8.0, epsilon = 1e-9);
        assert_eq!(cal.calibration_points.len(), 4);
    }

    #[test]
    fn scattered_points_fail() {
        let mut points = linear_points();
        points[1].measured_voltage += 0.05;
        let cal = fit_ph_calibration(table(), &points).ready().unwrap();
        assert!(cal.max_error > 0.05);
        assert!(!cal.passed);
    }

    #[test]
    fn expected_voltage_follows_temperature() {
        let mut p = point(PhBuffer::Ph4_01, 2.46);
        p.temperature_c = 35.0;
        let cal = fit_ph_calibration(table(), &[p, point(PhBuffer::Ph9_18, 1.54)])
            .ready()
            .unwrap();
        // 2.458 + (-5.4e-4)·10
        assert_relative_eq!(cal.calibration_points[0].expected_voltage, 2.4526, epsilon = 1e-12);
        assert!(cal.calibration_points[0].within_tolerance);
        assert_relative_eq!(cal.calibration_points[1].expected_voltage, 1.542, epsilon = 1e-12);
    }

    #[test]
    fn stable_electrode_passes() {
        // Pt reference 2.03 V, limit 0.03 mV/h; this run creeps 0.006 mV/h
        let minutes: Vec<f64> = (0..30).map(|i| i as f64 * 0.5).collect();
        let readings: Vec<f64> = minutes.iter().map(|m| 2.03 + 1e-7 * m).collect();
        let s = assess_electrode_stability(table(), ElectrodeType::Pt, &readings, &minutes)
            .ready()
            .unwrap();
        assert_relative_eq!(s.drift_rate_mv_per_hour, 0.006, epsilon = 1e-6);
        assert_relative_eq!(s.calibration_offset, 0.0, epsilon = 1e-5);
        assert_eq!(s.expected_voltage, 2.03);
        assert!(s.drift_acceptable && s.offset_acceptable && s.noise_acceptable);
        assert!(s.passed);
    }

    #[test]
    fn drifting_electrode_fails() {
        // 0.1 mV per minute = 6 mV/h
        let minutes: Vec<f64> = (0..30).map(|i| i as f64 * 0.5).collect();
        let readings: Vec<f64> = minutes.iter().map(|m| 1.42 + 0.0001 * m).collect();
        let s = assess_electrode_stability(table(), ElectrodeType::Ss, &readings, &minutes)
            .ready()
            .unwrap();
        assert_relative_eq!(s.drift_rate_mv_per_hour, 6.0, epsilon = 1e-6);
        assert!(!s.drift_acceptable);
        assert!(!s.passed);
        assert!(s.offset_acceptable);
    }

    #[test]
    fn offset_beyond_tolerance() {
        let readings = [1.60; 5];
        let minutes = [0.0, 1.0, 2.0, 3.0, 4.0];
        let s = assess_electrode_stability(table(), ElectrodeType::Ss, &readings, &minutes)
            .ready()
            .unwrap();
        assert_relative_eq!(s.calibration_offset, 0.18, epsilon = 1e-12);
        assert!(!s.offset_acceptable);
        assert!(s.drift_acceptable);
        assert!(!s.passed);
    }

    #[test]
    fn stability_needs_two_paired_readings() {
        let r = assess_electrode_stability(table(), ElectrodeType::Cu, &[1.68, 1.68], &[0.0]);
        assert_eq!(r.insufficiency().unwrap().available, 1);
    }
}
