//! Drift Detector
//!
//! ## Overview
//!
//! Runs the four statistical detectors over a reading window and lets them
//! vote. Each detector that fires contributes a quarter of the confidence;
//! drift is declared once the confidence reaches the configured threshold
//! (two of four by default).
//!
//! ```text
//! readings ──┬─→ linear trend ──→ |rate| > threshold ─┐
//!            ├─→ CUSUM ─────────→ alarm ──────────────┤
//!            ├─→ moving range ──→ out of control ─────┼─→ confidence = fired/4
//!            └─→ individuals ───→ out of control ─────┘          │
//!                                                                 ▼
//!                                             drift_detected, recommendation
//! ```
//!
//! ## Hourly Rate
//!
//! The trend slope is per sample. It is rescaled to an hourly figure with
//! `slope · 3600 / n`, which assumes uniform sampling over a window whose
//! duration is not tracked. Timestamps are not consulted.
//!
//! ## Trend Threshold
//!
//! - electrode with a known material: monthly aging rate / 30
//! - pH: the pH drift threshold from the reference table
//! - anything else: a default constant
//!
//! ## Usage Example
//!
//! ```rust
//! use driftguard_core::{DriftDetector, ReferenceTable, SensorType, ElectrodeType, Action};
//!
//! let table = ReferenceTable::builtin();
//! let detector = DriftDetector::new(table);
//!
//! let readings: Vec<f64> = (0..50).map(|i| 2.0 + 0.001 * i as f64).collect();
//! let result = detector
//!     .detect(&readings, SensorType::Electrode, Some(ElectrodeType::Pt))
//!     .ready()
//!     .unwrap();
//!
//! assert!(result.drift_detected);
//! assert_ne!(result.recommendation.action, Action::Monitor);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        electrochemistry::{DAYS_PER_MONTH, DEFAULT_DRIFT_THRESHOLD},
        statistics::{ESTABLISHED_DRIFT_CONFIDENCE, IMMEDIATE_CALIBRATION_RATE, SECONDS_PER_HOUR},
        DRIFT_CONFIDENCE_THRESHOLD, MIN_DRIFT_SAMPLES,
    },
    errors::{Analysis, InsufficientReason},
    reference::{ElectrodeType, ReferenceTable, SensorType},
    stats::{
        cusum, individuals_chart, linear_trend, moving_range, CusumParams, CusumStatistics,
        MovingRangeStatistics, SpcParams, SpcStatistics,
    },
};

/// Tunable detector settings
///
/// Defaults reproduce the field-proven constants; every one can be
/// overridden with the `with_*` builders.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriftConfig {
    /// CUSUM chart tuning
    pub cusum: CusumParams,
    /// Individuals chart tuning
    pub spc: SpcParams,
    /// Fraction of detectors needed to declare drift
    pub confidence_threshold: f64,
    /// Confidence at which drift counts as established
    pub established_confidence: f64,
    /// Hourly rate above which established drift is urgent
    pub immediate_calibration_rate: f64,
    /// Trend threshold for sensors without a profile
    pub default_trend_threshold: f64,
    /// Shortest series analysed
    pub min_samples: usize,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            cusum: CusumParams::default(),
            spc: SpcParams::default(),
            confidence_threshold: DRIFT_CONFIDENCE_THRESHOLD,
            established_confidence: ESTABLISHED_DRIFT_CONFIDENCE,
            immediate_calibration_rate: IMMEDIATE_CALIBRATION_RATE,
            default_trend_threshold: DEFAULT_DRIFT_THRESHOLD,
            min_samples: MIN_DRIFT_SAMPLES,
        }
    }
}

impl DriftConfig {
    /// Set CUSUM reference value and decision interval
    pub fn with_cusum(mut self, k: f64, h: f64) -> Self {
        self.cusum.k = k;
        self.cusum.h = h;
        self
    }

    /// Set the number of leading samples used as the CUSUM baseline
    pub fn with_baseline_window(mut self, samples: usize) -> Self {
        self.cusum.baseline_window = samples.max(1);
        self
    }

    /// Set the individuals chart band width and run length
    pub fn with_spc(mut self, sigma_multiplier: f64, run_length: usize) -> Self {
        self.spc = SpcParams { sigma_multiplier, run_length };
        self
    }

    /// Set the voting threshold
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Set the minimum series length
    pub fn with_min_samples(mut self, samples: usize) -> Self {
        self.min_samples = samples.max(2);
        self
    }

    /// Set the trend threshold used when a sensor has no profile of its own
    pub fn with_default_trend_threshold(mut self, threshold: f64) -> Self {
        self.default_trend_threshold = threshold;
        self
    }

    /// Set the hourly rate beyond which established drift needs calibration now
    pub fn with_immediate_calibration_rate(mut self, rate: f64) -> Self {
        self.immediate_calibration_rate = rate;
        self
    }

    /// Set the confidence at which drift counts as established
    pub fn with_established_confidence(mut self, confidence: f64) -> Self {
        self.established_confidence = confidence.clamp(0.0, 1.0);
        self
    }
}

/// Which detectors fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriftIndicators {
    /// Hourly rate beyond the sensor's trend threshold
    pub linear_trend: bool,
    /// CUSUM crossed its decision interval
    pub cusum_alarm: bool,
    /// A moving range left its control band
    pub range_alarm: bool,
    /// Individuals chart rule 1 or rule 2
    pub spc_alarm: bool,
}

impl DriftIndicators {
    /// Number of indicators
    pub const COUNT: usize = 4;

    /// Indicators that fired
    pub fn fired(&self) -> usize {
        [self.linear_trend, self.cusum_alarm, self.range_alarm, self.spc_alarm]
            .iter()
            .filter(|&&fired| fired)
            .count()
    }

    /// Fraction of indicators that fired
    pub fn confidence(&self) -> f64 {
        self.fired() as f64 / Self::COUNT as f64
    }
}

/// Recommended response to a drift analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    /// Keep the normal schedule
    Monitor,
    /// Check more often
    IncreaseMonitoring,
    /// Calibrate within a day
    ScheduleCalibration,
    /// Calibrate now
    ImmediateCalibration,
}

/// How soon someone should act
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Urgency {
    /// Routine
    Low,
    /// Soon
    Medium,
    /// Now
    High,
}

/// Action, urgency and next check
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Recommendation {
    /// What to do
    pub action: Action,
    /// How soon
    pub urgency: Urgency,
    /// Operator-facing explanation
    pub message: &'static str,
    /// Hours until the sensor should be analysed again
    pub next_check_hours: u32,
}

impl Recommendation {
    /// Pick a recommendation from the vote outcome
    ///
    /// Evaluated in order: no drift, suspected drift, established fast
    /// drift, established slow drift.
    pub fn from_vote(
        drift_detected: bool,
        confidence: f64,
        drift_rate: f64,
        config: &DriftConfig,
    ) -> Self {
        if !drift_detected {
            Self {
                action: Action::Monitor,
                urgency: Urgency::Low,
                message: "No significant drift detected. Continue normal monitoring.",
                next_check_hours: 24,
            }
        } else if confidence < config.established_confidence {
            Self {
                action: Action::IncreaseMonitoring,
                urgency: Urgency::Medium,
                message: "Possible drift detected. Increase monitoring frequency.",
                next_check_hours: 4,
            }
        } else if libm::fabs(drift_rate) > config.immediate_calibration_rate {
            Self {
                action: Action::ImmediateCalibration,
                urgency: Urgency::High,
                message: "Significant drift detected. Immediate calibration recommended.",
                next_check_hours: 1,
            }
        } else {
            Self {
                action: Action::ScheduleCalibration,
                urgency: Urgency::Medium,
                message: "Moderate drift detected. Schedule calibration within 24 hours.",
                next_check_hours: 8,
            }
        }
    }
}

/// Full drift analysis of one reading window
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DriftAnalysis {
    /// Confidence reached the threshold
    pub drift_detected: bool,
    /// Fraction of indicators that fired, in [0, 1]
    pub drift_confidence: f64,
    /// Trend rescaled to an hourly basis
    pub drift_rate_per_hour: f64,
    /// Trend slope per sample
    pub linear_slope: f64,
    /// Threshold the hourly rate was compared against
    pub trend_threshold: f64,
    /// CUSUM chart
    pub cusum_statistics: CusumStatistics,
    /// Moving-range chart
    pub moving_range_stats: MovingRangeStatistics,
    /// Individuals chart
    pub spc_statistics: SpcStatistics,
    /// Per-detector votes
    pub individual_indicators: DriftIndicators,
    /// What to do about it
    pub recommendation: Recommendation,
}

/// Drift detector bound to a reference table
#[derive(Debug, Clone, Copy)]
pub struct DriftDetector<'a> {
    table: &'a ReferenceTable,
    config: DriftConfig,
}

impl<'a> DriftDetector<'a> {
    /// Detector with default settings
    pub fn new(table: &'a ReferenceTable) -> Self {
        Self::with_config(table, DriftConfig::default())
    }

    /// Detector with custom settings
    pub fn with_config(table: &'a ReferenceTable, config: DriftConfig) -> Self {
        Self { table, config }
    }

    /// Active settings
    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    /// Trend threshold for a sensor
    pub fn trend_threshold(&self, sensor: SensorType, electrode: Option<ElectrodeType>) -> f64 {
        match (sensor, electrode) {
            (SensorType::Electrode, Some(electrode)) => {
                self.table.electrode(electrode).aging_rate / DAYS_PER_MONTH
            }
            (SensorType::Ph, _) => self.table.ph().drift_threshold,
            _ => self.config.default_trend_threshold,
        }
    }

    /// Analyse a reading window
    ///
    /// Windows shorter than `min_samples` return [`Analysis::Insufficient`].
    pub fn detect(
        &self,
        readings: &[f64],
        sensor: SensorType,
        electrode: Option<ElectrodeType>,
    ) -> Analysis<DriftAnalysis> {
        let n = readings.len();
        if n < self.config.min_samples {
            log_warn!(
                "drift analysis skipped for {}: {} samples, need {}",
                sensor,
                n,
                self.config.min_samples
            );
            return Analysis::insufficient(InsufficientReason::TooFewReadings, self.config.min_samples, n);
        }

        let slope = linear_trend(readings);
        let cusum_statistics = cusum(readings, &self.config.cusum);
        let moving_range_stats = moving_range(readings);
        let spc_statistics = individuals_chart(readings, &self.config.spc);

        let drift_rate = slope * SECONDS_PER_HOUR / n as f64;
        let threshold = self.trend_threshold(sensor, electrode);

        let indicators = DriftIndicators {
            linear_trend: libm::fabs(drift_rate) > threshold,
            cusum_alarm: cusum_statistics.alarm_triggered,
            range_alarm: moving_range_stats.out_of_control,
            spc_alarm: spc_statistics.out_of_control,
        };

        let confidence = indicators.confidence();
        let drift_detected = confidence >= self.config.confidence_threshold;
        let recommendation = Recommendation::from_vote(drift_detected, confidence, drift_rate, &self.config);

        log_debug!(
            "drift analysis for {}: indicators={:?} confidence={} rate={}/h -> {:?}",
            sensor,
            indicators,
            confidence,
            drift_rate,
            recommendation.action
        );

        Analysis::Ready(DriftAnalysis {
            drift_detected,
            drift_confidence: confidence,
            drift_rate_per_hour: drift_rate,
            linear_slope: slope,
            trend_threshold: threshold,
            cusum_statistics,
            moving_range_stats,
            spc_statistics,
            individual_indicators: indicators,
            recommendation,
        })
    }
}
