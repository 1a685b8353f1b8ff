//! Predictive Maintenance Forecasting
//!
//! Extrapolates the per-period drift and noise summaries of a sensor to the
//! day each metric will cross its limit.
//!
//! ```text
//! trend        = least-squares slope over entry index
//! days_to_limit = max(1, (limit - current) / max(trend, 1e-10))
//!                 only when trend > 0 and current < limit
//! horizon       = min(days_to_limit...) or 90 if neither metric applies
//! ```
//!
//! Entries are assumed one period (day) apart; the timestamps are carried but
//! not used for the fit.

use alloc::{format, string::String, vec::Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        maintenance::{
            CRITICAL_WITHIN_DAYS, DEFAULT_MAINTENANCE_DAYS, DRIFT_RATE_LIMIT, HIGH_WITHIN_DAYS,
            MIN_HISTORY_ENTRIES, MIN_MAINTENANCE_DAYS, NOISE_LEVEL_LIMIT,
        },
        DENOMINATOR_FLOOR,
    },
    errors::{Analysis, InsufficientReason},
    stats::linear_trend,
};

/// One period's performance summary
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HistoryEntry {
    /// Period timestamp (seconds since epoch)
    pub timestamp: u64,
    /// Drift rate measured over the period
    #[cfg_attr(feature = "serde", serde(default))]
    pub drift_rate: f64,
    /// Noise level measured over the period
    #[cfg_attr(feature = "serde", serde(default))]
    pub noise_level: f64,
}

impl HistoryEntry {
    /// Build an entry
    pub const fn new(timestamp: u64, drift_rate: f64, noise_level: f64) -> Self {
        Self { timestamp, drift_rate, noise_level }
    }
}

/// Usage counters supplied by the device store
///
/// Returned with the prediction untouched; the forecast itself does not
/// weigh them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UsageData {
    /// Hours the sensor has been powered
    pub operating_hours: f64,
    /// Measurements taken since the last service
    pub measurement_count: u64,
    /// Timestamp of the last service, if known
    pub last_maintenance: Option<u64>,
}

/// Forecast thresholds and bands
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForecastConfig {
    /// Drift rate that calls for service
    pub drift_rate_limit: f64,
    /// Noise level that calls for service
    pub noise_level_limit: f64,
    /// Horizon when no metric is heading for its limit
    pub default_horizon_days: f64,
    /// Shortest horizon ever reported
    pub min_horizon_days: f64,
    /// History entries needed before forecasting
    pub min_history: usize,
    /// Horizons below this are critical
    pub critical_within_days: f64,
    /// Horizons below this are high urgency
    pub high_within_days: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            drift_rate_limit: DRIFT_RATE_LIMIT,
            noise_level_limit: NOISE_LEVEL_LIMIT,
            default_horizon_days: DEFAULT_MAINTENANCE_DAYS,
            min_horizon_days: MIN_MAINTENANCE_DAYS,
            min_history: MIN_HISTORY_ENTRIES,
            critical_within_days: CRITICAL_WITHIN_DAYS,
            high_within_days: HIGH_WITHIN_DAYS,
        }
    }
}

impl ForecastConfig {
    /// Set drift and noise limits
    pub fn with_limits(mut self, drift_rate: f64, noise_level: f64) -> Self {
        self.drift_rate_limit = drift_rate;
        self.noise_level_limit = noise_level;
        self
    }

    /// Set the horizon reported when nothing is trending toward a limit
    pub fn with_default_horizon(mut self, days: f64) -> Self {
        self.default_horizon_days = days;
        self
    }

    /// Set the minimum history length (at least 2)
    pub fn with_min_history(mut self, entries: usize) -> Self {
        self.min_history = entries.max(2);
        self
    }

    /// Set urgency bands
    pub fn with_urgency_bands(mut self, critical_days: f64, high_days: f64) -> Self {
        self.critical_within_days = critical_days;
        self.high_within_days = high_days;
        self
    }
}

/// How soon service is needed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MaintenanceUrgency {
    /// Routine
    Medium,
    /// Within the high band
    High,
    /// Within the critical band
    Critical,
}

/// Metric that set the horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LimitingMetric {
    /// Drift rate reaches its limit first
    DriftRate,
    /// Noise level reaches its limit first
    NoiseLevel,
}

/// Latest entry's values
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurrentPerformance {
    /// Drift rate of the newest entry
    pub drift_rate: f64,
    /// Noise level of the newest entry
    pub noise_level: f64,
}

/// Per-entry slopes of the history
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PerformanceTrends {
    /// Drift rate change per entry
    pub drift_trend: f64,
    /// Noise level change per entry
    pub noise_trend: f64,
}

/// Forecast result
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MaintenancePrediction {
    /// Whole days until service is due
    pub next_maintenance_days: u32,
    /// Urgency band
    pub urgency: MaintenanceUrgency,
    /// Operator text
    pub message: String,
    /// Metric that set the horizon, `None` for the default horizon
    pub limiting_metric: Option<LimitingMetric>,
    /// Newest values
    pub current_performance: CurrentPerformance,
    /// Fitted slopes
    pub performance_trends: PerformanceTrends,
    /// Usage counters as supplied
    pub usage: UsageData,
}

/// Maintenance forecaster
#[derive(Debug, Clone, Copy, Default)]
pub struct MaintenanceForecaster {
    config: ForecastConfig,
}

impl MaintenanceForecaster {
    /// Forecaster with default limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Forecaster with custom limits
    pub fn with_config(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast the next service date from a history, oldest entry first
    pub fn forecast(
        &self,
        history: &[HistoryEntry],
        usage: UsageData,
    ) -> Analysis<MaintenancePrediction> {
        let cfg = &self.config;
        if history.len() < cfg.min_history {
            log_warn!(
                "maintenance forecast skipped: {} history entries, need {}",
                history.len(),
                cfg.min_history
            );
            return Analysis::insufficient(
                InsufficientReason::TooFewHistoryEntries,
                cfg.min_history,
                history.len(),
            );
        }
        let Some(latest) = history.last() else {
            return Analysis::insufficient(InsufficientReason::TooFewHistoryEntries, cfg.min_history, 0);
        };

        let drift_rates: Vec<f64> = history.iter().map(|e| e.drift_rate).collect();
        let noise_levels: Vec<f64> = history.iter().map(|e| e.noise_level).collect();

        let trends = PerformanceTrends {
            drift_trend: linear_trend(&drift_rates),
            noise_trend: linear_trend(&noise_levels),
        };
        let current = CurrentPerformance {
            drift_rate: latest.drift_rate,
            noise_level: latest.noise_level,
        };

        let candidates = [
            (
                LimitingMetric::DriftRate,
                self.days_to_limit(current.drift_rate, trends.drift_trend, cfg.drift_rate_limit),
            ),
            (
                LimitingMetric::NoiseLevel,
                self.days_to_limit(current.noise_level, trends.noise_trend, cfg.noise_level_limit),
            ),
        ];

        let (limiting_metric, days) = candidates
            .iter()
            .filter_map(|&(metric, days)| days.map(|d| (metric, d)))
            .fold(None, |best: Option<(LimitingMetric, f64)>, (metric, d)| match best {
                Some((_, b)) if b <= d => best,
                _ => Some((metric, d)),
            })
            .map_or((None, cfg.default_horizon_days), |(m, d)| (Some(m), d));

        let whole_days = libm::floor(days) as u32;
        let (urgency, message) = if days < cfg.critical_within_days {
            (
                MaintenanceUrgency::Critical,
                String::from("Immediate maintenance required within 1 week"),
            )
        } else if days < cfg.high_within_days {
            (
                MaintenanceUrgency::High,
                format!("Maintenance recommended within {} days", whole_days),
            )
        } else {
            (
                MaintenanceUrgency::Medium,
                format!("Next maintenance due in {} days", whole_days),
            )
        };

        log_debug!(
            "maintenance forecast: {} days ({:?}), limited by {:?}",
            whole_days,
            urgency,
            limiting_metric
        );

        Analysis::Ready(MaintenancePrediction {
            next_maintenance_days: whole_days,
            urgency,
            message,
            limiting_metric,
            current_performance: current,
            performance_trends: trends,
            usage,
        })
    }

    fn days_to_limit(&self, current: f64, trend: f64, limit: f64) -> Option<f64> {
        if trend > 0.0 && current < limit {
            let days = (limit - current) / trend.max(DENOMINATOR_FLOOR);
            Some(days.max(self.config.min_horizon_days))
        } else {
            None
        }
    }
}

/// Forecast with the default limits
pub fn forecast(history: &[HistoryEntry], usage: UsageData) -> Analysis<MaintenancePrediction> {
    MaintenanceForecaster::new().forecast(history, usage)
}
