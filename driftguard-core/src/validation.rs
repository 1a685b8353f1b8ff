//! Cross Validation Against Reference Profiles
//!
//! Compares the electrode vector of one sample against the vector a known
//! material is expected to produce. Only electrodes present in both the
//! profile and the sample take part; they are visited in the array's
//! canonical order (SS, Cu, Zn, Ag, Pt).
//!
//! ## Composite Score
//!
//! ```text
//! score = 30·max(0, r) + 30·max(0, 1 - NRMSE) + 40·max(0, 1 - MRE/100)
//!
//! r     = Pearson correlation of expected vs actual
//! NRMSE = RMSE / (max(expected) - min(expected))
//! MRE   = mean |actual - expected| / |expected| · 100
//! ```
//!
//! ```text
//! Score   | Status
//! --------|-----------------
//! ≥ 80    | excellent_match
//! ≥ 60    | good_match
//! ≥ 40    | acceptable_match
//! ≥ 20    | poor_match
//! < 20    | no_match
//! ```

use alloc::{collections::BTreeMap, string::String, vec::Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::DENOMINATOR_FLOOR,
    errors::{Analysis, InsufficientReason},
    reference::ElectrodeType,
    stats::{floor_magnitude, mean, pearson},
};

/// Fewest electrodes a comparison needs
pub const MIN_MATCHED_ELECTRODES: usize = 3;

const CORRELATION_WEIGHT: f64 = 30.0;
const RMSE_WEIGHT: f64 = 30.0;
const RELATIVE_ERROR_WEIGHT: f64 = 40.0;

/// Expected electrode voltages for one known material
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReferenceProfile {
    /// Expected voltage per electrode
    pub electrode_response: BTreeMap<ElectrodeType, f64>,
}

impl ReferenceProfile {
    /// Empty profile
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an electrode's expected voltage
    pub fn with(mut self, electrode: ElectrodeType, voltage: f64) -> Self {
        self.electrode_response.insert(electrode, voltage);
        self
    }
}

impl FromIterator<(ElectrodeType, f64)> for ReferenceProfile {
    fn from_iter<I: IntoIterator<Item = (ElectrodeType, f64)>>(iter: I) -> Self {
        Self {
            electrode_response: iter.into_iter().collect(),
        }
    }
}

/// Voltages measured on one sample
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ElectrodeReadings(BTreeMap<ElectrodeType, f64>);

impl ElectrodeReadings {
    /// Empty reading set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an electrode's voltage
    pub fn with(mut self, electrode: ElectrodeType, voltage: f64) -> Self {
        self.0.insert(electrode, voltage);
        self
    }

    /// Record a voltage
    pub fn insert(&mut self, electrode: ElectrodeType, voltage: f64) {
        self.0.insert(electrode, voltage);
    }

    /// Voltage for an electrode, if it was read
    pub fn get(&self, electrode: ElectrodeType) -> Option<f64> {
        self.0.get(&electrode).copied()
    }

    /// Number of electrodes read
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing was read
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ElectrodeType, f64)> for ElectrodeReadings {
    fn from_iter<I: IntoIterator<Item = (ElectrodeType, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Match grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MatchStatus {
    /// Score below 20
    NoMatch,
    /// Score in [20, 40)
    PoorMatch,
    /// Score in [40, 60)
    AcceptableMatch,
    /// Score in [60, 80)
    GoodMatch,
    /// Score of 80 or more
    ExcellentMatch,
}

impl MatchStatus {
    /// Grade a composite score
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::ExcellentMatch
        } else if score >= 60.0 {
            Self::GoodMatch
        } else if score >= 40.0 {
            Self::AcceptableMatch
        } else if score >= 20.0 {
            Self::PoorMatch
        } else {
            Self::NoMatch
        }
    }
}

/// Similarity metrics feeding the composite score
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValidationMetrics {
    /// Pearson correlation, expected vs actual
    pub correlation: f64,
    /// RMSE over the expected range
    pub normalized_rmse: f64,
    /// Mean absolute percentage error
    pub mean_relative_error: f64,
}

impl ValidationMetrics {
    /// Weighted 0-100 score
    pub fn score(&self) -> f64 {
        CORRELATION_WEIGHT * self.correlation.max(0.0)
            + RMSE_WEIGHT * (1.0 - self.normalized_rmse).max(0.0)
            + RELATIVE_ERROR_WEIGHT * (1.0 - self.mean_relative_error / 100.0).max(0.0)
    }
}

/// One electrode's expected and measured voltage
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElectrodeComparison {
    /// Electrode compared
    pub electrode: ElectrodeType,
    /// Profile voltage
    pub expected: f64,
    /// Measured voltage
    pub actual: f64,
    /// |actual - expected| / |expected| in percent
    pub relative_error: f64,
}

/// Result of a cross validation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ValidationReport {
    /// Composite score in [0, 100]
    pub validation_score: f64,
    /// Grade of the score
    pub status: MatchStatus,
    /// Name of the material validated against
    pub label: String,
    /// Component metrics
    pub metrics: ValidationMetrics,
    /// Per-electrode detail, canonical order
    pub electrode_comparison: Vec<ElectrodeComparison>,
}

/// Grade a sample against a reference profile
pub fn validate(
    current: &ElectrodeReadings,
    profile: &ReferenceProfile,
    label: &str,
) -> Analysis<ValidationReport> {
    let comparison: Vec<ElectrodeComparison> = ElectrodeType::ALL
        .iter()
        .filter_map(|&electrode| {
            let expected = *profile.electrode_response.get(&electrode)?;
            let actual = current.get(electrode)?;
            Some(ElectrodeComparison {
                electrode,
                expected,
                actual,
                relative_error: libm::fabs(actual - expected)
                    / floor_magnitude(libm::fabs(expected), DENOMINATOR_FLOOR)
                    * 100.0,
            })
        })
        .collect();

    if comparison.len() < MIN_MATCHED_ELECTRODES {
        log_warn!(
            "validation against {} skipped: {} matched electrodes",
            label,
            comparison.len()
        );
        return Analysis::insufficient(
            InsufficientReason::TooFewMatchedElectrodes,
            MIN_MATCHED_ELECTRODES,
            comparison.len(),
        );
    }

    let metrics = compute_metrics(&comparison);
    let validation_score = metrics.score();
    let status = MatchStatus::from_score(validation_score);

    log_debug!(
        "validation against {}: score={:.1} status={:?}",
        label,
        validation_score,
        status
    );

    Analysis::Ready(ValidationReport {
        validation_score,
        status,
        label: String::from(label),
        metrics,
        electrode_comparison: comparison,
    })
}

fn compute_metrics(comparison: &[ElectrodeComparison]) -> ValidationMetrics {
    let expected: Vec<f64> = comparison.iter().map(|c| c.expected).collect();
    let actual: Vec<f64> = comparison.iter().map(|c| c.actual).collect();

    let squared: Vec<f64> = comparison
        .iter()
        .map(|c| (c.actual - c.expected) * (c.actual - c.expected))
        .collect();
    let rmse = libm::sqrt(mean(&squared));

    let (lo, hi) = expected
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = floor_magnitude(hi - lo, DENOMINATOR_FLOOR);

    let errors: Vec<f64> = comparison.iter().map(|c| c.relative_error).collect();

    ValidationMetrics {
        correlation: pearson(&expected, &actual),
        normalized_rmse: rmse / range,
        mean_relative_error: mean(&errors),
    }
}
