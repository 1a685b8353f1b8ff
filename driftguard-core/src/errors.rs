//! Error and Sentinel Types for Drift Analysis
//!
//! ## Design Philosophy
//!
//! The error surface of this crate is deliberately narrow. Two very different
//! things can go wrong:
//!
//! 1. **Not enough data** - a series is too short, a profile shares too few
//!    electrodes with a reading, a maintenance history is too young. This is a
//!    normal outcome of field data and is returned as a value:
//!    [`Analysis::Insufficient`]. Callers branch on it, nothing is raised.
//!
//! 2. **Bad configuration** - a reference table is missing an electrode
//!    profile, carries a non-finite coefficient, or an ingestion string names a
//!    sensor we have no table for. That is a programmer or deployment error and
//!    is reported as [`ConfigError`] at load or parse time, never during an
//!    analysis.
//!
//! Degenerate numeric input (zero variance, empty ranges) is neither: the
//! statistics floor their denominators and carry on.
//!
//! ## Handling Strategy
//!
//! ```rust
//! use driftguard_core::{Analysis, DriftDetector, ReferenceTable, SensorType};
//!
//! let table = ReferenceTable::builtin();
//! let detector = DriftDetector::new(&table);
//!
//! match detector.detect(&[2.0; 4], SensorType::Ph, None) {
//!     Analysis::Ready(result) => {
//!         // act on result.recommendation
//!         let _ = result.drift_detected;
//!     }
//!     Analysis::Insufficient(why) => {
//!         // keep collecting samples
//!         assert_eq!(why.available, 4);
//!     }
//! }
//! ```

use core::fmt;

use thiserror_no_std::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result type for configuration loading and parsing
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors - the only hard failures in the crate
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Sensor type string not recognised by the ingestion parser
    #[error("Unknown sensor type")]
    UnknownSensorType,

    /// Electrode string not recognised by the ingestion parser
    #[error("Unknown electrode type")]
    UnknownElectrode,

    /// Reference table has no profile for an electrode
    #[error("Missing reference profile for electrode {electrode}")]
    MissingElectrodeProfile {
        /// Canonical electrode code (e.g. "Pt")
        electrode: &'static str,
    },

    /// Coefficient is non-finite, or a threshold is not strictly positive
    #[error("Invalid coefficient {field}: {value}")]
    InvalidCoefficient {
        /// Name of the offending field
        field: &'static str,
        /// Value found in the table
        value: f64,
    },

    /// Table source could not be decoded
    #[error("Malformed reference table: {reason}")]
    Malformed {
        /// Decoder's description of the problem
        reason: &'static str,
    },
}

/// Why an analysis could not run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InsufficientReason {
    /// Reading series shorter than the detector minimum
    TooFewReadings,
    /// Reference profile and reading share too few electrodes
    TooFewMatchedElectrodes,
    /// Maintenance history shorter than the forecast minimum
    TooFewHistoryEntries,
    /// Not enough buffer points to fit a calibration curve
    TooFewCalibrationPoints,
}

impl InsufficientReason {
    /// Stable identifier, matching the serialized form
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TooFewReadings => "too_few_readings",
            Self::TooFewMatchedElectrodes => "too_few_matched_electrodes",
            Self::TooFewHistoryEntries => "too_few_history_entries",
            Self::TooFewCalibrationPoints => "too_few_calibration_points",
        }
    }
}

/// Sentinel describing a short input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Insufficient {
    /// Which minimum was not met
    pub reason: InsufficientReason,
    /// Minimum count needed
    pub required: usize,
    /// Count actually supplied
    pub available: usize,
}

impl Insufficient {
    /// Build a sentinel
    pub const fn new(reason: InsufficientReason, required: usize, available: usize) -> Self {
        Self { reason, required, available }
    }
}

impl fmt::Display for Insufficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "insufficient data ({}): need {}, have {}",
            self.reason.as_str(),
            self.required,
            self.available
        )
    }
}

/// Outcome of an analysis: a result, or a typed "not enough data" sentinel
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "status", content = "data", rename_all = "snake_case"))]
pub enum Analysis<T> {
    /// Analysis completed
    Ready(T),
    /// Input too small to analyse
    Insufficient(Insufficient),
}

impl<T> Analysis<T> {
    /// Shorthand for the insufficient branch
    pub const fn insufficient(reason: InsufficientReason, required: usize, available: usize) -> Self {
        Self::Insufficient(Insufficient::new(reason, required, available))
    }

    /// True if the analysis produced a result
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Result, if any
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Insufficient(_) => None,
        }
    }

    /// Borrowing form of [`Analysis::ready`]
    pub const fn as_ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Insufficient(_) => None,
        }
    }

    /// Sentinel, if the analysis did not run
    pub const fn insufficiency(&self) -> Option<&Insufficient> {
        match self {
            Self::Ready(_) => None,
            Self::Insufficient(why) => Some(why),
        }
    }

    /// Transform the ready value, passing the sentinel through
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Analysis<U> {
        match self {
            Self::Ready(value) => Analysis::Ready(f(value)),
            Self::Insufficient(why) => Analysis::Insufficient(why),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_accessors() {
        let short: Analysis<u8> = Analysis::insufficient(InsufficientReason::TooFewReadings, 10, 3);
        assert!(!short.is_ready());
        let why = short.insufficiency().copied().unwrap();
        assert_eq!(why.required, 10);
        assert_eq!(why.available, 3);
        assert_eq!(short.ready(), None);
    }

    #[test]
    fn map_passes_sentinel_through() {
        let ready: Analysis<u8> = Analysis::Ready(2);
        assert_eq!(ready.map(|v| v * 2), Analysis::Ready(4));

        let short: Analysis<u8> = Analysis::insufficient(InsufficientReason::TooFewHistoryEntries, 20, 19);
        assert!(matches!(short.map(|v| v * 2), Analysis::Insufficient(w) if w.available == 19));
    }

    #[cfg(feature = "std")]
    #[test]
    fn messages_name_the_problem() {
        let err = ConfigError::MissingElectrodeProfile { electrode: "Pt" };
        assert_eq!(err.to_string(), "Missing reference profile for electrode Pt");

        let why = Insufficient::new(InsufficientReason::TooFewReadings, 10, 9);
        assert_eq!(why.to_string(), "insufficient data (too_few_readings): need 10, have 9");
    }
}
