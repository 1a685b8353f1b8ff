//! Drift detection and signal conditioning for electrochemical sensors
//!
//! Decides from a window of raw readings whether a sensor has left
//! calibration, denoises and temperature-compensates the signal, grades an
//! electrode-array sample against a known profile, and forecasts the next
//! maintenance date from drift and noise history.
//!
//! Key constraints:
//! - Pure, synchronous computation; no I/O, no shared mutable state
//! - Reference constants injected as an immutable [`ReferenceTable`]
//! - Short inputs return [`Analysis::Insufficient`], never an error
//! - Builds without `std` (needs `alloc`)
//!
//! ```
//! use driftguard_core::{DriftDetector, ElectrodeType, ReferenceTable, SensorType};
//!
//! let table = ReferenceTable::builtin();
//! let detector = DriftDetector::new(table);
//!
//! let readings = [1.42; 24];
//! let analysis = detector
//!     .detect(&readings, SensorType::Electrode, Some(ElectrodeType::Ss))
//!     .ready()
//!     .unwrap();
//! assert!(!analysis.drift_detected);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

extern crate alloc;

#[macro_use]
mod logging;

pub mod calibration;
pub mod compensation;
pub mod constants;
pub mod drift;
pub mod errors;
pub mod filter;
pub mod maintenance;
pub mod pipeline;
pub mod reference;
pub mod stats;
pub mod validation;

// Public API
pub use calibration::{assess_electrode_stability, fit_ph_calibration, PhCalibration, PhCalibrationPoint};
pub use compensation::TemperatureCompensator;
pub use drift::{Action, DriftAnalysis, DriftConfig, DriftDetector, Recommendation, Urgency};
pub use errors::{Analysis, ConfigError, ConfigResult, Insufficient, InsufficientReason};
pub use filter::{filter, KalmanParams, KalmanState};
pub use maintenance::{
    forecast, HistoryEntry, MaintenanceForecaster, MaintenancePrediction, MaintenanceUrgency, UsageData,
};
pub use pipeline::{ConditionedSignal, SignalConditioner};
pub use reference::{ElectrodeType, PhBuffer, ReferenceTable, SensorType};
pub use validation::{validate, ElectrodeReadings, MatchStatus, ReferenceProfile, ValidationReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
