//! Scalar Kalman Filter for Signal Conditioning
//!
//! ## Overview
//!
//! A one-state random-walk Kalman filter. The sensor signal is modelled as a
//! constant that wanders slowly (process noise `Q`) and is observed through
//! additive measurement noise `R`.
//!
//! ### 1. Prediction Step
//! ```text
//! x̂ₖ|ₖ₋₁ = x̂ₖ₋₁
//! Pₖ|ₖ₋₁ = Pₖ₋₁ + Q
//! ```
//!
//! ### 2. Update Step
//! ```text
//! Kₖ = Pₖ|ₖ₋₁ / (Pₖ|ₖ₋₁ + R)
//! x̂ₖ = x̂ₖ|ₖ₋₁ + Kₖ·(zₖ - x̂ₖ|ₖ₋₁)
//! Pₖ = (1 - Kₖ)·Pₖ|ₖ₋₁
//! ```
//!
//! ## Noise Settings
//!
//! ```text
//! Sensor           | Q      | R
//! -----------------|--------|------
//! electrode        | 1e-6   | 1e-4
//! pH, cond, other  | 1e-5   | 1e-3
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use driftguard_core::filter::{filter, KalmanParams, KalmanState};
//! use driftguard_core::SensorType;
//!
//! // Batch
//! let smoothed = filter(&[2.00, 2.03, 1.98, 2.01, 1.99], SensorType::Electrode);
//! assert_eq!(smoothed.len(), 5);
//!
//! // Streaming: carry the state between calls
//! let params = KalmanParams::for_sensor(SensorType::Ph);
//! let mut state = KalmanState::new(7.0, &params);
//! for z in [7.02, 6.98, 7.01] {
//!     let _estimate = state.step(z, &params);
//! }
//! ```

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::electrochemistry::{
        DEFAULT_MEASUREMENT_NOISE, DEFAULT_PROCESS_NOISE, ELECTRODE_MEASUREMENT_NOISE,
        ELECTRODE_PROCESS_NOISE, INITIAL_COVARIANCE,
    },
    reference::SensorType,
};

/// Shortest series the batch filter will touch
pub const MIN_FILTER_SAMPLES: usize = 3;

/// Kalman filter noise configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KalmanParams {
    /// Process noise variance (Q) - higher = less trust in the model
    pub process_noise: f64,
    /// Measurement noise variance (R) - higher = less trust in readings
    pub measurement_noise: f64,
    /// Error covariance the filter starts from
    pub initial_covariance: f64,
}

impl Default for KalmanParams {
    fn default() -> Self {
        Self {
            process_noise: DEFAULT_PROCESS_NOISE,
            measurement_noise: DEFAULT_MEASUREMENT_NOISE,
            initial_covariance: INITIAL_COVARIANCE,
        }
    }
}

impl KalmanParams {
    /// Noise settings for a sensor type
    ///
    /// Electrodes get the tightest process noise; every other sensor shares
    /// the looser default.
    pub fn for_sensor(sensor: SensorType) -> Self {
        match sensor {
            SensorType::Electrode => Self {
                process_noise: ELECTRODE_PROCESS_NOISE,
                measurement_noise: ELECTRODE_MEASUREMENT_NOISE,
                initial_covariance: INITIAL_COVARIANCE,
            },
            _ => Self::default(),
        }
    }

    /// Set process noise
    pub fn with_process_noise(mut self, noise: f64) -> Self {
        self.process_noise = noise;
        self
    }

    /// Set measurement noise
    pub fn with_measurement_noise(mut self, noise: f64) -> Self {
        self.measurement_noise = noise;
        self
    }

    /// Set initial covariance
    pub fn with_initial_covariance(mut self, covariance: f64) -> Self {
        self.initial_covariance = covariance;
        self
    }
}

/// Filter state between observations
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KalmanState {
    /// Current estimate of the true signal
    pub estimate: f64,
    /// Estimate error covariance
    pub error_covariance: f64,
}

impl KalmanState {
    /// Start from a first observation
    pub fn new(initial: f64, params: &KalmanParams) -> Self {
        Self {
            estimate: initial,
            error_covariance: params.initial_covariance,
        }
    }

    /// Advance by one observation and return the new estimate
    pub fn step(&mut self, observation: f64, params: &KalmanParams) -> f64 {
        // Predict
        let predicted_cov = self.error_covariance + params.process_noise;

        // Update
        let gain = self.gain(params);
        self.estimate += gain * (observation - self.estimate);
        self.error_covariance = (1.0 - gain) * predicted_cov;
        self.estimate
    }

    /// Kalman gain the next step will apply
    ///
    /// With both noise terms and the covariance at zero the observation is
    /// taken as is.
    pub fn gain(&self, params: &KalmanParams) -> f64 {
        let predicted_cov = self.error_covariance + params.process_noise;
        let denominator = predicted_cov + params.measurement_noise;
        if denominator > 0.0 {
            predicted_cov / denominator
        } else {
            1.0
        }
    }
}

/// Filter a series with the noise settings for `sensor`
///
/// Series shorter than [`MIN_FILTER_SAMPLES`] come back unchanged.
pub fn filter(series: &[f64], sensor: SensorType) -> Vec<f64> {
    filter_with(series, &KalmanParams::for_sensor(sensor))
}

/// Filter a series with explicit noise settings
///
/// The first output is the first input; every later sample goes through one
/// predict/update cycle.
pub fn filter_with(series: &[f64], params: &KalmanParams) -> Vec<f64> {
    let Some((&first, rest)) = series.split_first() else {
        return Vec::new();
    };
    if series.len() < MIN_FILTER_SAMPLES {
        return series.to_vec();
    }

    let mut state = KalmanState::new(first, params);
    let mut out = Vec::with_capacity(series.len());
    out.push(first);
    out.extend(rest.iter().map(|&z| state.step(z, params)));
    out
}
