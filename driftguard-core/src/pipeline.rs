//! Signal conditioning pipeline
//!
//! Chains the per-window stages in their fixed order:
//!
//! ```text
//! raw ─→ [Kalman filter] ─→ [temperature compensation] ─→ drift detector
//! ```
//!
//! Both bracketed stages are optional. The conditioned series is returned
//! with the drift analysis so the caller can store or plot what was judged.

use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::{
    compensation::TemperatureCompensator,
    drift::{DriftAnalysis, DriftConfig, DriftDetector},
    errors::Analysis,
    filter::{filter_with, KalmanParams},
    reference::{ElectrodeType, ReferenceTable, SensorType},
};

/// Kalman stage setting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KalmanStage {
    /// No filtering
    Off,
    /// Noise settings chosen from the sensor type at each call
    PerSensor,
    /// Fixed noise settings
    Custom(KalmanParams),
}

/// Output of one conditioning pass
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ConditionedSignal {
    /// Series after filtering and compensation
    pub series: Vec<f64>,
    /// Drift verdict on `series`
    pub drift: Analysis<DriftAnalysis>,
}

/// Configured conditioning pipeline
///
/// Stateless between calls; one instance can serve any number of sensors.
#[derive(Debug, Clone, Copy)]
pub struct SignalConditioner<'a> {
    table: &'a ReferenceTable,
    kalman: KalmanStage,
    temperature_c: Option<f64>,
    detector: DriftDetector<'a>,
}

impl<'a> SignalConditioner<'a> {
    /// Start building a conditioner
    pub fn builder(table: &'a ReferenceTable) -> ConditionerBuilder<'a> {
        ConditionerBuilder::new(table)
    }

    /// Run every configured stage over a reading window
    pub fn condition(
        &self,
        readings: &[f64],
        sensor: SensorType,
        electrode: Option<ElectrodeType>,
    ) -> ConditionedSignal {
        let filtered = match self.kalman {
            KalmanStage::Off => readings.to_vec(),
            KalmanStage::PerSensor => filter_with(readings, &KalmanParams::for_sensor(sensor)),
            KalmanStage::Custom(params) => filter_with(readings, &params),
        };

        let series = match self.temperature_c {
            Some(t) => TemperatureCompensator::new(self.table).compensate_series(
                &filtered, t, sensor, electrode,
            ),
            None => filtered,
        };

        let drift = self.detector.detect(&series, sensor, electrode);
        ConditionedSignal { series, drift }
    }

    /// Kalman stage in use
    pub fn kalman(&self) -> KalmanStage {
        self.kalman
    }

    /// Compensation temperature, if compensation is on
    pub fn temperature(&self) -> Option<f64> {
        self.temperature_c
    }
}

/// Builder for [`SignalConditioner`]
#[derive(Debug, Clone, Copy)]
pub struct ConditionerBuilder<'a> {
    table: &'a ReferenceTable,
    kalman: KalmanStage,
    temperature_c: Option<f64>,
    drift: DriftConfig,
}

impl<'a> ConditionerBuilder<'a> {
    /// Builder with every optional stage off
    pub fn new(table: &'a ReferenceTable) -> Self {
        Self {
            table,
            kalman: KalmanStage::Off,
            temperature_c: None,
            drift: DriftConfig::default(),
        }
    }

    /// Filter with the sensor's default noise settings
    pub fn kalman(mut self) -> Self {
        self.kalman = KalmanStage::PerSensor;
        self
    }

    /// Filter with fixed noise settings
    pub fn kalman_params(mut self, params: KalmanParams) -> Self {
        self.kalman = KalmanStage::Custom(params);
        self
    }

    /// Compensate every reading as taken at `temperature_c`
    pub fn compensate_at(mut self, temperature_c: f64) -> Self {
        self.temperature_c = Some(temperature_c);
        self
    }

    /// Detector settings
    pub fn drift_config(mut self, config: DriftConfig) -> Self {
        self.drift = config;
        self
    }

    /// Build the conditioner
    pub fn build(self) -> SignalConditioner<'a> {
        SignalConditioner {
            table: self.table,
            kalman: self.kalman,
            temperature_c: self.temperature_c,
            detector: DriftDetector::with_config(self.table, self.drift),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter;
    use approx::assert_relative_eq;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| 2.0 + 0.001 * i as f64).collect()
    }

    #[test]
    fn bare_pipeline_is_just_the_detector() {
        let table = ReferenceTable::builtin();
        let readings = ramp(30);
        let out = SignalConditioner::builder(table)
            .build()
            .condition(&readings, SensorType::Electrode, Some(ElectrodeType::Pt));

        assert_eq!(out.series, readings);
        let direct = DriftDetector::new(table).detect(&readings, SensorType::Electrode, Some(ElectrodeType::Pt));
        assert_eq!(out.drift, direct);
    }

    #[test]
    fn kalman_stage_matches_filter() {
        let table = ReferenceTable::builtin();
        let readings = [1.0, 1.2, 0.9, 1.1, 1.0, 0.95, 1.05, 1.0, 1.02, 0.98, 1.0];
        let conditioner = SignalConditioner::builder(table).kalman().build();
        let out = conditioner.condition(&readings, SensorType::Ph, None);
        assert_eq!(out.series, filter(&readings, SensorType::Ph));
        assert_eq!(conditioner.kalman(), KalmanStage::PerSensor);
    }

    #[test]
    fn compensation_at_reference_is_identity() {
        let table = ReferenceTable::builtin();
        let readings = ramp(12);
        let out = SignalConditioner::builder(table)
            .compensate_at(25.0)
            .build()
            .condition(&readings, SensorType::Conductivity, None);
        assert_eq!(out.series, readings);
    }

    #[test]
    fn warm_electrode_is_shifted() {
        let table = ReferenceTable::builtin();
        let readings = [1.42; 10];
        let out = SignalConditioner::builder(table)
            .compensate_at(35.0)
            .build()
            .condition(&readings, SensorType::Electrode, Some(ElectrodeType::Ss));
        // SS: -1.2 mV/°C
        for v in &out.series {
            assert_relative_eq!(*v, 1.432, epsilon = 1e-12);
        }
        assert!(!out.drift.ready().unwrap().drift_detected);
    }

    #[test]
    fn short_window_passes_sentinel_through() {
        let table = ReferenceTable::builtin();
        let out = SignalConditioner::builder(table)
            .kalman_params(KalmanParams::default())
            .build()
            .condition(&[1.0, 2.0, 3.0], SensorType::Generic, None);
        assert_eq!(out.series.len(), 3);
        assert!(!out.drift.is_ready());
    }
}
