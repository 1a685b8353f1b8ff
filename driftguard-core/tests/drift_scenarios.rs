//! End-to-end drift scenarios
//!
//! Realistic reading windows run through the detector and the full
//! conditioning pipeline.

mod common;

use driftguard_core::{
    Action, Analysis, DriftConfig, DriftDetector, ElectrodeType, InsufficientReason, KalmanParams,
    ReferenceTable, SensorType, SignalConditioner, Urgency,
};

use common::{gaussian_noise, ramp, step_change, with_noise, FIELD_SEED};

#[test]
fn drifting_platinum_electrode_worked_example() {
    let table = ReferenceTable::builtin();
    let readings = with_noise(&ramp(50, 2.0, 0.001), 0.002, FIELD_SEED);

    let result = DriftDetector::new(table)
        .detect(&readings, SensorType::Electrode, Some(ElectrodeType::Pt))
        .ready()
        .expect("50 readings is enough");

    assert!(result.drift_detected);
    assert!(result.drift_confidence >= 0.4);
    assert!(result.individual_indicators.linear_trend);
    assert!(result.individual_indicators.cusum_alarm);
    assert!(result.drift_rate_per_hour > 0.05);
    assert_ne!(result.recommendation.action, Action::Monitor);
}

#[test]
fn worked_example_holds_for_other_seeds() {
    let table = ReferenceTable::builtin();
    let detector = DriftDetector::new(table);

    for seed in 0..16 {
        let readings = with_noise(&ramp(50, 2.0, 0.001), 0.002, seed);
        let result = detector
            .detect(&readings, SensorType::Electrode, Some(ElectrodeType::Pt))
            .ready()
            .unwrap();
        assert!(result.drift_detected, "seed {seed}");
    }
}

#[test]
fn flat_windows_never_drift() {
    let detector = DriftDetector::new(ReferenceTable::builtin());
    let cases = [
        (SensorType::Electrode, Some(ElectrodeType::Ss), 1.42),
        (SensorType::Electrode, Some(ElectrodeType::Ag), 2.21),
        (SensorType::Ph, None, 2.0),
        (SensorType::Conductivity, None, 0.168),
        (SensorType::Generic, None, -0.5),
    ];

    for (sensor, electrode, level) in cases {
        let result = detector.detect(&[level; 64], sensor, electrode).ready().unwrap();
        assert!(!result.drift_detected, "{sensor}");
        assert_eq!(result.drift_confidence, 0.0);
        assert_eq!(result.recommendation.action, Action::Monitor);
        assert_eq!(result.recommendation.urgency, Urgency::Low);
    }
}

#[test]
fn level_shift_trips_cusum() {
    let detector = DriftDetector::new(ReferenceTable::builtin());
    let clean = step_change(40, 1.68, 20, 0.05);
    let readings = with_noise(&clean, 0.001, 7);

    let result = detector
        .detect(&readings, SensorType::Electrode, Some(ElectrodeType::Cu))
        .ready()
        .unwrap();

    assert!(result.individual_indicators.cusum_alarm);
    assert!(result.cusum_statistics.positive_alarm);
    assert!(result.cusum_statistics.max_cusum_pos > 4.0);
}

#[test]
fn downward_shift_trips_negative_side() {
    let detector = DriftDetector::new(ReferenceTable::builtin());
    let readings = with_noise(&step_change(40, 2.0, 25, -0.08), 0.002, 11);

    let result = detector.detect(&readings, SensorType::Ph, None).ready().unwrap();
    assert!(result.cusum_statistics.negative_alarm);
    assert!(result.cusum_statistics.min_cusum_neg < -4.0);
}

#[test]
fn nine_readings_are_not_enough() {
    let detector = DriftDetector::new(ReferenceTable::builtin());
    match detector.detect(&ramp(9, 2.0, 0.01), SensorType::Generic, None) {
        Analysis::Insufficient(why) => {
            assert_eq!(why.reason, InsufficientReason::TooFewReadings);
            assert_eq!(why.available, 9);
        }
        Analysis::Ready(_) => panic!("nine readings must not be analysed"),
    }
}

#[test]
fn noise_alone_on_ph_stays_quiet_on_trend() {
    // pH threshold is 1.0/h; pure noise has no trend to speak of
    let detector = DriftDetector::new(ReferenceTable::builtin());
    let readings: Vec<f64> = gaussian_noise(100, 0.002, 3).iter().map(|e| 2.0 + e).collect();
    let result = detector.detect(&readings, SensorType::Ph, None).ready().unwrap();
    assert!(!result.individual_indicators.linear_trend);
}

#[test]
fn stricter_vote_needs_more_evidence() {
    let table = ReferenceTable::builtin();
    let readings = with_noise(&ramp(50, 2.0, 0.001), 0.002, FIELD_SEED);

    let relaxed = DriftDetector::new(table)
        .detect(&readings, SensorType::Electrode, Some(ElectrodeType::Pt))
        .ready()
        .unwrap();
    let strict = DriftDetector::with_config(table, DriftConfig::default().with_confidence_threshold(1.0))
        .detect(&readings, SensorType::Electrode, Some(ElectrodeType::Pt))
        .ready()
        .unwrap();

    assert_eq!(relaxed.drift_confidence, strict.drift_confidence);
    assert_eq!(strict.drift_detected, strict.drift_confidence >= 1.0);
}

#[test]
fn conditioned_pipeline_keeps_the_verdict() {
    let table = ReferenceTable::builtin();
    let readings = with_noise(&ramp(60, 2.0, 0.001), 0.002, FIELD_SEED);

    let conditioner = SignalConditioner::builder(table)
        .kalman()
        .compensate_at(30.0)
        .build();
    let out = conditioner.condition(&readings, SensorType::Electrode, Some(ElectrodeType::Pt));

    assert_eq!(out.series.len(), readings.len());
    let drift = out.drift.ready().unwrap();
    assert!(drift.individual_indicators.linear_trend);
    assert!(drift.drift_detected);
}

#[test]
fn custom_kalman_in_pipeline() {
    let table = ReferenceTable::builtin();
    let readings = with_noise(&[1.0; 40], 0.01, 5);

    let params = KalmanParams::default().with_process_noise(1e-9).with_measurement_noise(1e-2);
    let out = SignalConditioner::builder(table)
        .kalman_params(params)
        .build()
        .condition(&readings, SensorType::Generic, None);

    let last = *out.series.last().unwrap();
    assert!((last - 1.0).abs() < 0.01);
}
