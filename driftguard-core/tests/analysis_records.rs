//! Cross validation, maintenance forecasting and calibration
//!
//! Exercises the record-producing analyses the way the device backend calls
//! them, including the JSON shape of what comes back.

mod common;

use driftguard_core::{
    assess_electrode_stability, fit_ph_calibration, forecast,
    maintenance::{ForecastConfig, LimitingMetric},
    Analysis, ElectrodeReadings, ElectrodeType, InsufficientReason, MaintenanceForecaster,
    MaintenanceUrgency, MatchStatus, PhBuffer, PhCalibrationPoint, ReferenceProfile, ReferenceTable,
    UsageData,
};

use common::{daily_history, gaussian_noise, FIELD_SEED};

fn tulsi_profile() -> ReferenceProfile {
    ReferenceProfile::new()
        .with(ElectrodeType::Ss, 1.45)
        .with(ElectrodeType::Cu, 1.72)
        .with(ElectrodeType::Zn, 1.88)
        .with(ElectrodeType::Ag, 2.25)
        .with(ElectrodeType::Pt, 2.05)
}

#[test]
fn forecast_needs_twenty_entries() {
    let nineteen = daily_history(19, |i| 0.001 * i as f64, |_| 0.001);
    match forecast(&nineteen, UsageData::default()) {
        Analysis::Insufficient(why) => {
            assert_eq!(why.reason, InsufficientReason::TooFewHistoryEntries);
            assert_eq!(why.required, 20);
            assert_eq!(why.available, 19);
        }
        Analysis::Ready(_) => panic!("19 entries must not be forecast"),
    }

    let twenty = daily_history(20, |i| 0.001 * i as f64, |_| 0.001);
    let prediction = forecast(&twenty, UsageData::default()).ready().unwrap();
    assert!(prediction.next_maintenance_days > 0);
    assert!(prediction.next_maintenance_days < 90);
    assert_eq!(prediction.limiting_metric, Some(LimitingMetric::DriftRate));
}

#[test]
fn noisy_rising_history_still_forecasts() {
    let noise = gaussian_noise(60, 0.0002, FIELD_SEED);
    let history = daily_history(60, |i| 0.005 + 0.0005 * i as f64 + noise[i], |_| 0.002);

    let prediction = forecast(&history, UsageData::default()).ready().unwrap();
    // latest ≈ 0.0345 climbing 0.0005/day → about a month
    assert!(prediction.next_maintenance_days >= 20 && prediction.next_maintenance_days <= 45);
    assert!(prediction.performance_trends.drift_trend > 0.0);
}

#[test]
fn urgency_bands_can_be_widened() {
    let history = daily_history(20, |i| 0.001 * i as f64, |_| 0.0);
    let forecaster = MaintenanceForecaster::with_config(
        ForecastConfig::default().with_urgency_bands(60.0, 90.0),
    );
    let prediction = forecaster.forecast(&history, UsageData::default()).ready().unwrap();
    assert_eq!(prediction.urgency, MaintenanceUrgency::Critical);
}

#[test]
fn validation_grades_a_close_sample() {
    let profile = tulsi_profile();
    let sample = ElectrodeReadings::new()
        .with(ElectrodeType::Ss, 1.46)
        .with(ElectrodeType::Cu, 1.70)
        .with(ElectrodeType::Zn, 1.90)
        .with(ElectrodeType::Ag, 2.23)
        .with(ElectrodeType::Pt, 2.06);

    let report = driftguard_core::validate(&sample, &profile, "tulsi").ready().unwrap();
    assert_eq!(report.status, MatchStatus::ExcellentMatch);
    assert!(report.metrics.correlation > 0.95);
    assert!(report.metrics.mean_relative_error < 2.0);
}

#[test]
fn validation_with_two_electrodes_is_insufficient() {
    let sample = ElectrodeReadings::new()
        .with(ElectrodeType::Ss, 1.46)
        .with(ElectrodeType::Pt, 2.06);
    let result = driftguard_core::validate(&sample, &tulsi_profile(), "tulsi");
    assert_eq!(
        result.insufficiency().map(|why| why.reason),
        Some(InsufficientReason::TooFewMatchedElectrodes)
    );
}

#[test]
fn calibration_against_factory_buffers() {
    let table = ReferenceTable::builtin();
    // Probe sitting right on the factory buffer voltages
    let points: Vec<PhCalibrationPoint> = PhBuffer::ALL
        .iter()
        .map(|&buffer| PhCalibrationPoint {
            buffer,
            measured_voltage: table.ph_buffer(buffer).expected_voltage,
            temperature_c: 25.0,
            std_deviation: 0.0008,
        })
        .collect();

    let cal = fit_ph_calibration(table, &points).ready().unwrap();
    assert!(cal.slope < 0.0);
    assert!(cal.calibration_points.iter().all(|p| p.within_tolerance));
    assert!(cal.r_squared > 0.99);
}

#[test]
fn stability_run_over_fifteen_minutes() {
    let table = ReferenceTable::builtin();
    let minutes: Vec<f64> = (0..30).map(|i| i as f64 * 0.5).collect();
    let noise = gaussian_noise(30, 0.0005, FIELD_SEED);
    let readings: Vec<f64> = noise.iter().map(|e| 1.89 + e).collect();

    let run = assess_electrode_stability(table, ElectrodeType::Zn, &readings, &minutes)
        .ready()
        .unwrap();
    assert!(run.offset_acceptable);
    assert!(run.noise_acceptable);
    assert!(run.cv_percent < 0.2);
}

#[cfg(feature = "json")]
mod json {
    use super::*;

    #[test]
    fn records_serialize_with_snake_case_fields() {
        let history = daily_history(20, |i| 0.001 * i as f64, |_| 0.001);
        let prediction = forecast(&history, UsageData::default()).ready().unwrap();
        let value = serde_json::to_value(&prediction).unwrap();
        assert!(value["next_maintenance_days"].is_u64());
        assert_eq!(value["urgency"], "medium");
        assert_eq!(value["limiting_metric"], "drift_rate");
        assert!(value["performance_trends"]["drift_trend"].is_f64());

        let flat: ElectrodeReadings = ElectrodeType::ALL.iter().map(|&e| (e, 2.0)).collect();
        let report = driftguard_core::validate(&flat, &tulsi_profile(), "tulsi");
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["status"], "ready");
        assert_eq!(value["data"]["label"], "tulsi");
        assert_eq!(value["data"]["electrode_comparison"][0]["electrode"], "SS");
    }

    #[test]
    fn insufficient_serializes_with_reason() {
        let result = forecast(&[], UsageData::default());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["status"], "insufficient");
        assert_eq!(value["data"]["reason"], "too_few_history_entries");
        assert_eq!(value["data"]["required"], 20);
    }

    #[test]
    fn readings_accept_ingestion_keys() {
        let source = r#"{"SS_voltage": 1.46, "Cu_voltage": 1.70, "Zn": 1.90, "Pt_voltage": 2.06}"#;
        let readings: ElectrodeReadings = serde_json::from_str(source).unwrap();
        assert_eq!(readings.len(), 4);
        assert_eq!(readings.get(ElectrodeType::Ss), Some(1.46));
        assert_eq!(readings.get(ElectrodeType::Pt), Some(2.06));

        let value = serde_json::to_value(&readings).unwrap();
        assert_eq!(value["Cu"], 1.70);
    }

    #[test]
    fn profile_round_trips_from_store_json() {
        let source = r#"{"electrode_response": {"SS": 1.45, "Cu": 1.72, "Pt": 2.05}}"#;
        let profile: ReferenceProfile = serde_json::from_str(source).unwrap();
        assert_eq!(profile.electrode_response.len(), 3);
        assert_eq!(profile.electrode_response[&ElectrodeType::Cu], 1.72);
    }
}
