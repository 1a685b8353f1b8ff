//! Drift Detection Example
//!
//! Runs a slowly drifting platinum electrode through the detector, first on
//! the raw readings and then through the full conditioning pipeline.
//!
//! ## What You'll Learn
//!
//! - Loading the factory reference table
//! - Reading the four detector votes and the recommendation
//! - Chaining Kalman filtering and temperature compensation
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_drift_detection
//! ```

use driftguard_core::{
    Analysis, DriftDetector, ElectrodeType, ReferenceTable, SensorType, SignalConditioner,
};
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};

fn main() {
    println!("DriftGuard Drift Detection Example");
    println!("==================================\n");

    let table = ReferenceTable::builtin();

    // 2.0 V climbing 1 mV per sample, with 2 mV of noise
    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, 0.002).unwrap();
    let readings: Vec<f64> = (0..50)
        .map(|i| 2.0 + 0.001 * i as f64 + noise.sample(&mut rng))
        .collect();

    let detector = DriftDetector::new(table);
    match detector.detect(&readings, SensorType::Electrode, Some(ElectrodeType::Pt)) {
        Analysis::Ready(result) => {
            let votes = result.individual_indicators;
            println!("Raw readings:");
            println!("  linear trend : {}", votes.linear_trend);
            println!("  CUSUM        : {}", votes.cusum_alarm);
            println!("  moving range : {}", votes.range_alarm);
            println!("  SPC          : {}", votes.spc_alarm);
            println!("  drift detected: {}", result.drift_detected);
            println!("  confidence    : {:.2}", result.drift_confidence);
            println!("  rate          : {:.6} V/hour", result.drift_rate_per_hour);
            println!(
                "  action        : {:?} ({}; check again in {}h)",
                result.recommendation.action,
                result.recommendation.message,
                result.recommendation.next_check_hours
            );
        }
        Analysis::Insufficient(why) => println!("Not analysed: {}", why),
    }
    println!();

    // Same window, filtered and compensated from a 31 °C sample
    let conditioner = SignalConditioner::builder(table)
        .kalman()
        .compensate_at(31.0)
        .build();
    let conditioned = conditioner.condition(&readings, SensorType::Electrode, Some(ElectrodeType::Pt));

    println!("Conditioned readings:");
    println!("  first / last: {:.4} V / {:.4} V", conditioned.series[0], conditioned.series[49]);
    if let Some(result) = conditioned.drift.as_ready() {
        println!("  drift detected: {}", result.drift_detected);
        println!("  confidence    : {:.2}", result.drift_confidence);
    }
}
