//! Maintenance Forecast Example
//!
//! Forecasts the next service date from a month of daily drift and noise
//! summaries, then grades a sample against a reference profile.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 02_maintenance_forecast
//! ```

use driftguard_core::{
    forecast, validate, ElectrodeReadings, ElectrodeType, HistoryEntry, ReferenceProfile, UsageData,
};

fn main() {
    println!("DriftGuard Maintenance Forecast Example");
    println!("=======================================\n");

    let start = 1_700_000_000u64;
    let history: Vec<HistoryEntry> = (0..30)
        .map(|day| {
            let d = day as f64;
            HistoryEntry::new(start + day * 86_400, 0.01 + 0.0008 * d, 0.002 + 0.0001 * d)
        })
        .collect();

    let usage = UsageData {
        operating_hours: 720.0,
        measurement_count: 8_640,
        last_maintenance: Some(start),
    };

    match forecast(&history, usage).ready() {
        Some(prediction) => {
            println!("Next maintenance : {} days", prediction.next_maintenance_days);
            println!("Urgency          : {:?}", prediction.urgency);
            println!("Limited by       : {:?}", prediction.limiting_metric);
            println!("Message          : {}", prediction.message);
        }
        None => println!("Not enough history yet"),
    }
    println!();

    let profile = ReferenceProfile::new()
        .with(ElectrodeType::Ss, 1.45)
        .with(ElectrodeType::Cu, 1.72)
        .with(ElectrodeType::Zn, 1.88)
        .with(ElectrodeType::Ag, 2.25)
        .with(ElectrodeType::Pt, 2.05);

    let sample = ElectrodeReadings::new()
        .with(ElectrodeType::Ss, 1.47)
        .with(ElectrodeType::Cu, 1.69)
        .with(ElectrodeType::Zn, 1.91)
        .with(ElectrodeType::Pt, 2.02);

    if let Some(report) = validate(&sample, &profile, "tulsi").ready() {
        println!("Validation against {}:", report.label);
        println!("  score  : {:.1}", report.validation_score);
        println!("  status : {:?}", report.status);
        for c in &report.electrode_comparison {
            println!(
                "  {:>2}: expected {:.3} V, got {:.3} V ({:.1}%)",
                c.electrode, c.expected, c.actual, c.relative_error
            );
        }
    }
}
