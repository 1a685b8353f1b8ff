//! Temperature Compensation
//!
//! Brings readings taken at temperature `T` back to the 25 °C basis the
//! reference table is specified at. `Δ = T - 25`.
//!
//! ```text
//! Sensor                 | Correction
//! -----------------------|------------------------------------------------
//! electrode (known type) | v - α_electrode · Δ
//! pH                     | Nernst: re-slope around the 2.0 V anchor
//! conductivity           | v / (1 + α_cond · Δ)
//! anything else          | v - (-1e-3) · Δ
//! ```
//!
//! ## Nernst Correction
//!
//! The glass electrode slope scales with absolute temperature:
//!
//! ```text
//! S(T) = S₂₅ · (T + 273.15) / 298.15        S₂₅ = -59.16 mV/pH
//! ```
//!
//! A reading is read as a pH offset from the anchor using `S₂₅`, then turned
//! back into a voltage with `S(T)`. At 25 °C the two slopes coincide and the
//! reading is returned untouched.

use alloc::vec::Vec;

use crate::{
    constants::{
        electrochemistry::{
            GENERIC_TEMP_COEFFICIENT_V_PER_C, KELVIN_OFFSET, PH_ANCHOR_VOLTAGE, REFERENCE_TEMP_C,
            REFERENCE_TEMP_K,
        },
        DENOMINATOR_FLOOR,
    },
    reference::{ElectrodeType, ReferenceTable, SensorType},
    stats::floor_magnitude,
};

/// Temperature compensator bound to a reference table
#[derive(Debug, Clone, Copy)]
pub struct TemperatureCompensator<'a> {
    table: &'a ReferenceTable,
}

impl<'a> TemperatureCompensator<'a> {
    /// Compensator reading coefficients from `table`
    pub fn new(table: &'a ReferenceTable) -> Self {
        Self { table }
    }

    /// Compensate one reading taken at `temperature_c`
    pub fn compensate(
        &self,
        reading: f64,
        temperature_c: f64,
        sensor: SensorType,
        electrode: Option<ElectrodeType>,
    ) -> f64 {
        let delta = temperature_c - REFERENCE_TEMP_C;

        match (sensor, electrode) {
            (SensorType::Electrode, Some(electrode)) => {
                reading - self.table.electrode(electrode).temp_coefficient * delta
            }
            (SensorType::Ph, _) => self.nernst(reading, temperature_c),
            (SensorType::Conductivity, _) => {
                let factor = 1.0 + self.table.conductivity().temp_coefficient * delta;
                // Zero at -22.6 °C with the stock coefficient
                reading / floor_magnitude(factor, DENOMINATOR_FLOOR)
            }
            _ => reading - GENERIC_TEMP_COEFFICIENT_V_PER_C * delta,
        }
    }

    /// Compensate a whole series taken at one temperature
    pub fn compensate_series(
        &self,
        readings: &[f64],
        temperature_c: f64,
        sensor: SensorType,
        electrode: Option<ElectrodeType>,
    ) -> Vec<f64> {
        readings
            .iter()
            .map(|&r| self.compensate(r, temperature_c, sensor, electrode))
            .collect()
    }

    /// Compensate a series with one temperature per reading
    ///
    /// Pairs readings and temperatures up to the shorter of the two.
    pub fn compensate_paired(
        &self,
        readings: &[f64],
        temperatures_c: &[f64],
        sensor: SensorType,
        electrode: Option<ElectrodeType>,
    ) -> Vec<f64> {
        readings
            .iter()
            .zip(temperatures_c)
            .map(|(&r, &t)| self.compensate(r, t, sensor, electrode))
            .collect()
    }

    fn nernst(&self, reading: f64, temperature_c: f64) -> f64 {
        let ratio = (temperature_c + KELVIN_OFFSET) / REFERENCE_TEMP_K;
        if ratio == 1.0 {
            return reading;
        }

        let slope_25 = self.table.ph().slope_nominal / 1000.0;
        let slope_t = slope_25 * ratio;

        let ph_offset = (reading - PH_ANCHOR_VOLTAGE) / floor_magnitude(slope_25, DENOMINATOR_FLOOR);
        PH_ANCHOR_VOLTAGE + ph_offset * slope_t
    }
}
