//! Reference Standard Table
//!
//! Per-sensor and per-electrode constants: expected buffer responses,
//! temperature coefficients, aging and noise thresholds, and the pH buffer
//! set used for multipoint calibration.
//!
//! The table is built once (embedded defaults or a JSON document), validated
//! at load time, and then only read. Every component takes it by reference,
//! so one table can be shared by any number of concurrent analyses.
//!
//! Lookups are keyed by closed enumerations and indexed directly, which makes
//! an electrode without a profile unrepresentable after [`ReferenceTable::validate`].
//!
//! ```rust
//! use driftguard_core::{ReferenceTable, ElectrodeType};
//!
//! let table = ReferenceTable::builtin();
//! let pt = table.electrode(ElectrodeType::Pt);
//! assert_eq!(pt.aging_rate, 0.003);
//! ```

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::constants::electrochemistry::{
    CONDUCTIVITY_CELL_CONSTANT, CONDUCTIVITY_DRIFT_THRESHOLD, CONDUCTIVITY_TEMP_COEFFICIENT,
    NERNST_SLOPE_25C_MV_PER_PH, NERNST_SLOPE_TEMP_COEFFICIENT, PH_DRIFT_THRESHOLD,
};
use crate::errors::{ConfigError, ConfigResult};

/// Sensor family a reading comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SensorType {
    /// Bare metal electrode in the array
    Electrode,
    /// Glass pH electrode
    Ph,
    /// Conductivity cell
    Conductivity,
    /// Any other analog channel
    Generic,
}

impl SensorType {
    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Electrode => "electrode",
            Self::Ph => "pH",
            Self::Conductivity => "conductivity",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SensorType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("electrode") {
            Ok(Self::Electrode)
        } else if s.eq_ignore_ascii_case("ph") {
            Ok(Self::Ph)
        } else if s.eq_ignore_ascii_case("conductivity") {
            Ok(Self::Conductivity)
        } else if s.eq_ignore_ascii_case("generic") || s.eq_ignore_ascii_case("analog") {
            Ok(Self::Generic)
        } else {
            Err(ConfigError::UnknownSensorType)
        }
    }
}

/// Electrode material in the sensing array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ElectrodeType {
    /// Stainless steel
    #[cfg_attr(feature = "serde", serde(rename = "SS", alias = "SS_voltage"))]
    Ss,
    /// Copper
    #[cfg_attr(feature = "serde", serde(alias = "Cu_voltage"))]
    Cu,
    /// Zinc
    #[cfg_attr(feature = "serde", serde(alias = "Zn_voltage"))]
    Zn,
    /// Silver
    #[cfg_attr(feature = "serde", serde(alias = "Ag_voltage"))]
    Ag,
    /// Platinum
    #[cfg_attr(feature = "serde", serde(alias = "Pt_voltage"))]
    Pt,
}

impl ElectrodeType {
    /// All electrodes, in the array's canonical order
    pub const ALL: [Self; 5] = [Self::Ss, Self::Cu, Self::Zn, Self::Ag, Self::Pt];

    /// Short code used by the device firmware ("SS", "Cu", ...)
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Ss => "SS",
            Self::Cu => "Cu",
            Self::Zn => "Zn",
            Self::Ag => "Ag",
            Self::Pt => "Pt",
        }
    }

    /// Position in [`ElectrodeType::ALL`]
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ElectrodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.code())
    }
}

impl FromStr for ElectrodeType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Ingestion payloads key channels as "<code>_voltage"
        let s = s.trim();
        let code = s.strip_suffix("_voltage").unwrap_or(s);
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.code().eq_ignore_ascii_case(code))
            .ok_or(ConfigError::UnknownElectrode)
    }
}

/// Buffer solution an electrode response is specified in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferLabel {
    /// pH 4
    Ph4,
    /// pH 7
    Ph7,
    /// pH 10
    Ph10,
}

/// Expected electrode voltage in each reference buffer (V)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BufferResponses {
    /// Response in pH 4 buffer
    #[cfg_attr(feature = "serde", serde(rename = "pH4"))]
    pub ph4: f64,
    /// Response in pH 7 buffer
    #[cfg_attr(feature = "serde", serde(rename = "pH7"))]
    pub ph7: f64,
    /// Response in pH 10 buffer
    #[cfg_attr(feature = "serde", serde(rename = "pH10"))]
    pub ph10: f64,
}

impl BufferResponses {
    /// Response for a buffer
    pub const fn get(&self, buffer: BufferLabel) -> f64 {
        match buffer {
            BufferLabel::Ph4 => self.ph4,
            BufferLabel::Ph7 => self.ph7,
            BufferLabel::Ph10 => self.ph10,
        }
    }
}

/// Calibration profile for one electrode material
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElectrodeStandard {
    /// Expected voltage per buffer
    pub reference_responses: BufferResponses,
    /// Thermal coefficient (V/°C)
    pub temp_coefficient: f64,
    /// Aging rate (units/month)
    pub aging_rate: f64,
    /// Noise floor (V)
    pub noise_threshold: f64,
    /// Largest acceptable drift during a stability run (mV/hour)
    pub max_drift_mv_per_hour: f64,
}

/// pH channel constants
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhStandard {
    /// Nernst slope at 25 °C (mV/pH)
    pub slope_nominal: f64,
    /// Slope temperature dependence (mV/pH/°C)
    pub temp_coefficient: f64,
    /// Trend threshold (mV/day)
    pub drift_threshold: f64,
}

/// Conductivity channel constants
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConductivityStandard {
    /// Relative change per °C
    pub temp_coefficient: f64,
    /// Cell constant (1/cm)
    pub cell_constant: f64,
    /// Trend threshold (%/day)
    pub drift_threshold: f64,
}

/// Certified pH buffer solution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PhBuffer {
    /// pH 4.01
    #[cfg_attr(feature = "serde", serde(rename = "pH_4.01"))]
    Ph4_01,
    /// pH 6.86
    #[cfg_attr(feature = "serde", serde(rename = "pH_6.86"))]
    Ph6_86,
    /// pH 9.18
    #[cfg_attr(feature = "serde", serde(rename = "pH_9.18"))]
    Ph9_18,
    /// pH 10.01
    #[cfg_attr(feature = "serde", serde(rename = "pH_10.01"))]
    Ph10_01,
}

impl PhBuffer {
    /// All buffers, acid to base
    pub const ALL: [Self; 4] = [Self::Ph4_01, Self::Ph6_86, Self::Ph9_18, Self::Ph10_01];

    /// Nominal pH at 25 °C
    pub const fn ph(&self) -> f64 {
        match self {
            Self::Ph4_01 => 4.01,
            Self::Ph6_86 => 6.86,
            Self::Ph9_18 => 9.18,
            Self::Ph10_01 => 10.01,
        }
    }

    /// Position in [`PhBuffer::ALL`]
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

/// Expected front-end response in a buffer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PhBufferStandard {
    /// Expected voltage at 25 °C (V)
    pub expected_voltage: f64,
    /// Acceptance band (V)
    pub tolerance: f64,
    /// Voltage change per °C away from 25 °C (V/°C)
    pub temp_coeff: f64,
}

/// Immutable table of reference constants
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    electrodes: [ElectrodeStandard; 5],
    ph: PhStandard,
    conductivity: ConductivityStandard,
    ph_buffers: [PhBufferStandard; 4],
}

const fn electrode(
    ph4: f64,
    ph7: f64,
    ph10: f64,
    temp_coefficient: f64,
    aging_rate: f64,
    noise_threshold: f64,
    max_drift_mv_per_hour: f64,
) -> ElectrodeStandard {
    ElectrodeStandard {
        reference_responses: BufferResponses { ph4, ph7, ph10 },
        temp_coefficient,
        aging_rate,
        noise_threshold,
        max_drift_mv_per_hour,
    }
}

/// Factory reference values for the five-electrode array
static BUILTIN: ReferenceTable = ReferenceTable {
    electrodes: [
        electrode(1.85, 1.42, 0.95, -1.2e-3, 0.005, 0.002, 0.05),  // SS
        electrode(2.15, 1.68, 1.12, -1.8e-3, 0.008, 0.003, 0.08),  // Cu
        electrode(2.45, 1.89, 1.35, -1.5e-3, 0.006, 0.0025, 0.06), // Zn
        electrode(2.78, 2.21, 1.58, -0.9e-3, 0.004, 0.002, 0.04),  // Ag
        electrode(2.52, 2.03, 1.41, -0.7e-3, 0.003, 0.0015, 0.03), // Pt
    ],
    ph: PhStandard {
        slope_nominal: NERNST_SLOPE_25C_MV_PER_PH,
        temp_coefficient: NERNST_SLOPE_TEMP_COEFFICIENT,
        drift_threshold: PH_DRIFT_THRESHOLD,
    },
    conductivity: ConductivityStandard {
        temp_coefficient: CONDUCTIVITY_TEMP_COEFFICIENT,
        cell_constant: CONDUCTIVITY_CELL_CONSTANT,
        drift_threshold: CONDUCTIVITY_DRIFT_THRESHOLD,
    },
    ph_buffers: [
        PhBufferStandard { expected_voltage: 2.458, tolerance: 0.015, temp_coeff: -5.4e-4 },
        PhBufferStandard { expected_voltage: 2.000, tolerance: 0.015, temp_coeff: -1.8e-4 },
        PhBufferStandard { expected_voltage: 1.542, tolerance: 0.015, temp_coeff: 1.2e-4 },
        PhBufferStandard { expected_voltage: 1.458, tolerance: 0.015, temp_coeff: 2.1e-4 },
    ],
};

impl ReferenceTable {
    /// Embedded factory table, shared for the life of the process
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Assemble a table from parts and validate it
    pub fn new(
        electrodes: [ElectrodeStandard; 5],
        ph: PhStandard,
        conductivity: ConductivityStandard,
        ph_buffers: [PhBufferStandard; 4],
    ) -> ConfigResult<Self> {
        let table = Self { electrodes, ph, conductivity, ph_buffers };
        table.validate()?;
        Ok(table)
    }

    /// Profile for an electrode
    pub fn electrode(&self, electrode: ElectrodeType) -> &ElectrodeStandard {
        &self.electrodes[electrode.index()]
    }

    /// pH channel constants
    pub fn ph(&self) -> &PhStandard {
        &self.ph
    }

    /// Conductivity channel constants
    pub fn conductivity(&self) -> &ConductivityStandard {
        &self.conductivity
    }

    /// Expected response in a pH buffer
    pub fn ph_buffer(&self, buffer: PhBuffer) -> &PhBufferStandard {
        &self.ph_buffers[buffer.index()]
    }

    /// Check every coefficient is finite and every threshold positive
    pub fn validate(&self) -> ConfigResult<()> {
        for standard in &self.electrodes {
            let r = &standard.reference_responses;
            finite("reference_responses.pH4", r.ph4)?;
            finite("reference_responses.pH7", r.ph7)?;
            finite("reference_responses.pH10", r.ph10)?;
            finite("temp_coefficient", standard.temp_coefficient)?;
            positive("aging_rate", standard.aging_rate)?;
            positive("noise_threshold", standard.noise_threshold)?;
            positive("max_drift_mv_per_hour", standard.max_drift_mv_per_hour)?;
        }

        finite("ph.slope_nominal", self.ph.slope_nominal)?;
        finite("ph.temp_coefficient", self.ph.temp_coefficient)?;
        positive("ph.drift_threshold", self.ph.drift_threshold)?;

        finite("conductivity.temp_coefficient", self.conductivity.temp_coefficient)?;
        positive("conductivity.cell_constant", self.conductivity.cell_constant)?;
        positive("conductivity.drift_threshold", self.conductivity.drift_threshold)?;

        for buffer in &self.ph_buffers {
            finite("ph_buffers.expected_voltage", buffer.expected_voltage)?;
            positive("ph_buffers.tolerance", buffer.tolerance)?;
            finite("ph_buffers.temp_coeff", buffer.temp_coeff)?;
        }

        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidCoefficient { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidCoefficient { field, value })
    }
}

#[cfg(feature = "json")]
mod json {
    //! Loading a table from the JSON layout the device backend stores.

    use alloc::collections::BTreeMap;
    use alloc::string::String;

    use serde::Deserialize;

    use super::*;

    #[derive(Deserialize)]
    struct RawTable {
        electrode_standards: BTreeMap<String, RawElectrode>,
        environmental_standards: RawEnvironmental,
        #[serde(default)]
        ph_buffers: Option<BTreeMap<String, PhBufferStandard>>,
    }

    #[derive(Clone, Deserialize)]
    struct RawElectrode {
        reference_responses: BufferResponses,
        temp_coefficient: f64,
        aging_rate: f64,
        noise_threshold: f64,
        #[serde(default)]
        max_drift_mv_per_hour: Option<f64>,
    }

    impl RawElectrode {
        fn into_standard(self, electrode: ElectrodeType) -> ElectrodeStandard {
            // Older factory tables carry no stability limit
            let max_drift_mv_per_hour = self
                .max_drift_mv_per_hour
                .unwrap_or(BUILTIN.electrodes[electrode.index()].max_drift_mv_per_hour);
            ElectrodeStandard {
                reference_responses: self.reference_responses,
                temp_coefficient: self.temp_coefficient,
                aging_rate: self.aging_rate,
                noise_threshold: self.noise_threshold,
                max_drift_mv_per_hour,
            }
        }
    }

    #[derive(Deserialize)]
    struct RawEnvironmental {
        #[serde(rename = "pH")]
        ph: PhStandard,
        conductivity: ConductivityStandard,
    }

    impl ReferenceTable {
        /// Parse and validate a table from JSON
        ///
        /// Every electrode must be present; `ph_buffers` may be omitted, in
        /// which case the factory buffer set is used.
        pub fn from_json(source: &str) -> ConfigResult<Self> {
            let raw: RawTable = serde_json::from_str(source).map_err(|_| {
                log_warn!("reference table rejected: not a valid table document");
                ConfigError::Malformed { reason: "not a valid reference table document" }
            })?;

            for key in raw.electrode_standards.keys() {
                key.parse::<ElectrodeType>()?;
            }

            let mut electrodes = BUILTIN.electrodes;
            for electrode in ElectrodeType::ALL {
                let standard = raw
                    .electrode_standards
                    .iter()
                    .find(|(key, _)| key.parse::<ElectrodeType>().ok() == Some(electrode))
                    .map(|(_, raw)| raw.clone().into_standard(electrode))
                    .ok_or(ConfigError::MissingElectrodeProfile { electrode: electrode.code() })?;
                electrodes[electrode.index()] = standard;
            }

            let mut ph_buffers = BUILTIN.ph_buffers;
            if let Some(buffers) = raw.ph_buffers {
                for buffer in PhBuffer::ALL {
                    let key = match buffer {
                        PhBuffer::Ph4_01 => "pH_4.01",
                        PhBuffer::Ph6_86 => "pH_6.86",
                        PhBuffer::Ph9_18 => "pH_9.18",
                        PhBuffer::Ph10_01 => "pH_10.01",
                    };
                    if let Some(standard) = buffers.get(key) {
                        ph_buffers[buffer.index()] = *standard;
                    }
                }
            }

            Self::new(
                electrodes,
                raw.environmental_standards.ph,
                raw.environmental_standards.conductivity,
                ph_buffers,
            )
        }
    }
}
