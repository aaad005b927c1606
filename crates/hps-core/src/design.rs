//! The four sizing decisions of a hybrid PV / battery / biogas / converter plant.

use crate::units::{KilowattHours, Kilowatts};
use serde::{Deserialize, Serialize};

/// Number of decision variables.
pub const DIMENSIONS: usize = 4;

/// Index of each decision variable inside a [`DecisionVector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Photovoltaic array rating (kW)
    Pv,
    /// Battery bank capacity (kWh)
    Battery,
    /// Biogas generator rating (kW)
    Biogas,
    /// Power converter rating (kW)
    Converter,
}

impl Dimension {
    pub const ALL: [Dimension; DIMENSIONS] = [
        Dimension::Pv,
        Dimension::Battery,
        Dimension::Biogas,
        Dimension::Converter,
    ];

    pub fn index(self) -> usize {
        match self {
            Dimension::Pv => 0,
            Dimension::Battery => 1,
            Dimension::Biogas => 2,
            Dimension::Converter => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Pv => "Solar PV",
            Dimension::Battery => "Battery",
            Dimension::Biogas => "Biogas",
            Dimension::Converter => "Converter",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Dimension::Battery => "kWh",
            _ => "kW",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// `[pv_kw, batt_kwh, biogas_kw, converter_kw]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionVector(pub [f64; DIMENSIONS]);

/// Error returned when a slice does not have exactly [`DIMENSIONS`] entries.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("decision vector needs 4 components, got {0}")]
pub struct WrongDimensions(pub usize);

impl DecisionVector {
    pub fn new(pv_kw: f64, battery_kwh: f64, biogas_kw: f64, converter_kw: f64) -> Self {
        Self([pv_kw, battery_kwh, biogas_kw, converter_kw])
    }

    pub fn pv_kw(&self) -> f64 {
        self.0[0]
    }

    pub fn battery_kwh(&self) -> f64 {
        self.0[1]
    }

    pub fn biogas_kw(&self) -> f64 {
        self.0[2]
    }

    pub fn converter_kw(&self) -> f64 {
        self.0[3]
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        self.0[dimension.index()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Typed view for reporting.
    pub fn to_design(&self) -> SystemDesign {
        SystemDesign {
            pv: Kilowatts(self.pv_kw()),
            battery: KilowattHours(self.battery_kwh()),
            biogas: Kilowatts(self.biogas_kw()),
            converter: Kilowatts(self.converter_kw()),
        }
    }
}

impl TryFrom<&[f64]> for DecisionVector {
    type Error = WrongDimensions;

    fn try_from(values: &[f64]) -> Result<Self, Self::Error> {
        let array: [f64; DIMENSIONS] = values
            .try_into()
            .map_err(|_| WrongDimensions(values.len()))?;
        Ok(Self(array))
    }
}

impl From<SystemDesign> for DecisionVector {
    fn from(design: SystemDesign) -> Self {
        Self::new(
            design.pv.value(),
            design.battery.value(),
            design.biogas.value(),
            design.converter.value(),
        )
    }
}

/// Installed equipment of a plant, with units attached.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SystemDesign {
    pub pv: Kilowatts,
    pub battery: KilowattHours,
    pub biogas: Kilowatts,
    pub converter: Kilowatts,
}
