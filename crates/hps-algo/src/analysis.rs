//! Post-hoc analysis of a sized plant
//!
//! Levelized cost, CO2 accounting and battery-price sensitivity. Everything
//! here consumes a finished design and never feeds back into the optimizer.
//!
//! ```text
//! LCOE        = NPC / (daily demand · 365 · horizon)
//! BAU CO2     = annual load · (grid share · grid factor + diesel share · diesel factor)
//! System CO2  = biogas kW · emergency hours · biogas factor
//! Sensitivity = NPC(design) for battery prices in [min, max]
//! ```

use crate::sizing::{HybridObjective, SizingParams, DAYS_PER_YEAR};
use hps_core::{DecisionVector, Dollars, HpsError, KilowattHours};
use serde::{Deserialize, Serialize};

/// Linear sweep of battery unit prices, both ends included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceSweep {
    pub min: f64,
    pub max: f64,
    pub points: usize,
}

impl Default for PriceSweep {
    fn default() -> Self {
        Self {
            min: 250.0,
            max: 400.0,
            points: 10,
        }
    }
}

impl PriceSweep {
    pub fn prices(&self) -> Vec<f64> {
        match self.points {
            0 => Vec::new(),
            1 => vec![self.min],
            n => {
                let step = (self.max - self.min) / (n - 1) as f64;
                (0..n).map(|i| self.min + step * i as f64).collect()
            }
        }
    }
}

/// A competing design known only by its total cost and battery size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSystem {
    pub label: String,
    pub npc: f64,
    pub battery_kwh: f64,
}

impl Default for ReferenceSystem {
    fn default() -> Self {
        Self {
            label: "Pure storage".to_string(),
            npc: 111_000_000.0,
            battery_kwh: 75_000.0,
        }
    }
}

/// Emission factors and sweep settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Share of load served by the grid in the business-as-usual case
    pub grid_share: f64,
    /// kg CO2 per grid kWh
    pub grid_emission_factor: f64,
    /// Share of load served by diesel backup in the business-as-usual case
    pub diesel_share: f64,
    /// kg CO2 per diesel kWh
    pub diesel_emission_factor: f64,
    /// kg CO2 per biogas kWh
    pub biogas_emission_factor: f64,
    /// Hours per year the biogas generator runs
    pub biogas_emergency_hours: f64,
    /// Tons of CO2 per passenger car per year
    pub tons_co2_per_car: f64,
    pub battery_prices: PriceSweep,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceSystem>,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            grid_share: 0.9,
            grid_emission_factor: 0.6,
            diesel_share: 0.1,
            diesel_emission_factor: 0.8,
            biogas_emission_factor: 0.05,
            biogas_emergency_hours: 500.0,
            tons_co2_per_car: 4.6,
            battery_prices: PriceSweep::default(),
            reference: Some(ReferenceSystem::default()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidFactor { name: &'static str, value: f64 },
    #[error("tons_co2_per_car must be positive, got {0}")]
    InvalidCarFactor(f64),
    #[error("battery price sweep {min}..={max} is empty or inverted")]
    InvalidSweep { min: f64, max: f64 },
}

impl From<AnalysisError> for HpsError {
    fn from(err: AnalysisError) -> Self {
        HpsError::Config(err.to_string())
    }
}

impl AnalysisParams {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        for (name, value) in [
            ("grid_share", self.grid_share),
            ("grid_emission_factor", self.grid_emission_factor),
            ("diesel_share", self.diesel_share),
            ("diesel_emission_factor", self.diesel_emission_factor),
            ("biogas_emission_factor", self.biogas_emission_factor),
            ("biogas_emergency_hours", self.biogas_emergency_hours),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(AnalysisError::InvalidFactor { name, value });
            }
        }
        if !(self.tons_co2_per_car.is_finite() && self.tons_co2_per_car > 0.0) {
            return Err(AnalysisError::InvalidCarFactor(self.tons_co2_per_car));
        }
        let sweep = &self.battery_prices;
        if sweep.points == 0 || !(sweep.min.is_finite() && sweep.max.is_finite()) || sweep.min > sweep.max {
            return Err(AnalysisError::InvalidSweep {
                min: sweep.min,
                max: sweep.max,
            });
        }
        Ok(())
    }
}

/// Levelized cost of energy
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LcoeReport {
    /// Load served over the whole horizon
    pub lifetime_energy: KilowattHours,
    /// $/kWh
    pub lcoe: f64,
    pub grid_price: f64,
    /// Grid price minus LCOE; negative when the plant is dearer than the grid
    pub savings_per_kwh: f64,
}

/// Annual CO2 balance, in metric tons
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EmissionsReport {
    pub annual_load: KilowattHours,
    pub annual_solar: KilowattHours,
    pub annual_biogas: KilowattHours,
    pub business_as_usual_tons: f64,
    pub system_tons: f64,
    pub avoided_tons: f64,
    pub equivalent_cars: f64,
}

/// Net present cost at one battery price
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityPoint {
    pub battery_price: f64,
    pub npc: Dollars,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_npc: Option<Dollars>,
}

/// Everything [`analyze`] derives from one design
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub design: DecisionVector,
    pub feasible: bool,
    pub npc: Dollars,
    pub lcoe: LcoeReport,
    pub emissions: EmissionsReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_label: Option<String>,
    pub sensitivity: Vec<SensitivityPoint>,
}

pub fn lcoe(params: &SizingParams, npc: Dollars) -> LcoeReport {
    let lifetime_energy =
        KilowattHours(params.daily_demand_kwh * DAYS_PER_YEAR * f64::from(params.horizon_years));
    let lcoe = npc.value() / lifetime_energy.value();
    LcoeReport {
        lifetime_energy,
        lcoe,
        grid_price: params.grid_price_per_kwh,
        savings_per_kwh: params.grid_price_per_kwh - lcoe,
    }
}

pub fn emissions(params: &SizingParams, analysis: &AnalysisParams, design: &DecisionVector) -> EmissionsReport {
    let annual_load = KilowattHours(params.daily_demand_kwh * DAYS_PER_YEAR);
    let annual_solar = KilowattHours(design.pv_kw() * params.solar_yield * DAYS_PER_YEAR);
    let annual_biogas = KilowattHours(design.biogas_kw() * analysis.biogas_emergency_hours);

    let bau_kg = annual_load.value()
        * (analysis.grid_share * analysis.grid_emission_factor
            + analysis.diesel_share * analysis.diesel_emission_factor);
    let system_kg = annual_biogas.value() * analysis.biogas_emission_factor;
    let avoided_tons = (bau_kg - system_kg) / 1_000.0;

    EmissionsReport {
        annual_load,
        annual_solar,
        annual_biogas,
        business_as_usual_tons: bau_kg / 1_000.0,
        system_tons: system_kg / 1_000.0,
        avoided_tons,
        equivalent_cars: avoided_tons / analysis.tons_co2_per_car,
    }
}

/// NPC of `design` (and of the reference system) across the battery price sweep.
///
/// Only the battery capital cost changes with price.
pub fn battery_price_sensitivity(
    objective: &HybridObjective,
    analysis: &AnalysisParams,
    design: &DecisionVector,
) -> Vec<SensitivityPoint> {
    let base_price = objective.params().cost_battery_per_kwh;
    analysis
        .battery_prices
        .prices()
        .into_iter()
        .map(|price| SensitivityPoint {
            battery_price: price,
            npc: objective.npc_with_battery_price(design, price),
            reference_npc: analysis.reference.as_ref().map(|reference| {
                Dollars(reference.npc - reference.battery_kwh * base_price + reference.battery_kwh * price)
            }),
        })
        .collect()
}

pub fn analyze(objective: &HybridObjective, analysis: &AnalysisParams, design: &DecisionVector) -> AnalysisReport {
    let evaluation = objective.evaluate(design);
    let npc = evaluation.breakdown().npc;

    AnalysisReport {
        design: *design,
        feasible: evaluation.is_feasible(),
        npc,
        lcoe: lcoe(objective.params(), npc),
        emissions: emissions(objective.params(), analysis, design),
        reference_label: analysis.reference.as_ref().map(|r| r.label.clone()),
        sensitivity: battery_price_sensitivity(objective, analysis, design),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn test_sweep_includes_both_ends() {
        let prices = PriceSweep::default().prices();
        assert_eq!(prices.len(), 10);
        assert_eq!(prices[0], 250.0);
        assert!(close(prices[9], 400.0));
        assert!(close(prices[1] - prices[0], 150.0 / 9.0));
        assert_eq!(PriceSweep { min: 300.0, max: 300.0, points: 1 }.prices(), vec![300.0]);
    }

    #[test]
    fn test_lcoe_over_horizon() {
        let report = lcoe(&SizingParams::default(), Dollars(103_760_709.0));
        assert_eq!(report.lifetime_energy, KilowattHours(450_000.0 * 365.0 * 20.0));
        assert!(close(report.lcoe, 103_760_709.0 / 3_285_000_000.0));
        assert!(close(report.savings_per_kwh, 0.105 - report.lcoe));
    }

    #[test]
    fn test_emissions_balance() {
        let design = DecisionVector::new(66_785.0, 46_325.0, 11_876.0, 35_000.0);
        let report = emissions(&SizingParams::default(), &AnalysisParams::default(), &design);

        let load = 450_000.0 * 365.0;
        assert!(close(report.business_as_usual_tons, load * (0.9 * 0.6 + 0.1 * 0.8) / 1_000.0));
        assert!(close(report.annual_biogas.value(), 11_876.0 * 500.0));
        assert!(close(report.system_tons, 11_876.0 * 500.0 * 0.05 / 1_000.0));
        assert!(close(report.equivalent_cars, report.avoided_tons / 4.6));
    }

    #[test]
    fn test_sensitivity_is_linear_in_battery_size() {
        let objective = HybridObjective::default();
        let analysis = AnalysisParams::default();
        let design = DecisionVector::new(80_000.0, 70_000.0, 2_000.0, 35_000.0);
        let points = battery_price_sensitivity(&objective, &analysis, &design);

        assert_eq!(points.len(), 10);
        let slope = (points[9].npc - points[0].npc).value() / 150.0;
        assert!(close(slope, 70_000.0));

        // Reference pinned at its published NPC for the base price
        let reference = points[0].reference_npc.unwrap().value();
        assert!(close(reference, 111_000_000.0 - 75_000.0 * 320.0 + 75_000.0 * 250.0));
    }

    #[test]
    fn test_validate_rejects_inverted_sweep() {
        let params = AnalysisParams {
            battery_prices: PriceSweep { min: 400.0, max: 250.0, points: 5 },
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(AnalysisError::InvalidSweep { min: 400.0, max: 250.0 })
        );
        assert!(AnalysisParams::default().validate().is_ok());
    }

    #[test]
    fn test_analyze_flags_infeasible_design() {
        let report = analyze(
            &HybridObjective::default(),
            &AnalysisParams::default(),
            &DecisionVector::new(0.0, 0.0, 0.0, 0.0),
        );
        assert!(!report.feasible);
        assert_eq!(report.reference_label.as_deref(), Some("Pure storage"));
    }
}
