//! Sizing problem definition
//!
//! Scenario parameters, decision bounds and their validation.

use super::objective::{Evaluation, HybridObjective};
use crate::gto::{Objective, INFEASIBLE_FITNESS};
use hps_core::{Bounds, BoundsError, DecisionVector, Diagnostics, Dimension, HpsError, DIMENSIONS};
use serde::{Deserialize, Serialize};

/// Scenario constants of the cost model.
///
/// Defaults describe a 450 MWh/day factory with a 35 MW peak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingParams {
    /// $/kW installed PV
    pub cost_solar_per_kw: f64,
    /// $/kWh of battery capacity
    pub cost_battery_per_kwh: f64,
    /// $/kW installed biogas generation
    pub cost_biogas_per_kw: f64,
    /// $/kW of converter rating
    pub cost_converter_per_kw: f64,
    /// $/kWh bought from the grid
    pub grid_price_per_kwh: f64,
    pub daily_demand_kwh: f64,
    pub peak_demand_kw: f64,
    /// kWh per installed PV kW per day (realistic average, not best case)
    pub solar_yield: f64,
    /// kWh per installed biogas kW per day
    pub biogas_yield: f64,
    /// Outage duration the backup must cover at peak demand
    pub blackout_hours: f64,
    /// Hours the biogas generator can run during an outage
    pub biogas_backup_hours: f64,
    /// Policy floor on biogas rating
    pub min_biogas_kw: f64,
    pub horizon_years: u32,
}

impl Default for SizingParams {
    fn default() -> Self {
        Self {
            cost_solar_per_kw: 900.0,
            cost_battery_per_kwh: 320.0,
            cost_biogas_per_kw: 1500.0,
            cost_converter_per_kw: 300.0,
            grid_price_per_kwh: 0.105,
            daily_demand_kwh: 450_000.0,
            peak_demand_kw: 35_000.0,
            solar_yield: 4.6,
            biogas_yield: 12.0,
            blackout_hours: 2.0,
            biogas_backup_hours: 2.0,
            min_biogas_kw: 2_000.0,
            horizon_years: 20,
        }
    }
}

/// Invalid sizing configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SizingError {
    #[error("{name} must not be negative, got {value}")]
    NegativeParameter { name: &'static str, value: f64 },
    #[error("{name} must be positive, got {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },
    #[error("{name} must be finite")]
    NonFiniteParameter { name: &'static str },
    #[error("horizon must be at least one year")]
    ZeroHorizon,
    #[error("expected {expected} decision bounds, found {found}")]
    WrongDimensions { expected: usize, found: usize },
    #[error("invalid bounds: {0}")]
    Bounds(#[from] BoundsError),
}

impl From<SizingError> for HpsError {
    fn from(err: SizingError) -> Self {
        HpsError::Config(err.to_string())
    }
}

impl SizingParams {
    pub fn validate(&self) -> Result<(), SizingError> {
        let non_negative = [
            ("cost_solar_per_kw", self.cost_solar_per_kw),
            ("cost_battery_per_kwh", self.cost_battery_per_kwh),
            ("cost_biogas_per_kw", self.cost_biogas_per_kw),
            ("cost_converter_per_kw", self.cost_converter_per_kw),
            ("grid_price_per_kwh", self.grid_price_per_kwh),
            ("blackout_hours", self.blackout_hours),
            ("biogas_backup_hours", self.biogas_backup_hours),
            ("min_biogas_kw", self.min_biogas_kw),
        ];
        let positive = [
            ("daily_demand_kwh", self.daily_demand_kwh),
            ("peak_demand_kw", self.peak_demand_kw),
            ("solar_yield", self.solar_yield),
            ("biogas_yield", self.biogas_yield),
        ];

        for (name, value) in non_negative.into_iter().chain(positive) {
            if !value.is_finite() {
                return Err(SizingError::NonFiniteParameter { name });
            }
        }
        for (name, value) in non_negative {
            if value < 0.0 {
                return Err(SizingError::NegativeParameter { name, value });
            }
        }
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(SizingError::NonPositiveParameter { name, value });
            }
        }
        if self.horizon_years == 0 {
            return Err(SizingError::ZeroHorizon);
        }
        Ok(())
    }

    /// Energy that must be available during a blackout at peak demand.
    pub fn required_backup_kwh(&self) -> f64 {
        self.peak_demand_kw * self.blackout_hours
    }
}

/// Lower bounds `[pv, battery, biogas, converter]` of the factory scenario.
pub const DEFAULT_LOWER: [f64; DIMENSIONS] = [0.0, 0.0, 2_000.0, 35_000.0];
/// Upper bounds `[pv, battery, biogas, converter]` of the factory scenario.
pub const DEFAULT_UPPER: [f64; DIMENSIONS] = [150_000.0, 300_000.0, 15_000.0, 100_000.0];

/// Validated cost model plus the box it is minimized over.
#[derive(Debug, Clone)]
pub struct SizingProblem {
    objective: HybridObjective,
    bounds: Bounds,
}

impl SizingProblem {
    pub fn new(params: SizingParams, bounds: Bounds) -> Result<Self, SizingError> {
        params.validate()?;
        if bounds.dimensions() != DIMENSIONS {
            return Err(SizingError::WrongDimensions {
                expected: DIMENSIONS,
                found: bounds.dimensions(),
            });
        }
        Ok(Self {
            objective: HybridObjective::new(params),
            bounds,
        })
    }

    /// Factory scenario bounds.
    pub fn default_bounds() -> Bounds {
        Bounds::new(DEFAULT_LOWER.to_vec(), DEFAULT_UPPER.to_vec())
            .unwrap_or_else(|_| unreachable!("default bounds are ordered and finite"))
    }

    pub fn params(&self) -> &SizingParams {
        self.objective.params()
    }

    pub fn objective(&self) -> &HybridObjective {
        &self.objective
    }

    pub fn evaluate(&self, design: &DecisionVector) -> Evaluation {
        self.objective.evaluate(design)
    }

    /// Check the search box against the constraints before running.
    ///
    /// Warnings mark regions that can never be feasible; errors mean no point
    /// of the box is feasible.
    pub fn diagnose(&self) -> Diagnostics {
        let mut diag = Diagnostics::new();
        let p = self.params();
        let lower = self.bounds.lower();
        let upper = self.bounds.upper();
        let biogas = Dimension::Biogas.index();
        let converter = Dimension::Converter.index();
        let battery = Dimension::Battery.index();

        if lower[biogas] < p.min_biogas_kw {
            diag.add_warning_with_entity(
                "bounds",
                &format!(
                    "lower bound {:.0} kW is below the {:.0} kW biogas floor",
                    lower[biogas], p.min_biogas_kw
                ),
                Dimension::Biogas.label(),
            );
        }
        if lower[converter] < p.peak_demand_kw {
            diag.add_warning_with_entity(
                "bounds",
                &format!(
                    "lower bound {:.0} kW is below the {:.0} kW peak demand",
                    lower[converter], p.peak_demand_kw
                ),
                Dimension::Converter.label(),
            );
        }

        if upper[converter] < p.peak_demand_kw {
            diag.add_error_with_entity(
                "feasibility",
                &format!(
                    "upper bound {:.0} kW can never carry the {:.0} kW peak demand",
                    upper[converter], p.peak_demand_kw
                ),
                Dimension::Converter.label(),
            );
        }
        if upper[biogas] < p.min_biogas_kw {
            diag.add_error_with_entity(
                "feasibility",
                &format!(
                    "upper bound {:.0} kW never reaches the {:.0} kW biogas floor",
                    upper[biogas], p.min_biogas_kw
                ),
                Dimension::Biogas.label(),
            );
        }
        let max_backup = upper[battery] + upper[biogas] * p.biogas_backup_hours;
        if max_backup < p.required_backup_kwh() {
            diag.add_error(
                "feasibility",
                &format!(
                    "largest possible backup {:.0} kWh is below the required {:.0} kWh",
                    max_backup,
                    p.required_backup_kwh()
                ),
            );
        }

        diag
    }
}

impl Default for SizingProblem {
    fn default() -> Self {
        Self {
            objective: HybridObjective::default(),
            bounds: Self::default_bounds(),
        }
    }
}

impl Objective for SizingProblem {
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn fitness(&self, position: &[f64]) -> f64 {
        match DecisionVector::try_from(position) {
            Ok(design) => self.objective.fitness(&design),
            Err(_) => INFEASIBLE_FITNESS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(SizingParams::default().validate().is_ok());
        let problem = SizingProblem::default();
        assert_eq!(problem.bounds().lower(), &DEFAULT_LOWER);
        assert!(!problem.diagnose().has_issues());
    }

    #[test]
    fn test_negative_cost_rejected() {
        let params = SizingParams {
            cost_battery_per_kwh: -1.0,
            ..Default::default()
        };
        assert_eq!(
            SizingProblem::new(params, SizingProblem::default_bounds()).unwrap_err(),
            SizingError::NegativeParameter {
                name: "cost_battery_per_kwh",
                value: -1.0
            }
        );
    }

    #[test]
    fn test_degenerate_params_rejected() {
        let zero_demand = SizingParams {
            daily_demand_kwh: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            zero_demand.validate(),
            Err(SizingError::NonPositiveParameter { name: "daily_demand_kwh", .. })
        ));

        let nan_price = SizingParams {
            grid_price_per_kwh: f64::NAN,
            ..Default::default()
        };
        assert_eq!(
            nan_price.validate(),
            Err(SizingError::NonFiniteParameter { name: "grid_price_per_kwh" })
        );

        let no_horizon = SizingParams {
            horizon_years: 0,
            ..Default::default()
        };
        assert_eq!(no_horizon.validate(), Err(SizingError::ZeroHorizon));
    }

    #[test]
    fn test_wrong_dimensions_rejected() {
        let bounds = Bounds::new(vec![0.0; 3], vec![1.0; 3]).unwrap();
        assert_eq!(
            SizingProblem::new(SizingParams::default(), bounds).unwrap_err(),
            SizingError::WrongDimensions {
                expected: 4,
                found: 3
            }
        );
    }

    #[test]
    fn test_diagnose_warns_on_wasted_region() {
        let bounds = Bounds::new(vec![0.0, 0.0, 0.0, 0.0], DEFAULT_UPPER.to_vec()).unwrap();
        let problem = SizingProblem::new(SizingParams::default(), bounds).unwrap();
        let diag = problem.diagnose();
        assert_eq!(diag.warning_count(), 2);
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_diagnose_errors_on_infeasible_box() {
        let bounds = Bounds::new(
            vec![0.0, 0.0, 0.0, 0.0],
            vec![150_000.0, 10_000.0, 1_000.0, 20_000.0],
        )
        .unwrap();
        let problem = SizingProblem::new(SizingParams::default(), bounds).unwrap();
        let diag = problem.diagnose();
        // converter ceiling, biogas ceiling, backup ceiling
        assert_eq!(diag.error_count(), 3);
        assert!(diag.errors().all(|issue| issue.category == "feasibility"));
    }

    #[test]
    fn test_objective_rejects_wrong_length() {
        let problem = SizingProblem::default();
        assert_eq!(problem.fitness(&[1.0, 2.0]), INFEASIBLE_FITNESS);
    }

    #[test]
    fn test_params_from_partial_toml() {
        let params: SizingParams = toml::from_str("grid_price_per_kwh = 0.12\nhorizon_years = 25").unwrap();
        assert_eq!(params.grid_price_per_kwh, 0.12);
        assert_eq!(params.horizon_years, 25);
        assert_eq!(params.peak_demand_kw, 35_000.0);
    }
}
