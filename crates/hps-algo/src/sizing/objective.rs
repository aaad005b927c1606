//! Hybrid plant cost model with hard constraints.

use super::problem::SizingParams;
use crate::gto::INFEASIBLE_FITNESS;
use hps_core::{DecisionVector, Dollars, KilowattHours, Kilowatts};
use serde::Serialize;

/// Days per year used to annualize daily energy balances.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Every intermediate quantity of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub pv_capex: Dollars,
    pub battery_capex: Dollars,
    pub biogas_capex: Dollars,
    pub converter_capex: Dollars,
    pub capex: Dollars,
    /// Daily solar generation
    pub solar_generation: KilowattHours,
    /// Daily biogas generation
    pub biogas_generation: KilowattHours,
    pub total_generation: KilowattHours,
    /// Daily demand not covered on site, bought from the grid
    pub shortage: KilowattHours,
    pub daily_grid_cost: Dollars,
    pub lifetime_grid_cost: Dollars,
    /// Net present cost over the horizon (undiscounted)
    pub npc: Dollars,
    /// Energy the battery and biogas generator can supply during an outage
    pub backup_capacity: KilowattHours,
    pub required_backup: KilowattHours,
}

/// A hard constraint a design fails.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintViolation {
    /// Battery plus biogas backup cannot carry peak load through a blackout
    InsufficientBackup { available_kwh: f64, required_kwh: f64 },
    /// Converter rating below peak demand
    UndersizedConverter { converter_kw: f64, peak_kw: f64 },
    /// Biogas rating below the hybrid policy floor
    BiogasBelowFloor { biogas_kw: f64, floor_kw: f64 },
    /// Cost accumulation overflowed or produced NaN
    NonFiniteCost,
    /// Finite cost at or above the fitness assigned to infeasible designs
    CostExceedsCeiling { npc: f64 },
}

impl std::fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintViolation::InsufficientBackup {
                available_kwh,
                required_kwh,
            } => write!(
                f,
                "backup capacity {:.0} kWh is below the required {:.0} kWh",
                available_kwh, required_kwh
            ),
            ConstraintViolation::UndersizedConverter {
                converter_kw,
                peak_kw,
            } => write!(
                f,
                "converter {:.0} kW cannot carry peak demand of {:.0} kW",
                converter_kw, peak_kw
            ),
            ConstraintViolation::BiogasBelowFloor {
                biogas_kw,
                floor_kw,
            } => write!(
                f,
                "biogas {:.0} kW is below the minimum of {:.0} kW",
                biogas_kw, floor_kw
            ),
            ConstraintViolation::NonFiniteCost => write!(f, "net present cost is not finite"),
            ConstraintViolation::CostExceedsCeiling { npc } => write!(
                f,
                "net present cost {:.0} reaches the ceiling of {:.0}",
                npc, INFEASIBLE_FITNESS
            ),
        }
    }
}

/// Tagged result of evaluating a design.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Evaluation {
    Feasible(CostBreakdown),
    Infeasible {
        violations: Vec<ConstraintViolation>,
        breakdown: CostBreakdown,
    },
}

impl Evaluation {
    /// NPC for a feasible design, the infeasible sentinel otherwise.
    pub fn fitness(&self) -> f64 {
        match self {
            Evaluation::Feasible(breakdown) => breakdown.npc.value(),
            Evaluation::Infeasible { .. } => INFEASIBLE_FITNESS,
        }
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self, Evaluation::Feasible(_))
    }

    /// Costs are computed even for infeasible designs.
    pub fn breakdown(&self) -> &CostBreakdown {
        match self {
            Evaluation::Feasible(breakdown) | Evaluation::Infeasible { breakdown, .. } => breakdown,
        }
    }

    pub fn violations(&self) -> &[ConstraintViolation] {
        match self {
            Evaluation::Feasible(_) => &[],
            Evaluation::Infeasible { violations, .. } => violations,
        }
    }
}

/// Pure cost model of a PV / battery / biogas / converter plant.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridObjective {
    params: SizingParams,
}

impl HybridObjective {
    pub fn new(params: SizingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SizingParams {
        &self.params
    }

    /// Cost first, then every constraint; any violation makes the design infeasible.
    pub fn evaluate(&self, design: &DecisionVector) -> Evaluation {
        let breakdown = self.costs(design);
        let p = &self.params;

        let mut violations = Vec::new();
        if breakdown.backup_capacity < breakdown.required_backup {
            violations.push(ConstraintViolation::InsufficientBackup {
                available_kwh: breakdown.backup_capacity.value(),
                required_kwh: breakdown.required_backup.value(),
            });
        }
        if design.converter_kw() < p.peak_demand_kw {
            violations.push(ConstraintViolation::UndersizedConverter {
                converter_kw: design.converter_kw(),
                peak_kw: p.peak_demand_kw,
            });
        }
        if design.biogas_kw() < p.min_biogas_kw {
            violations.push(ConstraintViolation::BiogasBelowFloor {
                biogas_kw: design.biogas_kw(),
                floor_kw: p.min_biogas_kw,
            });
        }
        // Costs the optimizer cannot rank apart from infeasible designs
        if !breakdown.npc.is_finite() {
            violations.push(ConstraintViolation::NonFiniteCost);
        } else if breakdown.npc.value() >= INFEASIBLE_FITNESS {
            violations.push(ConstraintViolation::CostExceedsCeiling {
                npc: breakdown.npc.value(),
            });
        }

        if violations.is_empty() {
            Evaluation::Feasible(breakdown)
        } else {
            Evaluation::Infeasible {
                violations,
                breakdown,
            }
        }
    }

    /// Shorthand for `evaluate(design).fitness()`.
    pub fn fitness(&self, design: &DecisionVector) -> f64 {
        self.evaluate(design).fitness()
    }

    /// Net present cost of `design` with the battery priced at `battery_price`.
    pub fn npc_with_battery_price(&self, design: &DecisionVector, battery_price: f64) -> Dollars {
        let mut params = self.params.clone();
        params.cost_battery_per_kwh = battery_price;
        HybridObjective::new(params).costs(design).npc
    }

    fn costs(&self, design: &DecisionVector) -> CostBreakdown {
        let p = &self.params;
        let pv = Kilowatts(design.pv_kw());
        let battery = KilowattHours(design.battery_kwh());
        let biogas = Kilowatts(design.biogas_kw());
        let converter = Kilowatts(design.converter_kw());

        let pv_capex = pv.priced_at(p.cost_solar_per_kw);
        let battery_capex = battery.priced_at(p.cost_battery_per_kwh);
        let biogas_capex = biogas.priced_at(p.cost_biogas_per_kw);
        let converter_capex = converter.priced_at(p.cost_converter_per_kw);
        let capex = pv_capex + battery_capex + biogas_capex + converter_capex;

        // Yields are kWh per installed kW per day
        let solar_generation = pv.over_hours(p.solar_yield);
        let biogas_generation = biogas.over_hours(p.biogas_yield);
        let total_generation = solar_generation + biogas_generation;

        let shortage = (KilowattHours(p.daily_demand_kwh) - total_generation).max(KilowattHours::ZERO);
        let daily_grid_cost = shortage.priced_at(p.grid_price_per_kwh);
        let lifetime_grid_cost = daily_grid_cost * DAYS_PER_YEAR * f64::from(p.horizon_years);
        let npc = capex + lifetime_grid_cost;

        let backup_capacity = battery + biogas.over_hours(p.biogas_backup_hours);
        let required_backup = Kilowatts(p.peak_demand_kw).over_hours(p.blackout_hours);

        CostBreakdown {
            pv_capex,
            battery_capex,
            biogas_capex,
            converter_capex,
            capex,
            solar_generation,
            biogas_generation,
            total_generation,
            shortage,
            daily_grid_cost,
            lifetime_grid_cost,
            npc,
            backup_capacity,
            required_backup,
        }
    }
}

impl Default for HybridObjective {
    fn default() -> Self {
        Self::new(SizingParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_violations_reported() {
        let evaluation = HybridObjective::default().evaluate(&DecisionVector::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(evaluation.violations().len(), 3);
        assert_eq!(evaluation.fitness(), INFEASIBLE_FITNESS);
        // Cost is still available for reporting
        assert_eq!(evaluation.breakdown().capex, Dollars::ZERO);
    }

    #[test]
    fn test_backup_counts_biogas_runtime() {
        // 60_000 kWh battery + 5_000 kW * 2 h biogas = 70_000 kWh = 35_000 kW * 2 h
        let evaluation =
            HybridObjective::default().evaluate(&DecisionVector::new(50_000.0, 60_000.0, 5_000.0, 35_000.0));
        assert!(evaluation.is_feasible());
        assert_eq!(evaluation.breakdown().backup_capacity, KilowattHours(70_000.0));

        let short =
            HybridObjective::default().evaluate(&DecisionVector::new(50_000.0, 59_999.0, 5_000.0, 35_000.0));
        assert!(matches!(
            short.violations(),
            [ConstraintViolation::InsufficientBackup { .. }]
        ));
    }

    #[test]
    fn test_thresholds_follow_params() {
        let params = SizingParams {
            min_biogas_kw: 0.0,
            ..Default::default()
        };
        let evaluation =
            HybridObjective::new(params).evaluate(&DecisionVector::new(0.0, 70_000.0, 0.0, 35_000.0));
        assert!(evaluation.is_feasible());
    }

    #[test]
    fn test_battery_price_only_moves_battery_capex() {
        let objective = HybridObjective::default();
        let design = DecisionVector::new(80_000.0, 70_000.0, 2_000.0, 35_000.0);
        let base = objective.npc_with_battery_price(&design, 320.0);
        let dearer = objective.npc_with_battery_price(&design, 330.0);
        assert!(((dearer - base).value() - 700_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_cost_at_ceiling_is_infeasible() {
        let params = SizingParams {
            cost_solar_per_kw: 1e10,
            ..Default::default()
        };
        let evaluation =
            HybridObjective::new(params).evaluate(&DecisionVector::new(1_000.0, 70_000.0, 2_000.0, 35_000.0));

        assert!(!evaluation.is_feasible());
        assert_eq!(evaluation.fitness(), INFEASIBLE_FITNESS);
        assert!(matches!(
            evaluation.violations(),
            [ConstraintViolation::CostExceedsCeiling { npc }] if *npc >= INFEASIBLE_FITNESS
        ));
    }

    #[test]
    fn test_violation_display() {
        let violation = ConstraintViolation::UndersizedConverter {
            converter_kw: 30_000.0,
            peak_kw: 35_000.0,
        };
        assert_eq!(
            violation.to_string(),
            "converter 30000 kW cannot carry peak demand of 35000 kW"
        );
    }

    #[test]
    fn test_evaluation_serializes_with_status_tag() {
        let evaluation = HybridObjective::default().evaluate(&DecisionVector::new(0.0, 0.0, 0.0, 0.0));
        let json = serde_json::to_value(&evaluation).unwrap();
        assert_eq!(json["status"], "infeasible");
        assert_eq!(json["violations"][1]["kind"], "undersized_converter");
    }
}
