//! Running the optimizer on a sizing problem.

use super::objective::{ConstraintViolation, CostBreakdown};
use super::problem::SizingProblem;
use crate::gto::{solve_gto, GtoConfig, GtoError, GtoSolution, SolveStatus};
use hps_core::{DecisionVector, Severity, SystemDesign};
use serde::Serialize;
use tracing::warn;

/// What the run produced, with the final design re-evaluated.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SizingOutcome {
    Feasible {
        design: SystemDesign,
        costs: CostBreakdown,
    },
    /// The silverback is still reported so the caller can see how close it got
    NoFeasibleDesign {
        closest: SystemDesign,
        violations: Vec<ConstraintViolation>,
    },
}

/// Sizing outcome plus the optimizer diagnostics behind it.
#[derive(Debug, Clone, Serialize)]
pub struct SizingResult {
    pub outcome: SizingOutcome,
    pub solution: GtoSolution,
}

impl SizingResult {
    pub fn is_feasible(&self) -> bool {
        matches!(self.outcome, SizingOutcome::Feasible { .. })
    }

    /// Best decision vector found, feasible or not.
    pub fn design(&self) -> SystemDesign {
        match &self.outcome {
            SizingOutcome::Feasible { design, .. } => *design,
            SizingOutcome::NoFeasibleDesign { closest, .. } => *closest,
        }
    }

    /// Net present cost, `None` when no feasible design exists.
    pub fn npc(&self) -> Option<f64> {
        match &self.outcome {
            SizingOutcome::Feasible { costs, .. } => Some(costs.npc.value()),
            SizingOutcome::NoFeasibleDesign { .. } => None,
        }
    }
}

/// Minimize the net present cost of `problem` with the GTO.
pub fn size_system(problem: &SizingProblem, config: &GtoConfig) -> Result<SizingResult, GtoError> {
    for issue in &problem.diagnose().issues {
        match issue.severity {
            Severity::Warning => warn!("{}", issue),
            Severity::Error => warn!("{} (no feasible design is possible)", issue),
        }
    }

    let solution = solve_gto(problem, config)?;
    let design = match DecisionVector::try_from(solution.best_position()) {
        Ok(design) => design,
        Err(_) => unreachable!("sizing bounds always have four dimensions"),
    };
    let evaluation = problem.evaluate(&design);

    let outcome = match (solution.status(), evaluation.is_feasible()) {
        (SolveStatus::Feasible, true) => SizingOutcome::Feasible {
            design: design.to_design(),
            costs: *evaluation.breakdown(),
        },
        _ => SizingOutcome::NoFeasibleDesign {
            closest: design.to_design(),
            violations: evaluation.violations().to_vec(),
        },
    };

    Ok(SizingResult { outcome, solution })
}
