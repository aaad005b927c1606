//! GTO run results
//!
//! Read-only view of the silverback at termination plus run diagnostics.

use super::operators::Move;
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Terminal outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// The silverback satisfies every constraint
    Feasible,
    /// Every position visited carried the infeasible sentinel
    NoFeasibleDesign,
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolveStatus::Feasible => write!(f, "feasible"),
            SolveStatus::NoFeasibleDesign => write!(f, "no feasible design found"),
        }
    }
}

/// How many times each operator was applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MoveCounts {
    pub relocate: usize,
    pub migrate: usize,
    pub interpolate: usize,
    pub follow_silverback: usize,
    pub compete: usize,
}

impl MoveCounts {
    pub fn record(&mut self, kind: Move) {
        match kind {
            Move::Relocate => self.relocate += 1,
            Move::Migrate => self.migrate += 1,
            Move::Interpolate => self.interpolate += 1,
            Move::FollowSilverback => self.follow_silverback += 1,
            Move::Compete => self.compete += 1,
        }
    }

    pub fn exploration(&self) -> usize {
        self.relocate + self.migrate + self.interpolate
    }

    pub fn exploitation(&self) -> usize {
        self.follow_silverback + self.compete
    }

    pub fn total(&self) -> usize {
        self.exploration() + self.exploitation()
    }
}

/// Complete result of a GTO run
#[derive(Debug, Clone, Serialize)]
pub struct GtoSolution {
    pub(crate) best_position: Vec<f64>,
    pub(crate) best_fitness: f64,
    pub(crate) status: SolveStatus,
    pub(crate) initial_best_fitness: f64,
    pub(crate) history: Vec<f64>,
    pub(crate) epochs_run: usize,
    pub(crate) evaluations: usize,
    pub(crate) moves: MoveCounts,
    pub(crate) stopped_early: bool,
    #[serde(rename = "solve_time_secs", serialize_with = "duration_secs")]
    pub(crate) solve_time: Duration,
}

fn duration_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl GtoSolution {
    /// Silverback position at termination
    pub fn best_position(&self) -> &[f64] {
        &self.best_position
    }

    /// Silverback fitness; the infeasible sentinel when nothing feasible was found
    pub fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn is_feasible(&self) -> bool {
        self.status == SolveStatus::Feasible
    }

    /// Best fitness of the generation-0 population
    pub fn initial_best_fitness(&self) -> f64 {
        self.initial_best_fitness
    }

    /// Silverback fitness after each epoch
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    pub fn epochs_run(&self) -> usize {
        self.epochs_run
    }

    /// Objective calls, generation 0 included
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn moves(&self) -> &MoveCounts {
        &self.moves
    }

    /// Whether the stall criterion ended the run before the epoch budget
    pub fn stopped_early(&self) -> bool {
        self.stopped_early
    }

    pub fn solve_time(&self) -> Duration {
        self.solve_time
    }

    /// Relative improvement of the silverback over the generation-0 best.
    ///
    /// `None` when generation 0 had no feasible candidate.
    pub fn improvement(&self) -> Option<f64> {
        if self.initial_best_fitness.is_finite()
            && self.initial_best_fitness < super::INFEASIBLE_FITNESS
            && self.initial_best_fitness != 0.0
        {
            Some((self.initial_best_fitness - self.best_fitness) / self.initial_best_fitness.abs())
        } else {
            None
        }
    }

    /// Single-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{}: fitness {:.4e} after {} epochs ({} evaluations, {:.1}% exploration) in {:.2?}",
            self.status,
            self.best_fitness,
            self.epochs_run,
            self.evaluations,
            100.0 * self.moves.exploration() as f64 / self.moves.total().max(1) as f64,
            self.solve_time
        )
    }
}
