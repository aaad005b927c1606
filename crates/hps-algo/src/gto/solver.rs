//! GTO epoch loop
//!
//! A run is single-shot: [`GtoRun::new`] builds and evaluates generation 0,
//! each [`GtoRun::step`] performs one epoch, and [`GtoRun::finish`] hands back
//! the [`GtoSolution`].
//!
//! One epoch is synchronous. All proposals are generated first, in candidate
//! order, from the single injected RNG and against the troop as it stood at
//! the start of the epoch. Only then are they evaluated (optionally in
//! parallel) and accepted in order. Serial and parallel runs with the same
//! seed are therefore bit-identical.

use super::operators::{self, Coefficients, MoveContext};
use super::population::{evaluate_positions, Acceptance, Candidate, Population, Silverback};
use super::solution::{GtoSolution, MoveCounts, SolveStatus};
use super::objective::Objective;
use hps_core::{Bounds, HpsError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Smallest troop for which "two other candidates" always exists.
pub const MIN_POPULATION: usize = 3;

/// Probability of choosing exploration, decaying linearly over the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationSchedule {
    /// Probability at the start of the run
    pub start: f64,
    /// Probability in the final epoch
    pub end: f64,
}

impl Default for ExplorationSchedule {
    fn default() -> Self {
        Self {
            start: 0.9,
            end: 0.1,
        }
    }
}

impl ExplorationSchedule {
    /// Exploration probability at `progress = t / T`.
    pub fn probability(&self, progress: f64) -> f64 {
        let progress = progress.clamp(0.0, 1.0);
        self.start + (self.end - self.start) * progress
    }
}

/// How out-of-bounds components are brought back inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Saturate at the violated bound
    #[default]
    Clamp,
    /// Mirror back across the violated bound
    Reflect,
}

impl BoundaryPolicy {
    pub fn repair(self, bounds: &Bounds, position: &mut [f64]) {
        match self {
            BoundaryPolicy::Clamp => bounds.clamp(position),
            BoundaryPolicy::Reflect => bounds.reflect(position),
        }
    }
}

/// GTO configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GtoConfig {
    /// Troop size
    pub population_size: usize,
    /// Epoch budget
    pub epochs: usize,
    /// Probability of a random relocation inside exploration
    pub p1: f64,
    /// Threshold on the adaptive coefficient `a` for following the silverback
    pub p2: f64,
    /// Competition impact
    pub beta: f64,
    pub exploration: ExplorationSchedule,
    pub boundary: BoundaryPolicy,
    pub acceptance: Acceptance,
    /// Stop after this many epochs without silverback improvement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stall_epochs: Option<usize>,
    /// RNG seed; entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Evaluate an epoch's proposals on the rayon pool
    pub parallel: bool,
}

impl Default for GtoConfig {
    fn default() -> Self {
        Self {
            population_size: 80,
            epochs: 150,
            p1: 0.03,
            p2: 0.8,
            beta: 3.0,
            exploration: ExplorationSchedule::default(),
            boundary: BoundaryPolicy::default(),
            acceptance: Acceptance::default(),
            stall_epochs: None,
            seed: None,
            parallel: cfg!(feature = "parallel"),
        }
    }
}

impl GtoConfig {
    pub fn validate(&self) -> Result<(), GtoError> {
        if self.population_size < MIN_POPULATION {
            return Err(GtoError::PopulationTooSmall {
                size: self.population_size,
                minimum: MIN_POPULATION,
            });
        }
        if self.epochs == 0 {
            return Err(GtoError::ZeroEpochs);
        }
        check_probability("p1", self.p1)?;
        check_probability("exploration.start", self.exploration.start)?;
        check_probability("exploration.end", self.exploration.end)?;
        if self.exploration.end >= self.exploration.start {
            return Err(GtoError::FlatOrRisingExploration {
                start: self.exploration.start,
                end: self.exploration.end,
            });
        }
        if !(self.p2.is_finite() && self.p2 >= 0.0) {
            return Err(GtoError::InvalidThreshold(self.p2));
        }
        if !(self.beta.is_finite() && self.beta > 0.0) {
            return Err(GtoError::InvalidBeta(self.beta));
        }
        if self.stall_epochs == Some(0) {
            return Err(GtoError::ZeroStallEpochs);
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), GtoError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GtoError::ProbabilityOutOfRange { name, value })
    }
}

/// GTO configuration errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GtoError {
    #[error("population size {size} is below the minimum of {minimum}")]
    PopulationTooSmall { size: usize, minimum: usize },
    #[error("epoch budget must be at least 1")]
    ZeroEpochs,
    #[error("{name} must be a probability in [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[error("exploration probability must decrease over the run: start {start}, end {end}")]
    FlatOrRisingExploration { start: f64, end: f64 },
    #[error("p2 must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),
    #[error("beta must be finite and positive, got {0}")]
    InvalidBeta(f64),
    #[error("stall_epochs must be at least 1 when set")]
    ZeroStallEpochs,
}

impl From<GtoError> for HpsError {
    fn from(err: GtoError) -> Self {
        HpsError::Config(err.to_string())
    }
}

/// In-progress optimization run.
pub struct GtoRun<'a, O, R> {
    objective: &'a O,
    config: GtoConfig,
    rng: R,
    population: Population,
    silverback: Silverback,
    epoch: usize,
    history: Vec<f64>,
    evaluations: usize,
    moves: MoveCounts,
    initial_best_fitness: f64,
    epochs_since_improvement: usize,
    stopped_early: bool,
    started: Instant,
}

impl<'a, O, R> GtoRun<'a, O, R>
where
    O: Objective,
    R: Rng,
{
    /// Validate `config`, then draw and evaluate generation 0.
    pub fn new(objective: &'a O, config: GtoConfig, mut rng: R) -> Result<Self, GtoError> {
        config.validate()?;
        let started = Instant::now();

        info!(
            population = config.population_size,
            epochs = config.epochs,
            dimensions = objective.bounds().dimensions(),
            parallel = config.parallel,
            "starting GTO run"
        );

        let population = Population::random(objective, config.population_size, &mut rng, config.parallel);
        // population_size >= MIN_POPULATION, so there is always a best
        let leader = population
            .best()
            .cloned()
            .unwrap_or_else(|| Candidate::new(objective.bounds().lower().to_vec(), f64::NAN));
        let initial_best_fitness = leader.fitness();
        debug!(
            fitness = initial_best_fitness,
            feasible = population.feasible_count(),
            "generation 0 evaluated"
        );

        Ok(Self {
            objective,
            evaluations: population.len(),
            population,
            silverback: Silverback::new(leader, 0),
            config,
            rng,
            epoch: 0,
            history: Vec::new(),
            moves: MoveCounts::default(),
            initial_best_fitness,
            epochs_since_improvement: 0,
            stopped_early: false,
            started,
        })
    }

    /// Completed epochs
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn is_terminated(&self) -> bool {
        self.stopped_early || self.epoch >= self.config.epochs
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn silverback(&self) -> &Silverback {
        &self.silverback
    }

    pub fn config(&self) -> &GtoConfig {
        &self.config
    }

    /// Run one epoch. Returns `false` once the run has terminated.
    pub fn step(&mut self) -> bool {
        if self.is_terminated() {
            return false;
        }

        let t = self.epoch + 1;
        let progress = t as f64 / self.config.epochs as f64;
        let coefficients = Coefficients::draw(progress, &mut self.rng);
        let explore_probability = self.config.exploration.probability(progress);
        let bounds = self.objective.bounds();
        let mean = self.population.mean_position();

        let ctx = MoveContext {
            population: &self.population,
            silverback: self.silverback.position(),
            mean: &mean,
            bounds,
            coefficients,
            p1: self.config.p1,
            p2: self.config.p2,
            beta: self.config.beta,
        };

        let size = self.population.len();
        let mut proposals = Vec::with_capacity(size);
        let mut kinds = Vec::with_capacity(size);
        for i in 0..size {
            let (mut position, kind) = if self.rng.gen::<f64>() < explore_probability {
                operators::explore(&ctx, i, &mut self.rng)
            } else {
                operators::exploit(&ctx, i, &mut self.rng)
            };
            self.config.boundary.repair(bounds, &mut position);
            proposals.push(position);
            kinds.push(kind);
        }

        let fitness = evaluate_positions(self.objective, &proposals, self.config.parallel);
        self.evaluations += size;

        let explored = kinds.iter().filter(|kind| kind.is_exploration()).count();
        let mut accepted = 0;
        for (i, ((position, fitness), kind)) in proposals.into_iter().zip(fitness).zip(kinds).enumerate() {
            self.moves.record(kind);
            if self
                .population
                .offer(i, Candidate::new(position, fitness), self.config.acceptance)
            {
                accepted += 1;
            }
        }

        let improved = match self.population.best() {
            Some(best) => self.silverback.challenge(best, t),
            None => false,
        };
        if improved {
            self.epochs_since_improvement = 0;
        } else {
            self.epochs_since_improvement += 1;
        }

        self.epoch = t;
        self.history.push(self.silverback.fitness());

        debug!(
            epoch = t,
            fitness = self.silverback.fitness(),
            a = coefficients.a,
            explore_probability,
            exploration_ratio = explored as f64 / size as f64,
            accepted,
            "epoch complete"
        );

        if let Some(limit) = self.config.stall_epochs {
            if self.epochs_since_improvement >= limit && self.epoch < self.config.epochs {
                debug!(epoch = t, limit, "stopping: silverback stalled");
                self.stopped_early = true;
            }
        }

        true
    }

    /// Run the remaining epochs and return the result.
    pub fn run(mut self) -> GtoSolution {
        while self.step() {}
        self.finish()
    }

    /// Stop here and return the result.
    pub fn finish(self) -> GtoSolution {
        let status = if self.silverback.candidate().is_feasible() {
            SolveStatus::Feasible
        } else {
            SolveStatus::NoFeasibleDesign
        };

        let solution = GtoSolution {
            best_position: self.silverback.position().to_vec(),
            best_fitness: self.silverback.fitness(),
            status,
            initial_best_fitness: self.initial_best_fitness,
            history: self.history,
            epochs_run: self.epoch,
            evaluations: self.evaluations,
            moves: self.moves,
            stopped_early: self.stopped_early,
            solve_time: self.started.elapsed(),
        };

        match status {
            SolveStatus::Feasible => info!("{}", solution.summary()),
            SolveStatus::NoFeasibleDesign => warn!(
                epochs = solution.epochs_run,
                "no feasible design found within the bounds and epoch budget"
            ),
        }

        solution
    }
}

/// Minimize `objective`, seeding from `config.seed` or from entropy.
pub fn solve_gto<O: Objective>(objective: &O, config: &GtoConfig) -> Result<GtoSolution, GtoError> {
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    solve_gto_with_rng(objective, config, rng)
}

/// Minimize `objective` with an explicit random source.
pub fn solve_gto_with_rng<O, R>(objective: &O, config: &GtoConfig, rng: R) -> Result<GtoSolution, GtoError>
where
    O: Objective,
    R: Rng,
{
    Ok(GtoRun::new(objective, config.clone(), rng)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GtoConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.population_size, 80);
        assert_eq!(config.epochs, 150);
    }

    #[test]
    fn test_validation_errors() {
        let cases = [
            (
                GtoConfig {
                    population_size: 2,
                    ..Default::default()
                },
                GtoError::PopulationTooSmall { size: 2, minimum: 3 },
            ),
            (
                GtoConfig {
                    epochs: 0,
                    ..Default::default()
                },
                GtoError::ZeroEpochs,
            ),
            (
                GtoConfig {
                    p1: 1.5,
                    ..Default::default()
                },
                GtoError::ProbabilityOutOfRange { name: "p1", value: 1.5 },
            ),
            (
                GtoConfig {
                    exploration: ExplorationSchedule { start: 0.2, end: 0.6 },
                    ..Default::default()
                },
                GtoError::FlatOrRisingExploration { start: 0.2, end: 0.6 },
            ),
            (
                GtoConfig {
                    exploration: ExplorationSchedule { start: 0.5, end: 0.5 },
                    ..Default::default()
                },
                GtoError::FlatOrRisingExploration { start: 0.5, end: 0.5 },
            ),
            (
                GtoConfig {
                    beta: 0.0,
                    ..Default::default()
                },
                GtoError::InvalidBeta(0.0),
            ),
            (
                GtoConfig {
                    stall_epochs: Some(0),
                    ..Default::default()
                },
                GtoError::ZeroStallEpochs,
            ),
        ];

        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn test_nan_p1_is_rejected() {
        let config = GtoConfig {
            p1: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GtoError::ProbabilityOutOfRange { name: "p1", .. })
        ));
    }

    #[test]
    fn test_schedule_decays_linearly() {
        let schedule = ExplorationSchedule::default();
        assert!((schedule.probability(0.0) - 0.9).abs() < 1e-12);
        assert!((schedule.probability(0.5) - 0.5).abs() < 1e-12);
        assert!((schedule.probability(1.0) - 0.1).abs() < 1e-12);
        assert!((schedule.probability(2.0) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_config_from_partial_toml() {
        let config: GtoConfig = toml::from_str(
            r#"
            epochs = 20
            boundary = "reflect"
            acceptance = "unconditional"

            [exploration]
            end = 0.0
            "#,
        )
        .unwrap();

        assert_eq!(config.epochs, 20);
        assert_eq!(config.population_size, 80);
        assert_eq!(config.boundary, BoundaryPolicy::Reflect);
        assert_eq!(config.acceptance, Acceptance::Unconditional);
        assert_eq!(config.exploration.start, 0.9);
        assert_eq!(config.exploration.end, 0.0);
        assert!(config.validate().is_ok());
    }
}
