//! Gorilla Troops Optimizer (GTO)
//!
//! Population-based metaheuristic for box-bounded continuous minimization,
//! modeled on the social behavior of a gorilla troop led by a silverback.
//!
//! ## Algorithm Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GORILLA TROOPS OPTIMIZER                                                │
//! │  ────────────────────────                                                │
//! │                                                                          │
//! │  Generation 0:                                                           │
//! │    • N positions drawn uniformly inside [lb, ub]                        │
//! │    • Silverback = best of generation 0                                  │
//! │                                                                          │
//! │  Each epoch t = 1..T:                                                    │
//! │    a = (cos(2r) + 1)(1 - t/T)        c = a(2r - 1)                       │
//! │    For every gorilla i, with probability p_explore(t):                  │
//! │      EXPLORATION                                                         │
//! │        r < p1      relocate to a random point                           │
//! │        r ≥ 0.5     (r - a)·X_j + c·z⊙X_i           z ~ U(-a, a)          │
//! │        otherwise   X_i - c(c·X_i - X_j) + r(X_i - X_k)                   │
//! │    otherwise:                                                            │
//! │      EXPLOITATION                                                        │
//! │        a ≥ p2      c·M⊙(X_i - X_sb) + X_i      M = (|mean X|^g)^(1/g)    │
//! │        otherwise   X_sb - (2r - 1)(X_sb - X_i)·β·h      h ~ N(0, 1)      │
//! │    Repair bounds → evaluate → accept → challenge the silverback         │
//! │                                                                          │
//! │  Result: silverback position and fitness                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `p_explore` decays linearly over the run (see [`ExplorationSchedule`]),
//! trading early diversification for late refinement.
//!
//! ## Invariants
//!
//! - Every stored position lies inside the objective's bounds after each epoch.
//! - The silverback is replaced only by a strictly better candidate, so its
//!   fitness never increases.
//! - All randomness comes from the RNG handed to [`GtoRun::new`]; with a fixed
//!   seed, serial and parallel evaluation produce the same run.
//!
//! ## Example
//!
//! ```
//! use hps_algo::gto::{solve_gto, FnObjective, GtoConfig};
//! use hps_core::Bounds;
//!
//! let sphere = FnObjective::new(
//!     Bounds::new(vec![-10.0; 3], vec![10.0; 3]).unwrap(),
//!     |x: &[f64]| x.iter().map(|v| v * v).sum(),
//! );
//! let config = GtoConfig {
//!     population_size: 20,
//!     epochs: 50,
//!     seed: Some(7),
//!     ..Default::default()
//! };
//!
//! let solution = solve_gto(&sphere, &config).unwrap();
//! assert!(solution.best_fitness() < solution.initial_best_fitness());
//! ```
//!
//! ## References
//!
//! - **Abdollahzadeh, Soleimanian Gharehchopogh & Mirjalili (2021)**:
//!   "Artificial gorilla troops optimizer: A new nature-inspired metaheuristic
//!   algorithm for global optimization problems"

mod objective;
mod operators;
mod population;
mod solution;
mod solver;

pub use objective::{is_feasible_fitness, sanitize_fitness, FnObjective, Objective, INFEASIBLE_FITNESS};
pub use operators::{Coefficients, Move};
pub use population::{Acceptance, Candidate, Population, Silverback};
pub use solution::{GtoSolution, MoveCounts, SolveStatus};
pub use solver::{
    solve_gto, solve_gto_with_rng, BoundaryPolicy, ExplorationSchedule, GtoConfig, GtoError, GtoRun,
    MIN_POPULATION,
};
