//! # hps-algo: Hybrid Power System Sizing Algorithms
//!
//! - [`sizing`] - the net-present-cost model, its constraints and [`sizing::size_system`]
//! - [`gto`] - the Gorilla Troops Optimizer, usable on any [`gto::Objective`]
//! - [`analysis`] - LCOE, CO2 and battery-price sensitivity of a finished design
//!
//! ## Quick Start
//!
//! ```no_run
//! use hps_algo::gto::GtoConfig;
//! use hps_algo::sizing::{size_system, SizingProblem};
//!
//! let config = GtoConfig { seed: Some(42), ..Default::default() };
//! let result = size_system(&SizingProblem::default(), &config).unwrap();
//! println!("{:?}", result.npc());
//! ```

pub mod analysis;
pub mod gto;
pub mod sizing;

pub use gto::{solve_gto, GtoConfig, GtoError, GtoSolution, SolveStatus};
pub use sizing::{size_system, Evaluation, HybridObjective, SizingError, SizingParams, SizingProblem};
