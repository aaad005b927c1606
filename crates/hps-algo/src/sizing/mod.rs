//! Hybrid power system sizing
//!
//! Cost model, problem definition and the optimizer entry point for a plant
//! made of a PV array, a battery bank, a biogas generator and a converter.
//!
//! ## Cost Model
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HYBRID PLANT NET PRESENT COST                                           │
//! │  ─────────────────────────────                                           │
//! │                                                                          │
//! │  Decide:   x = [pv_kw, batt_kwh, biogas_kw, converter_kw]  in [lb, ub]   │
//! │                                                                          │
//! │  CAPEX    = pv·c_pv + batt·c_batt + biogas·c_bio + conv·c_conv          │
//! │  gen/day  = pv·yield_pv + biogas·yield_bio                              │
//! │  shortage = max(0, demand - gen/day)                                    │
//! │  NPC      = CAPEX + shortage·grid_price·365·years                       │
//! │                                                                          │
//! │  Subject to (death penalty, fitness = 999 999 999 999):                  │
//! │    • batt + biogas·backup_hours ≥ peak·blackout_hours                   │
//! │    • conv ≥ peak                                                        │
//! │    • biogas ≥ biogas floor                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The thresholds of the three constraints are scenario parameters in
//! [`SizingParams`], not fixed physics.

mod objective;
mod problem;
mod result;

pub use objective::{ConstraintViolation, CostBreakdown, Evaluation, HybridObjective, DAYS_PER_YEAR};
pub use problem::{SizingError, SizingParams, SizingProblem, DEFAULT_LOWER, DEFAULT_UPPER};
pub use result::{size_system, SizingOutcome, SizingResult};
