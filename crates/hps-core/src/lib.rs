//! # hps-core: Hybrid Power System Sizing Core
//!
//! Shared vocabulary for sizing a hybrid photovoltaic / battery / biogas /
//! converter installation.
//!
//! ## Core Data Structures
//!
//! - [`Bounds`] - validated per-dimension box constraints of a search space
//! - [`DecisionVector`] - the four sizing decisions `[pv_kw, batt_kwh, biogas_kw, converter_kw]`
//! - [`SystemDesign`] - the same decisions with units attached, for reporting
//! - [`units`] - `Kilowatts`, `KilowattHours` and `Dollars` newtypes
//!
//! ## Modules
//!
//! - [`diagnostics`] - issue collection for pre-run problem checks
//! - [`error`] - [`HpsError`] and the [`HpsResult`] alias
//!
//! ## Quick Start
//!
//! ```
//! use hps_core::{Bounds, DecisionVector, Dimension};
//!
//! let bounds = Bounds::new(
//!     vec![0.0, 0.0, 2_000.0, 35_000.0],
//!     vec![150_000.0, 300_000.0, 15_000.0, 100_000.0],
//! )
//! .unwrap();
//!
//! let design = DecisionVector::new(80_000.0, 70_000.0, 2_000.0, 35_000.0);
//! assert!(bounds.contains(design.as_slice()));
//! assert_eq!(design.get(Dimension::Biogas), 2_000.0);
//! ```

pub mod bounds;
pub mod design;
pub mod diagnostics;
pub mod error;
pub mod units;

pub use bounds::{Bounds, BoundsError};
pub use design::{DecisionVector, Dimension, SystemDesign, WrongDimensions, DIMENSIONS};
pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{HpsError, HpsResult};
pub use units::{Dollars, KilowattHours, Kilowatts};
