//! Compile-time unit safety for installed capacities, energy and money.
//!
//! Sizing a hybrid plant mixes three kinds of quantities that are all plain
//! `f64` in the cost model: installed power (kW), stored or generated energy
//! (kWh) and money (USD). Mixing them up is an easy mistake when reporting a
//! design, so the reporting side of the crate uses these newtypes.
//!
//! All types are `#[repr(transparent)]` over `f64`.
//!
//! # Usage
//!
//! ```
//! use hps_core::units::{Dollars, KilowattHours, Kilowatts};
//!
//! let biogas = Kilowatts(2000.0);
//! let backup: KilowattHours = biogas.over_hours(2.0);
//! assert_eq!(backup, KilowattHours(4000.0));
//!
//! let cost: Dollars = KilowattHours(1000.0).priced_at(0.105);
//! assert!((cost.value() - 105.0).abs() < 1e-9);
//!
//! // This would NOT compile - different units
//! // let wrong = biogas + backup;
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Macro to implement common arithmetic operations for unit types
macro_rules! impl_unit_ops {
    ($type:ty, $unit_name:literal) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $type {
            type Output = Self;
            fn neg(self) -> Self::Output {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Mul<$type> for f64 {
            type Output = $type;
            fn mul(self, rhs: $type) -> Self::Output {
                <$type>::new(self * rhs.0)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl Div<$type> for $type {
            type Output = f64;
            fn div(self, rhs: $type) -> Self::Output {
                self.0 / rhs.0
            }
        }

        impl std::fmt::Display for $type {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{:.2} {}", self.0, $unit_name)
            }
        }

        impl $type {
            /// Create a new value
            #[inline]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            /// Get the raw numeric value
            #[inline]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Check if value is finite
            #[inline]
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// Minimum of two values
            #[inline]
            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            /// Maximum of two values
            #[inline]
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }

            /// Zero
            pub const ZERO: Self = Self(0.0);
        }

        impl std::iter::Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }

        impl<'a> std::iter::Sum<&'a $type> for $type {
            fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
                Self(iter.map(|x| x.0).sum())
            }
        }
    };
}

/// Installed power capacity in kilowatts (kW)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Kilowatts(pub f64);

impl_unit_ops!(Kilowatts, "kW");

/// Energy in kilowatt-hours (kWh)
///
/// Used both for storage capacity and for daily/annual energy flows.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct KilowattHours(pub f64);

impl_unit_ops!(KilowattHours, "kWh");

/// Money in US dollars
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Dollars(pub f64);

impl_unit_ops!(Dollars, "USD");

impl Kilowatts {
    /// Energy delivered when running at this power for `hours`
    #[inline]
    pub fn over_hours(self, hours: f64) -> KilowattHours {
        KilowattHours(self.0 * hours)
    }

    /// Capital cost at a per-kW unit price
    #[inline]
    pub fn priced_at(self, dollars_per_kw: f64) -> Dollars {
        Dollars(self.0 * dollars_per_kw)
    }
}

impl KilowattHours {
    /// Cost of this energy (or storage capacity) at a per-kWh unit price
    #[inline]
    pub fn priced_at(self, dollars_per_kwh: f64) -> Dollars {
        Dollars(self.0 * dollars_per_kwh)
    }

    /// Convert to gigawatt-hours for reporting
    #[inline]
    pub fn to_gwh(self) -> f64 {
        self.0 / 1_000_000.0
    }
}

impl Dollars {
    /// Convert to millions of dollars for reporting
    #[inline]
    pub fn to_millions(self) -> f64 {
        self.0 / 1_000_000.0
    }
}
