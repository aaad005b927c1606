//! Per-dimension box constraints of a continuous search space.
//!
//! [`Bounds`] is immutable once constructed: `lower[i] <= upper[i]` holds for
//! every dimension, every value is finite and so is twice every width. Deserialization goes through the
//! same validation as [`Bounds::new`], so a configuration file cannot smuggle in
//! inverted bounds.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Reasons a pair of bound vectors is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoundsError {
    #[error("bounds must have at least one dimension")]
    Empty,
    #[error("lower has {lower} dimensions but upper has {upper}")]
    LengthMismatch { lower: usize, upper: usize },
    #[error("dimension {dimension}: lower bound {lower} is greater than upper bound {upper}")]
    Inverted {
        dimension: usize,
        lower: f64,
        upper: f64,
    },
    #[error("dimension {dimension}: bounds must be finite")]
    NonFinite { dimension: usize },
    #[error("dimension {dimension}: width of [{lower}, {upper}] is not representable")]
    WidthOverflow {
        dimension: usize,
        lower: f64,
        upper: f64,
    },
}

/// Closed interval `[lower[i], upper[i]]` for every dimension `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds", into = "RawBounds")]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawBounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl TryFrom<RawBounds> for Bounds {
    type Error = BoundsError;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        Bounds::new(raw.lower, raw.upper)
    }
}

impl From<Bounds> for RawBounds {
    fn from(bounds: Bounds) -> Self {
        RawBounds {
            lower: bounds.lower,
            upper: bounds.upper,
        }
    }
}

impl Bounds {
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, BoundsError> {
        if lower.is_empty() && upper.is_empty() {
            return Err(BoundsError::Empty);
        }
        if lower.len() != upper.len() {
            return Err(BoundsError::LengthMismatch {
                lower: lower.len(),
                upper: upper.len(),
            });
        }
        for (dimension, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(BoundsError::NonFinite { dimension });
            }
            if lo > hi {
                return Err(BoundsError::Inverted {
                    dimension,
                    lower: lo,
                    upper: hi,
                });
            }
            // Sampling and reflection both work on 2 * (hi - lo)
            if !(2.0 * (hi - lo)).is_finite() {
                return Err(BoundsError::WidthOverflow {
                    dimension,
                    lower: lo,
                    upper: hi,
                });
            }
        }

        Ok(Self { lower, upper })
    }

    /// Number of dimensions
    pub fn dimensions(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Width of dimension `i`
    pub fn width(&self, i: usize) -> f64 {
        self.upper[i] - self.lower[i]
    }

    /// Whether every component of `position` lies in its closed interval.
    pub fn contains(&self, position: &[f64]) -> bool {
        position.len() == self.dimensions()
            && position
                .iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(&x, (&lo, &hi))| lo <= x && x <= hi)
    }

    /// Draw a point uniformly at random, independently per dimension.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<f64> {
        self.lower
            .iter()
            .zip(self.upper.iter())
            .map(|(&lo, &hi)| if lo < hi { rng.gen_range(lo..=hi) } else { lo })
            .collect()
    }

    /// Saturate each out-of-range component at the violated bound.
    pub fn clamp(&self, position: &mut [f64]) {
        for (i, x) in position.iter_mut().enumerate() {
            *x = clamp_component(*x, self.lower[i], self.upper[i]);
        }
    }

    /// Mirror each out-of-range component back inside its interval.
    ///
    /// Overshoots larger than the interval width fold repeatedly, so the
    /// result is always inside the bounds.
    pub fn reflect(&self, position: &mut [f64]) {
        for (i, x) in position.iter_mut().enumerate() {
            *x = reflect_component(*x, self.lower[i], self.upper[i]);
        }
    }
}

// NaN maps to the interval midpoint; infinities saturate.
fn clamp_component(x: f64, lo: f64, hi: f64) -> f64 {
    if x.is_nan() {
        return lo + (hi - lo) / 2.0;
    }
    x.clamp(lo, hi)
}

fn reflect_component(x: f64, lo: f64, hi: f64) -> f64 {
    if !x.is_finite() {
        return clamp_component(x, lo, hi);
    }
    if (lo..=hi).contains(&x) {
        return x;
    }
    let width = hi - lo;
    if width <= 0.0 {
        return lo;
    }
    let period = 2.0 * width;
    let mut offset = (x - lo).rem_euclid(period);
    if !offset.is_finite() {
        return clamp_component(x, lo, hi);
    }
    if offset > width {
        offset = period - offset;
    }
    (lo + offset).clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn unit_square() -> Bounds {
        Bounds::new(vec![0.0, 10.0], vec![1.0, 20.0]).unwrap()
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = Bounds::new(vec![0.0, 5.0], vec![1.0, 4.0]).unwrap_err();
        assert_eq!(
            err,
            BoundsError::Inverted {
                dimension: 1,
                lower: 5.0,
                upper: 4.0
            }
        );
    }

    #[test]
    fn test_rejects_length_mismatch_and_empty() {
        assert!(matches!(
            Bounds::new(vec![0.0], vec![1.0, 2.0]),
            Err(BoundsError::LengthMismatch { lower: 1, upper: 2 })
        ));
        assert_eq!(Bounds::new(vec![], vec![]), Err(BoundsError::Empty));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert_eq!(
            Bounds::new(vec![0.0], vec![f64::INFINITY]),
            Err(BoundsError::NonFinite { dimension: 0 })
        );
    }

    #[test]
    fn test_rejects_unrepresentable_width() {
        assert_eq!(
            Bounds::new(vec![0.0, -1e308], vec![1.0, 1e308]),
            Err(BoundsError::WidthOverflow {
                dimension: 1,
                lower: -1e308,
                upper: 1e308
            })
        );
        // Half the float range is still accepted and stays usable
        let wide = Bounds::new(vec![-4e307], vec![4e307]).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        assert!(wide.contains(&wide.sample(&mut rng)));
        let mut x = vec![f64::NAN];
        wide.clamp(&mut x);
        assert_eq!(x, vec![0.0]);
        let mut far = vec![f64::MAX];
        wide.reflect(&mut far);
        assert!(wide.contains(&far));
    }

    #[test]
    fn test_degenerate_dimension_is_allowed() {
        let bounds = Bounds::new(vec![3.0], vec![3.0]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(bounds.sample(&mut rng), vec![3.0]);
        let mut x = vec![7.0];
        bounds.reflect(&mut x);
        assert_eq!(x, vec![3.0]);
    }

    #[test]
    fn test_sample_stays_inside() {
        let bounds = unit_square();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            assert!(bounds.contains(&bounds.sample(&mut rng)));
        }
    }

    #[test]
    fn test_clamp() {
        let bounds = unit_square();
        let mut x = vec![-0.5, 25.0];
        bounds.clamp(&mut x);
        assert_eq!(x, vec![0.0, 20.0]);

        let mut y = vec![f64::NAN, f64::NEG_INFINITY];
        bounds.clamp(&mut y);
        assert_eq!(y, vec![0.5, 10.0]);
    }

    #[test]
    fn test_reflect() {
        let bounds = unit_square();
        let mut x = vec![-0.25, 22.0];
        bounds.reflect(&mut x);
        assert!((x[0] - 0.25).abs() < 1e-12);
        assert!((x[1] - 18.0).abs() < 1e-12);

        // Overshoot of several widths folds back inside
        let mut y = vec![3.25, -15.0];
        bounds.reflect(&mut y);
        assert!(bounds.contains(&y));
        assert!((y[0] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_repair_treats_both_sides_alike() {
        let bounds = Bounds::new(vec![10.0], vec![20.0]).unwrap();
        for overshoot in [0.5, 2.5, 7.75, 10.0] {
            let mut below = vec![10.0 - overshoot];
            let mut above = vec![20.0 + overshoot];
            bounds.reflect(&mut below);
            bounds.reflect(&mut above);
            assert_eq!(below[0] - 10.0, 20.0 - above[0], "reflect overshoot {overshoot}");

            let mut below = vec![10.0 - overshoot];
            let mut above = vec![20.0 + overshoot];
            bounds.clamp(&mut below);
            bounds.clamp(&mut above);
            assert_eq!((below[0], above[0]), (10.0, 20.0), "clamp overshoot {overshoot}");
        }
    }

    #[test]
    fn test_reflect_leaves_inside_points_alone() {
        let bounds = unit_square();
        let mut x = vec![0.3, 19.0];
        bounds.reflect(&mut x);
        assert_eq!(x, vec![0.3, 19.0]);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Bounds = serde_json::from_str(r#"{"lower":[0.0],"upper":[1.0]}"#).unwrap();
        assert_eq!(ok.dimensions(), 1);

        let bad: Result<Bounds, _> = serde_json::from_str(r#"{"lower":[2.0],"upper":[1.0]}"#);
        assert!(bad.is_err());
    }
}
