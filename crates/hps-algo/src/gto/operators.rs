//! Position-update operators of the Gorilla Troops Optimizer.
//!
//! Every operator reads the troop as it was at the start of the epoch and
//! returns a fresh position; nothing here touches the population or the
//! fitness cache. Bound repair happens afterwards in the solver.

use super::population::Population;
use hps_core::Bounds;
use rand::seq::index;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::Serialize;

/// Which operator produced a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    /// Exploration: jump to a uniformly random point inside the bounds
    Relocate,
    /// Exploration: move relative to one other troop member
    Migrate,
    /// Exploration: combine the current position with two other members
    Interpolate,
    /// Exploitation: move around the silverback, scaled by the troop mean
    FollowSilverback,
    /// Exploitation: contest-driven displacement from the silverback
    Compete,
}

impl Move {
    pub fn is_exploration(self) -> bool {
        matches!(self, Move::Relocate | Move::Migrate | Move::Interpolate)
    }
}

/// Adaptive coefficients shared by every move of one epoch.
///
/// `a = (cos(2r) + 1) * (1 - t/T)` shrinks to zero as the run ends, and
/// `c = a * (2r' - 1)` lies in `[-a, a]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub a: f64,
    pub c: f64,
}

impl Coefficients {
    /// Draw the coefficients for an epoch at `progress = t / T`.
    pub fn draw<R: Rng + ?Sized>(progress: f64, rng: &mut R) -> Self {
        let remaining = (1.0 - progress).clamp(0.0, 1.0);
        let a = ((2.0 * rng.gen::<f64>()).cos() + 1.0) * remaining;
        let c = a * (2.0 * rng.gen::<f64>() - 1.0);
        Self { a, c }
    }
}

/// Everything an operator may read while moving candidate `i`.
pub struct MoveContext<'a> {
    pub population: &'a Population,
    pub silverback: &'a [f64],
    /// Component-wise mean of the troop at the start of the epoch
    pub mean: &'a [f64],
    pub bounds: &'a Bounds,
    pub coefficients: Coefficients,
    /// Probability of a random relocation inside exploration
    pub p1: f64,
    /// Threshold on `a` above which exploitation follows the silverback
    pub p2: f64,
    /// Competition impact
    pub beta: f64,
}

/// Exploration phase for candidate `index`.
pub fn explore<R: Rng + ?Sized>(ctx: &MoveContext<'_>, index: usize, rng: &mut R) -> (Vec<f64>, Move) {
    if rng.gen::<f64>() < ctx.p1 {
        return (ctx.bounds.sample(rng), Move::Relocate);
    }

    let current = ctx.population.get(index).position();
    let Coefficients { a, c } = ctx.coefficients;

    if rng.gen::<f64>() >= 0.5 {
        let other = ctx.population.get(others(ctx.population.len(), index, 1, rng)[0]).position();
        let r = rng.gen::<f64>();
        let position = current
            .iter()
            .zip(other)
            .map(|(&x, &o)| {
                let z = rng.gen::<f64>() * 2.0 * a - a;
                (r - a) * o + c * z * x
            })
            .collect();
        (position, Move::Migrate)
    } else {
        let picked = others(ctx.population.len(), index, 2, rng);
        let first = ctx.population.get(picked[0]).position();
        let second = ctx.population.get(picked[1]).position();
        let r = rng.gen::<f64>();
        let position = current
            .iter()
            .zip(first.iter().zip(second))
            .map(|(&x, (&x1, &x2))| x - c * (c * x - x1) + r * (x - x2))
            .collect();
        (position, Move::Interpolate)
    }
}

/// Exploitation phase for candidate `index`.
pub fn exploit<R: Rng + ?Sized>(ctx: &MoveContext<'_>, index: usize, rng: &mut R) -> (Vec<f64>, Move) {
    let current = ctx.population.get(index).position();
    let Coefficients { a, c } = ctx.coefficients;

    if a >= ctx.p2 {
        let g = 2f64.powf(c);
        let position = current
            .iter()
            .zip(ctx.silverback.iter().zip(ctx.mean))
            .map(|(&x, (&sb, &m))| {
                let impact = (m.abs().powf(g)).powf(1.0 / g);
                c * impact * (x - sb) + x
            })
            .collect();
        (position, Move::FollowSilverback)
    } else {
        let q = 2.0 * rng.gen::<f64>() - 1.0;
        let per_dimension = rng.gen::<f64>() >= 0.5;
        let shared: f64 = rng.sample(StandardNormal);
        let position = current
            .iter()
            .zip(ctx.silverback)
            .map(|(&x, &sb)| {
                let h = if per_dimension {
                    rng.sample(StandardNormal)
                } else {
                    shared
                };
                sb - q * (sb - x) * (ctx.beta * h)
            })
            .collect();
        (position, Move::Compete)
    }
}

/// `count` distinct troop indices, none equal to `exclude`.
fn others<R: Rng + ?Sized>(len: usize, exclude: usize, count: usize, rng: &mut R) -> Vec<usize> {
    index::sample(rng, len - 1, count)
        .into_iter()
        .map(|j| if j >= exclude { j + 1 } else { j })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gto::population::Candidate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn troop() -> Population {
        Population::from_candidates(vec![
            Candidate::new(vec![1.0, 1.0], 2.0),
            Candidate::new(vec![2.0, 2.0], 8.0),
            Candidate::new(vec![3.0, 3.0], 18.0),
            Candidate::new(vec![4.0, 4.0], 32.0),
        ])
    }

    fn context<'a>(
        population: &'a Population,
        mean: &'a [f64],
        bounds: &'a Bounds,
        coefficients: Coefficients,
    ) -> MoveContext<'a> {
        MoveContext {
            population,
            silverback: population.get(0).position(),
            mean,
            bounds,
            coefficients,
            p1: 0.03,
            p2: 0.8,
            beta: 3.0,
        }
    }

    #[test]
    fn test_coefficients_vanish_at_end_of_run() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let k = Coefficients::draw(0.3, &mut rng);
            assert!((0.0..=2.0 * 0.7 + 1e-12).contains(&k.a));
            assert!(k.c.abs() <= k.a);
        }
        let end = Coefficients::draw(1.0, &mut rng);
        assert_eq!(end.a, 0.0);
        assert_eq!(end.c, 0.0);
    }

    #[test]
    fn test_others_never_returns_excluded_index() {
        let mut rng = StdRng::seed_from_u64(5);
        for exclude in 0..3 {
            for _ in 0..200 {
                let picked = others(3, exclude, 2, &mut rng);
                assert_eq!(picked.len(), 2);
                assert_ne!(picked[0], picked[1]);
                assert!(picked.iter().all(|&j| j != exclude && j < 3));
            }
        }
    }

    #[test]
    fn test_explore_relocates_when_p1_is_one() {
        let population = troop();
        let mean = population.mean_position();
        let bounds = Bounds::new(vec![10.0, 10.0], vec![20.0, 20.0]).unwrap();
        let mut ctx = context(&population, &mean, &bounds, Coefficients { a: 1.0, c: 0.5 });
        ctx.p1 = 1.0;

        let mut rng = StdRng::seed_from_u64(9);
        let (position, kind) = explore(&ctx, 1, &mut rng);
        assert_eq!(kind, Move::Relocate);
        assert!(bounds.contains(&position));
    }

    #[test]
    fn test_exploit_with_zero_coefficients_is_a_fixed_point() {
        // a = c = 0 and a >= p2 when p2 = 0: follow-silverback leaves x unchanged
        let population = troop();
        let mean = population.mean_position();
        let bounds = Bounds::new(vec![0.0, 0.0], vec![5.0, 5.0]).unwrap();
        let mut ctx = context(&population, &mean, &bounds, Coefficients { a: 0.0, c: 0.0 });
        ctx.p2 = 0.0;

        let mut rng = StdRng::seed_from_u64(2);
        let (position, kind) = exploit(&ctx, 2, &mut rng);
        assert_eq!(kind, Move::FollowSilverback);
        assert_eq!(position, vec![3.0, 3.0]);
    }

    #[test]
    fn test_compete_from_silverback_stays_put() {
        let population = troop();
        let mean = population.mean_position();
        let bounds = Bounds::new(vec![0.0, 0.0], vec![5.0, 5.0]).unwrap();
        let ctx = context(&population, &mean, &bounds, Coefficients { a: 0.1, c: 0.05 });

        let mut rng = StdRng::seed_from_u64(4);
        let (position, kind) = exploit(&ctx, 0, &mut rng);
        assert_eq!(kind, Move::Compete);
        assert_eq!(position, vec![1.0, 1.0]);
    }

    #[test]
    fn test_operators_keep_dimensionality() {
        let population = troop();
        let mean = population.mean_position();
        let bounds = Bounds::new(vec![0.0, 0.0], vec![5.0, 5.0]).unwrap();
        let ctx = context(&population, &mean, &bounds, Coefficients { a: 0.9, c: -0.4 });
        let mut rng = StdRng::seed_from_u64(77);

        for i in 0..population.len() {
            for _ in 0..50 {
                assert_eq!(explore(&ctx, i, &mut rng).0.len(), 2);
                assert_eq!(exploit(&ctx, i, &mut rng).0.len(), 2);
            }
        }
    }
}
