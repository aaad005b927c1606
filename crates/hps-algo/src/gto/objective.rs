//! The contract between the optimizer and the model it minimizes.

use hps_core::Bounds;

/// Fitness assigned to any position that violates a hard constraint.
///
/// Death-penalty value: large enough that no feasible design reaches it,
/// finite so that fitness comparisons stay totally ordered.
pub const INFEASIBLE_FITNESS: f64 = 999_999_999_999.0;

/// A minimization problem over a box-bounded continuous space.
///
/// `fitness` must be pure and total: the same position always yields the same
/// value and no position inside [`Objective::bounds`] may panic. Infeasible
/// positions should return [`INFEASIBLE_FITNESS`].
pub trait Objective: Sync {
    fn bounds(&self) -> &Bounds;

    fn fitness(&self, position: &[f64]) -> f64;
}

/// Map NaN / infinite fitness to the infeasible sentinel.
#[inline]
pub fn sanitize_fitness(fitness: f64) -> f64 {
    if fitness.is_finite() {
        fitness.min(INFEASIBLE_FITNESS)
    } else {
        INFEASIBLE_FITNESS
    }
}

/// Whether a fitness value denotes a feasible position.
#[inline]
pub fn is_feasible_fitness(fitness: f64) -> bool {
    fitness.is_finite() && fitness < INFEASIBLE_FITNESS
}

/// Adapter turning a closure into an [`Objective`].
///
/// ```
/// use hps_algo::gto::{FnObjective, Objective};
/// use hps_core::Bounds;
///
/// let sphere = FnObjective::new(
///     Bounds::new(vec![-5.0; 2], vec![5.0; 2]).unwrap(),
///     |x: &[f64]| x.iter().map(|v| v * v).sum(),
/// );
/// assert_eq!(sphere.fitness(&[1.0, 2.0]), 5.0);
/// ```
pub struct FnObjective<F> {
    bounds: Bounds,
    function: F,
}

impl<F> FnObjective<F>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    pub fn new(bounds: Bounds, function: F) -> Self {
        Self { bounds, function }
    }
}

impl<F> Objective for FnObjective<F>
where
    F: Fn(&[f64]) -> f64 + Sync,
{
    fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    fn fitness(&self, position: &[f64]) -> f64 {
        (self.function)(position)
    }
}
