//! Troop state: candidates with cached fitness and the silverback leader.

use super::objective::{is_feasible_fitness, sanitize_fitness, Objective};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A position together with the fitness it was evaluated to.
///
/// Position and fitness are only ever replaced together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    position: Vec<f64>,
    fitness: f64,
}

impl Candidate {
    pub fn new(position: Vec<f64>, fitness: f64) -> Self {
        Self {
            position,
            fitness: sanitize_fitness(fitness),
        }
    }

    pub fn position(&self) -> &[f64] {
        &self.position
    }

    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    pub fn is_feasible(&self) -> bool {
        is_feasible_fitness(self.fitness)
    }

    /// Strictly lower fitness.
    pub fn is_better_than(&self, other: &Candidate) -> bool {
        self.fitness.total_cmp(&other.fitness).is_lt()
    }
}

/// Per-candidate replacement rule applied after each move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acceptance {
    /// Keep the new position only if its fitness is not worse
    #[default]
    Greedy,
    /// Always move to the new position
    Unconditional,
}

/// Ordered collection of candidates.
#[derive(Debug, Clone)]
pub struct Population {
    candidates: Vec<Candidate>,
}

impl Population {
    /// Generation 0: `size` points drawn uniformly inside the objective's bounds.
    pub fn random<O, R>(objective: &O, size: usize, rng: &mut R, parallel: bool) -> Self
    where
        O: Objective,
        R: Rng + ?Sized,
    {
        let positions: Vec<Vec<f64>> = (0..size)
            .map(|_| objective.bounds().sample(rng))
            .collect();
        let fitness = evaluate_positions(objective, &positions, parallel);

        Self {
            candidates: positions
                .into_iter()
                .zip(fitness)
                .map(|(position, fitness)| Candidate::new(position, fitness))
                .collect(),
        }
    }

    pub fn from_candidates(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn get(&self, index: usize) -> &Candidate {
        &self.candidates[index]
    }

    /// Lowest-fitness candidate; ties go to the lowest index.
    pub fn best(&self) -> Option<&Candidate> {
        self.candidates
            .iter()
            .reduce(|best, c| if c.is_better_than(best) { c } else { best })
    }

    pub fn feasible_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.is_feasible()).count()
    }

    /// Component-wise mean position of the troop.
    pub fn mean_position(&self) -> Vec<f64> {
        let Some(first) = self.candidates.first() else {
            return Vec::new();
        };
        let mut mean = vec![0.0; first.position.len()];
        for candidate in &self.candidates {
            for (m, x) in mean.iter_mut().zip(&candidate.position) {
                *m += x;
            }
        }
        let n = self.candidates.len() as f64;
        mean.iter_mut().for_each(|m| *m /= n);
        mean
    }

    /// Offer a replacement for slot `index`; returns whether it was taken.
    pub fn offer(&mut self, index: usize, contender: Candidate, acceptance: Acceptance) -> bool {
        let accept = match acceptance {
            Acceptance::Greedy => {
                contender.fitness.total_cmp(&self.candidates[index].fitness).is_le()
            }
            Acceptance::Unconditional => true,
        };
        if accept {
            self.candidates[index] = contender;
        }
        accept
    }
}

/// Best candidate seen so far across the whole run.
///
/// Replaced only by a strictly better candidate, so its fitness never worsens.
#[derive(Debug, Clone, Serialize)]
pub struct Silverback {
    candidate: Candidate,
    found_at_epoch: usize,
}

impl Silverback {
    pub fn new(candidate: Candidate, found_at_epoch: usize) -> Self {
        Self {
            candidate,
            found_at_epoch,
        }
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub fn position(&self) -> &[f64] {
        &self.candidate.position
    }

    pub fn fitness(&self) -> f64 {
        self.candidate.fitness
    }

    pub fn found_at_epoch(&self) -> usize {
        self.found_at_epoch
    }

    /// Take over the lead if `contender` is strictly better.
    pub fn challenge(&mut self, contender: &Candidate, epoch: usize) -> bool {
        if contender.is_better_than(&self.candidate) {
            self.candidate = contender.clone();
            self.found_at_epoch = epoch;
            true
        } else {
            false
        }
    }
}

/// Evaluate positions in order, optionally fanning out over the rayon pool.
///
/// The output order always matches the input order.
pub(crate) fn evaluate_positions<O: Objective>(
    objective: &O,
    positions: &[Vec<f64>],
    parallel: bool,
) -> Vec<f64> {
    #[cfg(feature = "parallel")]
    if parallel {
        return positions
            .par_iter()
            .map(|position| sanitize_fitness(objective.fitness(position)))
            .collect();
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    positions
        .iter()
        .map(|position| sanitize_fitness(objective.fitness(position)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gto::objective::{FnObjective, INFEASIBLE_FITNESS};
    use hps_core::Bounds;
    use rand::{rngs::StdRng, SeedableRng};

    fn candidate(x: f64, fitness: f64) -> Candidate {
        Candidate::new(vec![x], fitness)
    }

    fn sphere() -> FnObjective<impl Fn(&[f64]) -> f64 + Sync> {
        FnObjective::new(
            Bounds::new(vec![-10.0, -10.0], vec![10.0, 10.0]).unwrap(),
            |x: &[f64]| x.iter().map(|v| v * v).sum(),
        )
    }

    #[test]
    fn test_random_population_is_inside_bounds() {
        let objective = sphere();
        let mut rng = StdRng::seed_from_u64(3);
        let population = Population::random(&objective, 50, &mut rng, false);

        assert_eq!(population.len(), 50);
        for c in population.candidates() {
            assert!(objective.bounds().contains(c.position()));
            assert_eq!(c.fitness(), objective.fitness(c.position()));
        }
    }

    #[test]
    fn test_parallel_and_serial_evaluation_agree() {
        let objective = sphere();
        let mut rng_a = StdRng::seed_from_u64(11);
        let mut rng_b = StdRng::seed_from_u64(11);
        let a = Population::random(&objective, 64, &mut rng_a, false);
        let b = Population::random(&objective, 64, &mut rng_b, true);
        assert_eq!(a.candidates(), b.candidates());
    }

    #[test]
    fn test_best_prefers_lowest_index_on_ties() {
        let population =
            Population::from_candidates(vec![candidate(0.0, 5.0), candidate(1.0, 2.0), candidate(2.0, 2.0)]);
        assert_eq!(population.best().unwrap().position(), &[1.0]);
    }

    #[test]
    fn test_greedy_offer_keeps_better_incumbent() {
        let mut population = Population::from_candidates(vec![candidate(0.0, 1.0)]);
        assert!(!population.offer(0, candidate(5.0, 3.0), Acceptance::Greedy));
        assert_eq!(population.get(0).fitness(), 1.0);

        // Equal fitness moves
        assert!(population.offer(0, candidate(6.0, 1.0), Acceptance::Greedy));
        assert_eq!(population.get(0).position(), &[6.0]);

        assert!(population.offer(0, candidate(7.0, 9.0), Acceptance::Unconditional));
        assert_eq!(population.get(0).fitness(), 9.0);
    }

    #[test]
    fn test_silverback_only_moves_on_strict_improvement() {
        let mut silverback = Silverback::new(candidate(0.0, 10.0), 0);
        assert!(!silverback.challenge(&candidate(1.0, 10.0), 1));
        assert!(!silverback.challenge(&candidate(1.0, 11.0), 1));
        assert!(silverback.challenge(&candidate(2.0, 9.0), 2));
        assert_eq!(silverback.found_at_epoch(), 2);
        assert_eq!(silverback.position(), &[2.0]);
    }

    #[test]
    fn test_candidate_sanitizes_nan() {
        let c = Candidate::new(vec![0.0], f64::NAN);
        assert_eq!(c.fitness(), INFEASIBLE_FITNESS);
        assert!(!c.is_feasible());
    }

    #[test]
    fn test_mean_position() {
        let population = Population::from_candidates(vec![
            Candidate::new(vec![0.0, 2.0], 0.0),
            Candidate::new(vec![4.0, 6.0], 0.0),
        ]);
        assert_eq!(population.mean_position(), vec![2.0, 4.0]);
    }
}
