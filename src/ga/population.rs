//! One generation's worth of tours.

use super::chromosome::Chromosome;
use super::gene::Gene;
use super::selection::{ranking, Selection};
use crate::error::{Result, TspError};
use rand::Rng;

/// A non-empty collection of chromosomes for one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    chromosomes: Vec<Chromosome>,
}

impl Population {
    /// Wraps `chromosomes` into a population.
    ///
    /// # Errors
    /// [`TspError::InvalidInput`] if `chromosomes` is empty.
    pub fn new(chromosomes: Vec<Chromosome>) -> Result<Self> {
        if chromosomes.is_empty() {
            return Err(TspError::InvalidInput("population must not be empty".into()));
        }
        Ok(Self { chromosomes })
    }

    /// Wraps offspring produced by the driver, which is never empty.
    pub(crate) fn from_offspring(chromosomes: Vec<Chromosome>) -> Self {
        debug_assert!(!chromosomes.is_empty());
        Self { chromosomes }
    }

    /// Creates `size` randomly shuffled tours of `points`.
    ///
    /// # Errors
    /// [`TspError::InvalidInput`] if `size` is zero or `points` is invalid
    /// (see [`Chromosome::create`]).
    pub fn random<R: Rng>(points: &[Gene], size: usize, rng: &mut R) -> Result<Self> {
        let first = Chromosome::create(points, rng)?;
        let mut chromosomes = Vec::with_capacity(size);
        if size > 0 {
            chromosomes.push(first);
        }
        for _ in 1..size {
            chromosomes.push(Chromosome::shuffled(points, rng));
        }
        Self::new(chromosomes)
    }

    /// Number of chromosomes.
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// The chromosomes in their current order.
    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    /// The shortest tour. Ties resolve to the earliest chromosome.
    pub fn best(&self) -> &Chromosome {
        let mut best = &self.chromosomes[0];
        for c in &self.chromosomes[1..] {
            if c.calculate_distance() < best.calculate_distance() {
                best = c;
            }
        }
        best
    }

    /// Computes and caches every member's distance.
    ///
    /// With the `parallel` feature and `parallel == true` the work is spread
    /// over rayon's thread pool. Results do not depend on the choice.
    pub fn evaluate(&self, parallel: bool) {
        if parallel {
            self.evaluate_parallel();
        } else {
            for c in &self.chromosomes {
                c.calculate_distance();
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn evaluate_parallel(&self) {
        use rayon::prelude::*;
        self.chromosomes.par_iter().for_each(|c| {
            c.calculate_distance();
        });
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_parallel(&self) {
        self.evaluate(false);
    }

    /// Sorts the population ascending by distance (shortest first) and
    /// returns the ranked chromosomes.
    ///
    /// The sort is stable: equal distances keep their relative order.
    pub fn rank(&mut self) -> &[Chromosome] {
        self.chromosomes
            .sort_by(|a, b| a.calculate_distance().total_cmp(&b.calculate_distance()));
        &self.chromosomes
    }

    /// Chooses `count` breeding candidates according to `selection`.
    ///
    /// The same chromosome may be chosen more than once. For a given
    /// generator state the choice is deterministic.
    pub fn select_parents<R: Rng>(
        &self,
        count: usize,
        selection: Selection,
        rng: &mut R,
    ) -> Vec<&Chromosome> {
        let fitness: Vec<f64> = self
            .chromosomes
            .iter()
            .map(Chromosome::calculate_distance)
            .collect();
        let order = ranking(&fitness);

        (0..count)
            .map(|_| &self.chromosomes[selection.select(&fitness, &order, rng)])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn ring(n: usize) -> Vec<Gene> {
        (0..n)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::TAU / n as f64;
                Gene::new(angle.cos() * 10.0, angle.sin() * 10.0)
            })
            .collect()
    }

    #[test]
    fn test_random_population_size() {
        let mut rng = create_rng(42);
        let points = ring(8);
        let pop = Population::random(&points, 25, &mut rng).unwrap();
        assert_eq!(pop.len(), 25);
        assert!(pop.chromosomes().iter().all(|c| c.is_permutation_of(&points)));
    }

    #[test]
    fn test_empty_population_rejected() {
        assert!(matches!(Population::new(vec![]), Err(TspError::InvalidInput(_))));

        let mut rng = create_rng(42);
        assert!(Population::random(&ring(4), 0, &mut rng).is_err());
    }

    #[test]
    fn test_random_rejects_invalid_points() {
        let mut rng = create_rng(42);
        let points = vec![Gene::new(1.0, 1.0), Gene::new(1.0, 1.0)];
        assert!(Population::random(&points, 5, &mut rng).is_err());
    }

    #[test]
    fn test_rank_ascending() {
        let mut rng = create_rng(42);
        let mut pop = Population::random(&ring(10), 30, &mut rng).unwrap();
        let ranked = pop.rank();
        for pair in ranked.windows(2) {
            assert!(pair[0].calculate_distance() <= pair[1].calculate_distance());
        }
    }

    #[test]
    fn test_best_matches_rank_head() {
        let mut rng = create_rng(9);
        let mut pop = Population::random(&ring(10), 30, &mut rng).unwrap();
        let best = pop.best().calculate_distance();
        assert_eq!(pop.rank()[0].calculate_distance(), best);
    }

    #[test]
    fn test_evaluate_matches_lazy_distance() {
        let mut rng = create_rng(1);
        let pop = Population::random(&ring(12), 20, &mut rng).unwrap();
        let fresh: Vec<f64> = pop
            .chromosomes()
            .iter()
            .map(|c| c.clone().reversed().reversed().calculate_distance())
            .collect();
        pop.evaluate(true);
        let cached: Vec<f64> = pop.chromosomes().iter().map(|c| c.calculate_distance()).collect();
        assert_eq!(fresh, cached);
    }

    #[test]
    fn test_select_parents_count_and_membership() {
        let mut rng = create_rng(42);
        let pop = Population::random(&ring(6), 10, &mut rng).unwrap();
        let parents = pop.select_parents(17, Selection::Tournament(3), &mut rng);
        assert_eq!(parents.len(), 17);
        for p in parents {
            assert!(pop.chromosomes().contains(p));
        }
    }

    #[test]
    fn test_select_parents_biased_to_short_tours() {
        let mut rng = create_rng(42);
        let pop = Population::random(&ring(10), 40, &mut rng).unwrap();
        let mean = |xs: &[&Chromosome]| {
            xs.iter().map(|c| c.calculate_distance()).sum::<f64>() / xs.len() as f64
        };
        let all: Vec<&Chromosome> = pop.chromosomes().iter().collect();
        let parents = pop.select_parents(400, Selection::Tournament(4), &mut rng);
        assert!(mean(&parents) < mean(&all));
    }

    #[test]
    fn test_select_parents_deterministic() {
        let points = ring(8);
        let pick = || {
            let mut rng = create_rng(5);
            let pop = Population::random(&points, 12, &mut rng).unwrap();
            pop.select_parents(10, Selection::Rank, &mut rng)
                .into_iter()
                .cloned()
                .collect::<Vec<_>>()
        };
        assert_eq!(pick(), pick());
    }
}
