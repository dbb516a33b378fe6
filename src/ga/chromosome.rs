//! Tour representation and its genetic operators.
//!
//! A [`Chromosome`] is one full ordering of every city. Both operators
//! produce new chromosomes and leave their inputs untouched:
//!
//! - [`Chromosome::cross_over`]: half-split, order-preserving recombination
//!   that skips genes already placed, so children stay permutations
//! - [`Chromosome::mutate`]: a fixed number of swaps of two distinct positions

use super::gene::Gene;
use crate::error::{Result, TspError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

/// Number of swaps performed by one mutation unless configured otherwise.
pub const DEFAULT_MUTATION_SEVERITY: usize = 2;

/// A candidate tour: every city exactly once, in visiting order.
///
/// The distance is computed on first use and cached; since the gene order
/// never changes after construction the cached value is always current.
#[derive(Debug, Clone)]
pub struct Chromosome {
    genes: Vec<Gene>,
    distance: OnceLock<f64>,
}

impl Chromosome {
    fn from_genes(genes: Vec<Gene>) -> Self {
        Self {
            genes,
            distance: OnceLock::new(),
        }
    }

    /// Creates a chromosome holding every gene of `points` in uniformly
    /// random order.
    ///
    /// # Errors
    /// [`TspError::InvalidInput`] if `points` is empty, contains duplicates
    /// or contains a non-finite coordinate.
    pub fn create<R: Rng>(points: &[Gene], rng: &mut R) -> Result<Self> {
        validate_points(points)?;
        Ok(Self::shuffled(points, rng))
    }

    /// Shuffles `points` without validating them.
    pub(crate) fn shuffled<R: Rng>(points: &[Gene], rng: &mut R) -> Self {
        let mut genes = points.to_vec();
        genes.shuffle(rng);
        Self::from_genes(genes)
    }

    /// The genes in visiting order.
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Number of cities in the tour.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Returns `true` if the tour has no cities.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Total length of the open path through the genes in order.
    ///
    /// Does not include the edge from the last city back to the first.
    /// This is the fitness value: lower is better.
    pub fn calculate_distance(&self) -> f64 {
        *self.distance.get_or_init(|| path_length(&self.genes))
    }

    /// Length of the closed tour, i.e. [`calculate_distance`] plus the
    /// edge returning to the starting city.
    ///
    /// [`calculate_distance`]: Chromosome::calculate_distance
    pub fn closed_distance(&self) -> f64 {
        let closing = match (self.genes.first(), self.genes.last()) {
            (Some(first), Some(last)) => last.distance(first),
            _ => 0.0,
        };
        self.calculate_distance() + closing
    }

    /// Returns `true` if this tour visits exactly the genes of `points`,
    /// each once.
    pub fn is_permutation_of(&self, points: &[Gene]) -> bool {
        if self.genes.len() != points.len() {
            return false;
        }
        let expected: HashSet<Gene> = points.iter().copied().collect();
        let seen: HashSet<Gene> = self.genes.iter().copied().collect();
        seen.len() == self.genes.len() && seen == expected
    }

    /// The same tour traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        let mut genes = self.genes.clone();
        genes.reverse();
        Self::from_genes(genes)
    }

    /// Recombines `self` with `other` into two children.
    ///
    /// Both parents are split at `len / 2`.
    ///
    /// - The first child starts with `self`'s first half, then takes the
    ///   genes of `other` in order, skipping those already present.
    /// - The second child starts with `other`'s second half, then takes the
    ///   genes of `self` in order, skipping those already present.
    ///
    /// # Errors
    /// [`TspError::InvalidInput`] if the parents are not permutations of the
    /// same gene set.
    ///
    /// # Complexity
    /// O(n) time, O(n) space
    pub fn cross_over(&self, other: &Chromosome) -> Result<(Chromosome, Chromosome)> {
        if !self.is_permutation_of(&other.genes) {
            return Err(TspError::InvalidInput(format!(
                "cannot cross over chromosomes with different gene sets (lengths {} and {})",
                self.len(),
                other.len()
            )));
        }
        Ok(self.cross_over_unchecked(other))
    }

    /// [`cross_over`](Chromosome::cross_over) for parents already known to
    /// share a gene set.
    pub(crate) fn cross_over_unchecked(&self, other: &Chromosome) -> (Chromosome, Chromosome) {
        let (my_head, _) = self.genes.split_at(self.len() / 2);
        let (_, other_tail) = other.genes.split_at(other.len() / 2);

        let first = ordered_fill(my_head, &other.genes);
        let second = ordered_fill(other_tail, &self.genes);

        (Self::from_genes(first), Self::from_genes(second))
    }

    /// Returns a copy with `severity` random swaps applied.
    ///
    /// Each swap picks two distinct positions, redrawing both when they
    /// collide. Tours with fewer than two genes are returned unchanged.
    pub fn mutate<R: Rng>(&self, severity: usize, rng: &mut R) -> Chromosome {
        let mut genes = self.genes.clone();
        let n = genes.len();
        if n < 2 {
            return Self::from_genes(genes);
        }

        for _ in 0..severity {
            let (a, b) = distinct_pair(n, rng);
            genes.swap(a, b);
        }
        Self::from_genes(genes)
    }
}

/// Rejects empty input, duplicates and non-finite coordinates.
pub(crate) fn validate_points(points: &[Gene]) -> Result<()> {
    if points.is_empty() {
        return Err(TspError::InvalidInput("no cities given".into()));
    }
    let mut seen = HashSet::with_capacity(points.len());
    for gene in points {
        if !gene.is_finite() {
            return Err(TspError::InvalidInput(format!(
                "city {gene} has a non-finite coordinate"
            )));
        }
        if !seen.insert(*gene) {
            return Err(TspError::InvalidInput(format!("duplicate city {gene}")));
        }
    }
    Ok(())
}

fn path_length(genes: &[Gene]) -> f64 {
    genes.windows(2).map(|w| w[0].distance(&w[1])).sum()
}

/// Copies `seed`, then appends every gene of `donor` not yet present.
fn ordered_fill(seed: &[Gene], donor: &[Gene]) -> Vec<Gene> {
    let mut child = Vec::with_capacity(donor.len());
    let mut present = HashSet::with_capacity(donor.len());

    for &gene in seed.iter().chain(donor) {
        if present.insert(gene) {
            child.push(gene);
        }
    }
    child
}

fn distinct_pair<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    loop {
        let a = rng.random_range(0..n);
        let b = rng.random_range(0..n);
        if a != b {
            return (a, b);
        }
    }
}

impl PartialEq for Chromosome {
    fn eq(&self, other: &Self) -> bool {
        self.genes == other.genes
    }
}

impl Eq for Chromosome {}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, gene) in self.genes.iter().enumerate() {
            if i > 0 {
                f.write_str(" : ")?;
            }
            write!(f, "{gene}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn genes(coords: &[(f64, f64)]) -> Vec<Gene> {
        coords.iter().map(|&c| Gene::from(c)).collect()
    }

    fn line(n: usize) -> Vec<Gene> {
        (0..n).map(|i| Gene::new(i as f64, 0.0)).collect()
    }

    fn unit_square() -> Vec<Gene> {
        genes(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)])
    }

    fn positions_changed(a: &Chromosome, b: &Chromosome) -> usize {
        a.genes()
            .iter()
            .zip(b.genes())
            .filter(|(x, y)| x != y)
            .count()
    }

    // ---- create ----

    #[test]
    fn test_create_is_permutation() {
        let mut rng = create_rng(42);
        let points = line(10);
        for _ in 0..50 {
            let c = Chromosome::create(&points, &mut rng).unwrap();
            assert!(c.is_permutation_of(&points));
        }
    }

    #[test]
    fn test_create_shuffles() {
        let mut rng = create_rng(42);
        let points = line(10);
        let shuffled = (0..20)
            .map(|_| Chromosome::create(&points, &mut rng).unwrap())
            .any(|c| c.genes() != points.as_slice());
        assert!(shuffled, "20 shuffles of 10 cities all kept input order");
    }

    #[test]
    fn test_create_rejects_empty() {
        let mut rng = create_rng(42);
        let err = Chromosome::create(&[], &mut rng).unwrap_err();
        assert!(matches!(err, TspError::InvalidInput(_)));
    }

    #[test]
    fn test_create_rejects_duplicates() {
        let mut rng = create_rng(42);
        let points = genes(&[(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        let err = Chromosome::create(&points, &mut rng).unwrap_err();
        assert!(matches!(err, TspError::InvalidInput(_)));
    }

    #[test]
    fn test_create_rejects_nan() {
        let mut rng = create_rng(42);
        let points = genes(&[(0.0, 0.0), (f64::NAN, 1.0)]);
        assert!(Chromosome::create(&points, &mut rng).is_err());
    }

    #[test]
    fn test_create_single_city() {
        let mut rng = create_rng(42);
        let points = genes(&[(3.0, 4.0)]);
        let c = Chromosome::create(&points, &mut rng).unwrap();
        assert_eq!(c.len(), 1);
        assert_eq!(c.calculate_distance(), 0.0);
    }

    // ---- distance ----

    #[test]
    fn test_distance_is_open_path() {
        let c = Chromosome::from_genes(unit_square());
        assert!((c.calculate_distance() - 3.0).abs() < 1e-12);
        assert!((c.closed_distance() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_depends_on_order() {
        let zigzag = Chromosome::from_genes(genes(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]));
        let expected = 2.0f64.sqrt() * 2.0 + 1.0;
        assert!((zigzag.calculate_distance() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_distance_reversal_invariant() {
        let mut rng = create_rng(7);
        let points = genes(&[(0.0, 0.0), (5.0, 1.0), (2.0, 7.0), (9.0, 3.0), (4.0, 4.0)]);
        let c = Chromosome::create(&points, &mut rng).unwrap();
        assert!((c.calculate_distance() - c.reversed().calculate_distance()).abs() < 1e-9);
    }

    // ---- cross_over ----

    #[test]
    fn test_crossover_follows_half_split_rule() {
        let a = Chromosome::from_genes(line(5));
        let b = Chromosome::from_genes(line(5).into_iter().rev().collect());
        let (c1, c2) = a.cross_over(&b).unwrap();

        // c1: a's first half [0, 1], then b = [4, 3, 2, 1, 0] minus placed.
        let expected1: Vec<Gene> = [0, 1, 4, 3, 2].iter().map(|&i| Gene::new(i as f64, 0.0)).collect();
        // c2: b's second half [2, 1, 0], then a = [0, 1, 2, 3, 4] minus placed.
        let expected2: Vec<Gene> = [2, 1, 0, 3, 4].iter().map(|&i| Gene::new(i as f64, 0.0)).collect();

        assert_eq!(c1.genes(), expected1.as_slice());
        assert_eq!(c2.genes(), expected2.as_slice());
    }

    #[test]
    fn test_crossover_five_cities_permutations() {
        let mut rng = create_rng(42);
        let points = line(5);
        for _ in 0..100 {
            let a = Chromosome::create(&points, &mut rng).unwrap();
            let b = Chromosome::create(&points, &mut rng).unwrap();
            let (c1, c2) = a.cross_over(&b).unwrap();
            assert!(c1.is_permutation_of(&points), "child1 invalid: {c1}");
            assert!(c2.is_permutation_of(&points), "child2 invalid: {c2}");
        }
    }

    #[test]
    fn test_crossover_leaves_parents_untouched() {
        let mut rng = create_rng(3);
        let points = line(8);
        let a = Chromosome::create(&points, &mut rng).unwrap();
        let b = Chromosome::create(&points, &mut rng).unwrap();
        let (a_before, b_before) = (a.clone(), b.clone());
        let _ = a.cross_over(&b).unwrap();
        assert_eq!(a, a_before);
        assert_eq!(b, b_before);
    }

    #[test]
    fn test_crossover_identical_parents() {
        let a = Chromosome::from_genes(line(6));
        let (c1, c2) = a.cross_over(&a).unwrap();
        assert_eq!(c1, a);
        // second half moves to the front
        assert_eq!(c2.genes()[0], Gene::new(3.0, 0.0));
        assert!(c2.is_permutation_of(a.genes()));
    }

    #[test]
    fn test_crossover_single_city() {
        let a = Chromosome::from_genes(line(1));
        let (c1, c2) = a.cross_over(&a).unwrap();
        assert_eq!(c1, a);
        assert_eq!(c2, a);
    }

    #[test]
    fn test_crossover_rejects_length_mismatch() {
        let a = Chromosome::from_genes(line(5));
        let b = Chromosome::from_genes(line(4));
        assert!(matches!(a.cross_over(&b), Err(TspError::InvalidInput(_))));
    }

    #[test]
    fn test_crossover_rejects_different_gene_sets() {
        let a = Chromosome::from_genes(line(3));
        let b = Chromosome::from_genes(genes(&[(0.0, 0.0), (1.0, 0.0), (9.0, 9.0)]));
        assert!(matches!(a.cross_over(&b), Err(TspError::InvalidInput(_))));
    }

    // ---- mutate ----

    #[test]
    fn test_mutate_single_swap_changes_two_positions() {
        let mut rng = create_rng(42);
        let original = Chromosome::from_genes(line(10));
        for _ in 0..100 {
            let mutated = original.mutate(1, &mut rng);
            assert_eq!(positions_changed(&original, &mutated), 2);
            assert!(mutated.is_permutation_of(original.genes()));
        }
    }

    #[test]
    fn test_mutate_leaves_parent_untouched() {
        let mut rng = create_rng(42);
        let original = Chromosome::from_genes(line(10));
        let snapshot = original.clone();
        let _ = original.mutate(5, &mut rng);
        assert_eq!(original, snapshot);
    }

    #[test]
    fn test_mutate_two_cities_always_swaps() {
        let mut rng = create_rng(42);
        let original = Chromosome::from_genes(line(2));
        let mutated = original.mutate(1, &mut rng);
        assert_eq!(mutated, original.reversed());
    }

    #[test]
    fn test_mutate_single_city_unchanged() {
        let mut rng = create_rng(42);
        let original = Chromosome::from_genes(line(1));
        assert_eq!(original.mutate(3, &mut rng), original);
    }

    #[test]
    fn test_mutate_zero_severity_is_copy() {
        let mut rng = create_rng(42);
        let original = Chromosome::from_genes(line(6));
        assert_eq!(original.mutate(0, &mut rng), original);
    }

    #[test]
    fn test_display() {
        let c = Chromosome::from_genes(genes(&[(0.0, 0.0), (1.0, 2.0)]));
        assert_eq!(c.to_string(), "(0, 0) : (1, 2)");
    }

    // ---- property tests ----

    fn distinct_points() -> impl Strategy<Value = Vec<Gene>> {
        proptest::collection::hash_set((-500i32..500, -500i32..500), 1..40).prop_map(|set| {
            set.into_iter()
                .map(|(x, y)| Gene::new(x as f64, y as f64))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_operators_preserve_permutation(
            points in distinct_points(),
            seed in any::<u64>(),
            severity in 0usize..6,
        ) {
            let mut rng = create_rng(seed);
            let a = Chromosome::create(&points, &mut rng).unwrap();
            let b = Chromosome::create(&points, &mut rng).unwrap();
            prop_assert!(a.is_permutation_of(&points));

            let (c1, c2) = a.cross_over(&b).unwrap();
            prop_assert!(c1.is_permutation_of(&points));
            prop_assert!(c2.is_permutation_of(&points));

            let m = c1.mutate(severity, &mut rng);
            prop_assert!(m.is_permutation_of(&points));
        }

        #[test]
        fn prop_reversal_keeps_distance(points in distinct_points(), seed in any::<u64>()) {
            let mut rng = create_rng(seed);
            let c = Chromosome::create(&points, &mut rng).unwrap();
            let forward = c.calculate_distance();
            let backward = c.reversed().calculate_distance();
            prop_assert!((forward - backward).abs() <= 1e-9 * forward.max(1.0));
        }
    }
}
