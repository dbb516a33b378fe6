//! Selection strategies for choosing breeding candidates.
//!
//! Selection determines which tours are chosen as parents for crossover.
//! Different strategies provide different selection pressure.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use rand::Rng;

/// Selection strategy for choosing parents.
///
/// All strategies assume **minimization** (shorter tour = better).
///
/// # Examples
///
/// ```
/// use tsp_ga::ga::Selection;
///
/// // Tournament with size 3 (moderate selection pressure)
/// let sel = Selection::Tournament(3);
///
/// // Only the 10 shortest tours may breed
/// let sel = Selection::Truncation(10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Tournament selection: pick `k` tours at random, select the shortest.
    ///
    /// Higher `k` = stronger selection pressure.
    /// - k=2: light pressure (good for diversity)
    /// - k=3-5: moderate pressure (typical default)
    /// - k>5: strong pressure (risk of premature convergence)
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),

    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// Since we minimize, weights are `max_distance - distance + ε`.
    ///
    /// **Warning**: the longest tour gets almost no weight, and when all
    /// distances are close together selection is nearly uniform.
    ///
    /// # Complexity
    /// O(n) per selection (linear scan)
    Roulette,

    /// Linear rank selection: the tour at rank `r` (0 = shortest) has
    /// weight `n - r`.
    ///
    /// Reference: Baker (1985), "Adaptive Selection Methods for Genetic
    /// Algorithms"
    ///
    /// # Complexity
    /// O(n) per selection
    Rank,

    /// Truncation selection: uniform choice among the `k` shortest tours.
    ///
    /// `k` is clamped to `1..=n`.
    ///
    /// # Complexity
    /// O(1) per selection
    Truncation(usize),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Selects a parent index.
    ///
    /// `fitness[i]` is the distance of tour `i`; `order` lists the indices
    /// of `fitness` sorted shortest first (see [`ranking`]).
    ///
    /// # Panics
    /// Panics if `fitness` is empty.
    pub fn select<R: Rng>(&self, fitness: &[f64], order: &[usize], rng: &mut R) -> usize {
        assert!(!fitness.is_empty(), "cannot select from empty population");
        debug_assert_eq!(fitness.len(), order.len());

        match self {
            Selection::Tournament(k) => tournament(fitness, *k, rng),
            Selection::Roulette => roulette(fitness, rng),
            Selection::Rank => rank(order, rng),
            Selection::Truncation(k) => truncation(order, *k, rng),
        }
    }
}

/// Indices of `fitness` sorted ascending (shortest first).
///
/// The sort is stable, so ties keep their original relative order.
pub fn ranking(fitness: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fitness.len()).collect();
    order.sort_by(|&a, &b| fitness[a].total_cmp(&fitness[b]));
    order
}

/// Tournament selection: pick k random tours, return the shortest.
fn tournament<R: Rng>(fitness: &[f64], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = fitness.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if fitness[idx] < fitness[best_idx] {
            best_idx = idx;
        }
    }
    best_idx
}

/// Roulette wheel selection using inverse fitness transformation.
fn roulette<R: Rng>(fitness: &[f64], rng: &mut R) -> usize {
    let n = fitness.len();
    if n == 1 {
        return 0;
    }

    let max_fitness = fitness.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let epsilon = 1e-10;

    let weights: Vec<f64> = fitness
        .iter()
        .map(|&f| (max_fitness - f + epsilon).max(epsilon))
        .collect();

    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }

    n - 1 // floating-point fallback
}

/// Linear rank selection over a precomputed ranking.
fn rank<R: Rng>(order: &[usize], rng: &mut R) -> usize {
    let n = order.len();
    if n == 1 {
        return order[0];
    }

    // weight_r = n - r, total = n(n+1)/2
    let total: f64 = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;

    for (r, &idx) in order.iter().enumerate() {
        cumulative += (n - r) as f64;
        if cumulative > threshold {
            return idx;
        }
    }

    order[n - 1]
}

fn truncation<R: Rng>(order: &[usize], k: usize, rng: &mut R) -> usize {
    let k = k.clamp(1, order.len());
    order[rng.random_range(0..k)]
}
