//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the evolutionary loop.

use super::chromosome::DEFAULT_MUTATION_SEVERITY;
use super::selection::Selection;
use crate::error::{Result, TspError};

/// Configuration for the TSP genetic algorithm.
///
/// Controls population size, selection strategy, operator rates,
/// termination conditions, and parallelism.
///
/// # Defaults
///
/// ```
/// use tsp_ga::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.max_generations, 500);
/// assert!(config.elitism);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use tsp_ga::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_selection(Selection::Tournament(5))
///     .with_mutation_rate(0.1)
///     .with_mutation_severity(3)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GaConfig {
    /// Number of tours in every generation.
    ///
    /// Must be at least 2 so that crossover has two parents.
    pub population_size: usize,

    /// Maximum number of generations before termination.
    pub max_generations: usize,

    /// Selection strategy for choosing parents.
    pub selection: Selection,

    /// Carry the shortest tour of each generation unchanged into the next.
    pub elitism: bool,

    /// Probability of applying crossover to a pair of parents (0.0–1.0).
    ///
    /// When crossover is not applied, the parents are copied unchanged.
    pub crossover_rate: f64,

    /// Probability of mutating each offspring (0.0–1.0).
    pub mutation_rate: f64,

    /// Number of position swaps performed by one mutation.
    pub mutation_severity: usize,

    /// Number of generations with no significant improvement before stopping.
    ///
    /// Set to 0 to disable plateau-based termination.
    pub stagnation_limit: usize,

    /// Minimum relative improvement to reset the stagnation counter.
    ///
    /// When a shorter tour is found the improvement ratio is
    /// `(old - new) / |old|`. Below this threshold the generation still
    /// counts as stagnating. 0.0 counts any improvement.
    pub convergence_threshold: f64,

    /// Whether to evaluate tour lengths in parallel using rayon.
    ///
    /// Only effective with the `parallel` cargo feature.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,

    /// Optional wall-clock time limit in milliseconds.
    ///
    /// Checked between generations, so a run may overshoot by up to one
    /// generation.
    pub time_limit_ms: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            max_generations: 500,
            selection: Selection::default(),
            elitism: true,
            crossover_rate: 1.0,
            mutation_rate: 0.1,
            mutation_severity: DEFAULT_MUTATION_SEVERITY,
            stagnation_limit: 50,
            convergence_threshold: 0.0,
            parallel: false,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Enables or disables elitism.
    pub fn with_elitism(mut self, elitism: bool) -> Self {
        self.elitism = elitism;
        self
    }

    /// Sets the crossover rate. Out-of-range values fail [`validate`](Self::validate).
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the mutation rate. Out-of-range values fail [`validate`](Self::validate).
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the number of swaps per mutation.
    pub fn with_mutation_severity(mut self, severity: usize) -> Self {
        self.mutation_severity = severity;
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the convergence threshold.
    ///
    /// Set to 0.0 to count any improvement (default).
    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold.max(0.0);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock time limit in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Preset for fast runs: small population, few generations.
    ///
    /// - Population: 50, Generations: 200, Time limit: 10s
    /// - Stagnation limit: 30, Convergence threshold: 0.001
    pub fn fast() -> Self {
        Self {
            population_size: 50,
            max_generations: 200,
            stagnation_limit: 30,
            convergence_threshold: 0.001,
            time_limit_ms: Some(10_000),
            ..Self::default()
        }
    }

    /// Preset for balanced runs.
    ///
    /// - Population: 100, Generations: 1000, Time limit: 30s
    /// - Stagnation limit: 100, Convergence threshold: 0.0005
    pub fn balanced() -> Self {
        Self {
            population_size: 100,
            max_generations: 1000,
            stagnation_limit: 100,
            convergence_threshold: 0.0005,
            time_limit_ms: Some(30_000),
            ..Self::default()
        }
    }

    /// Preset for quality runs: large population, many generations.
    ///
    /// - Population: 200, Generations: 5000, Time limit: 60s
    /// - Stagnation limit: 300, Convergence threshold: 0.0
    pub fn quality() -> Self {
        Self {
            population_size: 200,
            max_generations: 5000,
            stagnation_limit: 300,
            convergence_threshold: 0.0,
            time_limit_ms: Some(60_000),
            ..Self::default()
        }
    }

    /// Selects a preset based on the number of cities.
    ///
    /// - `city_count < 20` → [`fast()`](Self::fast)
    /// - `20 ≤ city_count < 100` → [`balanced()`](Self::balanced)
    /// - `city_count ≥ 100` → [`quality()`](Self::quality)
    pub fn auto_select(city_count: usize) -> Self {
        if city_count < 20 {
            Self::fast()
        } else if city_count < 100 {
            Self::balanced()
        } else {
            Self::quality()
        }
    }

    /// Convenience builder for setting tournament size.
    ///
    /// Equivalent to `.with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// [`TspError::Configuration`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(TspError::Configuration(msg.into()));

        if self.population_size < 2 {
            return fail("population_size must be at least 2");
        }
        if self.max_generations == 0 {
            return fail("max_generations must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return fail("mutation_rate must be within [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return fail("crossover_rate must be within [0, 1]");
        }
        if self.mutation_severity == 0 {
            return fail("mutation_severity must be at least 1");
        }
        if self.convergence_threshold.is_nan() || self.convergence_threshold < 0.0 {
            return fail("convergence_threshold must be non-negative");
        }
        if self.time_limit_ms == Some(0) {
            return fail("time_limit_ms must be positive or None");
        }
        Ok(())
    }
}
