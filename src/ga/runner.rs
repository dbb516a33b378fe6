//! GA evolutionary loop execution.
//!
//! [`Evolution`] is the generation-by-generation driver, a small state
//! machine: `Initializing → Evolving → Terminated`. [`GaRunner`] drives an
//! `Evolution` to completion and returns a [`GaResult`].

use super::chromosome::{validate_points, Chromosome};
use super::config::GaConfig;
use super::gene::Gene;
use super::population::Population;
use crate::error::Result;
use crate::random::rng_from_seed;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Lifecycle phase of an [`Evolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No population yet; the next step seeds it.
    Initializing,
    /// Each step produces one new generation.
    Evolving,
    /// A termination condition was met; steps do nothing.
    Terminated,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// `max_generations` generations were produced.
    MaxGenerations,
    /// No sufficient improvement for `stagnation_limit` generations.
    Stagnation,
    /// The wall-clock `time_limit_ms` elapsed.
    TimeLimit,
    /// Aborted between generations by the caller.
    Cancelled,
}

/// Summary of one generation, emitted after every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Generation index; 0 is the initial random population.
    pub generation: usize,

    /// Shortest distance within this generation.
    pub generation_best: f64,

    /// Mean distance over this generation.
    pub mean_distance: f64,

    /// Shortest distance seen in any generation so far.
    pub best_distance: f64,

    /// Consecutive generations without sufficient improvement.
    pub stagnation: usize,
}

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult {
    /// The shortest tour found during the entire run.
    pub best: Chromosome,

    /// Distance of `best` (same as `best.calculate_distance()`).
    pub best_distance: f64,

    /// Number of generations produced after the initial population.
    pub generations: usize,

    /// Which termination condition ended the run.
    pub stop_reason: StopReason,

    /// Best-so-far distance after each generation, starting with the
    /// initial population.
    pub fitness_history: Vec<f64>,
}

struct Progress {
    population: Population,
    best: Chromosome,
    generation: usize,
    stagnation: usize,
    fitness_history: Vec<f64>,
    started: Instant,
}

enum State {
    Initializing,
    Evolving(Progress),
    Terminated(Progress, StopReason),
}

/// Step-wise driver for one GA run.
///
/// All randomness comes from a single generator seeded from
/// [`GaConfig::seed`], so two runs with the same seed, configuration and
/// cities produce identical generations.
///
/// ```
/// use tsp_ga::ga::{Evolution, GaConfig, Gene, Phase};
///
/// let cities = vec![Gene::new(0.0, 0.0), Gene::new(3.0, 0.0), Gene::new(3.0, 4.0)];
/// let config = GaConfig::default()
///     .with_population_size(10)
///     .with_max_generations(5)
///     .with_seed(1);
///
/// let mut evolution = Evolution::new(&cities, config).unwrap();
/// while let Some(stats) = evolution.step() {
///     assert!(stats.best_distance >= 7.0);
/// }
/// assert_eq!(evolution.phase(), Phase::Terminated);
/// ```
pub struct Evolution {
    config: GaConfig,
    points: Vec<Gene>,
    rng: StdRng,
    state: State,
}

impl Evolution {
    /// Prepares a run over `points`.
    ///
    /// # Errors
    /// - [`TspError::Configuration`](crate::TspError::Configuration) if
    ///   `config` fails [`GaConfig::validate`]
    /// - [`TspError::InvalidInput`](crate::TspError::InvalidInput) if
    ///   `points` is empty or has duplicates
    pub fn new(points: &[Gene], config: GaConfig) -> Result<Self> {
        config.validate()?;
        validate_points(points)?;
        let rng = rng_from_seed(config.seed);
        Ok(Self {
            config,
            points: points.to_vec(),
            rng,
            state: State::Initializing,
        })
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        match self.state {
            State::Initializing => Phase::Initializing,
            State::Evolving(_) => Phase::Evolving,
            State::Terminated(..) => Phase::Terminated,
        }
    }

    /// The configuration this run uses.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    fn progress(&self) -> Option<&Progress> {
        match &self.state {
            State::Initializing => None,
            State::Evolving(p) | State::Terminated(p, _) => Some(p),
        }
    }

    /// Index of the latest generation, 0 before and right after seeding.
    pub fn generation(&self) -> usize {
        self.progress().map_or(0, |p| p.generation)
    }

    /// The current population, once seeded.
    pub fn population(&self) -> Option<&Population> {
        self.progress().map(|p| &p.population)
    }

    /// Shortest tour seen in any generation so far.
    pub fn best(&self) -> Option<&Chromosome> {
        self.progress().map(|p| &p.best)
    }

    /// Why the run stopped, once terminated.
    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.state {
            State::Terminated(_, reason) => Some(reason),
            _ => None,
        }
    }

    /// Advances the run by one generation.
    ///
    /// The first call seeds the initial population (generation 0). Returns
    /// `None` once the run has terminated.
    pub fn step(&mut self) -> Option<GenerationStats> {
        match &mut self.state {
            State::Initializing => {
                let progress = seed(&self.config, &self.points, &mut self.rng);
                let stats = progress.stats();
                self.state = State::Evolving(progress);
                Some(stats)
            }
            State::Evolving(progress) => {
                let stats = advance(progress, &self.config, &mut self.rng);
                let elapsed = progress.started.elapsed();
                debug!(
                    generation = stats.generation,
                    best = stats.best_distance,
                    generation_best = stats.generation_best,
                    "generation complete"
                );
                if let Some(reason) = check_termination(&self.config, &stats, elapsed) {
                    self.terminate(reason);
                }
                Some(stats)
            }
            State::Terminated(..) => None,
        }
    }

    /// Stops an evolving run between generations.
    ///
    /// Has no effect before the first step or after termination.
    pub fn cancel(&mut self) {
        if matches!(self.state, State::Evolving(_)) {
            self.terminate(StopReason::Cancelled);
        }
    }

    fn terminate(&mut self, reason: StopReason) {
        self.state = match std::mem::replace(&mut self.state, State::Initializing) {
            State::Evolving(progress) => {
                info!(
                    generations = progress.generation,
                    best = progress.best.calculate_distance(),
                    ?reason,
                    "evolution terminated"
                );
                State::Terminated(progress, reason)
            }
            other => other,
        };
    }

    /// Finishes the run and returns the best tour seen.
    ///
    /// A run that has not terminated is reported as
    /// [`StopReason::Cancelled`]; one that was never stepped is seeded first.
    pub fn into_result(mut self) -> GaResult {
        let (progress, stop_reason) = match self.state {
            State::Initializing => (
                seed(&self.config, &self.points, &mut self.rng),
                StopReason::Cancelled,
            ),
            State::Evolving(progress) => (progress, StopReason::Cancelled),
            State::Terminated(progress, reason) => (progress, reason),
        };

        GaResult {
            best_distance: progress.best.calculate_distance(),
            best: progress.best,
            generations: progress.generation,
            stop_reason,
            fitness_history: progress.fitness_history,
        }
    }
}

impl Progress {
    fn stats(&self) -> GenerationStats {
        let chromosomes = self.population.chromosomes();
        let total: f64 = chromosomes.iter().map(Chromosome::calculate_distance).sum();
        GenerationStats {
            generation: self.generation,
            generation_best: self.population.best().calculate_distance(),
            mean_distance: total / chromosomes.len() as f64,
            best_distance: self.best.calculate_distance(),
            stagnation: self.stagnation,
        }
    }
}

/// Builds the initial random population.
fn seed(config: &GaConfig, points: &[Gene], rng: &mut StdRng) -> Progress {
    info!(
        cities = points.len(),
        population_size = config.population_size,
        max_generations = config.max_generations,
        seed = ?config.seed,
        "starting evolution"
    );

    let chromosomes = (0..config.population_size)
        .map(|_| Chromosome::shuffled(points, rng))
        .collect();
    let population = Population::from_offspring(chromosomes);
    population.evaluate(config.parallel);

    let best = population.best().clone();
    let mut fitness_history = Vec::with_capacity(config.max_generations.min(4096) + 1);
    fitness_history.push(best.calculate_distance());

    Progress {
        population,
        best,
        generation: 0,
        stagnation: 0,
        fitness_history,
        started: Instant::now(),
    }
}

/// Replaces the population with the next generation.
fn advance(progress: &mut Progress, config: &GaConfig, rng: &mut StdRng) -> GenerationStats {
    let size = config.population_size;
    let population = &mut progress.population;
    population.rank();

    let mut next: Vec<Chromosome> = Vec::with_capacity(size);
    if config.elitism {
        next.push(population.best().clone());
    }

    let needed = size - next.len();
    let parents = population.select_parents(needed + needed % 2, config.selection, rng);

    for pair in parents.chunks_exact(2) {
        let (a, b) = (pair[0], pair[1]);
        let (c1, c2) = if rng.random_range(0.0..1.0) < config.crossover_rate {
            a.cross_over_unchecked(b)
        } else {
            (a.clone(), b.clone())
        };

        for child in [c1, c2] {
            if next.len() >= size {
                break;
            }
            let child = if rng.random_range(0.0..1.0) < config.mutation_rate {
                child.mutate(config.mutation_severity, rng)
            } else {
                child
            };
            next.push(child);
        }
    }

    *population = Population::from_offspring(next);
    population.evaluate(config.parallel);
    progress.generation += 1;

    let gen_best = population.best();
    let old = progress.best.calculate_distance();
    let new = gen_best.calculate_distance();
    if new < old {
        let improvement = if old.abs() > f64::EPSILON {
            (old - new) / old.abs()
        } else {
            f64::INFINITY
        };
        if improvement >= config.convergence_threshold {
            progress.stagnation = 0;
        } else {
            progress.stagnation += 1;
        }
        progress.best = gen_best.clone();
    } else {
        progress.stagnation += 1;
    }

    progress.fitness_history.push(progress.best.calculate_distance());
    progress.stats()
}

fn check_termination(
    config: &GaConfig,
    stats: &GenerationStats,
    elapsed: Duration,
) -> Option<StopReason> {
    if config.stagnation_limit > 0 && stats.stagnation >= config.stagnation_limit {
        return Some(StopReason::Stagnation);
    }
    if stats.generation >= config.max_generations {
        return Some(StopReason::MaxGenerations);
    }
    if let Some(limit) = config.time_limit_ms {
        if elapsed >= Duration::from_millis(limit) {
            return Some(StopReason::TimeLimit);
        }
    }
    None
}

/// Executes a complete GA run.
///
/// # Usage
///
/// ```
/// use tsp_ga::ga::{GaConfig, GaRunner, Gene};
///
/// let cities = vec![
///     Gene::new(0.0, 0.0),
///     Gene::new(1.0, 0.0),
///     Gene::new(1.0, 1.0),
///     Gene::new(0.0, 1.0),
/// ];
/// let config = GaConfig::default().with_population_size(20).with_seed(42);
/// let result = GaRunner::run(&cities, &config).unwrap();
/// assert!((result.best_distance - 3.0).abs() < 1e-9);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA until a termination condition is met.
    ///
    /// # Errors
    /// See [`Evolution::new`].
    pub fn run(points: &[Gene], config: &GaConfig) -> Result<GaResult> {
        Self::run_with_callback(points, config, None, |_| {})
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// If `cancel` is `Some` and the flag is set to `true`, the GA stops
    /// before producing the next generation and returns the best tour found
    /// so far.
    pub fn run_with_cancel(
        points: &[Gene],
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult> {
        Self::run_with_callback(points, config, cancel, |_| {})
    }

    /// Like [`run_with_cancel`](Self::run_with_cancel), calling
    /// `on_generation` after every generation (including generation 0).
    #[instrument(level = "info", skip_all, fields(cities = points.len()))]
    pub fn run_with_callback<F>(
        points: &[Gene],
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
        mut on_generation: F,
    ) -> Result<GaResult>
    where
        F: FnMut(&GenerationStats),
    {
        let mut evolution = Evolution::new(points, config.clone())?;

        while let Some(stats) = evolution.step() {
            on_generation(&stats);

            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    evolution.cancel();
                }
            }
        }

        Ok(evolution.into_result())
    }
}

// ============================================================================
// Tests
// ============================================================================
