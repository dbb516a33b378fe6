//! Genetic Algorithm for the Traveling Salesman Problem.
//!
//! A population of candidate tours evolves through selection, crossover
//! and mutation. Tours are scored by the length of the open path through
//! their cities; shorter is better.
//!
//! # Key Types
//!
//! - [`Gene`]: a city, with Euclidean [`distance`](Gene::distance)
//! - [`Chromosome`]: one full tour with its crossover and mutation operators
//! - [`Population`]: one generation; ranking and parent selection
//! - [`GaConfig`]: algorithm parameters (population size, rates, presets)
//! - [`Evolution`]: step-wise generational driver
//! - [`GaRunner`]: runs an [`Evolution`] to completion
//! - [`GaResult`]: best tour found with run statistics
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"

mod chromosome;
mod config;
mod gene;
mod population;
mod runner;
mod selection;

pub use chromosome::{Chromosome, DEFAULT_MUTATION_SEVERITY};
pub use config::GaConfig;
pub use gene::Gene;
pub use population::Population;
pub use runner::{Evolution, GaResult, GaRunner, GenerationStats, Phase, StopReason};
pub use selection::{ranking, Selection};
