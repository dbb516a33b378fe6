//! Approximate Traveling Salesman tours by genetic algorithm.
//!
//! A population of random tours evolves through selection, half-split
//! order-preserving crossover, and swap mutation until a short tour
//! emerges:
//!
//! ```
//! use tsp_ga::ga::{GaConfig, GaRunner};
//! use tsp_ga::cities::parse_points;
//!
//! let cities = parse_points("0 0\n1 0\n1 1\n0 1\n").unwrap();
//! let result = GaRunner::run(&cities, &GaConfig::fast().with_seed(7)).unwrap();
//! println!("{:.3}: {}", result.best_distance, result.best);
//! ```
//!
//! # Modules
//!
//! - [`ga`]: genes, chromosomes, populations and the generational driver
//! - [`cities`]: plain-text city lists and random city maps
//! - [`random`]: seeded generators for reproducible runs
//!
//! The engine is a pure in-process computation: no I/O happens inside the
//! generational loop, and progress is reported through `tracing` events.
//! Enable the `parallel` feature to evaluate tour lengths on rayon, and
//! the `serde` feature to (de)serialize configurations and cities.

pub mod cities;
mod error;
pub mod ga;
pub mod random;

pub use error::{Result, TspError};
