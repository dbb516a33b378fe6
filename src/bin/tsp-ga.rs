//! Command-line front end: load or generate cities, evolve, print the tour.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tsp_ga::cities::{parse_points, random_points};
use tsp_ga::ga::{GaConfig, GaRunner, Selection};
use tsp_ga::random::create_rng;

/// tsp-ga: approximate Traveling Salesman tours by genetic algorithm
///
/// Reads cities (one `x y` pair per line) from a file, or generates a random
/// map, and prints the shortest open path found.
#[derive(Parser, Debug)]
#[command(name = "tsp-ga")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// City list file (`x y` or `x,y` per line, `#` comments)
    #[arg(short, long, conflicts_with = "random")]
    input: Option<PathBuf>,

    /// Generate this many random cities instead of reading a file
    #[arg(short, long)]
    random: Option<usize>,

    /// Side length of the square random cities are placed in
    #[arg(long, default_value = "1000.0")]
    extent: f64,

    /// Population size
    #[arg(short = 'n', long, default_value = "100")]
    population_size: usize,

    /// Maximum number of generations
    #[arg(short = 'g', long, default_value = "500")]
    generations: usize,

    /// Probability of mutating each offspring
    #[arg(long, default_value = "0.1")]
    mutation_rate: f64,

    /// Number of swaps per mutation
    #[arg(long, default_value = "2")]
    mutation_severity: usize,

    /// Stop after this many generations without improvement (0 disables)
    #[arg(long, default_value = "50")]
    stagnation_limit: usize,

    /// Do not carry the best tour into the next generation
    #[arg(long)]
    no_elitism: bool,

    /// Parent selection strategy
    #[arg(long, value_enum, default_value = "tournament")]
    selection: SelectionArg,

    /// Tournament size, or pool size for truncation selection
    #[arg(long, default_value = "3")]
    selection_size: usize,

    /// Evaluate tour lengths on all cores (needs the `parallel` feature)
    #[arg(long)]
    parallel: bool,

    /// Random seed (also used for `--random` city generation)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SelectionArg {
    Tournament,
    Roulette,
    Rank,
    Truncation,
}

impl Cli {
    fn selection(&self) -> Selection {
        match self.selection {
            SelectionArg::Tournament => Selection::Tournament(self.selection_size),
            SelectionArg::Roulette => Selection::Roulette,
            SelectionArg::Rank => Selection::Rank,
            SelectionArg::Truncation => Selection::Truncation(self.selection_size),
        }
    }

    fn config(&self) -> GaConfig {
        let mut config = GaConfig::default()
            .with_population_size(self.population_size)
            .with_max_generations(self.generations)
            .with_mutation_rate(self.mutation_rate)
            .with_mutation_severity(self.mutation_severity)
            .with_stagnation_limit(self.stagnation_limit)
            .with_elitism(!self.no_elitism)
            .with_selection(self.selection())
            .with_parallel(self.parallel);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cities = match (&cli.input, cli.random) {
        (Some(path), _) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parse_points(&text).with_context(|| format!("failed to parse {}", path.display()))?
        }
        (None, Some(n)) => {
            if !cli.extent.is_finite() || cli.extent <= 0.0 {
                bail!("--extent must be a positive number");
            }
            let mut rng = create_rng(cli.seed.unwrap_or_else(rand::random));
            random_points(n, cli.extent, &mut rng)
        }
        (None, None) => bail!("either --input or --random is required"),
    };

    let result = GaRunner::run(&cities, &cli.config()).context("evolution failed")?;

    println!("cities:          {}", cities.len());
    println!("generations:     {} ({:?})", result.generations, result.stop_reason);
    println!("path distance:   {:.4}", result.best_distance);
    println!("closed distance: {:.4}", result.best.closed_distance());
    println!("tour:");
    for gene in result.best.genes() {
        println!("  {} {}", gene.x(), gene.y());
    }

    Ok(())
}
