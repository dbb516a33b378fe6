//! Criterion benchmarks for the TSP genetic algorithm.
//!
//! Uses seeded random city maps so timings are comparable across runs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tsp_ga::cities::random_points;
use tsp_ga::ga::{Chromosome, GaConfig, GaRunner};
use tsp_ga::random::create_rng;

fn bench_crossover(c: &mut Criterion) {
    let mut group = c.benchmark_group("crossover");

    for &n in &[20usize, 100, 500] {
        let mut rng = create_rng(42);
        let cities = random_points(n, 1000.0, &mut rng);
        let a = Chromosome::create(&cities, &mut rng).unwrap();
        let b = Chromosome::create(&cities, &mut rng).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &(a, b), |bench, (a, b)| {
            bench.iter(|| black_box(a.cross_over(black_box(b)).unwrap()))
        });
    }
    group.finish();
}

fn bench_mutate(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutate");

    for &n in &[20usize, 100, 500] {
        let mut rng = create_rng(42);
        let cities = random_points(n, 1000.0, &mut rng);
        let tour = Chromosome::create(&cities, &mut rng).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &tour, |bench, tour| {
            bench.iter(|| black_box(tour.mutate(2, &mut rng)))
        });
    }
    group.finish();
}

fn bench_ga_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_run");
    group.sample_size(10);

    for (cities, pop, gen) in [(20usize, 50usize, 50usize), (50, 100, 30), (100, 100, 20)] {
        let points = random_points(cities, 1000.0, &mut create_rng(7));
        let config = GaConfig {
            population_size: pop,
            max_generations: gen,
            stagnation_limit: 0,
            seed: Some(42),
            ..GaConfig::default()
        };
        group.bench_with_input(
            BenchmarkId::new(format!("c{}_p{}_g{}", cities, pop, gen), cities),
            &(points, config),
            |b, (p, c)| {
                b.iter(|| {
                    let result = GaRunner::run(black_box(p), black_box(c)).unwrap();
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_crossover, bench_mutate, bench_ga_run);
criterion_main!(benches);
