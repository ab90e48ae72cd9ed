//! Criterion benchmarks for the selection pipeline.
//!
//! Uses synthetic random populations in the unit cube to measure pure
//! algorithm cost, independent of any evaluator.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gepa_select::random::create_rng;
use gepa_select::{
    Candidate, CrowdingDistanceSelector, DominanceComparator, FitnessSharing, SharingConfig,
    TournamentConfig, TournamentSelector,
};
use rand::Rng;

// ===========================================================================
// Synthetic populations
// ===========================================================================

fn random_population(n: usize, objectives: usize, seed: u64) -> Vec<Candidate> {
    let mut rng = create_rng(seed);
    (0..n)
        .map(|i| {
            (0..objectives).fold(
                Candidate::new(format!("c{i}"), "").with_fitness(rng.random_range(0.0..1.0)),
                |c, m| c.with_normalized_objective(format!("obj{m}"), rng.random_range(0.0..1.0)),
            )
        })
        .collect()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_non_dominated_sort(c: &mut Criterion) {
    let mut group = c.benchmark_group("non_dominated_sort");
    group.sample_size(20);

    for &n in &[50usize, 100, 200] {
        let pop = random_population(n, 3, 42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &pop, |b, pop| {
            b.iter(|| black_box(DominanceComparator::fast_non_dominated_sort(black_box(pop))))
        });
    }
    group.finish();
}

fn bench_environmental_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("environmental_selection");
    group.sample_size(20);

    for &n in &[100usize, 200, 400] {
        let pop = random_population(n, 3, 7);
        group.bench_with_input(BenchmarkId::from_parameter(n), &pop, |b, pop| {
            b.iter(|| {
                black_box(CrowdingDistanceSelector::environmental_selection(
                    black_box(pop),
                    pop.len() / 2,
                ))
            })
        });
    }
    group.finish();
}

fn bench_fitness_sharing(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitness_sharing");
    group.sample_size(20);

    let config = SharingConfig::default().with_niche_radius(0.2);
    for &n in &[50usize, 100, 200] {
        let pop = random_population(n, 3, 11);
        group.bench_with_input(BenchmarkId::from_parameter(n), &pop, |b, pop| {
            b.iter(|| black_box(FitnessSharing::apply_sharing(black_box(pop), &config)))
        });
    }
    group.finish();
}

fn bench_tournament(c: &mut Criterion) {
    let mut group = c.benchmark_group("tournament_select");

    for &n in &[50usize, 200] {
        let pop = random_population(n, 3, 13);
        let ranked = CrowdingDistanceSelector::environmental_selection(&pop, n);
        let config = TournamentConfig::new(n).with_tournament_size(3);
        group.bench_with_input(BenchmarkId::from_parameter(n), &ranked, |b, ranked| {
            let mut rng = create_rng(42);
            b.iter(|| black_box(TournamentSelector::select(black_box(ranked), &config, &mut rng)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_non_dominated_sort,
    bench_environmental_selection,
    bench_fitness_sharing,
    bench_tournament
);
criterion_main!(benches);
