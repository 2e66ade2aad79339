//! Criterion benchmarks for generation throughput and canonicalization.
//!
//! - generate: full runs over 3–5 loose points, two iterations.
//! - canonical_form: from-scratch canonicalization of seeded random configurations.
//!
//! Results live under `target/criterion`.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use geogen::matcher::match_all;
use geogen::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn catalog() -> Catalog {
    let point = || Param::Object(ObjectType::Point);
    let line = || Param::Object(ObjectType::Line);
    let mut c = Catalog::new();
    c.add("Midpoint", vec![Param::set(point(), 2)], vec![ObjectType::Point])
        .unwrap();
    c.add("LineThrough", vec![Param::set(point(), 2)], vec![ObjectType::Line])
        .unwrap();
    c.add("Projection", vec![point(), line()], vec![ObjectType::Point])
        .unwrap();
    c.add("Intersection", vec![Param::set(line(), 2)], vec![ObjectType::Point])
        .unwrap();
    c
}

fn loose_points(n: usize) -> (ObjectRegistry, Configuration) {
    let mut registry = ObjectRegistry::new();
    for i in 0..n {
        registry
            .add_loose(ObjectType::Point, format!("P{i}"))
            .unwrap();
    }
    let config = Configuration::from_loose(registry.loose_objects());
    (registry, config)
}

/// Random walk of `steps` constructions from `n` loose points.
fn random_configuration(
    catalog: &Catalog,
    n: usize,
    steps: usize,
    seed: u64,
) -> (ObjectRegistry, Configuration) {
    let mut rng = StdRng::seed_from_u64(seed);
    let (mut registry, mut config) = loose_points(n);
    for _ in 0..steps {
        let options: Vec<_> = catalog
            .iter()
            .flat_map(|c| {
                match_all(&c.signature, config.inventory())
                    .into_iter()
                    .map(move |t| (c.id, t))
            })
            .collect();
        if options.is_empty() {
            break;
        }
        let (cid, args) = options[rng.gen_range(0..options.len())].clone();
        let candidate = catalog
            .candidate(cid, args, 0, |id| registry.object_type(id))
            .unwrap();
        let id = registry.intern(candidate).unwrap().id;
        let ty = registry.object_type(id).unwrap();
        if !config.contains(ty, id) {
            config.push_constructed(&registry, id).unwrap();
        }
    }
    (registry, config)
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    group.sample_size(10);
    let catalog = Arc::new(catalog());
    for &n in &[3usize, 4, 5] {
        group.bench_with_input(BenchmarkId::new("two_iterations", n), &n, |b, &n| {
            b.iter_batched(
                || loose_points(n),
                |(registry, initial)| {
                    let out = generate(
                        Arc::clone(&catalog),
                        registry,
                        initial,
                        GenerationSettings::with_iterations(2),
                    )
                    .unwrap();
                    criterion::black_box(out.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_canonical_form(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonical_form");
    let catalog = catalog();
    for &n in &[3usize, 5, 7] {
        let (registry, config) = random_configuration(&catalog, n, 6, 11);
        group.bench_with_input(BenchmarkId::new("from_scratch", n), &n, |b, _| {
            b.iter_batched(
                || {
                    let mut cache = BijectionCache::new();
                    Canonicalizer::for_configuration(&mut cache, &config)
                },
                |mut canon| {
                    let _ = canon.canonical_form(&registry, &config).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_canonical_form);
criterion_main!(benches);
