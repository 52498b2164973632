//! Benchmark for noise sampling.
//!
//! Run with: cargo bench --package terracube_procedural --bench noise_benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use terracube_procedural::{BiomeSelector, NoiseField, WorldSeed};

fn benchmark_single_sample(c: &mut Criterion) {
    let field = NoiseField::new(WorldSeed::new(42));

    c.bench_function("noise_sample", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 0.37;
            black_box(field.sample(black_box(x), black_box(x * 0.5)))
        });
    });
}

fn benchmark_octaves(c: &mut Criterion) {
    let field = NoiseField::new(WorldSeed::new(42));
    let mut group = c.benchmark_group("octave_sample");

    for octaves in [1u32, 4, 8] {
        group.bench_function(format!("{octaves}_octaves"), |b| {
            let mut x = 0.0f64;
            b.iter(|| {
                x += 1.0;
                black_box(field.octave_sample(black_box(x), black_box(-x), octaves))
            });
        });
    }

    group.finish();
}

fn benchmark_chunk_heightmap(c: &mut Criterion) {
    let field = NoiseField::new(WorldSeed::new(42));
    let mut group = c.benchmark_group("heightmap");
    group.throughput(Throughput::Elements(256));

    group.bench_function("16x16_columns", |b| {
        b.iter(|| {
            for z in 0..16 {
                for x in 0..16 {
                    black_box(field.octave_sample(f64::from(x), f64::from(z), 4));
                }
            }
        });
    });

    group.finish();
}

fn benchmark_biome_selection(c: &mut Criterion) {
    let selector = BiomeSelector::with_builtin(WorldSeed::new(42));

    c.bench_function("biome_selection_per_column", |b| {
        let mut x = 0.0f64;
        b.iter(|| {
            x += 1.0;
            black_box(selector.biome_index(black_box(x), black_box(x * 0.7)))
        });
    });
}

criterion_group!(
    benches,
    benchmark_single_sample,
    benchmark_octaves,
    benchmark_chunk_heightmap,
    benchmark_biome_selection
);
criterion_main!(benches);
