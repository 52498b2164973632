//! Benchmark for visible-voxel extraction.
//!
//! Run with: cargo bench --package terracube_rendering --bench extraction_benchmark

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use terracube_procedural::{ChunkCoord, ChunkGenerator, WorldSeed};
use terracube_rendering::{ExtractionCache, VisibleVoxelExtractor};
use terracube_shared::{BlockRegistry, CHUNK_VOLUME};

fn benchmark_extract_generated(c: &mut Criterion) {
    let registry = Arc::new(BlockRegistry::builtin());
    let extractor = VisibleVoxelExtractor::new(&registry);
    let gen = ChunkGenerator::with_defaults(WorldSeed::new(42), registry);
    let chunks: Vec<_> = (0..8).map(|i| gen.generate(ChunkCoord::new(i, -i))).collect();

    let mut group = c.benchmark_group("extraction");
    group.throughput(Throughput::Elements(CHUNK_VOLUME as u64));
    group.bench_function("generated_chunk", |b| {
        let mut i = 0usize;
        b.iter(|| {
            i = (i + 1) % chunks.len();
            black_box(extractor.extract(&chunks[i]))
        });
    });
    group.finish();
}

fn benchmark_cache_hit(c: &mut Criterion) {
    let registry = Arc::new(BlockRegistry::builtin());
    let extractor = VisibleVoxelExtractor::new(&registry);
    let gen = ChunkGenerator::with_defaults(WorldSeed::new(42), registry);
    let chunk = gen.generate(ChunkCoord::new(0, 0));
    let mut cache = ExtractionCache::new();

    c.bench_function("extraction_cache_hit", |b| {
        b.iter(|| black_box(cache.instances(&extractor, &chunk).len()));
    });
}

criterion_group!(benches, benchmark_extract_generated, benchmark_cache_hit);
criterion_main!(benches);
