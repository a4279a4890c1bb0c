//! Benchmarks for the per-frame field step.
//!
//! The connection pass is pairwise (O(N^2)); these benches document where the
//! comfortable ceiling sits before a spatial grid would be needed.

use constellation::ParticleField;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn seeded_field(count: u32) -> ParticleField {
    ParticleField::with_rng(1920, 1080, count, SmallRng::seed_from_u64(7))
}

fn bench_advance(c: &mut Criterion) {
    let mut field = seeded_field(50);
    c.bench_function("advance_50", |b| {
        b.iter(|| {
            field.advance();
            black_box(field.particles().len())
        })
    });
}

fn bench_connections(c: &mut Criterion) {
    for count in [50, 200, 500] {
        let field = seeded_field(count);
        let mut out = Vec::with_capacity(ParticleField::max_connections(count) as usize);
        c.bench_function(&format!("connections_{}", count), |b| {
            b.iter(|| {
                field.connections(&mut out);
                black_box(out.len())
            })
        });
    }
}

criterion_group!(benches, bench_advance, bench_connections);
criterion_main!(benches);
