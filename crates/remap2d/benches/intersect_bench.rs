//! Criterion benchmarks for the polygon overlap kernel.
//! Focus sizes: vertex counts n in {3, 8, 32, 128}, plus one arc polygon.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p remap2d

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use nalgebra::Vector2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use remap2d::geom2::{Arena, Chain, GeomCfg};

/// Convex polygon with `n` vertices on a jittered circle.
fn random_convex(n: usize, center: Vector2<f64>, seed: u64) -> Vec<Vector2<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let phase: f64 = rng.gen::<f64>() * std::f64::consts::TAU;
    (0..n)
        .map(|i| {
            let t = phase + std::f64::consts::TAU * (i as f64 + rng.gen_range(-0.3..0.3)) / n as f64;
            center + Vector2::new(t.cos(), t.sin())
        })
        .collect()
}

fn bench_overlap(c: &mut Criterion) {
    let cfg = GeomCfg::default();
    let mut group = c.benchmark_group("overlap");
    for &n in &[3usize, 8, 32, 128] {
        group.bench_with_input(BenchmarkId::new("linear", n), &n, |b, &n| {
            b.iter_batched(
                || {
                    (
                        random_convex(n, Vector2::zeros(), 41),
                        random_convex(n, Vector2::new(0.4, 0.3), 42),
                    )
                },
                |(p, q)| {
                    let mut arena = Arena::new();
                    let cp = Chain::build_linear_polygon(&mut arena, &p);
                    let cq = Chain::build_linear_polygon(&mut arena, &q);
                    let _a = cp.intersect_with_abs(&cq, &mut arena, &cfg).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.bench_function("arc_disc_vs_square", |b| {
        let disc = [
            Vector2::new(1.0, 0.0),
            Vector2::new(-1.0, 0.0),
            Vector2::new(0.0, 1.0),
            Vector2::new(0.0, -1.0),
        ];
        let square = [
            Vector2::new(0.0, 0.0),
            Vector2::new(2.0, 0.0),
            Vector2::new(2.0, 2.0),
            Vector2::new(0.0, 2.0),
        ];
        b.iter(|| {
            let mut arena = Arena::new();
            let cd = Chain::build_arc_circle_polygon(&mut arena, &disc, &cfg).unwrap();
            let cs = Chain::build_linear_polygon(&mut arena, &square);
            let _a = cd.intersect_with_abs(&cs, &mut arena, &cfg).unwrap();
        })
    });
    group.finish();
}

criterion_group!(benches, bench_overlap);
criterion_main!(benches);
