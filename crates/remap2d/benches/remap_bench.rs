//! Criterion benchmarks for matrix assembly and transfer.
//! Focus sizes: grids of k x k cells, k in {4, 8, 16, 32}.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p remap2d

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use remap2d::gen::{linear_field, perturbed_grid, GridCfg, ReplayToken};
use remap2d::remap::{options, Discretization, Nature, Remapper};

fn grid(k: usize, triangles: bool, seed: u64) -> remap2d::remap::Mesh {
    let cfg = GridCfg {
        nx: k,
        ny: k,
        triangles,
        ..GridCfg::default()
    };
    perturbed_grid(cfg, ReplayToken::new(seed)).unwrap()
}

fn bench_remap(c: &mut Criterion) {
    let mut group = c.benchmark_group("remap");
    for &k in &[4usize, 8, 16, 32] {
        let src = grid(k, false, 7);
        let trg = grid(k + k / 2, true, 8);
        for parallel in [false, true] {
            let id = if parallel { "prepare_par" } else { "prepare_seq" };
            group.bench_with_input(BenchmarkId::new(id, k), &k, |b, _| {
                b.iter_batched(
                    || {
                        let mut r = Remapper::new();
                        r.set_option_bool(options::PARALLEL, parallel);
                        r
                    },
                    |mut r| r.prepare(&src, &trg, Discretization::P0P0).unwrap(),
                    BatchSize::SmallInput,
                )
            });
        }

        let mut r = Remapper::new();
        r.prepare(&src, &trg, Discretization::P0P0).unwrap();
        r.set_nature(Nature::IntensiveMaximum);
        let values = linear_field(&src, 1.0, 2.0, -1.0);
        group.bench_with_input(BenchmarkId::new("transfer", k), &k, |b, _| {
            b.iter(|| {
                let _out = r.transfer(&values, 1, 0.0).unwrap();
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_remap);
criterion_main!(benches);
