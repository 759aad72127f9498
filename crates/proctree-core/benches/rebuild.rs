//! Benchmarks for the teardown-then-rebuild cycle over differently shaped
//! source trees.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use parking_lot::RwLock;
use proctree_core::testing::{balanced_tree, chain_tree, flat_tree};
use proctree_core::{LinkedTree, Namespace, Refresher};
use std::hint::black_box;
use std::sync::Arc;

fn refresher_for(tree: LinkedTree) -> Refresher<LinkedTree> {
    Refresher::new(Arc::new(Namespace::new()), Arc::new(RwLock::new(tree)))
}

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("refresh");

    for depth in [100u32, 1_000] {
        group.bench_with_input(BenchmarkId::new("chain", depth), &depth, |b, &depth| {
            let refresher = refresher_for(chain_tree(depth));
            b.iter(|| black_box(refresher.refresh().expect("refresh")));
        });
    }

    for width in [100u32, 1_000] {
        group.bench_with_input(BenchmarkId::new("flat", width), &width, |b, &width| {
            let refresher = refresher_for(flat_tree(width));
            b.iter(|| black_box(refresher.refresh().expect("refresh")));
        });
    }

    // 1 + 8 + 64 + 512 + 4096 nodes
    group.bench_function("balanced_4x8", |b| {
        let refresher = refresher_for(balanced_tree(4, 8));
        b.iter(|| black_box(refresher.refresh().expect("refresh")));
    });

    group.finish();
}

criterion_group!(benches, bench_refresh);
criterion_main!(benches);
