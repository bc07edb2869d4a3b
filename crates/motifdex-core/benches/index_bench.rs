//! # Index Benchmarks
//!
//! Performance benchmarks for the oracle, mining and feature indexing.
//!
//! Run with: `cargo bench -p motifdex-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use motifdex_core::{
    FallbackEnumerator, FeatureIndexer, Graph, GraphId, Label, Matcher, NodeId,
    is_subgraph_isomorphic,
};
use std::hint::black_box;

/// A ring of `size` nodes with alternating labels and one chord per 5 nodes.
fn create_ring_graph(id: u64, size: usize) -> Graph {
    let mut graph = Graph::new(GraphId(id));
    for i in 0..size {
        graph
            .add_node(NodeId(i as u64), Label::new((i % 3) as i64))
            .expect("node");
    }
    for i in 0..size {
        let next = (i + 1) % size;
        graph
            .add_edge(NodeId(i as u64), NodeId(next as u64), Label::new((i % 2) as i64))
            .expect("edge");
        if i % 5 == 0 && size > 3 {
            let across = (i + size / 2) % size;
            let _ = graph.add_edge(NodeId(i as u64), NodeId(across as u64), Label::new(2));
        }
    }
    graph
}

/// A path of `size` nodes cut from the same label scheme.
fn create_path_pattern(size: usize) -> Graph {
    let mut graph = Graph::new(GraphId(0));
    for i in 0..size {
        graph
            .add_node(NodeId(i as u64), Label::new((i % 3) as i64))
            .expect("node");
    }
    for i in 1..size {
        graph
            .add_edge(NodeId(i as u64 - 1), NodeId(i as u64), Label::new(((i - 1) % 2) as i64))
            .expect("edge");
    }
    graph
}

fn create_database(count: usize, size: usize) -> Vec<Graph> {
    (0..count)
        .map(|i| create_ring_graph(i as u64, size + i % 7))
        .collect()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_oracle(c: &mut Criterion) {
    let mut group = c.benchmark_group("subgraph_isomorphism");

    for size in [20, 100, 500].iter() {
        let target = create_ring_graph(0, *size);
        let pattern = create_path_pattern(5);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(is_subgraph_isomorphic(&pattern, &target)));
        });
    }

    group.finish();
}

fn bench_matcher_reuse(c: &mut Criterion) {
    let database = create_database(200, 30);
    let matcher = Matcher::new(&create_path_pattern(4));

    c.bench_function("matcher_reuse_200_graphs", |b| {
        b.iter(|| {
            let hits = database.iter().filter(|g| matcher.matches(g)).count();
            black_box(hits)
        });
    });
}

fn bench_fallback_mining(c: &mut Criterion) {
    let mut group = c.benchmark_group("fallback_mining");

    for count in [50, 200].iter() {
        let database = create_database(*count, 25);
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| black_box(FallbackEnumerator::new().mine(&database, 0.05)));
        });
    }

    group.finish();
}

fn bench_feature_indexing(c: &mut Criterion) {
    let database = create_database(200, 30);
    let patterns = FallbackEnumerator::new().mine(&database, 0.05);

    c.bench_function("feature_indexing_200_graphs", |b| {
        b.iter(|| black_box(FeatureIndexer::build(&database, &patterns)));
    });
}

criterion_group!(
    benches,
    bench_oracle,
    bench_matcher_reuse,
    bench_fallback_mining,
    bench_feature_indexing
);
criterion_main!(benches);
