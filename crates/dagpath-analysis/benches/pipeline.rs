//! Pipeline throughput benchmarks.
//!
//! Synthetic layered graphs with a back edge every few layers, so SCC has
//! real cycles to collapse and the condensation is still deep.
//!
//! Run with:
//! ```sh
//! cargo bench --bench pipeline
//! ```

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dagpath_analysis::pipeline::analyze;
use dagpath_analysis::scc::decompose;
use dagpath_analysis::topo::topo_sort;
use dagpath_core::{Graph, Metrics};

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

/// `layers` layers of `width` vertices; each vertex links to two vertices of
/// the next layer, and every fifth layer links back to the one before it.
fn layered_graph(layers: usize, width: usize, with_cycles: bool) -> Graph {
    let n = layers * width;
    let mut g = Graph::new(n, true);
    for layer in 0..layers.saturating_sub(1) {
        for i in 0..width {
            let u = layer * width + i;
            let next = (layer + 1) * width;
            g.add_edge(u, next + i, ((u % 7) + 1) as f64);
            g.add_edge(u, next + (i + 1) % width, ((u % 3) + 1) as f64);
            if with_cycles && layer % 5 == 4 {
                g.add_edge(next + i, u, 1.0);
            }
        }
    }
    g
}

// ---------------------------------------------------------------------------
// Benches
// ---------------------------------------------------------------------------

fn bench_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    for &layers in &[100_usize, 1_000] {
        let cyclic = layered_graph(layers, 16, true);
        let acyclic = layered_graph(layers, 16, false);

        group.bench_with_input(BenchmarkId::new("scc", layers), &cyclic, |b, g| {
            b.iter(|| decompose(black_box(g), &mut Metrics::new()));
        });
        group.bench_with_input(BenchmarkId::new("topo", layers), &acyclic, |b, g| {
            b.iter(|| topo_sort(black_box(g), &mut Metrics::new()));
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    for &layers in &[100_usize, 1_000] {
        let g = layered_graph(layers, 16, true);
        group.bench_with_input(BenchmarkId::new("analyze", layers), &g, |b, g| {
            b.iter(|| analyze(black_box(g), 0));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stages, bench_pipeline);
criterion_main!(benches);
