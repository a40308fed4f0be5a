#![no_main]

use dagpath_analysis::analyze;
use dagpath_core::Graph;
use libfuzzer_sys::fuzz_target;

// Bytes become a small directed graph: first byte is the vertex count,
// then (u, v, w) triples. The pipeline must accept any such graph.
fuzz_target!(|data: &[u8]| {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let n = usize::from(first % 64) + 1;
    let mut graph = Graph::new(n, true);
    for chunk in rest.chunks_exact(3) {
        let u = usize::from(chunk[0]) % n;
        let v = usize::from(chunk[1]) % n;
        graph.add_edge(u, v, f64::from(chunk[2]));
    }

    let analysis = analyze(&graph, 0).expect("source 0 is always in range");
    assert_eq!(analysis.vertex_order.len(), n);
    assert_eq!(
        analysis.partition.component_count(),
        analysis.condensation.vertex_count()
    );
});
