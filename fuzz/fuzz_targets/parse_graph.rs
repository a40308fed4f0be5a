#![no_main]

use dagpath_core::config::IngestConfig;
use dagpath_core::ingest::parse_graph;
use libfuzzer_sys::fuzz_target;

// Ingestion must reject bad documents with an error, never a panic, and
// every accepted graph must only reference in-range vertices.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(doc) = parse_graph(text, &IngestConfig::default()) {
        let n = doc.graph.vertex_count();
        for (u, v, _) in doc.graph.edges() {
            assert!(u < n && v < n);
        }
        if let Some(source) = doc.source {
            assert!(source < n);
        }
    }
});
