//! `dagpath scc`: strongly connected components and the condensation size.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use dagpath_analysis::condense::condense_partition;
use dagpath_analysis::scc::decompose;
use dagpath_core::{Metrics, MetricsSnapshot};
use serde::Serialize;

use super::{Context, load_document};
use crate::output::{fmt_list, pretty_kv, pretty_section, render};

/// Arguments for `dagpath scc`.
#[derive(Args, Debug)]
pub struct SccArgs {
    /// Graph JSON file.
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
struct SccOutput {
    vertices: usize,
    edges: usize,
    components: Vec<Vec<usize>>,
    largest: usize,
    condensation: CondensationSize,
    metrics: MetricsSnapshot,
}

#[derive(Debug, Serialize)]
struct CondensationSize {
    vertices: usize,
    edges: usize,
}

/// Execute `dagpath scc`.
pub fn run_scc(args: &SccArgs, ctx: &Context) -> anyhow::Result<()> {
    let doc = load_document(&args.file, ctx)?;
    let graph = &doc.graph;

    let mut metrics = Metrics::new();
    let (partition, dag) = metrics.timed(|m| {
        let partition = decompose(graph, m);
        let dag = condense_partition(graph, &partition);
        (partition, dag)
    });

    let payload = SccOutput {
        vertices: graph.vertex_count(),
        edges: graph.edge_count(),
        largest: partition.largest_component(),
        components: partition.components,
        condensation: CondensationSize {
            vertices: dag.vertex_count(),
            edges: dag.edge_count(),
        },
        metrics: metrics.snapshot(),
    };

    render(ctx.output, &payload, render_scc_human)
}

fn render_scc_human(payload: &SccOutput, pretty: bool, w: &mut dyn Write) -> std::io::Result<()> {
    if pretty {
        pretty_section(w, "Strongly connected components")?;
        pretty_kv(w, "graph", format!("n={}, m={}", payload.vertices, payload.edges))?;
        pretty_kv(w, "components", payload.components.len().to_string())?;
        pretty_kv(w, "largest", payload.largest.to_string())?;
        writeln!(w)?;
        for (id, members) in payload.components.iter().enumerate() {
            writeln!(w, "  #{id:<4} size {:<5} {}", members.len(), fmt_list(members))?;
        }
        writeln!(w)?;
        pretty_kv(
            w,
            "condensation",
            format!(
                "n={}, m={}",
                payload.condensation.vertices, payload.condensation.edges
            ),
        )?;
        pretty_kv(w, "metrics", payload.metrics.to_string())
    } else {
        writeln!(w, "SCC count: {}", payload.components.len())?;
        for (id, members) in payload.components.iter().enumerate() {
            writeln!(w, "Component {id} ({}): {}", members.len(), fmt_list(members))?;
        }
        writeln!(
            w,
            "Condensation DAG: n={}, m={}, metrics={}",
            payload.condensation.vertices, payload.condensation.edges, payload.metrics
        )
    }
}
