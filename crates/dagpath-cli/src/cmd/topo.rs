//! `dagpath topo`: topological order of the condensation, or of the graph
//! itself with `--raw`.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use dagpath_analysis::condense::{condense_partition, expand_order};
use dagpath_analysis::scc::decompose;
use dagpath_analysis::topo::topo_sort;
use dagpath_core::{Metrics, MetricsSnapshot};
use serde::Serialize;

use super::{Context, fail_graph, load_document};
use crate::output::{fmt_list, pretty_kv, pretty_section, render};

/// Arguments for `dagpath topo`.
#[derive(Args, Debug)]
pub struct TopoArgs {
    /// Graph JSON file.
    pub file: PathBuf,

    /// Sort the input graph directly instead of its condensation. Fails if
    /// the graph has a cycle.
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Serialize)]
struct TopoOutput {
    raw: bool,
    /// Component ids, or vertex ids with `--raw`.
    order: Vec<usize>,
    /// Vertices expanded from the component order. Absent with `--raw`.
    #[serde(skip_serializing_if = "Option::is_none")]
    vertex_order: Option<Vec<usize>>,
    metrics: MetricsSnapshot,
}

/// Execute `dagpath topo`.
pub fn run_topo(args: &TopoArgs, ctx: &Context) -> anyhow::Result<()> {
    let doc = load_document(&args.file, ctx)?;

    let payload = if args.raw {
        let mut metrics = Metrics::new();
        let order = metrics
            .timed(|m| topo_sort(&doc.graph, m))
            .map_err(|err| fail_graph(ctx, err))?;
        TopoOutput {
            raw: true,
            order,
            vertex_order: None,
            metrics: metrics.snapshot(),
        }
    } else {
        let partition = decompose(&doc.graph, &mut Metrics::new());
        let dag = condense_partition(&doc.graph, &partition);

        let mut metrics = Metrics::new();
        let order = metrics
            .timed(|m| topo_sort(&dag, m))
            .map_err(|err| fail_graph(ctx, err))?;
        let vertex_order = expand_order(&order, &partition.components);
        TopoOutput {
            raw: false,
            order,
            vertex_order: Some(vertex_order),
            metrics: metrics.snapshot(),
        }
    };

    render(ctx.output, &payload, render_topo_human)
}

fn render_topo_human(payload: &TopoOutput, pretty: bool, w: &mut dyn Write) -> std::io::Result<()> {
    let label = if payload.raw {
        "Topo order (vertices)"
    } else {
        "Topo order (components)"
    };

    if pretty {
        pretty_section(w, label)?;
        pretty_kv(w, "order", fmt_list(&payload.order))?;
        if let Some(vertex_order) = &payload.vertex_order {
            pretty_kv(w, "task order", fmt_list(vertex_order))?;
        }
        pretty_kv(w, "metrics", payload.metrics.to_string())
    } else {
        writeln!(w, "{label}: {}", fmt_list(&payload.order))?;
        if let Some(vertex_order) = &payload.vertex_order {
            writeln!(w, "Derived task order: {}", fmt_list(vertex_order))?;
        }
        writeln!(w, "Metrics: {}", payload.metrics)
    }
}
