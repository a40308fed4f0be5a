//! `dagpath shortest`: single-source shortest paths over the condensation,
//! or over the graph itself with `--raw`.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use dagpath_analysis::ShortestPaths;
use dagpath_analysis::condense::condense_partition;
use dagpath_analysis::paths::shortest_paths;
use dagpath_analysis::scc::decompose;
use dagpath_analysis::topo::topo_sort;
use dagpath_core::{Graph, GraphError, Metrics, MetricsSnapshot};
use serde::Serialize;

use super::{Context, fail_graph, load_document, resolve_source};
use crate::output::{fmt_list, fmt_weight, pretty_kv, pretty_section, render};

/// Arguments for `dagpath shortest`.
#[derive(Args, Debug)]
pub struct ShortestArgs {
    /// Graph JSON file.
    pub file: PathBuf,

    /// Source vertex. Defaults to the file's `source`, then the config.
    #[arg(long, short)]
    pub source: Option<usize>,

    /// Run on the input graph directly. Fails if the graph has a cycle.
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Serialize)]
struct ShortestOutput {
    raw: bool,
    /// Source vertex in the input graph.
    source_vertex: usize,
    /// Distances and paths; indices are component ids unless `raw`.
    shortest: ShortestPaths,
    #[serde(skip_serializing_if = "Option::is_none")]
    components: Option<Vec<Vec<usize>>>,
    metrics: MetricsSnapshot,
}

/// Execute `dagpath shortest`.
pub fn run_shortest(args: &ShortestArgs, ctx: &Context) -> anyhow::Result<()> {
    let doc = load_document(&args.file, ctx)?;
    let source = resolve_source(args.source, &doc, &ctx.config);

    let payload = if args.raw {
        let mut metrics = Metrics::new();
        let shortest = metrics
            .timed(|m| solve(&doc.graph, source, m))
            .map_err(|err| fail_graph(ctx, err))?;
        ShortestOutput {
            raw: true,
            source_vertex: source,
            shortest,
            components: None,
            metrics: metrics.snapshot(),
        }
    } else {
        let n = doc.graph.vertex_count();
        if source >= n {
            return Err(fail_graph(
                ctx,
                GraphError::VertexOutOfRange {
                    vertex: source,
                    vertex_count: n,
                },
            ));
        }

        let partition = decompose(&doc.graph, &mut Metrics::new());
        let dag = condense_partition(&doc.graph, &partition);
        let from = partition.comp_of[source];

        let mut metrics = Metrics::new();
        let shortest = metrics
            .timed(|m| solve(&dag, from, m))
            .map_err(|err| fail_graph(ctx, err))?;
        ShortestOutput {
            raw: false,
            source_vertex: source,
            shortest,
            components: Some(partition.components),
            metrics: metrics.snapshot(),
        }
    };

    render(ctx.output, &payload, render_shortest_human)
}

fn solve(dag: &Graph, source: usize, metrics: &mut Metrics) -> Result<ShortestPaths, GraphError> {
    let order = topo_sort(dag, metrics)?;
    shortest_paths(dag, source, &order, metrics)
}

fn render_shortest_human(
    payload: &ShortestOutput,
    pretty: bool,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    let sp = &payload.shortest;
    let unit = if payload.raw { "vertex" } else { "component" };
    let distances: Vec<String> = sp.dist.iter().map(|&d| fmt_weight(d)).collect();

    if pretty {
        pretty_section(w, "Shortest paths")?;
        pretty_kv(w, "source", payload.source_vertex.to_string())?;
        if !payload.raw {
            pretty_kv(w, "component", sp.source.to_string())?;
        }
        pretty_kv(w, "reachable", sp.reachable_count().to_string())?;
        writeln!(w)?;
        for (target, dist) in distances.iter().enumerate() {
            let path = sp.path(target);
            if path.is_empty() && target != sp.source {
                writeln!(w, "  {unit} {target:<4} unreachable")?;
            } else {
                writeln!(w, "  {unit} {target:<4} dist {dist:<8} via {}", fmt_list(path))?;
            }
        }
        writeln!(w)?;
        pretty_kv(w, "metrics", payload.metrics.to_string())
    } else {
        writeln!(w, "Shortest from {}: {}", sp.source, fmt_list(&distances))?;
        let paths: Vec<String> = sp.paths.iter().map(|p| fmt_list(p)).collect();
        writeln!(w, "Paths: {}", fmt_list(&paths))?;
        writeln!(w, "Metrics: {}", payload.metrics)
    }
}
