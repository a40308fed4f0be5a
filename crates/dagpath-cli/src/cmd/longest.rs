//! `dagpath longest`: critical path over the condensation, or over the
//! graph itself with `--raw`.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use dagpath_analysis::CriticalPath;
use dagpath_analysis::condense::condense_partition;
use dagpath_analysis::paths::longest_path;
use dagpath_analysis::scc::decompose;
use dagpath_analysis::topo::topo_sort;
use dagpath_core::{Graph, GraphError, Metrics, MetricsSnapshot};
use serde::Serialize;

use super::{Context, fail_graph, load_document};
use crate::output::{fmt_list, fmt_weight, pretty_kv, pretty_section, render};

/// Arguments for `dagpath longest`.
#[derive(Args, Debug)]
pub struct LongestArgs {
    /// Graph JSON file.
    pub file: PathBuf,

    /// Run on the input graph directly. Fails if the graph has a cycle.
    #[arg(long)]
    pub raw: bool,
}

#[derive(Debug, Serialize)]
struct LongestOutput {
    raw: bool,
    /// Path over component ids unless `raw`.
    critical: CriticalPath,
    /// Members of each component on the path. Absent with `--raw`.
    #[serde(skip_serializing_if = "Option::is_none")]
    members: Option<Vec<Vec<usize>>>,
    metrics: MetricsSnapshot,
}

/// Execute `dagpath longest`.
pub fn run_longest(args: &LongestArgs, ctx: &Context) -> anyhow::Result<()> {
    let doc = load_document(&args.file, ctx)?;

    let payload = if args.raw {
        let mut metrics = Metrics::new();
        let critical = metrics
            .timed(|m| solve(&doc.graph, m))
            .map_err(|err| fail_graph(ctx, err))?;
        LongestOutput {
            raw: true,
            critical,
            members: None,
            metrics: metrics.snapshot(),
        }
    } else {
        let partition = decompose(&doc.graph, &mut Metrics::new());
        let dag = condense_partition(&doc.graph, &partition);

        let mut metrics = Metrics::new();
        let critical = metrics
            .timed(|m| solve(&dag, m))
            .map_err(|err| fail_graph(ctx, err))?;
        let members = critical
            .path
            .iter()
            .map(|&component| partition.components[component].clone())
            .collect();
        LongestOutput {
            raw: false,
            critical,
            members: Some(members),
            metrics: metrics.snapshot(),
        }
    };

    render(ctx.output, &payload, render_longest_human)
}

fn solve(dag: &Graph, metrics: &mut Metrics) -> Result<CriticalPath, GraphError> {
    let order = topo_sort(dag, metrics)?;
    Ok(longest_path(dag, &order, metrics))
}

fn render_longest_human(
    payload: &LongestOutput,
    pretty: bool,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    let cp = &payload.critical;

    if pretty {
        pretty_section(w, "Critical path")?;
        pretty_kv(w, "length", fmt_weight(cp.length))?;
        pretty_kv(w, "path", fmt_list(&cp.path))?;
        if let Some(members) = &payload.members {
            let groups: Vec<String> = members.iter().map(|m| fmt_list(m)).collect();
            pretty_kv(w, "members", groups.join(" -> "))?;
        }
        pretty_kv(w, "metrics", payload.metrics.to_string())
    } else {
        writeln!(
            w,
            "Critical path len={}, path={}",
            fmt_weight(cp.length),
            fmt_list(&cp.path)
        )?;
        writeln!(w, "Metrics: {}", payload.metrics)
    }
}
