//! `dagpath all`: run the full pipeline over one file or a directory of
//! graph files and optionally write a CSV report.
//!
//! Files are analyzed in parallel; results are reported in file-name order.
//! A file that fails to load or analyze produces an `ERROR` row and a
//! warning, and the rest of the batch still runs.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use dagpath_analysis::pipeline::{Analysis, Stage, StageReport, analyze};
use dagpath_core::config::DagpathConfig;
use dagpath_core::ingest::load_graph;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use super::Context;
use crate::output::{CliError, fmt_list, fmt_weight, pretty_section, render, render_error};

/// Arguments for `dagpath all`.
#[derive(Args, Debug)]
pub struct AllArgs {
    /// A graph JSON file, or a directory whose `*.json` files are analyzed.
    pub path: PathBuf,

    /// Write a CSV report. Without a value, uses `output.csv_path` from the
    /// config (default `results.csv`).
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    pub csv: Option<Option<PathBuf>>,
}

/// Outcome for one input file.
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    vertices: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    edges: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<Analysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct AllOutput {
    files: Vec<FileReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    csv: Option<PathBuf>,
}

const CSV_HEADER: [&str; 5] = ["File", "Algorithm", "Output", "Time(ns)", "Metrics"];

/// Execute `dagpath all`.
pub fn run_all(args: &AllArgs, ctx: &Context) -> anyhow::Result<()> {
    let files = collect_files(&args.path)?;
    if files.is_empty() {
        let message = format!("no JSON files found at {}", args.path.display());
        render_error(ctx.output, &CliError::new(&message))?;
        anyhow::bail!(message);
    }

    info!(files = files.len(), "analyzing batch");
    let reports: Vec<FileReport> = files
        .par_iter()
        .map(|path| analyze_file(path, &ctx.config))
        .collect();

    let csv = args
        .csv
        .as_ref()
        .map(|explicit| explicit.clone().unwrap_or_else(|| ctx.config.output.csv_path.clone()));
    if let Some(csv_path) = &csv {
        write_csv(csv_path, &reports)?;
        info!(path = %csv_path.display(), "csv report written");
    }

    let payload = AllOutput {
        files: reports,
        csv,
    };
    render(ctx.output, &payload, render_all_human)
}

/// Graph files under `path`, sorted by name. A plain file is returned as is;
/// a missing path yields nothing.
fn collect_files(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(path).with_context(|| format!("reading {}", path.display()))? {
        let entry_path = entry?.path();
        if entry_path.is_file() && entry_path.extension().is_some_and(|ext| ext == "json") {
            files.push(entry_path);
        }
    }
    files.sort();
    Ok(files)
}

fn analyze_file(path: &Path, config: &DagpathConfig) -> FileReport {
    let file = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());

    let outcome = load_graph(path, &config.ingest)
        .map_err(|err| err.to_string())
        .and_then(|doc| {
            let source = doc.source.unwrap_or(config.analysis.default_source);
            let source = if doc.graph.vertex_count() == 0 { 0 } else { source };
            analyze(&doc.graph, source)
                .map(|analysis| (doc.graph.vertex_count(), doc.graph.edge_count(), analysis))
                .map_err(|err| err.to_string())
        });

    match outcome {
        Ok((vertices, edges, analysis)) => FileReport {
            file,
            vertices: Some(vertices),
            edges: Some(edges),
            analysis: Some(analysis),
            error: None,
        },
        Err(error) => {
            warn!(file = %file, error = %error, "graph analysis failed");
            FileReport {
                file,
                vertices: None,
                edges: None,
                analysis: None,
                error: Some(error),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Quote a field when it contains a comma, quote or line break, doubling
/// embedded quotes.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

fn stage_output(analysis: &Analysis, report: &StageReport) -> String {
    match report.stage {
        Stage::Scc => format!("count={}", analysis.partition.component_count()),
        Stage::Topo => fmt_list(&analysis.component_order),
        Stage::Shortest => analysis.shortest.as_ref().map_or_else(String::new, |sp| {
            let dist: Vec<String> = sp.dist.iter().map(|&d| fmt_weight(d)).collect();
            fmt_list(&dist)
        }),
        Stage::Longest => format!(
            "len={} path={}",
            fmt_weight(analysis.critical.length),
            fmt_list(&analysis.critical.path)
        ),
    }
}

fn csv_rows(reports: &[FileReport]) -> Vec<[String; 5]> {
    let mut rows = Vec::new();
    for report in reports {
        match (&report.analysis, &report.error) {
            (Some(analysis), _) => {
                for stage in &analysis.stages {
                    rows.push([
                        report.file.clone(),
                        stage.stage.label().to_string(),
                        stage_output(analysis, stage),
                        stage.metrics.elapsed.as_nanos().to_string(),
                        stage.metrics.to_string(),
                    ]);
                }
            }
            (None, error) => rows.push([
                report.file.clone(),
                "ERROR".to_string(),
                error.clone().unwrap_or_default(),
                "0".to_string(),
                String::new(),
            ]),
        }
    }
    rows
}

fn write_csv_to(w: &mut dyn Write, reports: &[FileReport]) -> io::Result<()> {
    writeln!(w, "{}", CSV_HEADER.join(","))?;
    for row in csv_rows(reports) {
        let fields: Vec<String> = row.iter().map(|f| csv_field(f)).collect();
        writeln!(w, "{}", fields.join(","))?;
    }
    Ok(())
}

fn write_csv(path: &Path, reports: &[FileReport]) -> anyhow::Result<()> {
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = io::BufWriter::new(file);
    write_csv_to(&mut out, reports)?;
    out.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Human output
// ---------------------------------------------------------------------------

fn render_all_human(payload: &AllOutput, pretty: bool, w: &mut dyn Write) -> io::Result<()> {
    for report in &payload.files {
        if pretty {
            pretty_section(w, &report.file)?;
        } else {
            writeln!(w, "Processing: {}", report.file)?;
        }

        let Some(analysis) = &report.analysis else {
            writeln!(w, "Error: {}", report.error.as_deref().unwrap_or("unknown"))?;
            continue;
        };

        let dag = &analysis.condensation;
        for stage in &analysis.stages {
            writeln!(
                w,
                "{}: n={}, m={}, time={}ns, output={}, metrics={}",
                stage.stage,
                dag.vertex_count(),
                dag.edge_count(),
                stage.metrics.elapsed.as_nanos(),
                stage_output(analysis, stage),
                stage.metrics
            )?;
        }
        if pretty {
            writeln!(w)?;
        }
    }

    let failed = payload.files.iter().filter(|r| r.error.is_some()).count();
    writeln!(
        w,
        "{} file(s) analyzed, {} failed",
        payload.files.len(),
        failed
    )?;
    if let Some(csv) = &payload.csv {
        writeln!(w, "Results written to {}", csv.display())?;
    }
    Ok(())
}
