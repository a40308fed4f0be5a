#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dagpath_core::config::load_config;
use dagpath_core::timing;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "dagpath: strongly connected components, topological order and DAG paths",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit command timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file (default: ./dagpath.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "List strongly connected components",
        long_about = "Decompose the graph into strongly connected components and report the condensation size.",
        after_help = "EXAMPLES:\n    dagpath scc graph.json\n    dagpath scc graph.json --json"
    )]
    Scc(cmd::scc::SccArgs),

    #[command(
        about = "Topologically order the condensation",
        long_about = "Order the component DAG with Kahn's algorithm and derive a vertex task order.",
        after_help = "EXAMPLES:\n    dagpath topo graph.json\n\n    # Sort the graph itself (fails on a cycle)\n    dagpath topo dag.json --raw"
    )]
    Topo(cmd::topo::TopoArgs),

    #[command(
        about = "Single-source shortest paths",
        long_about = "Shortest distances and paths from a source vertex over the component DAG.\n\nCondensation edges all weigh 1, so distances count component hops. Pass --raw to use the input weights on a graph that is already a DAG.",
        after_help = "EXAMPLES:\n    dagpath shortest graph.json --source 0\n    dagpath shortest dag.json --raw -s 2"
    )]
    Shortest(cmd::shortest::ShortestArgs),

    #[command(
        about = "Critical (longest) path",
        long_about = "Heaviest path through the component DAG.\n\nCondensation edges all weigh 1, so the length counts component hops. Pass --raw to use the input weights on a graph that is already a DAG.",
        after_help = "EXAMPLES:\n    dagpath longest graph.json\n    dagpath longest dag.json --raw"
    )]
    Longest(cmd::longest::LongestArgs),

    #[command(
        about = "Run every stage over a file or directory",
        long_about = "Run SCC, topological sort and both path solvers over one graph file or every *.json file in a directory.",
        after_help = "EXAMPLES:\n    dagpath all data/\n    dagpath all data/ --csv results.csv"
    )]
    All(cmd::all::AllArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("DAGPATH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "dagpath=debug,dagpath_core=debug,dagpath_analysis=debug,info"
        } else {
            "warn"
        })
    });

    let format = env::var("DAGPATH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let timing_enabled = cli.timing || timing::timing_enabled_from_env();
    timing::set_timing_enabled(timing_enabled);
    timing::clear_timings();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    let cwd = env::current_dir()?;
    let config = match load_config(cli.config.as_deref(), &cwd) {
        Ok(config) => config,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            return Err(err.into());
        }
    };
    let ctx = cmd::Context { output, config };

    let command_result = match cli.command {
        Commands::Scc(ref args) => timing::timed("cmd.scc", || cmd::scc::run_scc(args, &ctx)),
        Commands::Topo(ref args) => timing::timed("cmd.topo", || cmd::topo::run_topo(args, &ctx)),
        Commands::Shortest(ref args) => timing::timed("cmd.shortest", || {
            cmd::shortest::run_shortest(args, &ctx)
        }),
        Commands::Longest(ref args) => {
            timing::timed("cmd.longest", || cmd::longest::run_longest(args, &ctx))
        }
        Commands::All(ref args) => timing::timed("cmd.all", || cmd::all::run_all(args, &ctx)),
    };

    if timing_enabled {
        let report = timing::collect_report();
        if report.is_empty() {
            eprintln!("timing report: no samples recorded");
        } else {
            eprintln!("timing report:");
            eprintln!("{}", report.display_table());
            eprintln!("timing report (json):");
            eprintln!("{}", serde_json::to_string_pretty(&report.to_json())?);
        }
    }

    command_result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_flag_parses_before_subcommand() {
        let cli = Cli::parse_from(["dagpath", "--timing", "scc", "g.json"]);
        assert!(cli.timing);
        assert!(matches!(cli.command, Commands::Scc(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::parse_from(["dagpath", "topo", "g.json", "--raw", "--json", "--timing"]);
        assert!(cli.json);
        assert!(cli.timing);
        assert_eq!(cli.output_mode(), OutputMode::Json);
        match cli.command {
            Commands::Topo(args) => assert!(args.raw),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn format_flag_selects_mode() {
        let cli = Cli::parse_from(["dagpath", "--format", "text", "longest", "g.json"]);
        assert_eq!(cli.output_mode(), OutputMode::Text);
    }

    #[test]
    fn shortest_source_is_optional() {
        let cli = Cli::parse_from(["dagpath", "shortest", "g.json"]);
        match cli.command {
            Commands::Shortest(args) => assert_eq!(args.source, None),
            other => panic!("unexpected command: {other:?}"),
        }
        let cli = Cli::parse_from(["dagpath", "shortest", "g.json", "-s", "4"]);
        match cli.command {
            Commands::Shortest(args) => assert_eq!(args.source, Some(4)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn csv_flag_takes_optional_path() {
        let cli = Cli::parse_from(["dagpath", "all", "data", "--csv"]);
        match cli.command {
            Commands::All(args) => assert_eq!(args.csv, Some(None)),
            other => panic!("unexpected command: {other:?}"),
        }
        let cli = Cli::parse_from(["dagpath", "all", "data", "--csv", "out.csv"]);
        match cli.command {
            Commands::All(args) => assert_eq!(args.csv, Some(Some(PathBuf::from("out.csv")))),
            other => panic!("unexpected command: {other:?}"),
        }
        let cli = Cli::parse_from(["dagpath", "all", "data"]);
        match cli.command {
            Commands::All(args) => assert_eq!(args.csv, None),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["dagpath", "scc", "g.json", "--config", "x.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }
}
