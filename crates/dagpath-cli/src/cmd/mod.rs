//! Subcommand handlers. Each module owns its `Args` struct, a `run_*`
//! entry point and the human renderer for its payload.

pub mod all;
pub mod longest;
pub mod scc;
pub mod shortest;
pub mod topo;

use std::path::Path;

use dagpath_core::GraphError;
use dagpath_core::config::DagpathConfig;
use dagpath_core::ingest::{GraphDocument, load_graph};

use crate::output::{CliError, OutputMode, render_error};

/// Settings every handler receives from `main`.
#[derive(Debug, Clone)]
pub struct Context {
    pub output: OutputMode,
    pub config: DagpathConfig,
}

/// Load a graph file, rendering any ingestion error before bailing.
pub fn load_document(path: &Path, ctx: &Context) -> anyhow::Result<GraphDocument> {
    match load_graph(path, &ctx.config.ingest) {
        Ok(doc) => Ok(doc),
        Err(err) => {
            render_error(ctx.output, &CliError::from(&err))?;
            Err(err.into())
        }
    }
}

/// Render a graph-level failure and hand it back as the command error.
pub fn fail_graph(ctx: &Context, err: GraphError) -> anyhow::Error {
    if let Err(render_err) = render_error(ctx.output, &CliError::from(&err)) {
        return render_err;
    }
    err.into()
}

/// Source vertex precedence: `--source`, then the document, then config.
pub fn resolve_source(flag: Option<usize>, doc: &GraphDocument, config: &DagpathConfig) -> usize {
    flag.or(doc.source)
        .unwrap_or(config.analysis.default_source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagpath_core::Graph;

    #[test]
    fn source_flag_beats_document_beats_config() {
        let mut config = DagpathConfig::default();
        config.analysis.default_source = 2;
        let mut doc = GraphDocument {
            graph: Graph::new(4, true),
            source: Some(1),
        };

        assert_eq!(resolve_source(Some(3), &doc, &config), 3);
        assert_eq!(resolve_source(None, &doc, &config), 1);
        doc.source = None;
        assert_eq!(resolve_source(None, &doc, &config), 2);
    }
}
