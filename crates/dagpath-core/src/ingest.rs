//! JSON graph ingestion.
//!
//! # Document shape
//!
//! ```json
//! {
//!   "directed": true,
//!   "n": 6,
//!   "source": 0,
//!   "edges": [
//!     { "u": 0, "v": 1, "w": 2 },
//!     { "from": 1, "to": 2 }
//!   ]
//! }
//! ```
//!
//! - `directed` defaults to [`IngestConfig::default_directed`].
//! - `n` may be omitted; it is then inferred as the largest endpoint plus one.
//!   Either way it may not exceed [`MAX_VERTICES`].
//! - Endpoints are spelled `u`/`v` or `from`/`to`. An edge missing either one
//!   is rejected.
//! - `w` (or `weight`) defaults to [`IngestConfig::default_weight`]; an
//!   explicit zero is handled by [`IngestConfig::zero_weight`].
//! - `source` is optional and, when present, must be a valid vertex.
//!
//! Everything is validated here so the analysis stages never see an
//! out-of-range index.

#![allow(clippy::module_name_repetitions)]

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::IngestConfig;
use crate::error::ErrorCode;
use crate::graph::Graph;

/// Largest vertex count a document may declare or imply.
pub const MAX_VERTICES: usize = 1 << 24;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read graph file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid graph JSON in {origin}: {source}")]
    Json {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("graph has no `n` and no edges to infer it from")]
    MissingVertexCount,

    #[error("edge #{index} is missing its `{field}` endpoint")]
    MalformedEdge { index: usize, field: &'static str },

    #[error("edge #{index} references vertex {vertex}, but the graph has {vertex_count} vertices")]
    VertexOutOfRange {
        index: usize,
        vertex: usize,
        vertex_count: usize,
    },

    #[error("source vertex {vertex} is out of range for {vertex_count} vertices")]
    SourceOutOfRange { vertex: usize, vertex_count: usize },

    #[error("graph needs {vertex_count} vertices, more than the limit of {limit}")]
    TooManyVertices { vertex_count: usize, limit: usize },
}

impl IngestError {
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } => ErrorCode::GraphFileUnreadable,
            Self::Json { .. } => ErrorCode::GraphJsonInvalid,
            Self::MissingVertexCount => ErrorCode::MissingVertexCount,
            Self::MalformedEdge { .. } => ErrorCode::MalformedEdge,
            Self::VertexOutOfRange { .. } => ErrorCode::VertexOutOfRange,
            Self::SourceOutOfRange { .. } => ErrorCode::SourceOutOfRange,
            Self::TooManyVertices { .. } => ErrorCode::VertexCountTooLarge,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    directed: Option<bool>,
    #[serde(default)]
    n: Option<usize>,
    #[serde(default)]
    source: Option<usize>,
    #[serde(default)]
    edges: Vec<RawEdge>,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    #[serde(default, alias = "from")]
    u: Option<usize>,
    #[serde(default, alias = "to")]
    v: Option<usize>,
    #[serde(default, alias = "weight")]
    w: Option<f64>,
}

/// A validated graph plus the optional source vertex named by the file.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphDocument {
    pub graph: Graph,
    pub source: Option<usize>,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Read and validate a graph file.
///
/// # Errors
///
/// Returns [`IngestError::Io`] when the file cannot be read, otherwise any
/// error from [`parse_graph`].
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_graph(path: &Path, config: &IngestConfig) -> Result<GraphDocument, IngestError> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&text, &path.display().to_string(), config)
}

/// Parse and validate a graph document held in memory.
///
/// # Errors
///
/// Returns [`IngestError::Json`] for syntax or type errors, and the
/// validation variants for missing endpoints, a missing vertex count or an
/// out-of-range index, and [`IngestError::TooManyVertices`] when the vertex
/// count exceeds [`MAX_VERTICES`].
pub fn parse_graph(text: &str, config: &IngestConfig) -> Result<GraphDocument, IngestError> {
    parse_document(text, "<inline>", config)
}

fn parse_document(
    text: &str,
    origin: &str,
    config: &IngestConfig,
) -> Result<GraphDocument, IngestError> {
    let raw: RawDocument = serde_json::from_str(text).map_err(|source| IngestError::Json {
        origin: origin.to_string(),
        source,
    })?;

    let mut endpoints = Vec::with_capacity(raw.edges.len());
    for (index, edge) in raw.edges.iter().enumerate() {
        let u = edge.u.ok_or(IngestError::MalformedEdge { index, field: "u" })?;
        let v = edge.v.ok_or(IngestError::MalformedEdge { index, field: "v" })?;
        endpoints.push((u, v, config.normalize_weight(edge.w)));
    }

    let vertex_count = match raw.n {
        Some(n) => n,
        None => endpoints
            .iter()
            .map(|&(u, v, _)| u.max(v).saturating_add(1))
            .max()
            .ok_or(IngestError::MissingVertexCount)?,
    };
    if vertex_count > MAX_VERTICES {
        return Err(IngestError::TooManyVertices {
            vertex_count,
            limit: MAX_VERTICES,
        });
    }

    let directed = raw.directed.unwrap_or(config.default_directed);
    let mut graph = Graph::new(vertex_count, directed);
    for (index, (u, v, w)) in endpoints.into_iter().enumerate() {
        graph
            .try_add_edge(u, v, w)
            .map_err(|_| IngestError::VertexOutOfRange {
                index,
                vertex: if u >= vertex_count { u } else { v },
                vertex_count,
            })?;
    }

    if let Some(vertex) = raw.source.filter(|&vertex| vertex >= vertex_count) {
        return Err(IngestError::SourceOutOfRange {
            vertex,
            vertex_count,
        });
    }

    debug!(
        origin,
        vertices = vertex_count,
        edges = graph.edge_count(),
        directed,
        "graph ingested"
    );

    Ok(GraphDocument {
        graph,
        source: raw.source,
    })
}
