//! Single-source shortest paths and the critical (longest) path of a DAG.
//!
//! Both solvers sweep the vertices once in a caller-supplied topological
//! order and relax every outgoing edge of each vertex. Comparisons are exact
//! (`<` for shortest, `>` for longest), so the first relaxation to reach a
//! value keeps its parent on ties.
//!
//! Neither solver checks that the order is topological. Feed them the output
//! of [`crate::topo::topo_sort`].

#![allow(clippy::module_name_repetitions)]

use dagpath_core::{Counter, Graph, GraphError, Metrics};
use serde::{Serialize, Serializer};
use tracing::{debug, instrument};

// ---------------------------------------------------------------------------
// Shortest paths
// ---------------------------------------------------------------------------

/// Shortest distances and paths from one source vertex.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortestPaths {
    pub source: usize,
    /// Distance per vertex; `f64::INFINITY` when unreachable (`null` in JSON).
    #[serde(serialize_with = "serialize_distances")]
    pub dist: Vec<f64>,
    /// Vertex path per vertex, source first. Empty when unreachable.
    pub paths: Vec<Vec<usize>>,
}

impl ShortestPaths {
    /// Finite distance to `v`, `None` if `v` is unreachable or out of range.
    #[must_use]
    pub fn distance(&self, v: usize) -> Option<f64> {
        self.dist.get(v).copied().filter(|d| d.is_finite())
    }

    #[must_use]
    pub fn is_reachable(&self, v: usize) -> bool {
        self.distance(v).is_some()
    }

    /// Path from the source to `v`; empty if unreachable or out of range.
    #[must_use]
    pub fn path(&self, v: usize) -> &[usize] {
        self.paths.get(v).map_or(&[], Vec::as_slice)
    }

    /// Number of vertices with a finite distance, the source included.
    #[must_use]
    pub fn reachable_count(&self) -> usize {
        self.dist.iter().filter(|d| d.is_finite()).count()
    }
}

fn serialize_distances<S: Serializer>(dist: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(dist.iter().map(|d| d.is_finite().then_some(*d)))
}

/// Shortest paths from `source` over the DAG `dag`, sweeping in `order`.
///
/// Vertices whose distance is still infinite when reached are skipped, so
/// [`Counter::PathRelaxations`] counts only edges leaving reachable vertices.
///
/// # Errors
///
/// Returns [`GraphError::VertexOutOfRange`] if `source` is not a vertex of
/// `dag`.
///
/// # Panics
///
/// Panics if `order` names a vertex outside `dag`.
#[instrument(skip_all, fields(vertices = dag.vertex_count(), source = source))]
pub fn shortest_paths(
    dag: &Graph,
    source: usize,
    order: &[usize],
    metrics: &mut Metrics,
) -> Result<ShortestPaths, GraphError> {
    let n = dag.vertex_count();
    if source >= n {
        return Err(GraphError::VertexOutOfRange {
            vertex: source,
            vertex_count: n,
        });
    }

    let mut dist = vec![f64::INFINITY; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    dist[source] = 0.0;

    for &u in order {
        if dist[u].is_infinite() {
            continue;
        }
        for edge in dag.adjacency(u) {
            metrics.inc(Counter::PathRelaxations);
            let candidate = dist[u] + edge.weight;
            if candidate < dist[edge.to] {
                dist[edge.to] = candidate;
                parent[edge.to] = Some(u);
            }
        }
    }

    let paths = (0..n)
        .map(|v| {
            if v == source {
                vec![source]
            } else {
                walk_parents(&parent, v)
            }
        })
        .collect();

    let result = ShortestPaths {
        source,
        dist,
        paths,
    };
    debug!(reachable = result.reachable_count(), "shortest paths computed");
    Ok(result)
}

// ---------------------------------------------------------------------------
// Critical path
// ---------------------------------------------------------------------------

/// The heaviest path in a DAG.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalPath {
    /// Total weight of `path`; `0.0` for an empty graph.
    pub length: f64,
    /// Vertices from first to last.
    pub path: Vec<usize>,
}

impl CriticalPath {
    /// Last vertex of the path, `None` for an empty graph.
    #[must_use]
    pub fn endpoint(&self) -> Option<usize> {
        self.path.last().copied()
    }
}

/// Longest path over the DAG `dag`, sweeping in `order`.
///
/// Every vertex starts at `0.0`, so a path may begin anywhere and negative
/// edges never extend one. The endpoint is the vertex with the greatest
/// value, the lowest index winning ties.
///
/// # Panics
///
/// Panics if `order` names a vertex outside `dag`.
#[must_use]
#[instrument(skip_all, fields(vertices = dag.vertex_count()))]
pub fn longest_path(dag: &Graph, order: &[usize], metrics: &mut Metrics) -> CriticalPath {
    let n = dag.vertex_count();
    let mut best = vec![0.0_f64; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];

    for &u in order {
        for edge in dag.adjacency(u) {
            metrics.inc(Counter::PathRelaxations);
            let candidate = best[u] + edge.weight;
            if candidate > best[edge.to] {
                best[edge.to] = candidate;
                parent[edge.to] = Some(u);
            }
        }
    }

    let mut endpoint = None;
    for (v, &value) in best.iter().enumerate() {
        if endpoint.is_none_or(|e: usize| value > best[e]) {
            endpoint = Some(v);
        }
    }

    let Some(end) = endpoint else {
        return CriticalPath {
            length: 0.0,
            path: Vec::new(),
        };
    };

    let mut path = walk_parents(&parent, end);
    if path.is_empty() {
        path.push(end);
    }

    debug!(length = best[end], hops = path.len(), "critical path computed");
    CriticalPath {
        length: best[end],
        path,
    }
}

// ---------------------------------------------------------------------------
// Reconstruction
// ---------------------------------------------------------------------------

/// Follow parent links back from `v` and return the chain in forward order.
///
/// Returns an empty path when `v` has no parent. The walk is capped at the
/// vertex count, so a parent cycle (only possible when the sweep order was
/// not topological) yields an empty path rather than looping.
fn walk_parents(parent: &[Option<usize>], v: usize) -> Vec<usize> {
    if parent[v].is_none() {
        return Vec::new();
    }

    let mut chain = vec![v];
    let mut cursor = v;
    while let Some(p) = parent[cursor] {
        if chain.len() > parent.len() {
            return Vec::new();
        }
        chain.push(p);
        cursor = p;
    }
    chain.reverse();
    chain
}
