//! Weighted adjacency-list graph shared by every analysis stage.
//!
//! # Overview
//!
//! [`Graph`] has a fixed vertex count chosen at construction and append-only
//! edge lists. Vertices are plain indices in `[0, n)`. An undirected graph is
//! stored as a bidirectional one: each [`Graph::add_edge`] call on an
//! undirected graph stores the edge in both adjacency lists.
//!
//! Analysis stages never mutate a graph they are handed. Derived graphs
//! (the reverse, the condensation) are always fresh values.

#![allow(clippy::module_name_repetitions)]

use serde::Serialize;

use crate::error::ErrorCode;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised by graph construction and the analysis stages.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// An endpoint lies outside `[0, n)`.
    #[error("vertex {vertex} is out of range for a graph with {vertex_count} vertices")]
    VertexOutOfRange { vertex: usize, vertex_count: usize },

    /// Topological sort ran out of zero-indegree vertices before placing
    /// every vertex.
    #[error("graph is not a DAG: cycle detected after ordering {sorted} of {total} vertices")]
    Cyclic { sorted: usize, total: usize },
}

impl GraphError {
    /// Machine-readable code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::VertexOutOfRange { .. } => ErrorCode::VertexOutOfRange,
            Self::Cyclic { .. } => ErrorCode::CycleDetected,
        }
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// One stored outgoing edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Edge {
    /// Target vertex.
    pub to: usize,
    /// Edge weight.
    pub weight: f64,
}

/// A weighted graph with a fixed vertex set.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    directed: bool,
    adjacency: Vec<Vec<Edge>>,
    edge_count: usize,
}

impl Graph {
    /// Create a graph with `vertex_count` vertices and no edges.
    #[must_use]
    pub fn new(vertex_count: usize, directed: bool) -> Self {
        Self {
            directed,
            adjacency: vec![Vec::new(); vertex_count],
            edge_count: 0,
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of stored directed edges. An undirected edge counts twice.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    /// Append `u -> v` (and `v -> u` when undirected).
    ///
    /// # Panics
    ///
    /// Panics if `u` or `v` is not below [`Graph::vertex_count`]. Callers
    /// holding unvalidated input should use [`Graph::try_add_edge`].
    pub fn add_edge(&mut self, u: usize, v: usize, weight: f64) {
        self.adjacency[u].push(Edge { to: v, weight });
        self.edge_count += 1;
        if !self.directed {
            self.adjacency[v].push(Edge { to: u, weight });
            self.edge_count += 1;
        }
    }

    /// Checked form of [`Graph::add_edge`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::VertexOutOfRange`] naming the first offending
    /// endpoint. The graph is left untouched in that case.
    pub fn try_add_edge(&mut self, u: usize, v: usize, weight: f64) -> Result<(), GraphError> {
        let vertex_count = self.vertex_count();
        for vertex in [u, v] {
            if vertex >= vertex_count {
                return Err(GraphError::VertexOutOfRange {
                    vertex,
                    vertex_count,
                });
            }
        }
        self.add_edge(u, v, weight);
        Ok(())
    }

    /// Outgoing edges of `u` in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if `u` is out of range.
    #[must_use]
    pub fn adjacency(&self, u: usize) -> &[Edge] {
        &self.adjacency[u]
    }

    /// Iterate every stored edge as `(from, to, weight)`, grouped by source
    /// vertex in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(u, out)| out.iter().map(move |e| (u, e.to, e.weight)))
    }

    /// In-degree of every vertex, from one scan of all adjacency lists.
    #[must_use]
    pub fn indegrees(&self) -> Vec<usize> {
        let mut indegree = vec![0; self.vertex_count()];
        for out in &self.adjacency {
            for edge in out {
                indegree[edge.to] += 1;
            }
        }
        indegree
    }

    /// A new graph with every stored edge flipped. An undirected graph is
    /// its own reverse.
    #[must_use]
    pub fn reverse(&self) -> Self {
        if !self.directed {
            return self.clone();
        }
        let mut reversed = Self::new(self.vertex_count(), self.directed);
        for (u, v, w) in self.edges() {
            reversed.add_edge(v, u, w);
        }
        reversed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph() -> Graph {
        let mut g = Graph::new(3, true);
        g.add_edge(0, 1, 2.0);
        g.add_edge(1, 2, 3.5);
        g
    }

    #[test]
    fn new_graph_is_empty() {
        let g = Graph::new(4, true);
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.edge_count(), 0);
        assert!(g.is_directed());
        assert!((0..4).all(|u| g.adjacency(u).is_empty()));
    }

    #[test]
    fn directed_add_edge_appends_once() {
        let g = path_graph();
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.adjacency(0), &[Edge { to: 1, weight: 2.0 }]);
        assert!(g.adjacency(2).is_empty());
    }

    #[test]
    fn undirected_add_edge_stores_both_directions() {
        let mut g = Graph::new(2, false);
        g.add_edge(0, 1, 4.0);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.adjacency(0), &[Edge { to: 1, weight: 4.0 }]);
        assert_eq!(g.adjacency(1), &[Edge { to: 0, weight: 4.0 }]);
    }

    #[test]
    fn edges_keep_insertion_order_and_multi_edges() {
        let mut g = Graph::new(2, true);
        g.add_edge(0, 1, 1.0);
        g.add_edge(0, 1, 0.0);
        let edges: Vec<_> = g.edges().collect();
        assert_eq!(edges, vec![(0, 1, 1.0), (0, 1, 0.0)]);
    }

    #[test]
    fn try_add_edge_rejects_out_of_range() {
        let mut g = Graph::new(2, true);
        let err = g.try_add_edge(0, 2, 1.0).unwrap_err();
        assert_eq!(
            err,
            GraphError::VertexOutOfRange {
                vertex: 2,
                vertex_count: 2
            }
        );
        assert_eq!(g.edge_count(), 0);
        assert_eq!(err.error_code(), ErrorCode::VertexOutOfRange);
    }

    #[test]
    fn indegrees_count_every_incoming_edge() {
        let mut g = path_graph();
        g.add_edge(0, 2, 1.0);
        g.add_edge(2, 2, 1.0);
        assert_eq!(g.indegrees(), vec![0, 1, 3]);
    }

    #[test]
    fn reverse_flips_each_edge() {
        let r = path_graph().reverse();
        let edges: Vec<_> = r.edges().collect();
        assert_eq!(edges, vec![(1, 0, 2.0), (2, 1, 3.5)]);
        assert_eq!(r.edge_count(), 2);
        assert_eq!(r.indegrees(), vec![1, 1, 0]);
    }

    #[test]
    fn undirected_graph_is_its_own_reverse() {
        let mut g = Graph::new(2, false);
        g.add_edge(0, 1, 4.0);
        assert_eq!(g.reverse(), g);
    }

    #[test]
    fn cyclic_error_message_names_progress() {
        let err = GraphError::Cyclic {
            sorted: 1,
            total: 4,
        };
        assert!(err.to_string().contains("1 of 4"));
        assert_eq!(err.error_code(), ErrorCode::CycleDetected);
    }
}
