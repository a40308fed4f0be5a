//! Condensation: collapse each strongly connected component to one vertex.
//!
//! The condensation has one vertex per component and an edge `a -> b` of
//! weight 1 whenever some original edge leaves component `a` for component
//! `b`. Each ordered pair produces one edge no matter how many original
//! edges cross it, and intra-component edges (including self loops) vanish.
//! The result is always a DAG.

use std::collections::HashSet;

use dagpath_core::Graph;
use tracing::{debug, instrument};

use crate::scc::SccPartition;

/// Build the condensation of `graph` under the component map `comp_of`.
///
/// Edges are added in the order their first witness is met while scanning
/// vertices ascending and each adjacency list in insertion order.
///
/// # Panics
///
/// Panics if `comp_of` does not cover every vertex of `graph` or names a
/// component at or above `component_count`.
#[must_use]
#[instrument(skip_all, fields(vertices = graph.vertex_count(), components = component_count))]
pub fn condense(graph: &Graph, comp_of: &[usize], component_count: usize) -> Graph {
    let mut dag = Graph::new(component_count, true);
    let mut seen: HashSet<(usize, usize)> = HashSet::new();

    for (u, v, _) in graph.edges() {
        let (cu, cv) = (comp_of[u], comp_of[v]);
        if cu != cv && seen.insert((cu, cv)) {
            dag.add_edge(cu, cv, 1.0);
        }
    }

    debug!(edges = dag.edge_count(), "condensation built");
    dag
}

/// [`condense`] driven directly by a decomposition result.
#[must_use]
pub fn condense_partition(graph: &Graph, partition: &SccPartition) -> Graph {
    condense(graph, &partition.comp_of, partition.component_count())
}

/// Expand a component-level order into a vertex-level task order.
///
/// Each component contributes its members in stored order at the position
/// the component takes in `order`.
///
/// # Panics
///
/// Panics if `order` names a component outside `components`.
#[must_use]
pub fn expand_order(order: &[usize], components: &[Vec<usize>]) -> Vec<usize> {
    order
        .iter()
        .flat_map(|&component| components[component].iter().copied())
        .collect()
}
