//! Kahn's topological sort.
//!
//! The frontier is a FIFO queue seeded with every zero in-degree vertex in
//! ascending index order. Vertices that become ready later are appended as
//! their last incoming edge is removed, so among simultaneously-ready
//! vertices the output is deterministic: seed order first, then discovery
//! order.
//!
//! A cycle leaves its vertices with positive in-degree forever. The sort
//! detects this when the frontier drains before every vertex is placed and
//! reports it as [`GraphError::Cyclic`]; an empty graph is a successful,
//! empty order.

use std::collections::VecDeque;

use dagpath_core::{Counter, Graph, GraphError, Metrics};
use tracing::{debug, instrument, warn};

/// Topologically order `graph`.
///
/// Counts [`Counter::TopoPushes`], [`Counter::TopoPops`] and
/// [`Counter::TopoEdgesExamined`].
///
/// # Errors
///
/// Returns [`GraphError::Cyclic`] if `graph` contains a directed cycle
/// (a self loop counts).
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn topo_sort(graph: &Graph, metrics: &mut Metrics) -> Result<Vec<usize>, GraphError> {
    let n = graph.vertex_count();
    let mut indegree = graph.indegrees();
    let mut frontier: VecDeque<usize> = VecDeque::new();

    for (v, &degree) in indegree.iter().enumerate() {
        if degree == 0 {
            frontier.push_back(v);
            metrics.inc(Counter::TopoPushes);
        }
    }

    let mut order = Vec::with_capacity(n);
    while let Some(u) = frontier.pop_front() {
        metrics.inc(Counter::TopoPops);
        order.push(u);

        for edge in graph.adjacency(u) {
            metrics.inc(Counter::TopoEdgesExamined);
            indegree[edge.to] -= 1;
            if indegree[edge.to] == 0 {
                frontier.push_back(edge.to);
                metrics.inc(Counter::TopoPushes);
            }
        }
    }

    if order.len() < n {
        warn!(sorted = order.len(), total = n, "cycle detected during topological sort");
        return Err(GraphError::Cyclic {
            sorted: order.len(),
            total: n,
        });
    }

    debug!(len = order.len(), "topological order computed");
    Ok(order)
}

/// Whether `order` is a permutation of `graph`'s vertices that places every
/// edge's source before its target.
#[must_use]
pub fn is_topological_order(graph: &Graph, order: &[usize]) -> bool {
    let n = graph.vertex_count();
    if order.len() != n {
        return false;
    }

    let mut position = vec![usize::MAX; n];
    for (i, &v) in order.iter().enumerate() {
        if v >= n || position[v] != usize::MAX {
            return false;
        }
        position[v] = i;
    }

    graph.edges().all(|(u, v, _)| position[u] < position[v])
}
