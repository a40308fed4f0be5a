//! Strongly connected components using Tarjan's algorithm.
//!
//! # Algorithm
//!
//! One depth-first pass over the graph, starting from every unvisited vertex
//! in ascending index order:
//!
//! 1. On entering `v`, give it the next discovery index (also its initial
//!    low-link) and push it onto the component stack.
//! 2. For each edge `v -> w`: descend into an unvisited `w` and fold its
//!    low-link into `v`'s afterwards; fold `index[w]` if `w` is still on the
//!    stack; ignore `w` otherwise (it belongs to a finished component).
//! 3. When `v`'s edges are exhausted and `low[v] == index[v]`, pop the stack
//!    down to `v`. The popped vertices, in pop order, form one component.
//!
//! The traversal keeps its own frame stack of `(vertex, next edge position)`
//! instead of recursing, so path length is bounded by heap, not by the
//! thread's call stack.
//!
//! # Output order
//!
//! Components are numbered in completion order. A component is completed
//! only after every component it can reach, so the numbering is a reverse
//! topological order of the condensation.

use dagpath_core::{Counter, Graph, Metrics};
use serde::Serialize;
use tracing::{debug, instrument};

/// Partition of the vertex set into strongly connected components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SccPartition {
    /// Components in completion order; members in pop order.
    pub components: Vec<Vec<usize>>,
    /// `comp_of[v]` is the position of `v`'s component in `components`.
    pub comp_of: Vec<usize>,
}

impl SccPartition {
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Whether `a` and `b` are mutually reachable.
    ///
    /// # Panics
    ///
    /// Panics if either vertex is out of range.
    #[must_use]
    pub fn same_component(&self, a: usize, b: usize) -> bool {
        self.comp_of[a] == self.comp_of[b]
    }

    /// Size of the largest component, zero for an empty graph.
    #[must_use]
    pub fn largest_component(&self) -> usize {
        self.components.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Decompose `graph` into strongly connected components.
///
/// Counts [`Counter::SccVerticesVisited`] once per vertex and
/// [`Counter::SccEdgesExamined`] once per stored edge. Never fails: self
/// loops, parallel edges and isolated vertices are all handled.
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn decompose(graph: &Graph, metrics: &mut Metrics) -> SccPartition {
    let mut state = TarjanState::new(graph.vertex_count());

    for root in 0..graph.vertex_count() {
        if state.index[root].is_none() {
            state.strongconnect(graph, root, metrics);
        }
    }

    debug!(
        components = state.components.len(),
        "strongly connected components found"
    );

    SccPartition {
        components: state.components,
        comp_of: state.comp_of,
    }
}

/// One suspended call of the depth-first search.
struct Frame {
    vertex: usize,
    next_edge: usize,
}

struct TarjanState {
    /// Discovery index, `None` while unvisited.
    index: Vec<Option<usize>>,
    lowlink: Vec<usize>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: usize,
    comp_of: Vec<usize>,
    components: Vec<Vec<usize>>,
}

impl TarjanState {
    fn new(n: usize) -> Self {
        Self {
            index: vec![None; n],
            lowlink: vec![0; n],
            on_stack: vec![false; n],
            stack: Vec::new(),
            next_index: 0,
            comp_of: vec![usize::MAX; n],
            components: Vec::new(),
        }
    }

    fn enter(&mut self, v: usize, metrics: &mut Metrics) {
        metrics.inc(Counter::SccVerticesVisited);
        self.index[v] = Some(self.next_index);
        self.lowlink[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;
    }

    fn strongconnect(&mut self, graph: &Graph, root: usize, metrics: &mut Metrics) {
        self.enter(root, metrics);
        let mut frames = vec![Frame {
            vertex: root,
            next_edge: 0,
        }];

        while let Some(frame) = frames.last_mut() {
            let v = frame.vertex;

            if let Some(edge) = graph.adjacency(v).get(frame.next_edge) {
                frame.next_edge += 1;
                metrics.inc(Counter::SccEdgesExamined);
                let w = edge.to;

                match self.index[w] {
                    None => {
                        self.enter(w, metrics);
                        frames.push(Frame {
                            vertex: w,
                            next_edge: 0,
                        });
                    }
                    Some(w_index) if self.on_stack[w] => {
                        self.lowlink[v] = self.lowlink[v].min(w_index);
                    }
                    Some(_) => {}
                }
                continue;
            }

            // All edges of `v` done: close its component if it is a root,
            // then hand its low-link back to the caller frame.
            frames.pop();
            if self.index[v] == Some(self.lowlink[v]) {
                self.close_component(v);
            }
            if let Some(parent) = frames.last() {
                let p = parent.vertex;
                self.lowlink[p] = self.lowlink[p].min(self.lowlink[v]);
            }
        }
    }

    fn close_component(&mut self, root: usize) {
        let id = self.components.len();
        let mut component = Vec::new();
        while let Some(w) = self.stack.pop() {
            self.on_stack[w] = false;
            self.comp_of[w] = id;
            component.push(w);
            if w == root {
                break;
            }
        }
        self.components.push(component);
    }
}
