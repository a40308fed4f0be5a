//! End-to-end analysis: SCC, condensation, topological order, paths.
//!
//! [`analyze`] runs the four stages in sequence on one graph. Each stage gets
//! a fresh [`Metrics`] recorder so its counters and time are reported
//! separately; condensation is timed as part of the SCC stage.

use std::fmt;

use dagpath_core::{Graph, GraphError, Metrics, MetricsSnapshot};
use serde::Serialize;
use tracing::{info, instrument};

use crate::condense::{condense_partition, expand_order};
use crate::paths::{CriticalPath, ShortestPaths, longest_path, shortest_paths};
use crate::scc::{SccPartition, decompose};
use crate::topo::topo_sort;

/// Pipeline stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    #[serde(rename = "SCC")]
    Scc,
    #[serde(rename = "TOPO")]
    Topo,
    #[serde(rename = "DAG Shortest")]
    Shortest,
    #[serde(rename = "DAG Longest")]
    Longest,
}

impl Stage {
    pub const ALL: [Self; 4] = [Self::Scc, Self::Topo, Self::Shortest, Self::Longest];

    /// Report label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scc => "SCC",
            Self::Topo => "TOPO",
            Self::Shortest => "DAG Shortest",
            Self::Longest => "DAG Longest",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Counters and elapsed time of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub metrics: MetricsSnapshot,
}

/// Everything one pipeline run produces.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub partition: SccPartition,
    /// Condensation DAG, one vertex per component.
    #[serde(skip)]
    pub condensation: Graph,
    /// Topological order of the condensation (component ids).
    pub component_order: Vec<usize>,
    /// Original vertices in component order.
    pub vertex_order: Vec<usize>,
    /// Shortest paths over the condensation from the source's component.
    /// `None` for an empty graph.
    pub shortest: Option<ShortestPaths>,
    pub critical: CriticalPath,
    pub stages: Vec<StageReport>,
}

impl Analysis {
    /// Report for `stage`, if it ran.
    #[must_use]
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }
}

/// Run every stage on `graph`, measuring shortest paths from `source`.
///
/// The shortest-path stage runs on the condensation from the component that
/// contains `source`. It is skipped for an empty graph, where no source
/// exists.
///
/// # Errors
///
/// Returns [`GraphError::VertexOutOfRange`] if the graph is non-empty and
/// `source` is not one of its vertices.
#[instrument(skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn analyze(graph: &Graph, source: usize) -> Result<Analysis, GraphError> {
    let n = graph.vertex_count();
    if n > 0 && source >= n {
        return Err(GraphError::VertexOutOfRange {
            vertex: source,
            vertex_count: n,
        });
    }

    let mut stages = Vec::with_capacity(Stage::ALL.len());

    let mut metrics = Metrics::new();
    let (partition, condensation) = metrics.timed(|m| {
        let partition = decompose(graph, m);
        let condensation = condense_partition(graph, &partition);
        (partition, condensation)
    });
    stages.push(StageReport {
        stage: Stage::Scc,
        metrics: metrics.snapshot(),
    });

    let mut metrics = Metrics::new();
    let component_order = metrics.timed(|m| topo_sort(&condensation, m))?;
    stages.push(StageReport {
        stage: Stage::Topo,
        metrics: metrics.snapshot(),
    });
    let vertex_order = expand_order(&component_order, &partition.components);

    let shortest = if n == 0 {
        None
    } else {
        let mut metrics = Metrics::new();
        let from = partition.comp_of[source];
        let result =
            metrics.timed(|m| shortest_paths(&condensation, from, &component_order, m))?;
        stages.push(StageReport {
            stage: Stage::Shortest,
            metrics: metrics.snapshot(),
        });
        Some(result)
    };

    let mut metrics = Metrics::new();
    let critical = metrics.timed(|m| longest_path(&condensation, &component_order, m));
    stages.push(StageReport {
        stage: Stage::Longest,
        metrics: metrics.snapshot(),
    });

    info!(
        components = partition.component_count(),
        critical_length = critical.length,
        "analysis complete"
    );

    Ok(Analysis {
        partition,
        condensation,
        component_order,
        vertex_order,
        shortest,
        critical,
        stages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagpath_core::Counter;

    fn graph(n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut g = Graph::new(n, true);
        for &(u, v) in edges {
            g.add_edge(u, v, 3.0);
        }
        g
    }

    #[test]
    fn cyclic_input_is_analyzed_through_its_condensation() {
        // {0,1,2} cycle -> 3 -> 4
        let g = graph(5, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)]);
        let analysis = analyze(&g, 0).expect("analyze");

        assert_eq!(analysis.partition.component_count(), 3);
        assert_eq!(analysis.condensation.vertex_count(), 3);
        assert_eq!(analysis.vertex_order.len(), 5);

        let big = analysis.partition.comp_of[0];
        assert_eq!(analysis.component_order[0], big);

        let shortest = analysis.shortest.as_ref().expect("non-empty");
        assert_eq!(shortest.source, big);
        // Condensation edges carry weight 1.
        assert_eq!(shortest.distance(analysis.partition.comp_of[4]), Some(2.0));
        assert!((analysis.critical.length - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn every_stage_reports_in_order() {
        let g = graph(3, &[(0, 1), (1, 2)]);
        let analysis = analyze(&g, 0).expect("analyze");

        let stages: Vec<Stage> = analysis.stages.iter().map(|r| r.stage).collect();
        assert_eq!(stages, Stage::ALL.to_vec());

        let scc = analysis.stage(Stage::Scc).expect("scc");
        assert_eq!(scc.metrics.get(Counter::SccVerticesVisited), 3);
        let topo = analysis.stage(Stage::Topo).expect("topo");
        assert_eq!(topo.metrics.get(Counter::TopoPops), 3);
    }

    #[test]
    fn empty_graph_skips_shortest_paths() {
        let analysis = analyze(&Graph::new(0, true), 0).expect("analyze");
        assert!(analysis.shortest.is_none());
        assert!(analysis.stage(Stage::Shortest).is_none());
        assert!(analysis.critical.path.is_empty());
        assert_eq!(analysis.stages.len(), 3);
    }

    #[test]
    fn out_of_range_source_is_rejected() {
        let err = analyze(&graph(2, &[(0, 1)]), 2).expect_err("range");
        assert_eq!(
            err,
            GraphError::VertexOutOfRange {
                vertex: 2,
                vertex_count: 2
            }
        );
    }

    #[test]
    fn stage_labels_serialize_as_report_names() {
        let json = serde_json::to_value(Stage::Shortest).expect("serialize");
        assert_eq!(json, serde_json::json!("DAG Shortest"));
        assert_eq!(Stage::Topo.to_string(), "TOPO");
    }
}
