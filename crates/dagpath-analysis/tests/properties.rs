//! Property tests for the analysis stages on small random graphs.

use dagpath_analysis::condense::condense_partition;
use dagpath_analysis::paths::{longest_path, shortest_paths};
use dagpath_analysis::scc::decompose;
use dagpath_analysis::topo::{is_topological_order, topo_sort};
use dagpath_core::{Graph, GraphError, Metrics};
use proptest::prelude::*;

use generators::*;

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    // SCC

    #[test]
    fn partition_is_total_and_disjoint(g in arb_graph(12)) {
        let p = decompose(&g, &mut Metrics::new());
        let mut seen = vec![false; g.vertex_count()];
        for (id, component) in p.components.iter().enumerate() {
            prop_assert!(!component.is_empty());
            for &v in component {
                prop_assert!(!seen[v], "vertex {} in two components", v);
                seen[v] = true;
                prop_assert_eq!(p.comp_of[v], id);
            }
        }
        prop_assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn same_component_iff_mutually_reachable(g in arb_graph(10)) {
        let p = decompose(&g, &mut Metrics::new());
        let reach = reachability(&g);
        let n = g.vertex_count();
        for a in 0..n {
            for b in 0..n {
                prop_assert_eq!(p.same_component(a, b), reach[a][b] && reach[b][a]);
            }
        }
    }

    #[test]
    fn components_complete_in_reverse_topological_order(g in arb_graph(12)) {
        let p = decompose(&g, &mut Metrics::new());
        for (u, v, _) in g.edges() {
            prop_assert!(p.comp_of[u] >= p.comp_of[v]);
        }
    }

    // Condensation

    #[test]
    fn condensation_always_sorts(g in arb_graph(12)) {
        let p = decompose(&g, &mut Metrics::new());
        let dag = condense_partition(&g, &p);
        prop_assert_eq!(dag.vertex_count(), p.component_count());

        let order = topo_sort(&dag, &mut Metrics::new());
        prop_assert!(order.is_ok());
        prop_assert!(is_topological_order(&dag, &order.unwrap_or_default()));
    }

    #[test]
    fn condensation_edges_are_unique_unit_crossings(g in arb_graph(12)) {
        let p = decompose(&g, &mut Metrics::new());
        let dag = condense_partition(&g, &p);
        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for (a, b, w) in dag.edges() {
            prop_assert!(a != b);
            prop_assert!((w - 1.0).abs() < f64::EPSILON);
            prop_assert!(!pairs.contains(&(a, b)));
            prop_assert!(g.edges().any(|(u, v, _)| p.comp_of[u] == a && p.comp_of[v] == b));
            pairs.push((a, b));
        }
    }

    #[test]
    fn condensing_a_dag_keeps_its_edge_set(g in arb_dag(10)) {
        let p = decompose(&g, &mut Metrics::new());
        prop_assert_eq!(p.component_count(), g.vertex_count());
        let dag = condense_partition(&g, &p);

        let mut expected: Vec<(usize, usize)> = g
            .edges()
            .map(|(u, v, _)| (p.comp_of[u], p.comp_of[v]))
            .collect();
        expected.sort_unstable();
        expected.dedup();
        let mut actual: Vec<(usize, usize)> = dag.edges().map(|(u, v, _)| (u, v)).collect();
        actual.sort_unstable();
        prop_assert_eq!(actual, expected);
    }

    // Topological sort

    #[test]
    fn topo_sort_fails_iff_graph_has_cycle(g in arb_graph(10)) {
        match topo_sort(&g, &mut Metrics::new()) {
            Ok(order) => {
                prop_assert!(!has_cycle(&g));
                prop_assert!(is_topological_order(&g, &order));
            }
            Err(GraphError::Cyclic { sorted, total }) => {
                prop_assert!(has_cycle(&g));
                prop_assert!(sorted < total);
                prop_assert_eq!(total, g.vertex_count());
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    // Paths

    #[test]
    fn shortest_path_weight_matches_distance(g in arb_dag(10), pick in any::<prop::sample::Index>()) {
        let order = topo_sort(&g, &mut Metrics::new()).unwrap_or_default();
        let source = pick.index(g.vertex_count());
        let sp = shortest_paths(&g, source, &order, &mut Metrics::new())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        for v in 0..g.vertex_count() {
            match sp.distance(v) {
                Some(d) => {
                    let path = sp.path(v);
                    prop_assert_eq!(path.first().copied(), Some(source));
                    prop_assert_eq!(path.last().copied(), Some(v));
                    prop_assert_eq!(path_weight(&g, path, true), Some(d));
                }
                None => prop_assert!(sp.path(v).is_empty()),
            }
        }
    }

    #[test]
    fn shortest_distances_never_decrease_along_paths(g in arb_dag(10)) {
        let order = topo_sort(&g, &mut Metrics::new()).unwrap_or_default();
        let source = order.first().copied().unwrap_or(0);
        let sp = shortest_paths(&g, source, &order, &mut Metrics::new())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        for v in 0..g.vertex_count() {
            let path = sp.path(v);
            for hop in path.windows(2) {
                prop_assert!(sp.dist[hop[0]] <= sp.dist[hop[1]]);
            }
        }
    }

    #[test]
    fn critical_path_is_the_heaviest_path(g in arb_dag(8)) {
        let order = topo_sort(&g, &mut Metrics::new()).unwrap_or_default();
        let cp = longest_path(&g, &order, &mut Metrics::new());

        let (length, endpoint) = brute_force_longest(&g);
        prop_assert_eq!(cp.length, length);
        prop_assert_eq!(cp.endpoint(), endpoint);
        prop_assert_eq!(path_weight(&g, &cp.path, false), Some(cp.length));
    }
}

#[test]
fn generated_dags_are_acyclic() {
    use proptest::strategy::ValueTree;

    let mut runner = proptest::test_runner::TestRunner::default();
    let strategy = arb_dag(10);
    for _ in 0..64 {
        let g: Graph = strategy
            .new_tree(&mut runner)
            .expect("generate")
            .current();
        assert!(!has_cycle(&g));
    }
}
