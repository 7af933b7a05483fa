//! Property-based tests for riego-tsp.
//!
//! Uses proptest to verify invariants across many random inputs.

use proptest::prelude::*;
use riego_tsp::{CostGraph, HcaSolver, IwdSolver, TourSolver, WaterFlowSolver};

// ============================================================================
// Instance Generation Strategies
// ============================================================================

/// Generate random coordinates for a tour instance
fn random_coords(n: usize) -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((0.0..100.0f64, 0.0..100.0f64), n)
}

/// Generate a random Euclidean graph with 3-12 nodes
fn random_graph() -> impl Strategy<Value = CostGraph> {
    (3usize..12)
        .prop_flat_map(random_coords)
        .prop_map(|coords| CostGraph::from_coords("random", &coords).unwrap())
}

// ============================================================================
// Graph State Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_soil_stays_symmetric(
        graph in random_graph(),
        writes in prop::collection::vec((0usize..12, 0usize..12, 0.1..5000.0f64), 1..40)
    ) {
        let mut graph = graph;
        let n = graph.num_nodes();
        for (a, b, soil) in writes {
            let (a, b) = (a % n, b % n);
            if a == b {
                continue;
            }
            graph.set_soil(a, b, soil).unwrap();
        }
        for a in 0..n {
            for b in 0..n {
                if a == b {
                    continue;
                }
                prop_assert!((graph.soil(a, b).unwrap() - graph.soil(b, a).unwrap()).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn prop_tour_cost_includes_closing_edge(graph in random_graph()) {
        let n = graph.num_nodes();
        let tour: Vec<usize> = (0..n).collect();
        let mut by_hand = 0.0;
        for w in tour.windows(2) {
            by_hand += graph.cost(w[0], w[1]).unwrap();
        }
        by_hand += graph.cost(tour[n - 1], tour[0]).unwrap();
        prop_assert!((graph.tour_cost(&tour).unwrap() - by_hand).abs() < 1e-9);
    }
}

// ============================================================================
// Solver Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn prop_hca_returns_valid_tour(graph in random_graph(), seed in any::<u64>()) {
        let mut solver = HcaSolver::new().with_seed(seed).with_cycle_cap(5);
        let result = solver.solve(&graph).unwrap();

        prop_assert_eq!(result.tour.len(), graph.num_nodes());
        prop_assert!(graph.validate_tour(&result.tour).is_ok());
        prop_assert!(result.cost.is_finite());
        prop_assert!(result.cost >= 0.0);
        // Reported cost matches a recomputation from the original graph.
        prop_assert!((graph.tour_cost(&result.tour).unwrap() - result.cost).abs() < 1e-6);
    }

    #[test]
    fn prop_iwd_returns_valid_tour(graph in random_graph(), seed in any::<u64>()) {
        let mut solver = IwdSolver::new().with_seed(seed).with_iterations(5);
        let result = solver.solve(&graph).unwrap();

        prop_assert!(graph.validate_tour(&result.tour).is_ok());
        prop_assert_eq!(result.cycles_run, 5);
        prop_assert!((graph.tour_cost(&result.tour).unwrap() - result.cost).abs() < 1e-6);
    }

    #[test]
    fn prop_wfa_returns_valid_tour(graph in random_graph(), seed in any::<u64>()) {
        let mut solver = WaterFlowSolver::new().with_seed(seed);
        let result = solver.solve(&graph).unwrap();

        prop_assert!(graph.validate_tour(&result.tour).is_ok());
        prop_assert!(result.cost.is_finite());
    }

    #[test]
    fn prop_hca_deterministic_under_seed(graph in random_graph(), seed in any::<u64>()) {
        let mut first = HcaSolver::new().with_seed(seed).with_cycle_cap(4);
        let mut second = HcaSolver::new().with_seed(seed).with_cycle_cap(4);
        let a = first.solve(&graph).unwrap();
        let b = second.solve(&graph).unwrap();
        prop_assert_eq!(a.tour, b.tour);
        prop_assert!((a.cost - b.cost).abs() < 1e-12);
        prop_assert_eq!(a.cycles_run, b.cycles_run);
    }

    #[test]
    fn prop_hca_history_never_increases(graph in random_graph(), seed in any::<u64>()) {
        let mut solver = HcaSolver::new().with_seed(seed).with_cycle_cap(6);
        solver.solve(&graph).unwrap();
        for window in solver.history().windows(2) {
            prop_assert!(window[1] <= window[0] + 1e-12);
        }
    }

    #[test]
    fn prop_solve_leaves_caller_graph_unchanged(graph in random_graph(), seed in any::<u64>()) {
        let before: Vec<f64> = {
            let n = graph.num_nodes();
            let mut soils = Vec::new();
            for a in 0..n {
                for b in 0..n {
                    if a != b {
                        soils.push(graph.soil(a, b).unwrap());
                    }
                }
            }
            soils
        };

        let mut solver = HcaSolver::new().with_seed(seed).with_cycle_cap(3);
        solver.solve(&graph).unwrap();

        let n = graph.num_nodes();
        let mut idx = 0;
        for a in 0..n {
            for b in 0..n {
                if a != b {
                    prop_assert!((graph.soil(a, b).unwrap() - before[idx]).abs() < 1e-12);
                    idx += 1;
                }
            }
        }
    }
}

// ============================================================================
// Construction Error Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn prop_rejects_undersized_matrices(cost in 0.0..100.0f64) {
        let matrix = vec![vec![cost]];
        prop_assert!(CostGraph::from_matrix("tiny", matrix).is_err());
    }

    #[test]
    fn prop_rejects_negative_costs(cost in -100.0..-0.001f64) {
        let matrix = vec![
            vec![0.0, cost, 1.0],
            vec![cost, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ];
        prop_assert!(CostGraph::from_matrix("negative", matrix).is_err());
    }
}
