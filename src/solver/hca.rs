//! Hydrological Cycle Algorithm - preset over the shared engine.
//!
//! HCA runs the full water cycle: construction, evaporation, condensation,
//! and precipitation, with a temperature scalar bounding the outer loop the
//! way annealing schedules bound theirs.

use crate::error::RiegoResult;
use crate::graph::CostGraph;
use crate::solver::{BestResult, HydroCycle, SelectionRule, SolverConfig, StopRule, TourSolver};

/// Hydrological Cycle solver.
#[derive(Debug, Clone)]
pub struct HcaSolver {
    config: SolverConfig,
    /// Engine kept from the last run for history inspection
    engine: Option<HydroCycle>,
}

impl Default for HcaSolver {
    fn default() -> Self {
        Self {
            config: SolverConfig {
                stop: StopRule::TemperatureBound,
                population_dynamics: true,
                ..SolverConfig::default()
            },
            engine: None,
        }
    }
}

impl HcaSolver {
    /// Create an HCA solver with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the uniform initial soil.
    #[must_use]
    pub fn with_initial_soil(mut self, initial_soil: f64) -> Self {
        self.config.initial_soil = initial_soil;
        self
    }

    /// Set the velocity soil-term weight.
    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.config.alpha = alpha;
        self
    }

    /// Set the soil retention factor PN.
    #[must_use]
    pub fn with_retention(mut self, retention_pn: f64) -> Self {
        self.config.retention_pn = retention_pn;
        self
    }

    /// Set the temperature growth coefficient.
    #[must_use]
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.config.beta = beta;
        self
    }

    /// Set the temperature window the run operates in.
    #[must_use]
    pub fn with_temperature_window(mut self, initial: f64, max: f64) -> Self {
        self.config.initial_temperature = initial;
        self.config.max_temperature = max;
        self
    }

    /// Set the merge threshold in dissimilarity percent.
    #[must_use]
    pub fn with_merge_threshold(mut self, threshold: f64) -> Self {
        self.config.similarity_merge_threshold = threshold;
        self
    }

    /// Set the next-hop selection rule.
    #[must_use]
    pub fn with_selection(mut self, selection: SelectionRule) -> Self {
        self.config.selection = selection;
        self
    }

    /// Cap the outer loop even while the temperature stays below its bound.
    #[must_use]
    pub fn with_cycle_cap(mut self, max_cycles: usize) -> Self {
        self.config.max_outer_iterations = max_cycles;
        self
    }

    /// Set the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Best cost per cycle from the latest run.
    pub fn history(&self) -> &[f64] {
        self.engine.as_ref().map_or(&[], HydroCycle::history)
    }
}

impl TourSolver for HcaSolver {
    fn solve(&mut self, graph: &CostGraph) -> RiegoResult<BestResult> {
        let mut engine = HydroCycle::new(self.config.clone());
        let result = engine.solve(graph);
        self.engine = Some(engine);
        result
    }

    fn name(&self) -> &'static str {
        "Hydrological Cycle Algorithm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_edge_graph(n: usize) -> CostGraph {
        let mut matrix = vec![vec![100.0; n]; n];
        for (i, row) in matrix.iter_mut().enumerate() {
            row[i] = 0.0;
        }
        matrix[0][1] = 1.0;
        matrix[1][0] = 1.0;
        CostGraph::from_matrix("cheap-edge", matrix).expect("should build")
    }

    #[test]
    fn test_hca_builder() {
        let solver = HcaSolver::new()
            .with_initial_soil(500.0)
            .with_alpha(3.0)
            .with_beta(5.0)
            .with_retention(0.9)
            .with_merge_threshold(25.0)
            .with_temperature_window(10.0, 200.0)
            .with_seed(9);
        assert!((solver.config.initial_soil - 500.0).abs() < 1e-10);
        assert!((solver.config.alpha - 3.0).abs() < 1e-10);
        assert!((solver.config.beta - 5.0).abs() < 1e-10);
        assert!((solver.config.retention_pn - 0.9).abs() < 1e-10);
        assert!((solver.config.similarity_merge_threshold - 25.0).abs() < 1e-10);
        assert!((solver.config.initial_temperature - 10.0).abs() < 1e-10);
        assert!((solver.config.max_temperature - 200.0).abs() < 1e-10);
        assert_eq!(solver.config.seed, Some(9));
    }

    #[test]
    fn test_hca_name() {
        assert_eq!(HcaSolver::new().name(), "Hydrological Cycle Algorithm");
    }

    #[test]
    fn test_hca_finds_cheap_edge_tour() {
        let graph = cheap_edge_graph(5);
        let mut solver = HcaSolver::new().with_seed(42).with_cycle_cap(20);
        let result = solver.solve(&graph).expect("should solve");

        assert!(graph.validate_tour(&result.tour).is_ok());
        // The optimal tour keeps the single cheap edge: 1 + 4 * 100.
        assert!((result.cost - 401.0).abs() < 1e-10);
        let closed: Vec<(usize, usize)> = result
            .tour
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(std::iter::once((
                result.tour[result.tour.len() - 1],
                result.tour[0],
            )))
            .collect();
        assert!(closed
            .iter()
            .any(|&(a, b)| (a, b) == (0, 1) || (a, b) == (1, 0)));
    }

    #[test]
    fn test_hca_history_non_increasing() {
        let graph = cheap_edge_graph(6);
        let mut solver = HcaSolver::new().with_seed(11).with_cycle_cap(10);
        solver.solve(&graph).expect("should solve");

        let history = solver.history();
        assert!(!history.is_empty());
        for window in history.windows(2) {
            assert!(window[1] <= window[0]);
        }
    }

    #[test]
    fn test_hca_respects_cycle_count() {
        let graph = cheap_edge_graph(5);
        let mut solver = HcaSolver::new().with_seed(1).with_cycle_cap(3);
        let result = solver.solve(&graph).expect("should solve");
        assert!(result.cycles_run <= 3);
        assert!(result.cycles_run >= 1);
    }
}
