//! Intelligent Water Drops - constructive preset over the shared engine.
//!
//! IWD skips the population stages entirely: every cycle rebuilds the
//! population, constructs tours, and reinforces the incumbent's edges for
//! the next cycle. The outer loop runs a fixed number of iterations.

use crate::error::RiegoResult;
use crate::graph::CostGraph;
use crate::solver::{BestResult, HydroCycle, SelectionRule, SolverConfig, StopRule, TourSolver};

/// Intelligent Water Drops solver.
#[derive(Debug, Clone)]
pub struct IwdSolver {
    config: SolverConfig,
    engine: Option<HydroCycle>,
}

impl Default for IwdSolver {
    fn default() -> Self {
        Self {
            config: SolverConfig {
                initial_soil: 1000.0,
                stop: StopRule::FixedIterations,
                population_dynamics: false,
                ..SolverConfig::default()
            },
            engine: None,
        }
    }
}

impl IwdSolver {
    /// Create an IWD solver with default parameters.
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

    /// Set the number of outer iterations.
    #[must_use]
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.config.max_outer_iterations = iterations;
        self
    }

    /// Set the next-hop selection rule.
    #[must_use]
    pub fn with_selection(mut self, selection: SelectionRule) -> Self {
        self.config.selection = selection;
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

impl TourSolver for IwdSolver {
    fn solve(&mut self, graph: &CostGraph) -> RiegoResult<BestResult> {
        let mut engine = HydroCycle::new(self.config.clone());
        let result = engine.solve(graph);
        self.engine = Some(engine);
        result
    }

    fn name(&self) -> &'static str {
        "Intelligent Water Drops"
    }
}
