//! Tour solver implementations.
//!
//! Provides the water-inspired metaheuristic backends:
//! - HCA (Hydrological Cycle Algorithm)
//! - IWD (Intelligent Water Drops)
//! - WFA (Water Flow Algorithm, flow splitting)
//!
//! The first two share one engine ([`HydroCycle`]) parameterized by a
//! selection rule and a stopping rule; the presets only differ in the
//! policies and defaults they configure.

mod constructor;
mod cycle;
mod hca;
mod iwd;
mod updater;
mod wfa;

pub use cycle::{HydroCycle, Incumbent};
pub use hca::HcaSolver;
pub use iwd::IwdSolver;
pub use wfa::WaterFlowSolver;

use crate::error::RiegoResult;
use crate::graph::CostGraph;
use serde::{Deserialize, Serialize};

/// How the constructor picks the next node among the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionRule {
    /// Take the candidate with the maximum selection probability, ties
    /// broken by first-seen order. This is the behavior the drop-based
    /// algorithms were designed around, not an approximation of sampling.
    GreedyProbabilistic,
    /// Roulette draw proportional to the selection probabilities.
    WeightedRandom,
}

/// When the outer cycle loop stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopRule {
    /// Run `max_outer_iterations` cycles, ignoring temperature.
    FixedIterations,
    /// Run while `temperature < max_temperature`, with the temperature
    /// rising during construction and dropping at condensation.
    TemperatureBound,
}

/// Tunables shared by the drop-based solvers. All fields have defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Soil placed on every edge at the start of a cycle
    pub initial_soil: f64,
    /// Velocity each drop starts a cycle with
    pub initial_velocity: f64,
    /// Carried soil (and therefore quality) each drop starts with
    pub initial_carried_soil: f64,
    /// Small positive constant guarding denominators
    pub epsilon: f64,
    /// Weight of the soil term in the velocity update
    pub alpha: f64,
    /// Soil retention factor PN, below 1
    pub retention_pn: f64,
    /// Temperature growth coefficient
    pub beta: f64,
    /// Numerator of the quality term in the velocity update
    pub quality_scale: f64,
    /// Scale applied to depth inside the desirability heuristic
    pub depth_normalization: f64,
    /// Factor applied to the initial soil of edges on the best-path hint
    pub best_path_soil_factor: f64,
    /// Temperature at the start of a run
    pub initial_temperature: f64,
    /// Temperature bound ending a run
    pub max_temperature: f64,
    /// Temperature released at each condensation stage
    pub temperature_drop: f64,
    /// Outer cycle bound for fixed-iteration runs
    pub max_outer_iterations: usize,
    /// Tours at or below this dissimilarity percentage merge
    pub similarity_merge_threshold: f64,
    /// Run evaporation, condensation, and precipitation between cycles
    pub population_dynamics: bool,
    /// Next-hop selection policy
    pub selection: SelectionRule,
    /// Outer loop stopping policy
    pub stop: StopRule,
    /// Seed for the run's single PRNG; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_soil: 10_000.0,
            initial_velocity: 100.0,
            initial_carried_soil: 1.0,
            epsilon: 0.01,
            alpha: 2.0,
            retention_pn: 0.99,
            beta: 10.0,
            quality_scale: 100.0,
            depth_normalization: 10_000.0,
            best_path_soil_factor: 0.9,
            initial_temperature: 50.0,
            max_temperature: 1000.0,
            temperature_drop: 50.0,
            max_outer_iterations: 1000,
            similarity_merge_threshold: 50.0,
            population_dynamics: true,
            selection: SelectionRule::GreedyProbabilistic,
            stop: StopRule::TemperatureBound,
            seed: None,
        }
    }
}

/// Outcome of a solver run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestResult {
    /// Best complete tour found, as node ids; closes back to `tour[0]`
    pub tour: Vec<usize>,
    /// Total tour cost including the closing edge
    pub cost: f64,
    /// Outer cycles executed
    pub cycles_run: usize,
}

/// Trait for tour solvers.
pub trait TourSolver {
    /// Search `graph` for a low-cost Hamiltonian tour.
    ///
    /// The caller's graph is never mutated; solvers work on an internal
    /// copy of the soil state.
    fn solve(&mut self, graph: &CostGraph) -> RiegoResult<BestResult>;

    /// Get algorithm name.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SolverConfig::default();
        assert!((config.initial_soil - 10_000.0).abs() < 1e-10);
        assert!((config.epsilon - 0.01).abs() < 1e-10);
        assert!((config.alpha - 2.0).abs() < 1e-10);
        assert!((config.retention_pn - 0.99).abs() < 1e-10);
        assert!(config.retention_pn < 1.0);
        assert!((config.beta - 10.0).abs() < 1e-10);
        assert!((config.similarity_merge_threshold - 50.0).abs() < 1e-10);
        assert_eq!(config.max_outer_iterations, 1000);
        assert_eq!(config.selection, SelectionRule::GreedyProbabilistic);
        assert_eq!(config.stop, StopRule::TemperatureBound);
        assert!(config.population_dynamics);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_temperature_window() {
        let config = SolverConfig::default();
        assert!(config.initial_temperature < config.max_temperature);
        assert!(config.temperature_drop > 0.0);
    }
}
