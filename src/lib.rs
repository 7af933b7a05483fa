//! Riego: water-inspired metaheuristics for the travelling salesman problem.
//!
//! Riego implements a family of stochastic tour solvers modelled on water
//! moving through terrain. Drops traverse a cost graph whose edges carry a
//! mutable soil scalar; faster drops erode soil from the edges they cross,
//! slower drops deposit it, and later drops read the soil landscape as a
//! shared memory of good routes.
//!
//! # Quick Start
//!
//! ```
//! use riego_tsp::{CostGraph, HcaSolver, TourSolver};
//!
//! let graph = CostGraph::from_coords(
//!     "square",
//!     &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
//! )
//! .unwrap();
//!
//! let mut solver = HcaSolver::new().with_seed(42).with_cycle_cap(10);
//! let result = solver.solve(&graph).unwrap();
//! assert_eq!(result.tour.len(), 4);
//! assert!((result.cost - 4.0).abs() < 1e-9);
//! ```
//!
//! # Modules
//!
//! - [`graph`]: Cost graph with per-edge soil state
//! - [`agent`]: Water drop agents and population statistics
//! - [`solver`]: HCA, IWD, and WFA solver backends
//! - [`error`]: Error taxonomy and result alias

pub mod agent;
pub mod error;
pub mod graph;
pub mod solver;

pub use agent::WaterDrop;
pub use error::{RiegoError, RiegoResult};
pub use graph::{CostGraph, EdgeRecord, Neighbor};
pub use solver::{
    BestResult, HcaSolver, HydroCycle, IwdSolver, SelectionRule, SolverConfig, StopRule,
    TourSolver, WaterFlowSolver,
};
