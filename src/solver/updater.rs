//! Per-hop state updates: velocity, edge soil, carried soil.
//!
//! The three updates run in a fixed order after every successful hop.
//! Degenerate denominators (zero, negative, or non-finite) are clamped to
//! the configured epsilon and logged; the equations never propagate NaN or
//! infinity into the drop or the graph.

use crate::agent::WaterDrop;
use crate::error::RiegoResult;
use crate::graph::CostGraph;
use crate::solver::SolverConfig;
use rand::rngs::StdRng;
use rand::Rng;

/// Clamp a denominator (or other value that must stay positive) to epsilon.
fn positive_or_epsilon(value: f64, epsilon: f64, what: &str) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        log::debug!("clamping degenerate {what} ({value}) to {epsilon}");
        epsilon
    }
}

/// Velocity update, stage 1.
///
/// `v' = K*v + alpha*(v/soil) + sqrt(v/carried) + C/quality + sqrt(v/depth)`
/// where `K` is a fresh uniform draw in `[0, 1]` (the stochastic roughness
/// coefficient) and `depth = cost / soil`.
pub(crate) fn update_velocity(
    drop: &mut WaterDrop,
    edge_cost: f64,
    edge_soil: f64,
    config: &SolverConfig,
    rng: &mut StdRng,
) {
    let k: f64 = rng.gen();
    let v = drop.velocity();
    let soil = positive_or_epsilon(edge_soil, config.epsilon, "edge soil");
    let depth = positive_or_epsilon(edge_cost / soil, config.epsilon, "edge depth");
    let carried = positive_or_epsilon(drop.carried_soil(), config.epsilon, "carried soil");
    let quality = positive_or_epsilon(drop.solution_quality(), config.epsilon, "solution quality");

    let mut next = k * v
        + config.alpha * (v / soil)
        + (v / carried).sqrt()
        + config.quality_scale / quality
        + (v / depth).sqrt();
    if !next.is_finite() || next <= 0.0 {
        log::warn!("drop {}: degenerate velocity {next}, clamping", drop.id());
        next = config.epsilon;
    }
    drop.set_velocity(next);
}

/// Soil update, stage 2.
///
/// Fast drops (at or above the population mean velocity) erode the edge;
/// slow drops deposit onto it. The write goes through the graph's symmetric
/// soil path, so the reverse record is updated as well.
pub(crate) fn update_soil(
    graph: &mut CostGraph,
    drop: &WaterDrop,
    from: usize,
    to: usize,
    mean_velocity: f64,
    config: &SolverConfig,
) -> RiegoResult<()> {
    let edge_cost = graph.cost(from, to)?;
    let soil = graph.soil(from, to)?;
    let delta_soil = delta_soil(drop, edge_cost, config);
    // sqrt(1/depth) = sqrt(soil/cost), guarded against negative soil and
    // zero cost.
    let inverse_depth = positive_or_epsilon(soil / edge_cost, config.epsilon, "inverse depth");
    let retained = config.retention_pn * soil;

    let new_soil = if drop.velocity() >= mean_velocity {
        retained - delta_soil - inverse_depth.sqrt()
    } else {
        retained + delta_soil + inverse_depth.sqrt()
    };
    graph.set_soil(from, to, new_soil)
}

/// Carried-soil update, stage 3.
///
/// The quality proxy is synchronized to the carried soil afterwards; the
/// value can move in either direction, which is deliberate noise in the
/// heuristic.
pub(crate) fn update_carried_soil(drop: &mut WaterDrop, edge_cost: f64, config: &SolverConfig) {
    let delta = delta_soil(drop, edge_cost, config);
    let quality = positive_or_epsilon(drop.solution_quality(), config.epsilon, "solution quality");
    let carried = drop.carried_soil() + delta / quality;
    drop.set_carried_soil(carried);
    drop.set_solution_quality(carried);
}

/// `delta_soil = 1 / (cost / velocity)`, the soil moved in one traversal.
fn delta_soil(drop: &WaterDrop, edge_cost: f64, config: &SolverConfig) -> f64 {
    let velocity = positive_or_epsilon(drop.velocity(), config.epsilon, "velocity");
    let time = positive_or_epsilon(edge_cost / velocity, config.epsilon, "traverse time");
    1.0 / time
}
