//! Probabilistic next-hop selection.
//!
//! Desirability of a candidate edge combines an inverse of its soil with an
//! inverse of its depth (cost / soil): the search prefers cheap,
//! well-trodden paths. Low soil means the edge has been eroded by fast
//! drops, which raises its desirability.

use crate::agent::WaterDrop;
use crate::error::RiegoResult;
use crate::graph::CostGraph;
use crate::solver::{SelectionRule, SolverConfig};
use rand::rngs::StdRng;
use rand::Rng;

/// Desirability of hopping onto an edge with the given cost and soil.
///
/// `f_soil^2 * g_depth` with `f_soil = 1 / (epsilon + soil)` and
/// `g_depth = 1 / (depth * depth_normalization)`.
fn desirability(cost: f64, soil: f64, config: &SolverConfig) -> f64 {
    let f_soil = 1.0 / (config.epsilon + soil);
    let depth = cost / soil;
    let g_depth = 1.0 / (depth * config.depth_normalization);
    f_soil * f_soil * g_depth
}

/// Pick the next node for `drop`, or `None` when every neighbor is already
/// visited and the tour cannot be extended.
pub(crate) fn choose_next(
    graph: &CostGraph,
    drop: &WaterDrop,
    config: &SolverConfig,
    rng: &mut StdRng,
) -> RiegoResult<Option<usize>> {
    let mut candidates = Vec::new();
    for neighbor in graph.neighbors_of(drop.current())? {
        if !drop.is_visited(neighbor.node) {
            let weight = desirability(neighbor.cost, neighbor.soil, config);
            candidates.push((neighbor.node, weight));
        }
    }
    if candidates.is_empty() {
        return Ok(None);
    }

    let sum: f64 = candidates.iter().map(|&(_, w)| w).sum();
    if !sum.is_finite() || sum == 0.0 {
        // Degenerate weights: treat every candidate as equally likely.
        log::debug!(
            "drop {} at node {}: non-finite desirability sum, equal weighting",
            drop.id(),
            drop.current()
        );
        for candidate in &mut candidates {
            candidate.1 = 1.0;
        }
    } else {
        for candidate in &mut candidates {
            candidate.1 /= sum;
        }
    }

    let chosen = match config.selection {
        SelectionRule::GreedyProbabilistic => greedy_pick(&candidates),
        SelectionRule::WeightedRandom => roulette_pick(&candidates, rng),
    };
    Ok(Some(chosen))
}

/// Maximum-probability candidate, first seen wins ties.
fn greedy_pick(candidates: &[(usize, f64)]) -> usize {
    let mut best = candidates[0].0;
    let mut best_probability = f64::NEG_INFINITY;
    for &(node, probability) in candidates {
        if probability > best_probability {
            best_probability = probability;
            best = node;
        }
    }
    best
}

/// Roulette draw over the candidate probabilities.
fn roulette_pick(candidates: &[(usize, f64)], rng: &mut StdRng) -> usize {
    let total: f64 = candidates.iter().map(|&(_, p)| p.max(0.0)).sum();
    if !total.is_finite() || total <= 0.0 {
        return candidates[rng.gen_range(0..candidates.len())].0;
    }
    let target = rng.gen::<f64>() * total;
    let mut running = 0.0;
    for &(node, probability) in candidates {
        running += probability.max(0.0);
        if running >= target {
            return node;
        }
    }
    candidates[candidates.len() - 1].0
}
