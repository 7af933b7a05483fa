//! Water Flow Algorithm - flow-splitting search.
//!
//! A flow carries mass and velocity. At each node it splits into up to
//! `max_subflows` sub-flows toward the cheapest unvisited neighbors; each
//! sub-flow inherits a share of the mass and a perturbed velocity. Light,
//! slow flows stop splitting, which bounds the search tree. A
//! nearest-neighbour tour improved by 2-opt seeds the incumbent before any
//! splitting starts.

use crate::error::RiegoResult;
use crate::graph::CostGraph;
use crate::solver::{BestResult, Incumbent, TourSolver};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Water Flow solver.
#[derive(Debug, Clone)]
pub struct WaterFlowSolver {
    /// Mass of the main flow spawned at each start node
    pub base_mass: f64,
    /// Velocity of the main flow
    pub base_velocity: f64,
    /// Momentum needed per sub-flow; higher momentum means fewer splits
    pub momentum: f64,
    /// Upper bound on sub-flows split from a single flow
    pub max_subflows: usize,
    /// Gravity constant feeding the sub-flow velocity perturbation
    pub gravity: f64,
    /// Cap on expanded flows per start node
    pub max_flows: usize,
    seed: Option<u64>,
}

impl Default for WaterFlowSolver {
    fn default() -> Self {
        Self {
            base_mass: 8.0,
            base_velocity: 5.0,
            momentum: 20.0,
            max_subflows: 3,
            gravity: 9.8,
            max_flows: 10_000,
            seed: None,
        }
    }
}

/// One flow front: the partial tour it has traced plus its mass and
/// velocity.
#[derive(Debug, Clone)]
struct Flow {
    tour: Vec<usize>,
    visited: Vec<bool>,
    cost: f64,
    mass: f64,
    velocity: f64,
}

impl WaterFlowSolver {
    /// Create a WFA solver with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base mass of main flows.
    #[must_use]
    pub fn with_base_mass(mut self, base_mass: f64) -> Self {
        self.base_mass = base_mass;
        self
    }

    /// Set the base velocity of main flows.
    #[must_use]
    pub fn with_base_velocity(mut self, base_velocity: f64) -> Self {
        self.base_velocity = base_velocity;
        self
    }

    /// Set the splitting momentum.
    #[must_use]
    pub fn with_momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    /// Set the sub-flow cap per split.
    #[must_use]
    pub fn with_max_subflows(mut self, max_subflows: usize) -> Self {
        self.max_subflows = max_subflows.max(1);
        self
    }

    /// Set the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// How many sub-flows a flow with this mass and velocity splits into.
    fn subflow_count(&self, mass: f64, velocity: f64) -> usize {
        let raw = (mass * velocity / self.momentum).ceil();
        (raw.max(1.0) as usize).min(self.max_subflows)
    }

    /// Mass share of sub-flow `rank` (1-based) out of `count`.
    fn subflow_mass(&self, mass: f64, rank: usize, count: usize) -> f64 {
        let total_ranks: f64 = (1..=count).sum::<usize>() as f64;
        ((count + 1 - rank) as f64 / total_ranks) * mass
    }

    /// Velocity of a sub-flow after a random objective perturbation.
    fn subflow_velocity(&self, velocity: f64, rank: usize, n: usize, rng: &mut StdRng) -> f64 {
        let improvement = rng.gen_range(0..n) as f64 - rank as f64;
        let squared = velocity * velocity + 2.0 * self.gravity * improvement;
        if squared > 0.0 {
            squared.sqrt()
        } else {
            0.0
        }
    }

    fn split_from(
        &self,
        graph: &CostGraph,
        start: usize,
        incumbent: &mut Incumbent,
        rng: &mut StdRng,
    ) -> RiegoResult<()> {
        let n = graph.num_nodes();
        let mut visited = vec![false; n];
        visited[start] = true;
        let mut stack = vec![Flow {
            tour: vec![start],
            visited,
            cost: 0.0,
            mass: self.base_mass,
            velocity: self.base_velocity,
        }];
        let mut expanded = 0usize;

        while let Some(flow) = stack.pop() {
            expanded += 1;
            if expanded > self.max_flows {
                log::debug!("flow cap reached for start node {start}");
                break;
            }

            let current = flow.tour[flow.tour.len() - 1];
            if flow.tour.len() == n {
                let total = flow.cost + graph.cost(current, start)?;
                incumbent.offer(&flow.tour, total);
                continue;
            }

            let mut candidates: Vec<_> = graph
                .neighbors_of(current)?
                .into_iter()
                .filter(|neighbor| !flow.visited[neighbor.node])
                .collect();
            candidates.sort_by(|a, b| {
                a.cost.partial_cmp(&b.cost).unwrap_or(std::cmp::Ordering::Equal)
            });

            let count = self.subflow_count(flow.mass, flow.velocity).min(candidates.len());
            for (rank, neighbor) in candidates.iter().take(count).enumerate() {
                let rank = rank + 1;
                let mut child = flow.clone();
                child.tour.push(neighbor.node);
                child.visited[neighbor.node] = true;
                child.cost += neighbor.cost;
                child.mass = self.subflow_mass(flow.mass, rank, count);
                child.velocity = self.subflow_velocity(flow.velocity, rank, n, rng);
                stack.push(child);
            }
        }
        Ok(())
    }
}

/// Greedy nearest-neighbour tour from `start`.
fn nearest_neighbor(graph: &CostGraph, start: usize) -> RiegoResult<Vec<usize>> {
    let n = graph.num_nodes();
    let mut visited = vec![false; n];
    visited[start] = true;
    let mut tour = vec![start];

    while tour.len() < n {
        let current = tour[tour.len() - 1];
        let mut best: Option<(usize, f64)> = None;
        for neighbor in graph.neighbors_of(current)? {
            if visited[neighbor.node] {
                continue;
            }
            if best.map_or(true, |(_, cost)| neighbor.cost < cost) {
                best = Some((neighbor.node, neighbor.cost));
            }
        }
        // Complete graph: an unvisited neighbor always exists here.
        if let Some((node, _)) = best {
            visited[node] = true;
            tour.push(node);
        } else {
            break;
        }
    }
    Ok(tour)
}

/// 2-opt improvement by segment reversal; runs until no swap helps.
/// Returns the improved tour cost.
fn two_opt(graph: &CostGraph, tour: &mut [usize]) -> RiegoResult<f64> {
    let n = tour.len();
    let mut improved = true;
    while improved {
        improved = false;
        for i in 1..n - 1 {
            for j in i + 1..n - 1 {
                let before = graph.cost(tour[i - 1], tour[i])? + graph.cost(tour[j], tour[j + 1])?;
                let after = graph.cost(tour[i - 1], tour[j])? + graph.cost(tour[i], tour[j + 1])?;
                if after + 1e-12 < before {
                    tour[i..=j].reverse();
                    improved = true;
                }
            }
        }
    }
    graph.tour_cost(tour)
}

impl TourSolver for WaterFlowSolver {
    fn solve(&mut self, graph: &CostGraph) -> RiegoResult<BestResult> {
        let n = graph.num_nodes();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut incumbent = Incumbent::new();

        // Seed the incumbent with an improved nearest-neighbour tour.
        let mut seed_tour = nearest_neighbor(graph, 0)?;
        if seed_tour.len() == n {
            let cost = two_opt(graph, &mut seed_tour)?;
            incumbent.offer(&seed_tour, cost);
        }

        let mut cycles = 0usize;
        for start in 0..n {
            self.split_from(graph, start, &mut incumbent, &mut rng)?;
            cycles += 1;
        }

        match incumbent.current_best() {
            Some((tour, cost)) => Ok(BestResult {
                tour: tour.to_vec(),
                cost,
                cycles_run: cycles,
            }),
            None => Err(crate::error::RiegoError::NoTourFound { cycles }),
        }
    }

    fn name(&self) -> &'static str {
        "Water Flow Algorithm"
    }
}
