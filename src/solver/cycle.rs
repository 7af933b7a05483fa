//! Population cycle controller.
//!
//! Drives repeated construction rounds over a population of water drops and
//! applies the between-cycle stages: evaporation (roulette culling),
//! condensation (similarity merge), and precipitation (soil-bias reseeding
//! from the strongest survivor). Owns the global incumbent.

use crate::agent::{self, WaterDrop};
use crate::error::{RiegoError, RiegoResult};
use crate::graph::CostGraph;
use crate::solver::{constructor, updater, BestResult, SolverConfig, StopRule};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Global best tour tracker. Replaced only on strict improvement.
#[derive(Debug, Clone, Default)]
pub struct Incumbent {
    tour: Option<Vec<usize>>,
    cost: f64,
}

impl Incumbent {
    /// Empty tracker with no tour recorded.
    pub fn new() -> Self {
        Self {
            tour: None,
            cost: f64::INFINITY,
        }
    }

    /// Offer a completed tour; it is adopted only when strictly cheaper
    /// than the current best. Returns whether it was adopted.
    pub fn offer(&mut self, tour: &[usize], cost: f64) -> bool {
        if self.tour.is_none() || cost < self.cost {
            self.tour = Some(tour.to_vec());
            self.cost = cost;
            true
        } else {
            false
        }
    }

    /// Current best tour and its cost, if any tour completed yet.
    pub fn current_best(&self) -> Option<(&[usize], f64)> {
        self.tour.as_deref().map(|t| (t, self.cost))
    }
}

/// The shared engine behind the drop-based solvers.
///
/// One cycle: reinitialize soil (biased toward the precipitation hint),
/// rebuild the population, run hop rounds until every drop is complete or
/// stalled, update the incumbent, then apply the population stages. The
/// stopping rule decides whether the outer loop is bounded by iteration
/// count or by temperature.
#[derive(Debug, Clone)]
pub struct HydroCycle {
    config: SolverConfig,
    incumbent: Incumbent,
    history: Vec<f64>,
}

impl HydroCycle {
    /// Create an engine with the given tunables.
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            incumbent: Incumbent::new(),
            history: Vec::new(),
        }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Best cost after each cycle (infinite until a tour completes).
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Best tour found in the latest run.
    pub fn best(&self) -> Option<(&[usize], f64)> {
        self.incumbent.current_best()
    }

    /// Run the full outer loop on a copy of `graph`.
    pub fn solve(&mut self, graph: &CostGraph) -> RiegoResult<BestResult> {
        let mut working = graph.clone();
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        self.incumbent = Incumbent::new();
        self.history.clear();

        let mut temperature = self.config.initial_temperature;
        let mut hint: Option<Vec<usize>> = None;
        let mut cycles = 0usize;

        while self.keep_running(cycles, temperature) {
            self.run_cycle(&mut working, &mut rng, &mut temperature, &mut hint)?;
            cycles += 1;
        }

        log::debug!(
            "finished after {cycles} cycles, best cost {:?}",
            self.incumbent.current_best().map(|(_, c)| c)
        );

        match self.incumbent.current_best() {
            Some((tour, cost)) => Ok(BestResult {
                tour: tour.to_vec(),
                cost,
                cycles_run: cycles,
            }),
            None => Err(RiegoError::NoTourFound { cycles }),
        }
    }

    fn keep_running(&self, cycles: usize, temperature: f64) -> bool {
        match self.config.stop {
            StopRule::FixedIterations => cycles < self.config.max_outer_iterations,
            StopRule::TemperatureBound => {
                // The iteration bound doubles as a safety cap; a population
                // whose temperature oscillates must still terminate.
                temperature < self.config.max_temperature
                    && cycles < self.config.max_outer_iterations
            }
        }
    }

    fn run_cycle(
        &mut self,
        working: &mut CostGraph,
        rng: &mut StdRng,
        temperature: &mut f64,
        hint: &mut Option<Vec<usize>>,
    ) -> RiegoResult<()> {
        let n = working.num_nodes();
        init_soil(working, hint.as_deref(), &self.config)?;

        let mut drops: Vec<WaterDrop> = (0..n)
            .map(|i| {
                WaterDrop::new(
                    i,
                    i,
                    n,
                    self.config.initial_velocity,
                    self.config.initial_carried_soil,
                )
            })
            .collect();

        // Construction: each round gives every active drop one hop. The
        // round budget of 3n comfortably covers the n - 1 hops a complete
        // tour needs.
        let max_rounds = 3 * n;
        for _ in 0..max_rounds {
            if drops.iter().all(|d| !d.is_active()) {
                break;
            }
            // Mean velocity frozen per round so drop processing order does
            // not leak into the erosion decision.
            let mean = agent::mean_velocity(&drops);
            for i in 0..drops.len() {
                if !drops[i].is_active() {
                    continue;
                }
                match constructor::choose_next(working, &drops[i], &self.config, rng)? {
                    None => drops[i].mark_stalled(),
                    Some(next) => {
                        let from = drops[i].current();
                        let cost = working.cost(from, next)?;
                        let soil = working.soil(from, next)?;
                        updater::update_velocity(&mut drops[i], cost, soil, &self.config, rng);
                        updater::update_soil(working, &drops[i], from, next, mean, &self.config)?;
                        updater::update_carried_soil(&mut drops[i], cost, &self.config);
                        drops[i].advance_to(next);
                    }
                }
            }
            if self.config.stop == StopRule::TemperatureBound {
                *temperature += temperature_delta(&drops, *temperature, self.config.beta);
            }
        }

        // Completed tours compete for the incumbent; stalled tours are
        // excluded this cycle.
        for drop in &drops {
            if drop.is_complete() {
                let cost = working.tour_cost(drop.tour())?;
                self.incumbent.offer(drop.tour(), cost);
            }
        }
        self.history.push(
            self.incumbent
                .current_best()
                .map_or(f64::INFINITY, |(_, c)| c),
        );

        if self.config.population_dynamics {
            let survivors = evaporation(&drops, rng);
            if survivors.is_empty() {
                log::warn!("evaporation selected no survivors, skipping condensation");
            } else {
                let alive = condensation(&mut drops, survivors, &self.config);
                if self.config.stop == StopRule::TemperatureBound {
                    *temperature -= self.config.temperature_drop;
                }
                if let Some(collector) = precipitation(&drops, &alive) {
                    *hint = Some(drops[collector].tour().to_vec());
                }
            }
        } else {
            // Constructive-only mode reinforces the incumbent directly.
            *hint = self.incumbent.current_best().map(|(t, _)| t.to_vec());
        }
        Ok(())
    }
}

/// Distribute the initial soil, with the hint tour's edges discounted so
/// the next cycle is biased toward reselecting them.
fn init_soil(graph: &mut CostGraph, hint: Option<&[usize]>, config: &SolverConfig) -> RiegoResult<()> {
    graph.fill_soil(config.initial_soil);
    if let Some(tour) = hint {
        let biased = config.best_path_soil_factor * config.initial_soil;
        for pair in tour.windows(2) {
            graph.set_soil(pair[0], pair[1], biased)?;
        }
        if tour.len() == graph.num_nodes() {
            graph.set_soil(tour[tour.len() - 1], tour[0], biased)?;
        }
    }
    Ok(())
}

/// Temperature increment for one construction round.
fn temperature_delta(drops: &[WaterDrop], temperature: f64, beta: f64) -> f64 {
    let (min, max) = agent::quality_bounds(drops);
    let spread = max - min;
    if spread.is_finite() && spread > 0.0 {
        beta * (temperature / spread)
    } else {
        temperature / 10.0
    }
}

fn quality_weight(drop: &WaterDrop) -> f64 {
    let q = drop.solution_quality();
    if q.is_finite() && q > 0.0 {
        q
    } else {
        0.0
    }
}

/// Roulette-wheel selection of the drops that survive evaporation.
///
/// The survivor count is drawn uniformly from `1..=population`; the draws
/// are weighted by solution quality and taken without replacement, so every
/// survivor is a distinct member of the original population.
fn evaporation(drops: &[WaterDrop], rng: &mut StdRng) -> Vec<usize> {
    if drops.is_empty() {
        return Vec::new();
    }
    let target = rng.gen_range(1..=drops.len());
    let mut pool: Vec<usize> = (0..drops.len()).collect();
    let mut survivors = Vec::with_capacity(target);

    while survivors.len() < target && !pool.is_empty() {
        let total: f64 = pool.iter().map(|&i| quality_weight(&drops[i])).sum();
        let position = if total.is_finite() && total > 0.0 {
            let spin = rng.gen::<f64>() * total;
            let mut running = 0.0;
            let mut chosen = pool.len() - 1;
            for (idx, &i) in pool.iter().enumerate() {
                running += quality_weight(&drops[i]);
                if running >= spin {
                    chosen = idx;
                    break;
                }
            }
            chosen
        } else {
            rng.gen_range(0..pool.len())
        };
        survivors.push(pool.swap_remove(position));
    }
    survivors
}

/// Percentage of positions where two equal-length tours disagree.
/// `None` when the tours cannot collide (different lengths, or empty).
fn dissimilarity(a: &[usize], b: &[usize]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let differing = a.iter().zip(b.iter()).filter(|(x, y)| x != y).count();
    Some(differing as f64 / a.len() as f64 * 100.0)
}

/// Merge colliding survivors. A pair merges when their tours share at least
/// half their positions; the faster drop collects the other's velocity.
/// Returns the indices still alive afterwards.
fn condensation(drops: &mut [WaterDrop], survivors: Vec<usize>, config: &SolverConfig) -> Vec<usize> {
    let mut alive = survivors;
    let mut i = 0;
    while i < alive.len() {
        let mut j = i + 1;
        while j < alive.len() {
            let (a, b) = (alive[i], alive[j]);
            let merged = match dissimilarity(drops[a].tour(), drops[b].tour()) {
                Some(score) => score <= config.similarity_merge_threshold,
                None => false,
            };
            if merged {
                let (collector, absorbed) = if drops[a].velocity() >= drops[b].velocity() {
                    (a, b)
                } else {
                    (b, a)
                };
                let velocity = drops[collector].velocity() + drops[absorbed].velocity();
                drops[collector].set_velocity(velocity);
                alive[i] = collector;
                alive.remove(j);
            } else {
                j += 1;
            }
        }
        i += 1;
    }
    alive
}

/// The surviving drop with the greatest velocity seeds the next cycle's
/// soil bias.
fn precipitation(drops: &[WaterDrop], alive: &[usize]) -> Option<usize> {
    alive
        .iter()
        .copied()
        .max_by(|&a, &b| {
            drops[a]
                .velocity()
                .partial_cmp(&drops[b].velocity())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}
