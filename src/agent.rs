//! Water drop agent state.
//!
//! Each drop carries three search properties: velocity, carried soil, and
//! solution quality. Carried soil doubles as the quality proxy — after every
//! hop the quality is synchronized to the carried soil, so a drop that moved
//! over cheap, well-trodden edges accumulates a different profile than one
//! that waded through heavy soil.

/// One traversal unit building a candidate tour.
#[derive(Debug, Clone)]
pub struct WaterDrop {
    id: usize,
    origin: usize,
    current: usize,
    velocity: f64,
    carried_soil: f64,
    solution_quality: f64,
    visited: Vec<bool>,
    tour: Vec<usize>,
    stalled: bool,
}

impl WaterDrop {
    /// Create a drop at `origin` with the configured initial state.
    ///
    /// Quality starts equal to the carried soil.
    pub fn new(
        id: usize,
        origin: usize,
        num_nodes: usize,
        velocity: f64,
        carried_soil: f64,
    ) -> Self {
        let mut visited = vec![false; num_nodes];
        visited[origin] = true;
        Self {
            id,
            origin,
            current: origin,
            velocity,
            carried_soil,
            solution_quality: carried_soil,
            visited,
            tour: vec![origin],
            stalled: false,
        }
    }

    /// Drop id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Node this drop started from.
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Node this drop currently sits on.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Current velocity.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub(crate) fn set_velocity(&mut self, velocity: f64) {
        self.velocity = velocity;
    }

    /// Soil carried so far.
    pub fn carried_soil(&self) -> f64 {
        self.carried_soil
    }

    pub(crate) fn set_carried_soil(&mut self, carried_soil: f64) {
        self.carried_soil = carried_soil;
    }

    /// Quality proxy for the tour under construction.
    pub fn solution_quality(&self) -> f64 {
        self.solution_quality
    }

    pub(crate) fn set_solution_quality(&mut self, quality: f64) {
        self.solution_quality = quality;
    }

    /// Whether `node` has been visited in this construction round.
    pub fn is_visited(&self, node: usize) -> bool {
        self.visited.get(node).copied().unwrap_or(false)
    }

    /// Move the drop to `node`: mark it visited, append it to the tour,
    /// and advance the position pointer.
    pub(crate) fn advance_to(&mut self, node: usize) {
        debug_assert!(node < self.visited.len());
        debug_assert!(!self.visited[node]);
        self.visited[node] = true;
        self.tour.push(node);
        self.current = node;
    }

    /// The tour recorded so far, starting at the origin.
    pub fn tour(&self) -> &[usize] {
        &self.tour
    }

    /// A tour is complete once it covers every node; the closing edge back
    /// to the origin is implicit.
    pub fn is_complete(&self) -> bool {
        self.tour.len() == self.visited.len()
    }

    /// Whether construction halted before completing the tour.
    pub fn is_stalled(&self) -> bool {
        self.stalled
    }

    pub(crate) fn mark_stalled(&mut self) {
        self.stalled = true;
    }

    /// A drop still takes hops while it is neither complete nor stalled.
    pub fn is_active(&self) -> bool {
        !self.is_complete() && !self.stalled
    }
}

/// Mean velocity over a population of drops.
pub(crate) fn mean_velocity(drops: &[WaterDrop]) -> f64 {
    if drops.is_empty() {
        return 0.0;
    }
    drops.iter().map(WaterDrop::velocity).sum::<f64>() / drops.len() as f64
}

/// Minimum and maximum solution quality over a population.
pub(crate) fn quality_bounds(drops: &[WaterDrop]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for drop in drops {
        let q = drop.solution_quality();
        if q < min {
            min = q;
        }
        if q > max {
            max = q;
        }
    }
    (min, max)
}
