//! Cost graph with a mutable soil field per directed edge.
//!
//! The graph is structurally immutable after construction: every ordered
//! pair of distinct nodes has exactly one [`EdgeRecord`]. Costs are static;
//! `soil` is the only field the search mutates, and it is written exclusively
//! through [`CostGraph::set_soil`] so the forward/reverse records always
//! agree (the instance is conceptually symmetric but stored as two directed
//! records).

use crate::error::{RiegoError, RiegoResult};
use std::collections::HashMap;

/// One directed edge of the complete cost graph.
#[derive(Debug, Clone)]
pub struct EdgeRecord {
    cost: f64,
    soil: f64,
    attributes: HashMap<String, f64>,
}

impl EdgeRecord {
    fn new(cost: f64) -> Self {
        Self {
            cost,
            soil: 0.0,
            attributes: HashMap::new(),
        }
    }

    /// Static traversal cost of this edge.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Current soil deposit on this edge.
    pub fn soil(&self) -> f64 {
        self.soil
    }

    /// Named auxiliary attribute, if set.
    pub fn attribute(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).copied()
    }
}

/// An entry yielded by [`CostGraph::neighbors_of`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Neighbor node id
    pub node: usize,
    /// Edge cost from the queried node to `node`
    pub cost: f64,
    /// Edge soil from the queried node to `node`
    pub soil: f64,
}

/// Complete weighted digraph over `num_nodes` nodes.
#[derive(Debug, Clone)]
pub struct CostGraph {
    name: String,
    num_nodes: usize,
    // Dense row-major storage; the diagonal slots exist but are never
    // exposed through any accessor.
    edges: Vec<EdgeRecord>,
}

impl CostGraph {
    /// Build a graph from a square cost matrix.
    ///
    /// The matrix must be at least 2x2 and every off-diagonal entry must be
    /// a non-negative finite number.
    pub fn from_matrix(name: &str, matrix: Vec<Vec<f64>>) -> RiegoResult<Self> {
        let n = matrix.len();
        if n < 2 {
            return Err(RiegoError::InvalidInstance {
                cause: format!("need at least 2 nodes, got {n}"),
            });
        }
        for (i, row) in matrix.iter().enumerate() {
            if row.len() != n {
                return Err(RiegoError::InvalidInstance {
                    cause: format!("row {i} has length {}, expected {n}", row.len()),
                });
            }
            for (j, &cost) in row.iter().enumerate() {
                if i != j && (!cost.is_finite() || cost < 0.0) {
                    return Err(RiegoError::InvalidInstance {
                        cause: format!("edge ({i}, {j}) has invalid cost {cost}"),
                    });
                }
            }
        }

        let mut edges = Vec::with_capacity(n * n);
        for row in &matrix {
            for &cost in row {
                edges.push(EdgeRecord::new(cost));
            }
        }

        Ok(Self {
            name: name.to_string(),
            num_nodes: n,
            edges,
        })
    }

    /// Build a graph from 2D coordinates using Euclidean distances.
    pub fn from_coords(name: &str, coords: &[(f64, f64)]) -> RiegoResult<Self> {
        let n = coords.len();
        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in i + 1..n {
                let dx = coords[i].0 - coords[j].0;
                let dy = coords[i].1 - coords[j].1;
                let dist = (dx * dx + dy * dy).sqrt();
                matrix[i][j] = dist;
                matrix[j][i] = dist;
            }
        }
        Self::from_matrix(name, matrix)
    }

    /// Instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of nodes.
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    fn check_node(&self, node: usize) -> RiegoResult<()> {
        if node < self.num_nodes {
            Ok(())
        } else {
            Err(RiegoError::InvalidNode {
                node,
                num_nodes: self.num_nodes,
            })
        }
    }

    fn index(&self, from: usize, to: usize) -> usize {
        from * self.num_nodes + to
    }

    /// Edge record for the directed pair `(from, to)`.
    pub fn edge_between(&self, from: usize, to: usize) -> RiegoResult<&EdgeRecord> {
        self.check_node(from)?;
        self.check_node(to)?;
        if from == to {
            return Err(RiegoError::InvalidInstance {
                cause: format!("no edge from node {from} to itself"),
            });
        }
        Ok(&self.edges[self.index(from, to)])
    }

    /// Cost of the directed edge `(from, to)`.
    pub fn cost(&self, from: usize, to: usize) -> RiegoResult<f64> {
        Ok(self.edge_between(from, to)?.cost())
    }

    /// Soil on the directed edge `(from, to)`.
    pub fn soil(&self, from: usize, to: usize) -> RiegoResult<f64> {
        Ok(self.edge_between(from, to)?.soil())
    }

    /// Write `value` onto both the `(a, b)` and `(b, a)` records.
    ///
    /// This is the only soil write path; going through it keeps the
    /// symmetry invariant enforced in one place.
    pub fn set_soil(&mut self, a: usize, b: usize, value: f64) -> RiegoResult<()> {
        self.check_node(a)?;
        self.check_node(b)?;
        if a == b {
            return Err(RiegoError::InvalidInstance {
                cause: format!("no edge from node {a} to itself"),
            });
        }
        let forward = self.index(a, b);
        let reverse = self.index(b, a);
        self.edges[forward].soil = value;
        self.edges[reverse].soil = value;
        Ok(())
    }

    /// Reset every edge's soil to a uniform value.
    pub fn fill_soil(&mut self, value: f64) {
        for record in &mut self.edges {
            record.soil = value;
        }
    }

    /// Set a named auxiliary attribute on both directions of an edge.
    pub fn set_attribute(&mut self, a: usize, b: usize, name: &str, value: f64) -> RiegoResult<()> {
        self.check_node(a)?;
        self.check_node(b)?;
        if a == b {
            return Err(RiegoError::InvalidInstance {
                cause: format!("no edge from node {a} to itself"),
            });
        }
        let forward = self.index(a, b);
        let reverse = self.index(b, a);
        self.edges[forward].attributes.insert(name.to_string(), value);
        self.edges[reverse].attributes.insert(name.to_string(), value);
        Ok(())
    }

    /// All neighbors of `node` with the cost and soil of the outgoing edge.
    pub fn neighbors_of(&self, node: usize) -> RiegoResult<Vec<Neighbor>> {
        self.check_node(node)?;
        let mut neighbors = Vec::with_capacity(self.num_nodes - 1);
        for to in 0..self.num_nodes {
            if to == node {
                continue;
            }
            let record = &self.edges[self.index(node, to)];
            neighbors.push(Neighbor {
                node: to,
                cost: record.cost(),
                soil: record.soil(),
            });
        }
        Ok(neighbors)
    }

    /// Check that `tour` is a complete Hamiltonian tour of this graph.
    pub fn validate_tour(&self, tour: &[usize]) -> RiegoResult<()> {
        if tour.len() != self.num_nodes {
            return Err(RiegoError::InvalidInstance {
                cause: format!(
                    "tour length {} does not match node count {}",
                    tour.len(),
                    self.num_nodes
                ),
            });
        }
        let mut seen = vec![false; self.num_nodes];
        for &node in tour {
            self.check_node(node)?;
            if seen[node] {
                return Err(RiegoError::InvalidInstance {
                    cause: format!("tour visits node {node} twice"),
                });
            }
            seen[node] = true;
        }
        Ok(())
    }

    /// Total cost of a tour, including the closing edge back to its start.
    pub fn tour_cost(&self, tour: &[usize]) -> RiegoResult<f64> {
        if tour.len() < 2 {
            return Err(RiegoError::InvalidInstance {
                cause: format!("tour of length {} has no cost", tour.len()),
            });
        }
        let mut total = 0.0;
        for pair in tour.windows(2) {
            total += self.cost(pair[0], pair[1])?;
        }
        total += self.cost(tour[tour.len() - 1], tour[0])?;
        Ok(total)
    }
}
