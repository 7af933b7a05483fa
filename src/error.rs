//! Error types for riego-tsp operations.

use std::fmt;

/// Result type alias for riego-tsp operations.
pub type RiegoResult<T> = Result<T, RiegoError>;

/// Main error type for riego-tsp operations.
#[derive(Debug, Clone, PartialEq)]
pub enum RiegoError {
    /// Node id outside `[0, num_nodes)`. A caller bug, never retried.
    InvalidNode {
        /// Offending node id
        node: usize,
        /// Number of nodes in the graph
        num_nodes: usize,
    },

    /// Problem instance cannot be turned into a complete cost graph.
    InvalidInstance {
        /// What was wrong with the input
        cause: String,
    },

    /// The run finished without completing a single tour.
    ///
    /// Only reachable on degenerate instances; on a complete graph every
    /// drop can always extend its tour.
    NoTourFound {
        /// Outer cycles executed before giving up
        cycles: usize,
    },
}

impl fmt::Display for RiegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiegoError::InvalidNode { node, num_nodes } => {
                write!(f, "invalid node id {node}, graph has {num_nodes} nodes")
            }
            RiegoError::InvalidInstance { cause } => {
                write!(f, "invalid problem instance: {cause}")
            }
            RiegoError::NoTourFound { cycles } => {
                write!(f, "no complete tour found after {cycles} cycles")
            }
        }
    }
}

impl std::error::Error for RiegoError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_node() {
        let err = RiegoError::InvalidNode {
            node: 7,
            num_nodes: 5,
        };
        assert!(err.to_string().contains("invalid node id 7"));
        assert!(err.to_string().contains("5 nodes"));
    }

    #[test]
    fn test_display_invalid_instance() {
        let err = RiegoError::InvalidInstance {
            cause: "matrix is not square".into(),
        };
        assert!(err.to_string().contains("matrix is not square"));
    }

    #[test]
    fn test_display_no_tour_found() {
        let err = RiegoError::NoTourFound { cycles: 12 };
        assert!(err.to_string().contains("12 cycles"));
    }
}
