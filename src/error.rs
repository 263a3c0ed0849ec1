use crate::matrix::{Node, Weight};

/// Errors surfaced by the shortest path engine and its inputs.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("node {node} is out of range for a graph of {len} nodes")]
    NodeOutOfRange { node: Node, len: usize },

    #[error("adjacency matrix is not square: row {row} has {found} entries, expected {expected}")]
    NotSquare {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("negative weight {weight} on edge {from} -> {to}")]
    NegativeWeight { from: Node, to: Node, weight: Weight },

    #[error("handicap must be non-negative, got {0}")]
    NegativeHandicap(Weight),

    #[error("a graph of {len} nodes exceeds the limit of {max} nodes")]
    TooManyNodes { len: usize, max: usize },

    #[error("node {0} is unreachable from the source")]
    Unreachable(Node),
}

impl PathError {
    /// True for everything except [`PathError::Unreachable`].
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, PathError::Unreachable(_))
    }
}

pub type Result<T> = std::result::Result<T, PathError>;
