use crate::error::{PathError, Result};

pub type Node = usize;
pub type Weight = i64;

/// Marks a missing edge. Treated as an infinite weight.
pub const NO_EDGE: Weight = Weight::MAX;

/// Largest supported node count. Storage grows with the square of the node
/// count, so 4096 nodes already take 128 MiB.
pub const MAX_NODES: usize = 4096;

/// Dense N x N edge weights, `rows[from][to]`. Not required to be symmetric.
///
/// Validated on construction and immutable afterwards, so a single matrix can be
/// shared between any number of concurrent queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    rows: Vec<Vec<Weight>>,
}

impl AdjacencyMatrix {
    /// Wraps raw rows, rejecting non-square shapes and negative weights.
    pub fn new(rows: Vec<Vec<Weight>>) -> Result<Self> {
        let n = rows.len();
        check_size(n)?;
        for (from, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(PathError::NotSquare {
                    row: from,
                    found: row.len(),
                    expected: n,
                });
            }
            if let Some((to, &weight)) = row.iter().enumerate().find(|(_, w)| **w < 0) {
                return Err(PathError::NegativeWeight { from, to, weight });
            }
        }
        Ok(Self { rows })
    }

    /// Builds an `n` node matrix with zero self-weights and the given directed edges.
    /// Repeated edges keep the cheapest weight.
    pub fn from_edges(n: usize, edges: &[(Node, Node, Weight)]) -> Result<Self> {
        check_size(n)?;
        let mut rows = vec![vec![NO_EDGE; n]; n];
        for (node, row) in rows.iter_mut().enumerate() {
            row[node] = 0;
        }

        for &(from, to, weight) in edges {
            for node in [from, to] {
                if node >= n {
                    return Err(PathError::NodeOutOfRange { node, len: n });
                }
            }
            if weight < 0 {
                return Err(PathError::NegativeWeight { from, to, weight });
            }
            let cell = &mut rows[from][to];
            *cell = (*cell).min(weight);
        }

        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Weight of the edge `from -> to`, or `None` when there is no edge or either
    /// node is out of range.
    pub fn weight(&self, from: Node, to: Node) -> Option<Weight> {
        match self.rows.get(from).and_then(|row| row.get(to)) {
            Some(&w) if w != NO_EDGE => Some(w),
            _ => None,
        }
    }

    pub fn has_edge(&self, from: Node, to: Node) -> bool {
        self.weight(from, to).is_some()
    }

    /// Finite-weight out-edges of `from`, in ascending node order.
    pub fn neighbors(&self, from: Node) -> impl Iterator<Item = (Node, Weight)> + '_ {
        self.rows
            .get(from)
            .into_iter()
            .flat_map(|row| row.iter().copied().enumerate())
            .filter(|&(_, w)| w != NO_EDGE)
    }

    pub(crate) fn check_node(&self, node: Node) -> Result<()> {
        if node < self.len() {
            Ok(())
        } else {
            Err(PathError::NodeOutOfRange {
                node,
                len: self.len(),
            })
        }
    }
}

fn check_size(n: usize) -> Result<()> {
    if n > MAX_NODES {
        return Err(PathError::TooManyNodes {
            len: n,
            max: MAX_NODES,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_rows() {
        let err = AdjacencyMatrix::new(vec![vec![0, 1], vec![0]]).unwrap_err();
        assert_eq!(
            err,
            PathError::NotSquare {
                row: 1,
                found: 1,
                expected: 2
            }
        );
        assert!(err.is_invalid_input());
    }

    #[test]
    fn rejects_negative_weights() {
        let err = AdjacencyMatrix::new(vec![vec![0, -3], vec![NO_EDGE, 0]]).unwrap_err();
        assert_eq!(
            err,
            PathError::NegativeWeight {
                from: 0,
                to: 1,
                weight: -3
            }
        );
    }

    #[test]
    fn from_edges_fills_diagonal_and_keeps_cheapest() {
        let matrix = AdjacencyMatrix::from_edges(3, &[(0, 1, 7), (0, 1, 4), (2, 0, 1)]).unwrap();
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.weight(0, 0), Some(0));
        assert_eq!(matrix.weight(0, 1), Some(4));
        assert_eq!(matrix.weight(1, 0), None);
        assert_eq!(matrix.weight(2, 0), Some(1));
        assert!(!matrix.has_edge(1, 2));
    }

    #[test]
    fn from_edges_checks_endpoints() {
        let err = AdjacencyMatrix::from_edges(2, &[(0, 5, 1)]).unwrap_err();
        assert_eq!(err, PathError::NodeOutOfRange { node: 5, len: 2 });
    }

    #[test]
    fn neighbors_skip_missing_edges() {
        let matrix = AdjacencyMatrix::from_edges(4, &[(1, 3, 2), (1, 0, 9)]).unwrap();
        let out: Vec<_> = matrix.neighbors(1).collect();
        assert_eq!(out, vec![(0, 9), (1, 0), (3, 2)]);
        assert_eq!(matrix.neighbors(10).count(), 0);
    }

    #[test]
    fn oversized_graphs_fail_before_allocating() {
        let err = AdjacencyMatrix::from_edges(200_001, &[(200_000, 0, 1)]).unwrap_err();
        assert_eq!(
            err,
            PathError::TooManyNodes {
                len: 200_001,
                max: MAX_NODES
            }
        );
        assert!(err.is_invalid_input());
        assert!(AdjacencyMatrix::from_edges(usize::MAX, &[]).is_err());
    }

    #[test]
    fn empty_matrix_is_valid() {
        let matrix = AdjacencyMatrix::new(Vec::new()).unwrap();
        assert!(matrix.is_empty());
        assert!(matrix.check_node(0).is_err());
    }
}
