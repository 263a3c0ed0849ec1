//! Street grid topology.
//!
//! Corners of a rectangular block of streets become graph nodes, row by row from
//! the grid origin. Moving east/west along a street and north/south along an
//! avenue each have their own per-line cost, which is how slow streets are
//! modelled.

use std::fmt;
use std::str::FromStr;

use crate::error::PathError;
use crate::matrix::{AdjacencyMatrix, Node, Weight, MAX_NODES};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("corner {0} is outside the grid")]
    OutsideGrid(Corner),

    #[error("street {0} is outside the grid")]
    StreetOutsideGrid(i32),

    #[error("avenue {0} is outside the grid")]
    AvenueOutsideGrid(i32),

    #[error("node {node} is not a corner of a grid with {len} corners")]
    NodeOutOfRange { node: Node, len: usize },

    #[error(transparent)]
    Matrix(#[from] PathError),
}

type Result<T> = std::result::Result<T, GridError>;

/// A street corner in absolute coordinates: `x` is the avenue, `y` the street.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Corner {
    pub x: i32,
    pub y: i32,
}

impl Corner {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("expected a corner as X,Y but got {0:?}")]
pub struct ParseCornerError(String);

impl FromStr for Corner {
    type Err = ParseCornerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || ParseCornerError(s.to_string());
        let (x, y) = s.split_once(',').ok_or_else(err)?;
        let x = x.trim().parse().map_err(|_| err())?;
        let y = y.trim().parse().map_err(|_| err())?;
        Ok(Corner { x, y })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreetGrid {
    origin: Corner,
    width: usize,
    height: usize,
    /// East/west cost along each street, indexed by row offset.
    row_costs: Vec<Weight>,
    /// North/south cost along each avenue, indexed by column offset.
    column_costs: Vec<Weight>,
}

impl StreetGrid {
    pub fn new(origin: Corner, width: usize, height: usize, default_cost: Weight) -> Self {
        Self {
            origin,
            width,
            height,
            row_costs: vec![default_cost; height],
            column_costs: vec![default_cost; width],
        }
    }

    /// Avenues 10..=15 by streets 50..=55. Street 51 is slow to walk along and
    /// avenues 12 to 14 are slow to cross blocks on.
    pub fn chapinero() -> Self {
        let mut grid = Self::new(Corner::new(10, 50), 6, 6, 4);
        grid.row_costs[1] = 8;
        for column in 2..=4 {
            grid.column_costs[column] = 6;
        }
        grid
    }

    /// Sets the cost of moving one block east or west along street `y`.
    pub fn with_row_cost(mut self, y: i32, cost: Weight) -> Result<Self> {
        let row = self.row_offset(y).ok_or(GridError::StreetOutsideGrid(y))?;
        self.row_costs[row] = cost;
        Ok(self)
    }

    /// Sets the cost of moving one block north or south along avenue `x`.
    pub fn with_column_cost(mut self, x: i32, cost: Weight) -> Result<Self> {
        let column = self.column_offset(x).ok_or(GridError::AvenueOutsideGrid(x))?;
        self.column_costs[column] = cost;
        Ok(self)
    }

    pub fn node_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }

    pub fn node_of(&self, corner: Corner) -> Result<Node> {
        match (self.column_offset(corner.x), self.row_offset(corner.y)) {
            (Some(column), Some(row)) => Ok(row * self.width + column),
            _ => Err(GridError::OutsideGrid(corner)),
        }
    }

    pub fn corner_of(&self, node: Node) -> Result<Corner> {
        if node >= self.node_count() {
            return Err(GridError::NodeOutOfRange {
                node,
                len: self.node_count(),
            });
        }
        Ok(Corner {
            x: self.origin.x + (node % self.width) as i32,
            y: self.origin.y + (node / self.width) as i32,
        })
    }

    pub fn corners_of(&self, nodes: &[Node]) -> Result<Vec<Corner>> {
        nodes.iter().map(|&node| self.corner_of(node)).collect()
    }

    /// Four-neighbour adjacency: zero on the diagonal, per-line costs between
    /// adjacent corners and no edge anywhere else.
    pub fn build_matrix(&self) -> Result<AdjacencyMatrix> {
        let n = self.node_count();
        if n > MAX_NODES {
            return Err(PathError::TooManyNodes { len: n, max: MAX_NODES }.into());
        }
        let mut edges = Vec::new();

        for line in 0..self.height {
            for column in 0..self.width {
                let node = line * self.width + column;
                let east_west = self.row_costs[line];
                let north_south = self.column_costs[column];

                if column + 1 < self.width {
                    edges.push((node, node + 1, east_west));
                    edges.push((node + 1, node, east_west));
                }
                if line + 1 < self.height {
                    edges.push((node, node + self.width, north_south));
                    edges.push((node + self.width, node, north_south));
                }
            }
        }

        Ok(AdjacencyMatrix::from_edges(n, &edges)?)
    }

    fn column_offset(&self, x: i32) -> Option<usize> {
        let offset = usize::try_from(x.checked_sub(self.origin.x)?).ok()?;
        (offset < self.width).then_some(offset)
    }

    fn row_offset(&self, y: i32) -> Option<usize> {
        let offset = usize::try_from(y.checked_sub(self.origin.y)?).ok()?;
        (offset < self.height).then_some(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dijkstra::dijkstra_all;

    #[test]
    fn corner_node_conversions() {
        let grid = StreetGrid::chapinero();
        assert_eq!(grid.node_of(Corner::new(10, 50)).unwrap(), 0);
        assert_eq!(grid.node_of(Corner::new(14, 54)).unwrap(), 28);
        assert_eq!(grid.corner_of(28).unwrap(), Corner::new(14, 54));
        assert_eq!(grid.corner_of(35).unwrap(), Corner::new(15, 55));

        assert!(grid.node_of(Corner::new(16, 50)).is_err());
        assert!(grid.node_of(Corner::new(9, 50)).is_err());
        assert_eq!(
            grid.corner_of(36).unwrap_err(),
            GridError::NodeOutOfRange { node: 36, len: 36 }
        );
    }

    #[test]
    fn parse_corner() {
        assert_eq!("14,54".parse::<Corner>().unwrap(), Corner::new(14, 54));
        assert_eq!(" 11 , 50 ".parse::<Corner>().unwrap(), Corner::new(11, 50));
        assert!("14".parse::<Corner>().is_err());
        assert!("a,b".parse::<Corner>().is_err());
    }

    #[test]
    fn matrix_uses_line_costs() {
        let grid = StreetGrid::chapinero();
        let matrix = grid.build_matrix().unwrap();
        let at = |x, y| grid.node_of(Corner::new(x, y)).unwrap();

        assert_eq!(matrix.len(), 36);
        assert_eq!(matrix.weight(at(10, 51), at(11, 51)), Some(8));
        assert_eq!(matrix.weight(at(10, 52), at(11, 52)), Some(4));
        assert_eq!(matrix.weight(at(12, 52), at(12, 53)), Some(6));
        assert_eq!(matrix.weight(at(11, 52), at(11, 53)), Some(4));
        assert_eq!(matrix.weight(at(11, 52), at(11, 52)), Some(0));
        assert_eq!(matrix.weight(at(10, 50), at(11, 51)), None);
        // No wrap-around between the end of one street and the start of the next.
        assert_eq!(matrix.weight(at(15, 50), at(10, 51)), None);
    }

    #[test]
    fn custom_costs() {
        let grid = StreetGrid::new(Corner::new(0, 0), 3, 2, 1)
            .with_row_cost(1, 5)
            .unwrap()
            .with_column_cost(2, 9)
            .unwrap();
        let matrix = grid.build_matrix().unwrap();
        assert_eq!(matrix.weight(3, 4), Some(5));
        assert_eq!(matrix.weight(0, 1), Some(1));
        assert_eq!(matrix.weight(2, 5), Some(9));

        let grid = StreetGrid::new(Corner::new(0, 0), 3, 2, 1);
        assert_eq!(
            grid.clone().with_row_cost(2, 1).unwrap_err(),
            GridError::StreetOutsideGrid(2)
        );
        assert_eq!(
            grid.with_column_cost(-1, 1).unwrap_err(),
            GridError::AvenueOutsideGrid(-1)
        );
    }

    #[test]
    fn matrix_errors_pass_through() {
        let negative = StreetGrid::new(Corner::new(0, 0), 2, 1, -1);
        assert!(matches!(
            negative.build_matrix().unwrap_err(),
            GridError::Matrix(PathError::NegativeWeight { weight: -1, .. })
        ));

        let huge = StreetGrid::new(Corner::new(0, 0), 100_000, 100_000, 1);
        assert!(matches!(
            huge.build_matrix().unwrap_err(),
            GridError::Matrix(PathError::TooManyNodes { .. })
        ));
    }

    #[test]
    fn outside_corner_reports_the_corner() {
        let grid = StreetGrid::chapinero();
        let corner = Corner::new(16, 50);
        assert_eq!(grid.node_of(corner).unwrap_err(), GridError::OutsideGrid(corner));
        assert_eq!(
            grid.node_of(corner).unwrap_err().to_string(),
            "corner (16, 50) is outside the grid"
        );
    }

    #[test]
    fn two_travelers_to_the_bar() {
        let grid = StreetGrid::chapinero();
        let matrix = grid.build_matrix().unwrap();
        let destination = grid.node_of(Corner::new(11, 54)).unwrap();

        let first = dijkstra_all(grid.node_of(Corner::new(14, 54)).unwrap(), &matrix, 0).unwrap();
        assert_eq!(first.distance(destination).unwrap(), Some(12));
        let route = grid.corners_of(&first.path_to(destination).unwrap()).unwrap();
        assert_eq!(
            route,
            vec![
                Corner::new(14, 54),
                Corner::new(13, 54),
                Corner::new(12, 54),
                Corner::new(11, 54)
            ]
        );

        let second = dijkstra_all(grid.node_of(Corner::new(13, 52)).unwrap(), &matrix, 2).unwrap();
        assert_eq!(second.distance(destination).unwrap(), Some(24));
        let route = grid.corners_of(&second.path_to(destination).unwrap()).unwrap();
        assert_eq!(
            route,
            vec![
                Corner::new(13, 52),
                Corner::new(12, 52),
                Corner::new(11, 52),
                Corner::new(11, 53),
                Corner::new(11, 54)
            ]
        );
    }
}
