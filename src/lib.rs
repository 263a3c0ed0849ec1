//! Single-source shortest paths over a dense weighted adjacency matrix.
//!
//! [`dijkstra_all`] settles nodes one per round, picking the closest unsettled
//! node with a linear scan, and returns a [`DistanceTable`] that answers distance
//! and route queries for every node. A fixed handicap can be charged on each
//! positive-weight edge to model a slower traveler. [`StreetGrid`] builds the
//! matrix for a rectangular block of street corners.

pub mod dijkstra;
pub mod error;
pub mod grid;
pub mod matrix;

pub use dijkstra::{
    dijkstra_all, dijkstra_all_with, get_distance, reconstruct_path, DistanceTable, TableEntry,
};
pub use error::{PathError, Result};
pub use grid::{Corner, GridError, StreetGrid};
pub use matrix::{AdjacencyMatrix, Node, Weight, MAX_NODES, NO_EDGE};
