use tracing::{debug, trace};

use crate::error::{PathError, Result};
use crate::matrix::{AdjacencyMatrix, Node, Weight};

/// Per-node state of a traversal. `distance == None` means not reached (infinite).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TableEntry {
    pub distance: Option<Weight>,
    pub predecessor: Option<Node>,
    pub settled: bool,
}

/// Result of one traversal: exactly one entry per node, indexed by node id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceTable {
    source: Node,
    entries: Vec<TableEntry>,
}

impl DistanceTable {
    fn new(source: Node, len: usize) -> Self {
        let mut entries = vec![TableEntry::default(); len];
        entries[source].distance = Some(0);
        Self { source, entries }
    }

    pub fn source(&self) -> Node {
        self.source
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn entry(&self, node: Node) -> Result<&TableEntry> {
        self.entries.get(node).ok_or(PathError::NodeOutOfRange {
            node,
            len: self.entries.len(),
        })
    }

    /// Shortest distance from the source, `None` if `target` was never reached.
    pub fn distance(&self, target: Node) -> Result<Option<Weight>> {
        Ok(self.entry(target)?.distance)
    }

    pub fn is_reachable(&self, target: Node) -> bool {
        self.entries.get(target).is_some_and(|e| e.settled)
    }

    pub fn settled_count(&self) -> usize {
        self.entries.iter().filter(|e| e.settled).count()
    }

    /// Walks predecessor links back from `target` and returns the route from the
    /// source to `target`, both inclusive.
    pub fn path_to(&self, target: Node) -> Result<Vec<Node>> {
        if !self.entry(target)?.settled {
            return Err(PathError::Unreachable(target));
        }

        let mut path = vec![target];
        let mut current = target;
        while let Some(parent) = self.entries[current].predecessor {
            path.push(parent);
            current = parent;
        }

        if current != self.source {
            return Err(PathError::Unreachable(target));
        }

        path.reverse();
        Ok(path)
    }

    /// Unsettled node with the smallest finite distance. Ties go to the lowest index.
    fn next_unsettled(&self) -> Option<Node> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.settled)
            .filter_map(|(node, e)| e.distance.map(|d| (node, d)))
            .min_by_key(|&(_, d)| d)
            .map(|(node, _)| node)
    }
}

/// Dijkstra from `source` to all nodes of `matrix`.
///
/// `handicap` is added to every traversed edge with a positive weight.
/// Unreachable nodes are left unsettled with no distance.
pub fn dijkstra_all(
    source: Node,
    matrix: &AdjacencyMatrix,
    handicap: Weight,
) -> Result<DistanceTable> {
    dijkstra_all_with(source, matrix, handicap, |_, _| {})
}

/// Same as [`dijkstra_all`], calling `on_expand(settled, next)` once per settled node.
/// `next` is the node that will be expanded afterwards, `None` on the last round.
///
/// Each round settles one node by a linear scan over the table, so the loop runs at
/// most `matrix.len()` times.
pub fn dijkstra_all_with<F>(
    source: Node,
    matrix: &AdjacencyMatrix,
    handicap: Weight,
    mut on_expand: F,
) -> Result<DistanceTable>
where
    F: FnMut(Node, Option<Node>),
{
    matrix.check_node(source)?;
    if handicap < 0 {
        return Err(PathError::NegativeHandicap(handicap));
    }

    debug!(source, nodes = matrix.len(), handicap, "starting dijkstra");

    let mut table = DistanceTable::new(source, matrix.len());
    let mut current = Some(source);

    while let Some(node) = current {
        let Some(base) = table.entries[node].distance else {
            break;
        };

        for (neighbor, weight) in matrix.neighbors(node) {
            let entry = &mut table.entries[neighbor];
            if entry.settled {
                continue;
            }
            let penalty = if weight > 0 { handicap } else { 0 };
            // Overflow means the candidate is effectively infinite.
            let candidate = base
                .checked_add(weight)
                .and_then(|d| d.checked_add(penalty));
            let Some(candidate) = candidate else {
                continue;
            };
            if entry.distance.map_or(true, |d| candidate < d) {
                entry.distance = Some(candidate);
                entry.predecessor = Some(node);
            }
        }

        table.entries[node].settled = true;
        let next = table.next_unsettled();
        trace!(node, distance = base, ?next, "settled");

        on_expand(node, next);
        current = next;
    }

    debug!(source, settled = table.settled_count(), "dijkstra finished");
    Ok(table)
}

/// Distance to `target` in a finished table, `None` when unreachable.
pub fn get_distance(table: &DistanceTable, target: Node) -> Result<Option<Weight>> {
    table.distance(target)
}

/// Route from the table's source to `target`. Fails with [`PathError::Unreachable`]
/// when no route exists.
pub fn reconstruct_path(table: &DistanceTable, target: Node) -> Result<Vec<Node>> {
    table.path_to(target)
}
