use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{CostKind, Edge, Graph, VertexId};

/// Vertex -> previous vertex on its best known path (`None` at the source).
pub type Predecessors = HashMap<VertexId, Option<VertexId>>;

/// Pluggable traversal cost. Implementations must never return a negative value.
pub trait EdgeCost {
    fn cost(&self, edge: &Edge) -> f64;
}

impl EdgeCost for CostKind {
    fn cost(&self, edge: &Edge) -> f64 {
        self.edge_cost(edge)
    }
}

impl<F> EdgeCost for F
where
    F: Fn(&Edge) -> f64,
{
    fn cost(&self, edge: &Edge) -> f64 {
        self(edge)
    }
}

/// Query-scoped result of a shortest-path search.
///
/// Vertices the search never touched have no predecessor and an infinite cost.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathTree {
    source: VertexId,
    target: VertexId,
    predecessors: Predecessors,
    costs: HashMap<VertexId, f64>,
    settled: usize,
}

impl ShortestPathTree {
    fn new(source: VertexId, target: VertexId) -> Self {
        Self {
            source,
            target,
            predecessors: HashMap::from([(source, None)]),
            costs: HashMap::from([(source, 0.0)]),
            settled: 0,
        }
    }

    pub fn source(&self) -> VertexId {
        self.source
    }

    pub fn target(&self) -> VertexId {
        self.target
    }

    /// Best known cumulative cost to `vertex`, or infinity when unreached.
    pub fn cost(&self, vertex: VertexId) -> f64 {
        self.costs.get(&vertex).copied().unwrap_or(f64::INFINITY)
    }

    pub fn predecessor(&self, vertex: VertexId) -> Option<VertexId> {
        self.predecessors.get(&vertex).copied().flatten()
    }

    pub fn predecessors(&self) -> &Predecessors {
        &self.predecessors
    }

    pub fn costs(&self) -> &HashMap<VertexId, f64> {
        &self.costs
    }

    /// Number of vertices finalized before the search stopped.
    pub fn settled_count(&self) -> usize {
        self.settled
    }

    /// Cost of the target; infinite when unreachable.
    pub fn total_cost(&self) -> f64 {
        self.cost(self.target)
    }

    pub fn is_reachable(&self) -> bool {
        self.total_cost().is_finite()
    }

    /// Ordered legs from source to target; empty when unreachable or trivial.
    pub fn legs(&self) -> Result<Vec<(VertexId, VertexId)>> {
        reconstruct_path(&self.predecessors, self.source, self.target)
    }
}

/// Run Dijkstra's algorithm from `source` until `target` is selected, using
/// the chosen edge attribute as cost.
pub fn shortest_path(
    graph: &Graph,
    source: VertexId,
    target: VertexId,
    cost: CostKind,
) -> Result<ShortestPathTree> {
    shortest_path_with(graph, source, target, cost)
}

/// Run Dijkstra's algorithm with an arbitrary non-negative cost function.
///
/// The open set is a binary heap keyed by best known cost. Among equal costs
/// the smaller vertex id is selected first. The search stops the moment the
/// target is selected, and never relaxes an edge into a finalized vertex.
pub fn shortest_path_with<C: EdgeCost>(
    graph: &Graph,
    source: VertexId,
    target: VertexId,
    cost: C,
) -> Result<ShortestPathTree> {
    for id in [source, target] {
        if !graph.contains(id) {
            return Err(Error::UnknownVertex { id });
        }
    }

    let mut tree = ShortestPathTree::new(source, target);
    if source == target {
        return Ok(tree);
    }

    let mut finalized: HashSet<VertexId> = HashSet::new();
    let mut queue = BinaryHeap::new();
    queue.push(QueueEntry::new(source, 0.0));

    while let Some(entry) = queue.pop() {
        if finalized.contains(&entry.node) {
            continue;
        }
        if entry.node == target {
            break;
        }
        finalized.insert(entry.node);

        for edge in graph.outgoing(entry.node) {
            let next = edge.head;
            if finalized.contains(&next) {
                continue;
            }

            let edge_cost = cost.cost(edge);
            debug_assert!(edge_cost >= 0.0, "negative edge cost {edge_cost}");
            let candidate = entry.cost.0 + edge_cost;
            if candidate < tree.cost(next) {
                tree.costs.insert(next, candidate);
                tree.predecessors.insert(next, Some(entry.node));
                queue.push(QueueEntry::new(next, candidate));
            }
        }
    }

    tree.settled = finalized.len();
    debug!(
        source,
        target,
        settled = tree.settled,
        cost = tree.total_cost(),
        "shortest path search finished"
    );
    Ok(tree)
}

/// Walk predecessor links back from `target` and return the ordered legs.
///
/// Returns an empty list when `source == target` or when the walk runs out of
/// predecessors without meeting `source`. A predecessor map that loops is
/// reported as [`Error::PredecessorCycle`] instead of being followed forever.
pub fn reconstruct_path(
    predecessors: &Predecessors,
    source: VertexId,
    target: VertexId,
) -> Result<Vec<(VertexId, VertexId)>> {
    if source == target {
        return Ok(Vec::new());
    }

    let mut legs = Vec::new();
    let mut visited = HashSet::from([target]);
    let mut current = target;

    loop {
        let Some(previous) = predecessors.get(&current).copied().flatten() else {
            return Ok(Vec::new());
        };
        if !visited.insert(previous) {
            return Err(Error::PredecessorCycle { vertex: previous });
        }
        legs.push((previous, current));
        if previous == source {
            break;
        }
        current = previous;
    }

    legs.reverse();
    Ok(legs)
}

/// Ordered legs of a path together with their aggregate length and duration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathSummary {
    pub legs: Vec<(VertexId, VertexId)>,
    /// Meters, rounded to two decimals.
    pub total_distance_m: f64,
    /// Seconds, rounded to two decimals.
    pub total_duration_s: f64,
}

/// Sum length and time over `legs`, using for each leg the edge the query
/// would have chosen (the cheapest parallel edge under `cost`).
pub fn summarize_path(
    graph: &Graph,
    legs: Vec<(VertexId, VertexId)>,
    cost: CostKind,
) -> Result<PathSummary> {
    let mut distance = 0.0;
    let mut duration = 0.0;
    for &(from, to) in &legs {
        let edge = graph.cheapest_edge(from, to, cost).ok_or_else(|| {
            Error::malformed(format!("path leg {from} -> {to} is not an edge of the graph"))
        })?;
        distance += edge.length;
        duration += edge.time;
    }

    Ok(PathSummary {
        legs,
        total_distance_m: round_to_centi(distance),
        total_duration_s: round_to_centi(duration),
    })
}

/// Round to two decimal places for presentation.
pub fn round_to_centi(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: VertexId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: VertexId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_pops_cheapest_then_smallest_id() {
        let mut queue = BinaryHeap::new();
        queue.push(QueueEntry::new(7, 2.0));
        queue.push(QueueEntry::new(9, 1.0));
        queue.push(QueueEntry::new(3, 1.0));

        let order: Vec<VertexId> = std::iter::from_fn(|| queue.pop().map(|e| e.node)).collect();
        assert_eq!(order, vec![3, 9, 7]);
    }

    #[test]
    fn cyclic_predecessors_are_rejected() {
        let predecessors = Predecessors::from([(1, None), (2, Some(3)), (3, Some(2))]);
        let error = reconstruct_path(&predecessors, 1, 2).expect_err("cycle");
        assert!(matches!(error, Error::PredecessorCycle { .. }));
    }

    #[test]
    fn chain_without_source_is_empty() {
        let predecessors = Predecessors::from([(1, None), (3, Some(2)), (2, None)]);
        assert!(reconstruct_path(&predecessors, 1, 3).unwrap().is_empty());
    }

    #[test]
    fn rounding_keeps_two_decimals() {
        assert_eq!(round_to_centi(12.3456), 12.35);
        assert_eq!(round_to_centi(0.004), 0.0);
    }
}
