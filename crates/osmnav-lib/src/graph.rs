use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Identifier of a road-network vertex (OSM node ids fit as-is).
pub type VertexId = i64;

/// Meters per second in one kilometre per hour.
const KMH_TO_MPS: f64 = 1000.0 / 3600.0;

/// Edge attribute used as traversal cost by a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CostKind {
    /// Physical length in meters.
    #[default]
    Length,
    /// Travel time in seconds.
    Time,
}

impl CostKind {
    /// Cost of traversing `edge` under this selector.
    pub fn edge_cost(self, edge: &Edge) -> f64 {
        match self {
            CostKind::Length => edge.length,
            CostKind::Time => edge.time,
        }
    }
}

impl fmt::Display for CostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            CostKind::Length => "length",
            CostKind::Time => "time",
        };
        f.write_str(value)
    }
}

/// Directed road segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Edge {
    pub tail: VertexId,
    pub head: VertexId,
    /// Length in meters.
    pub length: f64,
    /// Speed in meters per second.
    pub speed: f64,
    /// Travel time in seconds, `length / speed`.
    pub time: f64,
    pub one_way: bool,
}

impl Edge {
    /// Create an edge, deriving its travel time from length and speed.
    pub fn new(tail: VertexId, head: VertexId, length: f64, speed: f64, one_way: bool) -> Self {
        Self {
            tail,
            head,
            length,
            speed,
            time: length / speed,
            one_way,
        }
    }

    /// Create an edge from a speed expressed in km/h, as found in map data.
    pub fn with_speed_kmh(
        tail: VertexId,
        head: VertexId,
        length: f64,
        speed_kmh: f64,
        one_way: bool,
    ) -> Self {
        Self::new(tail, head, length, speed_kmh * KMH_TO_MPS, one_way)
    }

    /// Speed converted back to km/h.
    pub fn speed_kmh(&self) -> f64 {
        self.speed / KMH_TO_MPS
    }

    /// Same road traversed in the opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            tail: self.head,
            head: self.tail,
            ..*self
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.tail == self.head
    }

    fn validate(&self) -> Result<()> {
        if !self.length.is_finite() || self.length < 0.0 {
            return Err(Error::malformed(format!(
                "edge {} -> {} has invalid length {}",
                self.tail, self.head, self.length
            )));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(Error::malformed(format!(
                "edge {} -> {} has invalid speed {}",
                self.tail, self.head, self.speed
            )));
        }
        if !self.time.is_finite() || self.time < 0.0 {
            return Err(Error::malformed(format!(
                "edge {} -> {} has invalid travel time {}",
                self.tail, self.head, self.time
            )));
        }
        Ok(())
    }
}

/// Immutable directed road graph used by the routing engine.
///
/// The adjacency index maps each tail vertex to the positions of its outgoing
/// edges in the edge list, so neighbour lookup is a single hash probe. Clones
/// share the underlying storage.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: Arc<BTreeSet<VertexId>>,
    edges: Arc<Vec<Edge>>,
    adjacency: Arc<HashMap<VertexId, Vec<usize>>>,
}

impl Graph {
    /// Build a graph, rejecting edges whose endpoints are not in `vertices`.
    pub fn new(vertices: impl IntoIterator<Item = VertexId>, edges: Vec<Edge>) -> Result<Self> {
        let vertices: BTreeSet<VertexId> = vertices.into_iter().collect();
        let mut adjacency: HashMap<VertexId, Vec<usize>> = HashMap::new();

        for (index, edge) in edges.iter().enumerate() {
            for endpoint in [edge.tail, edge.head] {
                if !vertices.contains(&endpoint) {
                    return Err(Error::malformed(format!(
                        "edge {} -> {} references unknown vertex {}",
                        edge.tail, edge.head, endpoint
                    )));
                }
            }
            edge.validate()?;
            adjacency.entry(edge.tail).or_default().push(index);
        }

        debug!(
            vertices = vertices.len(),
            edges = edges.len(),
            "constructed road graph"
        );

        Ok(Self {
            vertices: Arc::new(vertices),
            edges: Arc::new(edges),
            adjacency: Arc::new(adjacency),
        })
    }

    /// Vertex identifiers in ascending order.
    pub fn vertices(&self) -> &BTreeSet<VertexId> {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.vertices.contains(&vertex)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Return the outgoing edges of a vertex; unknown vertices have none.
    pub fn outgoing(&self, vertex: VertexId) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacency
            .get(&vertex)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(move |&index| &self.edges[index])
    }

    /// Cheapest edge from `tail` to `head` under `cost`, if the two are adjacent.
    pub fn cheapest_edge(&self, tail: VertexId, head: VertexId, cost: CostKind) -> Option<&Edge> {
        self.outgoing(tail)
            .filter(|edge| edge.head == head)
            .min_by(|a, b| cost.edge_cost(a).total_cmp(&cost.edge_cost(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_derives_travel_time() {
        let edge = Edge::new(1, 2, 100.0, 20.0, false);
        assert_eq!(edge.time, 5.0);

        let kmh = Edge::with_speed_kmh(1, 2, 1000.0, 36.0, true);
        assert!((kmh.speed - 10.0).abs() < 1e-9);
        assert!((kmh.time - 100.0).abs() < 1e-9);
        assert!((kmh.speed_kmh() - 36.0).abs() < 1e-9);
    }

    #[test]
    fn reversed_edge_swaps_endpoints_only() {
        let edge = Edge::new(1, 2, 10.0, 5.0, false);
        let back = edge.reversed();
        assert_eq!((back.tail, back.head), (2, 1));
        assert_eq!(back.length, edge.length);
        assert_eq!(back.time, edge.time);
    }

    #[test]
    fn zero_speed_is_rejected() {
        let error = Graph::new([1, 2], vec![Edge::new(1, 2, 10.0, 0.0, false)])
            .expect_err("zero speed");
        assert!(matches!(error, Error::MalformedGraph { .. }));
    }

    #[test]
    fn cheapest_parallel_edge_depends_on_cost_kind() {
        let graph = Graph::new(
            [1, 2],
            vec![
                Edge::new(1, 2, 10.0, 1.0, true),
                Edge::new(1, 2, 30.0, 30.0, true),
            ],
        )
        .expect("valid graph");

        let by_length = graph.cheapest_edge(1, 2, CostKind::Length).unwrap();
        assert_eq!(by_length.length, 10.0);
        let by_time = graph.cheapest_edge(1, 2, CostKind::Time).unwrap();
        assert_eq!(by_time.time, 1.0);
        assert!(graph.cheapest_edge(2, 1, CostKind::Length).is_none());
    }
}
