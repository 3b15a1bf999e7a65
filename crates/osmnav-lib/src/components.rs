//! Undirected connected-component extraction over the edge list.
//!
//! Raw map extracts routinely contain fragments (parking lots, clipped ways at
//! the bounding box) that are unreachable from the main network. Filtering the
//! graph down to its largest component before routing removes them.
//!
//! Connectivity ignores edge direction and the one-way flag. Self-loops carry
//! no connectivity: a loop joins the component of its vertex, and a loop on a
//! vertex with no other edge belongs to no component.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use crate::error::Result;
use crate::graph::{Edge, Graph, VertexId};

/// Maximal set of edges connected through shared endpoints, with the vertices
/// those edges touch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
    pub edges: Vec<Edge>,
    pub vertices: BTreeSet<VertexId>,
}

impl Component {
    fn from_indices(edges: &[Edge], indices: &[usize]) -> Self {
        let edges: Vec<Edge> = indices.iter().map(|&index| edges[index]).collect();
        let vertices = edges
            .iter()
            .flat_map(|edge| [edge.tail, edge.head])
            .collect();
        Self { edges, vertices }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Partition `edges` into connected components in discovery order.
///
/// Every edge lands in exactly one component, except self-loops on vertices
/// without any other edge; edges within a
/// component keep their relative input order.
pub fn connected_components(edges: &[Edge]) -> Vec<Component> {
    let components: Vec<Component> = component_indices(edges)
        .iter()
        .map(|indices| Component::from_indices(edges, indices))
        .collect();
    debug!(
        edges = edges.len(),
        components = components.len(),
        "partitioned edges into components"
    );
    components
}

/// Return the component with the most edges. Ties keep the first one found.
pub fn find_largest_component(edges: &[Edge]) -> Component {
    let mut largest: Option<Vec<usize>> = None;
    for indices in component_indices(edges) {
        let is_larger = match &largest {
            Some(current) => indices.len() > current.len(),
            None => true,
        };
        if is_larger {
            largest = Some(indices);
        }
    }

    largest
        .map(|indices| Component::from_indices(edges, &indices))
        .unwrap_or_default()
}

impl Graph {
    /// Rebuild the graph restricted to its largest connected component.
    ///
    /// Vertices not touched by a surviving edge are dropped.
    pub fn largest_component(&self) -> Result<Graph> {
        let component = find_largest_component(self.edges());
        info!(
            kept_edges = component.edges.len(),
            dropped_edges = self.edge_count() - component.edges.len(),
            kept_vertices = component.vertices.len(),
            dropped_vertices = self.vertex_count() - component.vertices.len(),
            "filtered graph to largest component"
        );
        Graph::new(component.vertices, component.edges)
    }
}

/// Depth-first search with an explicit work-stack over a precomputed
/// vertex -> incident edges index. Each vertex's incidence list is expanded
/// once, so the whole pass is linear in the number of edges. Self-loops are
/// attached afterwards to the component that expanded their vertex.
fn component_indices(edges: &[Edge]) -> Vec<Vec<usize>> {
    let mut incident: HashMap<VertexId, Vec<usize>> = HashMap::new();
    for (index, edge) in edges.iter().enumerate() {
        if edge.is_self_loop() {
            continue;
        }
        incident.entry(edge.tail).or_default().push(index);
        incident.entry(edge.head).or_default().push(index);
    }

    let mut edge_visited = vec![false; edges.len()];
    let mut owner: HashMap<VertexId, usize> = HashMap::with_capacity(incident.len());
    let mut components: Vec<Vec<usize>> = Vec::new();
    let mut stack: Vec<VertexId> = Vec::new();

    for (seed, edge) in edges.iter().enumerate() {
        if edge_visited[seed] || edge.is_self_loop() {
            continue;
        }

        let mut members = Vec::new();
        edge_visited[seed] = true;
        members.push(seed);
        stack.push(edge.tail);
        stack.push(edge.head);

        while let Some(vertex) = stack.pop() {
            match owner.entry(vertex) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    slot.insert(components.len());
                }
            }
            for &next in incident.get(&vertex).map(Vec::as_slice).unwrap_or(&[]) {
                if edge_visited[next] {
                    continue;
                }
                edge_visited[next] = true;
                members.push(next);
                let other = if edges[next].tail == vertex {
                    edges[next].head
                } else {
                    edges[next].tail
                };
                stack.push(other);
            }
        }

        components.push(members);
    }

    for (index, edge) in edges.iter().enumerate() {
        if !edge.is_self_loop() {
            continue;
        }
        if let Some(&component) = owner.get(&edge.tail) {
            components[component].push(index);
        }
    }
    for members in &mut components {
        members.sort_unstable();
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;

    fn road(tail: VertexId, head: VertexId) -> Edge {
        Edge::new(tail, head, 1.0, 1.0, false)
    }

    #[test]
    fn long_chain_does_not_recurse() {
        let edges: Vec<Edge> = (0..200_000).map(|i| road(i, i + 1)).collect();
        let components = component_indices(&edges);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].len(), edges.len());
    }

    #[test]
    fn tie_keeps_first_component() {
        let edges = vec![road(1, 2), road(10, 11)];
        let largest = find_largest_component(&edges);
        assert_eq!(largest.edges, vec![road(1, 2)]);
    }

    #[test]
    fn self_loop_joins_the_component_of_its_vertex() {
        let edges = vec![road(1, 2), road(2, 1), road(2, 2)];
        let components = connected_components(&edges);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].edges, edges);
        assert_eq!(components[0].vertices, BTreeSet::from([1, 2]));
    }

    #[test]
    fn self_loops_only_yield_empty_component() {
        let edges = vec![road(1, 1), road(2, 2)];
        assert!(connected_components(&edges).is_empty());
        assert!(find_largest_component(&edges).is_empty());
    }
}
