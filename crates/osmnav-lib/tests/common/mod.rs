//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use osmnav_lib::{Edge, Graph, VertexId};

pub const A: VertexId = 1;
pub const B: VertexId = 2;
pub const C: VertexId = 3;
pub const D: VertexId = 4;

/// Path to fixtures directory used by tests.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Hand-written OSM extract with a main network, a one-way shortcut and an
/// isolated fragment.
pub fn small_town_path() -> PathBuf {
    fixtures_dir().join("small_town.osm")
}

/// Four vertices where the shortest and the fastest routes from A to C differ,
/// and D has no edges.
pub fn scenario_edges() -> Vec<Edge> {
    vec![
        Edge::new(A, B, 10.0, 10.0, true),
        Edge::new(B, C, 10.0, 5.0, true),
        Edge::new(A, C, 25.0, 25.0, true),
    ]
}

pub fn scenario_graph() -> Graph {
    Graph::new([A, B, C, D], scenario_edges()).expect("scenario graph is well formed")
}

/// Two-way `width` x `height` lattice with 100 m blocks; ids are `y * width + x`.
pub fn grid_graph(width: i64, height: i64) -> Graph {
    let mut edges = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let id = y * width + x;
            if x + 1 < width {
                let road = Edge::new(id, id + 1, 100.0, 13.9, false);
                edges.push(road);
                edges.push(road.reversed());
            }
            if y + 1 < height {
                let speed = if x % 3 == 0 { 25.0 } else { 8.3 };
                let road = Edge::new(id, id + width, 100.0, speed, false);
                edges.push(road);
                edges.push(road.reversed());
            }
        }
    }
    Graph::new(0..width * height, edges).expect("grid graph is well formed")
}
