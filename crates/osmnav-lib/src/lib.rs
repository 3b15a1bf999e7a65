//! osmnav library entry points.
//!
//! This crate exposes the road-network routing core (graph model, connected
//! component filtering, Dijkstra search and path reconstruction) together with
//! the collaborators around it: OSM/DOT loaders, a coordinate overlay with
//! nearest-vertex lookup, and DOT/text renderers. Higher-level consumers (the
//! CLI) should only depend on the functions exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod components;
pub mod error;
pub mod graph;
pub mod loader;
pub mod output;
pub mod overlay;
pub mod path;
pub mod render;
pub mod routing;
pub mod spatial;

pub use components::{connected_components, find_largest_component, Component};
pub use error::{Error, Result};
pub use graph::{CostKind, Edge, Graph, VertexId};
pub use loader::{
    load_dot, load_map, load_osm, parse_dot, parse_osm, LoadedMap, LoaderConfig, MapFormat,
};
pub use output::{render_positions, RouteRenderMode};
pub use overlay::{Bounds, Coordinates, MapOverlay};
pub use path::{
    reconstruct_path, round_to_centi, shortest_path, shortest_path_with, summarize_path,
    EdgeCost, PathSummary, Predecessors, ShortestPathTree,
};
pub use render::{export_dot, render_dot};
pub use routing::{plan_route, RoutePlan, RouteRequest};
pub use spatial::SpatialIndex;
