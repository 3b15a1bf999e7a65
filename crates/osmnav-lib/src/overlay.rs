//! Presentation-only geography attached to a routing graph.
//!
//! The routing core never reads coordinates; they exist so loaders can
//! measure edge lengths, the CLI can snap coordinates to vertices, and the
//! renderer can place nodes.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::graph::VertexId;

/// Mean Earth radius in meters.
pub(crate) const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// WGS84 latitude/longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Great-circle distance in meters.
    pub fn haversine_m(&self, other: &Self) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (other.lon - self.lon).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().asin()
    }
}

/// Geographic bounding box of a map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Smallest box enclosing all `points`; `None` when there are none.
    pub fn enclosing<'a>(points: impl IntoIterator<Item = &'a Coordinates>) -> Option<Self> {
        points.into_iter().fold(None, |bounds, point| {
            Some(match bounds {
                None => Bounds {
                    min_lat: point.lat,
                    min_lon: point.lon,
                    max_lat: point.lat,
                    max_lon: point.lon,
                },
                Some(b) => Bounds {
                    min_lat: b.min_lat.min(point.lat),
                    min_lon: b.min_lon.min(point.lon),
                    max_lat: b.max_lat.max(point.lat),
                    max_lon: b.max_lon.max(point.lon),
                },
            })
        })
    }

    pub fn contains(&self, point: &Coordinates) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lon..=self.max_lon).contains(&point.lon)
    }
}

/// Vertex coordinates and map bounds, keyed by the routing graph's ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapOverlay {
    positions: HashMap<VertexId, Coordinates>,
    bounds: Option<Bounds>,
}

impl MapOverlay {
    pub fn new(positions: HashMap<VertexId, Coordinates>, bounds: Option<Bounds>) -> Self {
        Self { positions, bounds }
    }

    pub fn position(&self, vertex: VertexId) -> Option<Coordinates> {
        self.positions.get(&vertex).copied()
    }

    pub fn positions(&self) -> &HashMap<VertexId, Coordinates> {
        &self.positions
    }

    pub fn insert(&mut self, vertex: VertexId, position: Coordinates) {
        self.positions.insert(vertex, position);
    }

    /// Declared bounds, falling back to the box around all positions.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds.or_else(|| Bounds::enclosing(self.positions.values()))
    }

    /// Drop positions of vertices that are no longer part of the graph.
    pub fn retain_vertices(&mut self, vertices: &BTreeSet<VertexId>) {
        self.positions.retain(|id, _| vertices.contains(id));
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
