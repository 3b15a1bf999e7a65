//! KD-tree index for snapping coordinates to the nearest graph vertex.
//!
//! Positions are projected onto a local equirectangular plane (meters) around
//! the mean latitude of the indexed vertices, which is accurate enough for
//! city-sized extracts. The reported distance is recomputed with the
//! haversine formula.

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::info;

use crate::error::{Error, Result};
use crate::graph::VertexId;
use crate::overlay::{Coordinates, MapOverlay, EARTH_RADIUS_M};

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Nearest-vertex lookup over a [`MapOverlay`].
pub struct SpatialIndex {
    tree: KdTree<f64, usize, 2, BUCKET_SIZE, u32>,
    nodes: Vec<(VertexId, Coordinates)>,
    reference_lat_cos: f64,
}

impl SpatialIndex {
    /// Build an index over every positioned vertex of `overlay`.
    pub fn build(overlay: &MapOverlay) -> Self {
        let mut nodes: Vec<(VertexId, Coordinates)> = overlay
            .positions()
            .iter()
            .map(|(&id, &position)| (id, position))
            .collect();
        // Deterministic item order so equidistant vertices resolve the same way.
        nodes.sort_unstable_by_key(|(id, _)| *id);

        let mean_lat = if nodes.is_empty() {
            0.0
        } else {
            nodes.iter().map(|(_, p)| p.lat).sum::<f64>() / nodes.len() as f64
        };
        let reference_lat_cos = mean_lat.to_radians().cos();

        let mut tree: KdTree<f64, usize, 2, BUCKET_SIZE, u32> = KdTree::new();
        for (index, (_, position)) in nodes.iter().enumerate() {
            tree.add(&project(position, reference_lat_cos), index);
        }

        info!(node_count = nodes.len(), "built spatial index");

        Self {
            tree,
            nodes,
            reference_lat_cos,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Closest vertex to `point` with its great-circle distance in meters.
    pub fn nearest(&self, point: Coordinates) -> Result<(VertexId, f64)> {
        if self.nodes.is_empty() {
            return Err(Error::EmptyOverlay);
        }

        let query = project(&point, self.reference_lat_cos);
        let neighbour = self
            .tree
            .nearest_n::<SquaredEuclidean>(&query, 1)
            .into_iter()
            .next()
            .ok_or(Error::EmptyOverlay)?;

        let (id, position) = self.nodes[neighbour.item];
        Ok((id, point.haversine_m(&position)))
    }
}

fn project(position: &Coordinates, reference_lat_cos: f64) -> [f64; 2] {
    [
        position.lon.to_radians() * reference_lat_cos * EARTH_RADIUS_M,
        position.lat.to_radians() * EARTH_RADIUS_M,
    ]
}
