//! Map loaders producing a routing [`Graph`] plus its [`MapOverlay`].
//!
//! Two input formats are supported:
//! - OpenStreetMap XML (`.osm`, `.xml`), see [`load_osm`]
//! - Graphviz DOT previously written by [`crate::render::export_dot`]
//!   (`.dot`, `.gv`), see [`load_dot`]
//!
//! Loaders are the only place where map I/O happens; the routing core only
//! sees the finished graph.

mod dot;
mod osm;

pub use dot::{load_dot, parse_dot};
pub use osm::{load_osm, parse_osm};

use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::overlay::MapOverlay;

/// Speed assumed for roads without a usable `maxspeed` tag, in km/h.
pub const DEFAULT_SPEED_KMH: f64 = 50.0;

/// `highway` tag values kept by default.
pub const DEFAULT_HIGHWAY_TYPES: &[&str] = &[
    "residential",
    "motorway",
    "trunk",
    "primary",
    "secondary",
    "tertiary",
    "unclassified",
];

/// Options controlling which roads are imported and how they are weighted.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// `highway` tag values to import; other ways are skipped.
    pub highway_types: Vec<String>,
    /// Speed used when a way has no parseable `maxspeed`, in km/h.
    pub default_speed_kmh: f64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            highway_types: DEFAULT_HIGHWAY_TYPES
                .iter()
                .map(|kind| kind.to_string())
                .collect(),
            default_speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl LoaderConfig {
    fn accepts_highway(&self, kind: &str) -> bool {
        self.highway_types.iter().any(|accepted| accepted == kind)
    }
}

/// Input formats recognised by [`load_map`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapFormat {
    Osm,
    Dot,
}

impl MapFormat {
    /// Detect the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("osm") | Some("xml") => Ok(MapFormat::Osm),
            Some("dot") | Some("gv") => Ok(MapFormat::Dot),
            _ => Err(Error::UnsupportedMapFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// A loaded map: the routing graph and its presentation overlay.
#[derive(Debug, Clone, Default)]
pub struct LoadedMap {
    pub graph: Graph,
    pub overlay: MapOverlay,
}

impl LoadedMap {
    /// Restrict the map to the graph's largest connected component.
    pub fn largest_component(self) -> Result<Self> {
        let graph = self.graph.largest_component()?;
        let mut overlay = self.overlay;
        overlay.retain_vertices(graph.vertices());
        Ok(Self { graph, overlay })
    }
}

/// Load a map file, choosing the parser by extension.
pub fn load_map(path: &Path, config: &LoaderConfig) -> Result<LoadedMap> {
    let format = MapFormat::from_path(path)?;
    info!(path = %path.display(), ?format, "loading map");
    match format {
        MapFormat::Osm => load_osm(path, config),
        MapFormat::Dot => load_dot(path, config),
    }
}
