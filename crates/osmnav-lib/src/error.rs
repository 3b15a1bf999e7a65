use std::path::PathBuf;

use thiserror::Error;

use crate::graph::VertexId;

/// Convenient result alias for the osmnav library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when graph construction finds a structural inconsistency.
    #[error("malformed graph: {reason}")]
    MalformedGraph { reason: String },

    /// Raised when a query references a vertex that is not part of the graph.
    #[error("unknown vertex: {id}")]
    UnknownVertex { id: VertexId },

    /// Raised by the route planner when the target cannot be reached from the source.
    #[error("no route found between {from} and {to}")]
    RouteNotFound { from: VertexId, to: VertexId },

    /// Raised when a predecessor map loops back on itself during reconstruction.
    #[error("predecessor map contains a cycle through vertex {vertex}")]
    PredecessorCycle { vertex: VertexId },

    /// Raised when map input is well-formed XML/DOT but semantically unusable.
    #[error("invalid map data: {message}")]
    InvalidMapData { message: String },

    /// Raised when the map file extension is not one of the supported formats.
    #[error("unsupported map format for {path}; expected .osm, .xml, .dot or .gv")]
    UnsupportedMapFormat { path: PathBuf },

    /// Raised when a nearest-vertex lookup runs against an overlay without positions.
    #[error("map overlay has no positioned vertices")]
    EmptyOverlay,

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for XML parsing errors.
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    /// Wrapper for JSON serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedGraph {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_map(message: impl Into<String>) -> Self {
        Error::InvalidMapData {
            message: message.into(),
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(error: quick_xml::events::attributes::AttrError) -> Self {
        Error::Xml(quick_xml::Error::from(error))
    }
}
