//! Show-nodes command handler: list vertex coordinates.

use anyhow::{bail, Result};
use osmnav_lib::{LoadedMap, VertexId};

use osmnav_cli::output::OutputFormat;

/// List every vertex, or only `pair` when both ends were given.
pub fn handle_show_nodes_command(
    map: &LoadedMap,
    pair: Option<(VertexId, VertexId)>,
    format: OutputFormat,
) -> Result<()> {
    match pair {
        Some((from, to)) => {
            for id in [from, to] {
                if !map.graph.contains(id) {
                    bail!("Unknown vertex {id}: it is not part of the loaded road network.");
                }
            }
            format.render_nodes(&map.overlay, [from, to])
        }
        None => format.render_nodes(&map.overlay, map.graph.vertices().iter().copied()),
    }
}
