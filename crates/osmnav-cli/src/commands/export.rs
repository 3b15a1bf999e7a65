//! Export command handler: write the loaded graph as Graphviz DOT.

use std::path::Path;

use anyhow::{Context, Result};
use osmnav_lib::{export_dot, LoadedMap};

use osmnav_cli::terminal::format_with_separators;

pub fn handle_export_command(map: &LoadedMap, output: &Path) -> Result<()> {
    export_dot(output, &map.graph, &map.overlay, None)
        .with_context(|| format!("failed to write DOT export to {}", output.display()))?;
    println!(
        "Exported {} vertices and {} edges to {}",
        format_with_separators(map.graph.vertex_count() as u64),
        format_with_separators(map.graph.edge_count() as u64),
        output.display()
    );
    Ok(())
}
