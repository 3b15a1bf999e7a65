// Module exports for CLI subcommands.
//
// Each module handles one subcommand; main.rs parses arguments, loads the map
// and dispatches to these handlers.

pub mod export;
pub mod nodes;
pub mod route;

use std::path::Path;

use anyhow::{Context, Result};
use osmnav_lib::{load_map, LoadedMap, LoaderConfig};

/// Load the map named by `--map`, optionally keeping only its largest component.
pub fn load(path: &Path, config: &LoaderConfig, largest_component: bool) -> Result<LoadedMap> {
    let map = load_map(path, config)
        .with_context(|| format!("failed to load map from {}", path.display()))?;
    if !largest_component {
        return Ok(map);
    }
    map.largest_component()
        .context("failed to filter the map to its largest connected component")
}
