//! Route command handlers for computing paths between vertices or coordinates.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use osmnav_lib::{
    export_dot, plan_route, Coordinates, CostKind, Error as RouteError, LoadedMap, RoutePlan,
    RouteRequest, SpatialIndex, VertexId,
};

use osmnav_cli::output::OutputFormat;

/// Options shared by `route` and `route-coords`.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Edge attribute to minimise.
    pub cost: CostKind,
    /// How to print the plan.
    pub format: OutputFormat,
    /// Write the map with the route highlighted to this DOT file.
    pub export: Option<PathBuf>,
}

impl RouteCommandArgs {
    fn to_request(&self, source: VertexId, target: VertexId) -> RouteRequest {
        RouteRequest {
            source,
            target,
            cost: self.cost,
        }
    }
}

/// Handle the route subcommand.
pub fn handle_route_command(
    map: &LoadedMap,
    from: VertexId,
    to: VertexId,
    args: &RouteCommandArgs,
) -> Result<()> {
    let request = args.to_request(from, to);
    let plan = plan_route(&map.graph, &request).map_err(|err| handle_route_failure(args, err))?;
    finish(map, &plan, args)
}

/// Handle the route-coords subcommand: snap both points to their nearest
/// vertices, then route between them.
pub fn handle_route_coords_command(
    map: &LoadedMap,
    from: Coordinates,
    to: Coordinates,
    args: &RouteCommandArgs,
) -> Result<()> {
    let index = SpatialIndex::build(&map.overlay);
    let (source, source_offset) = index
        .nearest(from)
        .context("cannot snap coordinates: the map has no positioned vertices")?;
    let (target, target_offset) = index
        .nearest(to)
        .context("cannot snap coordinates: the map has no positioned vertices")?;
    info!(
        source,
        source_offset_m = source_offset,
        target,
        target_offset_m = target_offset,
        "snapped coordinates to vertices"
    );

    handle_route_command(map, source, target, args)
}

fn finish(map: &LoadedMap, plan: &RoutePlan, args: &RouteCommandArgs) -> Result<()> {
    if let Some(path) = &args.export {
        export_dot(path, &map.graph, &map.overlay, Some(plan))
            .with_context(|| format!("failed to write DOT export to {}", path.display()))?;
    }
    args.format.render_route(plan)
}

fn handle_route_failure(args: &RouteCommandArgs, err: RouteError) -> anyhow::Error {
    match err {
        RouteError::UnknownVertex { id } => anyhow::anyhow!(
            "Unknown vertex {id}: it is not part of the loaded road network. \
             Use show-nodes to list valid ids."
        ),
        RouteError::RouteNotFound { from, to } => {
            anyhow::anyhow!(format_route_not_found_message(from, to, args.cost))
        }
        other => anyhow::Error::new(other),
    }
}

fn format_route_not_found_message(from: VertexId, to: VertexId, cost: CostKind) -> String {
    format!(
        "No route found between {from} and {to} (cost: {cost}). \
         The vertices may lie in disconnected parts of the map or one-way \
         streets may block the way; try --largest-component."
    )
}
