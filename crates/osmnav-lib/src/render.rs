//! Graphviz DOT export of a road graph, optionally highlighting a route.
//!
//! Node positions are pinned (`pos="x,y!"`) with x = lon * 100 and
//! y = lat * 100 so `neato -n` reproduces the map layout. Two-way roads are
//! written once with `dir=none`; [`crate::loader::load_dot`] expands them back
//! into both directions.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::graph::{Edge, Graph, VertexId};
use crate::overlay::MapOverlay;
use crate::routing::RoutePlan;

/// Scale applied to degrees when placing nodes.
pub const POSITION_SCALE: f64 = 100.0;

const HIGHLIGHT_COLOR: &str = "red";

/// Render the graph as a DOT document.
pub fn render_dot(graph: &Graph, overlay: &MapOverlay, highlight: Option<&RoutePlan>) -> String {
    let mut buffer = String::new();
    let _ = writeln!(buffer, "digraph osmnav {{");

    let mut graph_attrs = vec![
        "layout=neato".to_string(),
        "outputorder=nodesfirst".to_string(),
    ];
    if let Some(bounds) = overlay.bounds() {
        graph_attrs.push(format!(
            "bb=\"{},{},{},{}\"",
            bounds.min_lon * POSITION_SCALE,
            bounds.min_lat * POSITION_SCALE,
            bounds.max_lon * POSITION_SCALE,
            bounds.max_lat * POSITION_SCALE
        ));
        let scale = ((bounds.max_lon - bounds.min_lon) * POSITION_SCALE)
            .min((bounds.max_lat - bounds.min_lat) * POSITION_SCALE)
            .abs()
            / 10.0;
        if scale > 0.0 {
            graph_attrs.push(format!("inputscale={scale}"));
        }
    }
    let _ = writeln!(buffer, "  graph [{}];", graph_attrs.join(", "));
    let _ = writeln!(buffer, "  node [shape=point];");

    let endpoints: HashSet<VertexId> = highlight
        .map(|plan| HashSet::from([plan.source, plan.target]))
        .unwrap_or_default();

    for &vertex in graph.vertices() {
        let mut attrs = Vec::new();
        if let Some(position) = overlay.position(vertex) {
            attrs.push(format!(
                "pos=\"{},{}!\"",
                position.lon * POSITION_SCALE,
                position.lat * POSITION_SCALE
            ));
            attrs.push(format!("comment=\"{},{}\"", position.lat, position.lon));
        }
        if endpoints.contains(&vertex) {
            attrs.push(format!("color={HIGHLIGHT_COLOR}"));
            attrs.push("width=0.15".to_string());
        }
        write_statement(&mut buffer, &format!("\"{vertex}\""), &attrs);
    }

    for edge in graph.edges() {
        let collapsed = is_collapsible_pair(graph, edge);
        if collapsed && edge.tail > edge.head {
            continue;
        }

        let mut attrs = vec![
            format!("length={}", edge.length),
            format!("speed={}", edge.speed_kmh()),
            format!("oneway={}", edge.one_way),
        ];
        if collapsed {
            attrs.insert(0, "dir=none".to_string());
        }
        attrs.push(format!("label={}", edge.length as i64));

        let highlighted = highlight.is_some_and(|plan| {
            plan.uses_leg(edge.tail, edge.head)
                || (collapsed && plan.uses_leg(edge.head, edge.tail))
        });
        if highlighted {
            attrs.push(format!("color={HIGHLIGHT_COLOR}"));
            attrs.push("penwidth=3".to_string());
        }

        write_statement(
            &mut buffer,
            &format!("\"{}\" -> \"{}\"", edge.tail, edge.head),
            &attrs,
        );
    }

    let _ = writeln!(buffer, "}}");
    buffer
}

/// Render the graph and write it to `path`.
pub fn export_dot(
    path: &Path,
    graph: &Graph,
    overlay: &MapOverlay,
    highlight: Option<&RoutePlan>,
) -> Result<()> {
    let document = render_dot(graph, overlay, highlight);
    fs::write(path, document)?;
    info!(
        path = %path.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        highlighted = highlight.is_some(),
        "exported DOT graph"
    );
    Ok(())
}

/// A two-way edge whose mirror image exists can be written as one undirected line.
fn is_collapsible_pair(graph: &Graph, edge: &Edge) -> bool {
    !edge.one_way
        && !edge.is_self_loop()
        && graph.outgoing(edge.head).any(|back| {
            back.head == edge.tail
                && !back.one_way
                && back.length == edge.length
                && back.speed == edge.speed
        })
}

fn write_statement(buffer: &mut String, subject: &str, attrs: &[String]) {
    if attrs.is_empty() {
        let _ = writeln!(buffer, "  {subject};");
    } else {
        let _ = writeln!(buffer, "  {subject} [{}];", attrs.join(", "));
    }
}
