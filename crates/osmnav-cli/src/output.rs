//! Output formatting for routes and node listings.

use std::fmt::Write as _;
use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use osmnav_lib::{Coordinates, MapOverlay, RoutePlan, RouteRenderMode, VertexId};

use crate::terminal::{supports_unicode, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Print a planned route to stdout.
    pub fn render_route(self, plan: &RoutePlan) -> anyhow::Result<()> {
        let rendered = match self {
            OutputFormat::Text => render_route_text(plan, &ColorPalette::detect()),
            OutputFormat::Json => plan.render(RouteRenderMode::Json)?,
        };
        write_stdout(&rendered)
    }

    /// Print vertex positions to stdout.
    pub fn render_nodes(
        self,
        overlay: &MapOverlay,
        vertices: impl IntoIterator<Item = VertexId>,
    ) -> anyhow::Result<()> {
        let rendered = match self {
            OutputFormat::Text => osmnav_lib::render_positions(overlay, vertices),
            OutputFormat::Json => {
                let listing: Vec<NodeEntry> = vertices
                    .into_iter()
                    .map(|id| NodeEntry {
                        id,
                        position: overlay.position(id),
                    })
                    .collect();
                serde_json::to_string_pretty(&listing)?
            }
        };
        write_stdout(&rendered)
    }
}

#[derive(Debug, Serialize)]
struct NodeEntry {
    id: VertexId,
    position: Option<Coordinates>,
}

fn write_stdout(rendered: &str) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    if !rendered.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}

/// Route view used by `--format text`.
pub fn render_route_text(plan: &RoutePlan, palette: &ColorPalette) -> String {
    let p = palette;
    let arrow = if supports_unicode() { "→" } else { "->" };
    let unit = match plan.cost {
        osmnav_lib::CostKind::Length => "m",
        osmnav_lib::CostKind::Time => "s",
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Route from {}{}{} to {}{}{} ({} hops; cost: {}):",
        p.white_bold,
        plan.source,
        p.reset,
        p.white_bold,
        plan.target,
        p.reset,
        plan.hop_count(),
        plan.cost
    );
    for (index, step) in plan.steps.iter().enumerate() {
        let marker = if index == 0 {
            "start"
        } else if index + 1 == plan.steps.len() {
            "goal"
        } else {
            arrow
        };
        let _ = writeln!(out, " {}{marker:>5}{} {step}", p.gray, p.reset);
    }
    let _ = writeln!(
        out,
        "\nTotal distance: {}{:.2} m{}",
        p.green, plan.total_distance_m, p.reset
    );
    let _ = writeln!(
        out,
        "Total duration: {}{:.2} s{}",
        p.green, plan.total_duration_s, p.reset
    );
    let _ = writeln!(
        out,
        "Optimised {}: {}{:.2} {unit}{}",
        plan.cost, p.orange, plan.total_cost, p.reset
    );
    out
}
