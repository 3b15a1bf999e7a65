use std::fmt::Write;

use crate::error::Result;
use crate::graph::{CostKind, VertexId};
use crate::overlay::MapOverlay;
use crate::routing::RoutePlan;

/// Presentation style for turning a [`RoutePlan`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteRenderMode {
    #[default]
    PlainText,
    Json,
}

impl RoutePlan {
    /// Render the plan using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> Result<String> {
        match mode {
            RouteRenderMode::PlainText => Ok(self.render_plain()),
            RouteRenderMode::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({} hops, optimised for {})",
            self.source,
            self.target,
            self.hop_count(),
            self.cost
        );
        for (index, step) in self.steps.iter().enumerate() {
            let _ = writeln!(buffer, "{index:>3}: {step}");
        }
        let _ = writeln!(buffer, "Total distance: {:.2} m", self.total_distance_m);
        let _ = writeln!(buffer, "Total duration: {:.2} s", self.total_duration_s);
        let unit = match self.cost {
            CostKind::Length => "m",
            CostKind::Time => "s",
        };
        let _ = writeln!(buffer, "Total cost: {:.2} {unit}", self.total_cost);
        buffer
    }
}

/// List `id: lat, lon` for each vertex; vertices without a position are marked.
pub fn render_positions(
    overlay: &MapOverlay,
    vertices: impl IntoIterator<Item = VertexId>,
) -> String {
    let mut buffer = String::new();
    for vertex in vertices {
        match overlay.position(vertex) {
            Some(position) => {
                let _ = writeln!(buffer, "{vertex}: {}, {}", position.lat, position.lon);
            }
            None => {
                let _ = writeln!(buffer, "{vertex}: <no position>");
            }
        }
    }
    buffer
}
