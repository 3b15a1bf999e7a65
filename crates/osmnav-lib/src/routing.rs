use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::graph::{CostKind, Graph, VertexId};
use crate::path::{round_to_centi, shortest_path, summarize_path};

/// High-level route planning request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    pub source: VertexId,
    pub target: VertexId,
    pub cost: CostKind,
}

impl RouteRequest {
    /// Convenience constructor for the shortest route by physical length.
    pub fn by_length(source: VertexId, target: VertexId) -> Self {
        Self {
            source,
            target,
            cost: CostKind::Length,
        }
    }

    /// Convenience constructor for the fastest route by travel time.
    pub fn by_time(source: VertexId, target: VertexId) -> Self {
        Self {
            source,
            target,
            cost: CostKind::Time,
        }
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub cost: CostKind,
    pub source: VertexId,
    pub target: VertexId,
    /// Visited vertices from source to target inclusive.
    pub steps: Vec<VertexId>,
    pub legs: Vec<(VertexId, VertexId)>,
    /// Optimised cost in the unit of `cost`, rounded to two decimals.
    pub total_cost: f64,
    pub total_distance_m: f64,
    pub total_duration_s: f64,
}

impl RoutePlan {
    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.legs.len()
    }

    /// Whether the route uses the directed edge `from -> to`.
    pub fn uses_leg(&self, from: VertexId, to: VertexId) -> bool {
        self.legs.iter().any(|&leg| leg == (from, to))
    }
}

/// Compute the cheapest route for `request`.
///
/// Unlike the raw engine, an unreachable target is reported as
/// [`Error::RouteNotFound`].
pub fn plan_route(graph: &Graph, request: &RouteRequest) -> Result<RoutePlan> {
    let tree = shortest_path(graph, request.source, request.target, request.cost)?;
    if !tree.is_reachable() {
        return Err(Error::RouteNotFound {
            from: request.source,
            to: request.target,
        });
    }

    let summary = summarize_path(graph, tree.legs()?, request.cost)?;
    let mut steps = Vec::with_capacity(summary.legs.len() + 1);
    steps.push(request.source);
    steps.extend(summary.legs.iter().map(|&(_, to)| to));

    info!(
        source = request.source,
        target = request.target,
        cost_kind = %request.cost,
        hops = summary.legs.len(),
        distance_m = summary.total_distance_m,
        duration_s = summary.total_duration_s,
        "planned route"
    );

    Ok(RoutePlan {
        cost: request.cost,
        source: request.source,
        target: request.target,
        steps,
        legs: summary.legs,
        total_cost: round_to_centi(tree.total_cost()),
        total_distance_m: summary.total_distance_m,
        total_duration_s: summary.total_duration_s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_plan_hop_count() {
        let plan = RoutePlan {
            cost: CostKind::Length,
            source: 1,
            target: 3,
            steps: vec![1, 2, 3],
            legs: vec![(1, 2), (2, 3)],
            total_cost: 2.0,
            total_distance_m: 2.0,
            total_duration_s: 1.0,
        };
        assert_eq!(plan.hop_count(), 2);
        assert!(plan.uses_leg(2, 3));
        assert!(!plan.uses_leg(3, 2));
    }

    #[test]
    fn trivial_route_has_single_step() {
        let graph = Graph::new([5], Vec::new()).expect("graph");
        let plan = plan_route(&graph, &RouteRequest::by_time(5, 5)).expect("trivial route");
        assert_eq!(plan.steps, vec![5]);
        assert_eq!(plan.hop_count(), 0);
        assert_eq!(plan.total_cost, 0.0);
    }
}
