use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use osmnav_lib::{
    find_largest_component, load_map, plan_route, shortest_path, CostKind, Edge, Graph,
    LoadedMap, LoaderConfig, RouteRequest,
};
use std::hint::black_box;
use std::path::PathBuf;

const GRID_SIDE: i64 = 120;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures/small_town.osm")
}

/// Two-way lattice with alternating fast and slow avenues.
fn grid(side: i64) -> Graph {
    let mut edges = Vec::new();
    for y in 0..side {
        for x in 0..side {
            let id = y * side + x;
            if x + 1 < side {
                let road = Edge::new(id, id + 1, 100.0, 13.9, false);
                edges.push(road);
                edges.push(road.reversed());
            }
            if y + 1 < side {
                let speed = if x % 4 == 0 { 25.0 } else { 8.3 };
                let road = Edge::new(id, id + side, 100.0, speed, false);
                edges.push(road);
                edges.push(road.reversed());
            }
        }
    }
    Graph::new(0..side * side, edges).expect("grid is well formed")
}

static GRID: Lazy<Graph> = Lazy::new(|| grid(GRID_SIDE));
static SMALL_TOWN: Lazy<LoadedMap> =
    Lazy::new(|| load_map(&fixture_path(), &LoaderConfig::default()).expect("fixture loads"));
static CORNER_TO_CORNER: Lazy<RouteRequest> =
    Lazy::new(|| RouteRequest::by_time(0, GRID_SIDE * GRID_SIDE - 1));

fn benchmark_pathfinding(c: &mut Criterion) {
    let graph = &*GRID;

    c.bench_function("dijkstra_grid_length", |b| {
        b.iter(|| {
            let tree = shortest_path(graph, 0, GRID_SIDE * GRID_SIDE - 1, CostKind::Length)
                .expect("query runs");
            black_box(tree.total_cost())
        });
    });

    c.bench_function("plan_route_grid_time", |b| {
        let request = &*CORNER_TO_CORNER;
        b.iter(|| {
            let plan = plan_route(graph, request).expect("route exists");
            black_box(plan.hop_count())
        });
    });

    c.bench_function("largest_component_grid", |b| {
        b.iter(|| {
            let component = find_largest_component(graph.edges());
            black_box(component.edge_count())
        });
    });

    c.bench_function("plan_route_small_town", |b| {
        let map = &*SMALL_TOWN;
        let request = RouteRequest::by_length(1, 5);
        b.iter(|| {
            let plan = plan_route(&map.graph, &request).expect("route exists");
            black_box(plan.steps.len())
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
