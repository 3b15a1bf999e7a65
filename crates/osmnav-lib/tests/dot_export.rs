mod common;

use common::small_town_path;
use osmnav_lib::{
    export_dot, load_map, parse_dot, plan_route, render_dot, Edge, Graph, LoaderConfig,
    MapOverlay, RouteRequest,
};
use tempfile::tempdir;

#[test]
fn exported_map_loads_back_with_the_same_network() {
    let config = LoaderConfig::default();
    let original = load_map(&small_town_path(), &config).expect("fixture loads");

    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("small_town.dot");
    export_dot(&path, &original.graph, &original.overlay, None).expect("export");

    let reloaded = load_map(&path, &config).expect("exported DOT loads");
    assert_eq!(reloaded.graph.vertices(), original.graph.vertices());
    assert_eq!(reloaded.graph.edge_count(), original.graph.edge_count());
    assert_eq!(reloaded.overlay.position(3), original.overlay.position(3));

    for edge in original.graph.edges() {
        let twin = reloaded
            .graph
            .outgoing(edge.tail)
            .find(|candidate| candidate.head == edge.head)
            .expect("edge survives the round trip");
        assert_eq!(twin.length, edge.length);
        assert!((twin.speed - edge.speed).abs() < 1e-9);
        assert!((twin.time - edge.time).abs() < 1e-9);
        assert_eq!(twin.one_way, edge.one_way);
    }

    let bounds = reloaded.overlay.bounds().expect("bb attribute");
    assert!((bounds.min_lat - 49.9995).abs() < 1e-9);
    assert!((bounds.max_lon - 14.0065).abs() < 1e-9);

    let before = plan_route(&original.graph, &RouteRequest::by_time(1, 5)).unwrap();
    let after = plan_route(&reloaded.graph, &RouteRequest::by_time(1, 5)).unwrap();
    assert_eq!(before.steps, after.steps);
}

#[test]
fn edge_attributes_keep_full_precision() {
    let edges = vec![
        Edge::new(1, 2, 123.456_789, 13.888_888_9, true),
        Edge::new(2, 3, 0.004, 1.234_567, true),
    ];
    let graph = Graph::new([1, 2, 3], edges.clone()).unwrap();
    let dot = render_dot(&graph, &MapOverlay::default(), None);
    assert!(dot.contains("length=123.456789"), "{dot}");

    let reparsed = parse_dot(&dot, &LoaderConfig::default()).expect("parses");
    for edge in &edges {
        let twin = reparsed
            .graph
            .outgoing(edge.tail)
            .find(|candidate| candidate.head == edge.head)
            .expect("edge survives the round trip");
        assert_eq!(twin.length, edge.length);
        assert!((twin.time - edge.time).abs() < 1e-9, "{twin:?} vs {edge:?}");
    }
}

#[test]
fn highlighted_route_marks_only_its_legs() {
    let map = load_map(&small_town_path(), &LoaderConfig::default()).expect("fixture loads");
    let plan = plan_route(&map.graph, &RouteRequest::by_length(1, 5)).unwrap();
    let dot = render_dot(&map.graph, &map.overlay, Some(&plan));

    let highlighted: Vec<&str> = dot
        .lines()
        .filter(|line| line.contains("->") && line.contains("penwidth=3"))
        .collect();
    assert_eq!(highlighted.len(), plan.hop_count());
    assert!(highlighted.iter().all(|line| line.contains("color=red")));
    assert!(!dot
        .lines()
        .any(|line| line.contains("\"3\" -> \"5\"") && line.contains("penwidth")));

    // Highlighting is presentation only; parsing ignores it.
    let reparsed = parse_dot(&dot, &LoaderConfig::default()).expect("parses");
    assert_eq!(reparsed.graph.edge_count(), map.graph.edge_count());
}

#[test]
fn node_positions_are_scaled_degrees() {
    let map = load_map(&small_town_path(), &LoaderConfig::default()).expect("fixture loads");
    let dot = render_dot(&map.graph, &map.overlay, None);
    let node_two = dot
        .lines()
        .find(|line| line.trim_start().starts_with("\"2\" ["))
        .expect("node line");
    assert!(node_two.contains("pos=\"1400.1"), "{node_two}");
    assert!(node_two.contains("comment=\"50,14.001\""), "{node_two}");
    assert!(dot.contains("node [shape=point]"));
    assert!(dot.contains("bb=\""));
}
