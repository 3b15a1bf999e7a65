use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use tracing::info;

use super::{LoadedMap, LoaderConfig};
use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, VertexId};
use crate::overlay::{Bounds, Coordinates, MapOverlay};
use crate::render::POSITION_SCALE;

/// Load a DOT file previously written by [`crate::render::export_dot`].
pub fn load_dot(path: &Path, config: &LoaderConfig) -> Result<LoadedMap> {
    let document = fs::read_to_string(path)?;
    parse_dot(&document, config)
}

/// Parse the DOT subset produced by the renderer.
///
/// Nodes carry their coordinates in `comment="lat,lon"`. Edges carry
/// `length` (meters), `speed` (km/h) and `oneway`; `dir=none` marks a two-way
/// road written once. Missing lengths are measured from node coordinates and
/// missing speeds fall back to the configured default.
pub fn parse_dot(document: &str, config: &LoaderConfig) -> Result<LoadedMap> {
    let mut vertices: BTreeSet<VertexId> = BTreeSet::new();
    let mut positions: HashMap<VertexId, Coordinates> = HashMap::new();
    let mut bounds: Option<Bounds> = None;
    let mut raw_edges: Vec<(VertexId, VertexId, HashMap<String, String>)> = Vec::new();

    for (line_no, line) in document.lines().enumerate() {
        let line = line.trim().trim_end_matches(';').trim();
        if line.is_empty()
            || line.starts_with("//")
            || line.starts_with("digraph")
            || line.starts_with("graph {")
            || line == "}"
        {
            continue;
        }

        let (subject, attrs) = split_statement(line);
        let attrs = parse_attributes(attrs);

        match subject {
            "graph" => {
                if let Some(bb) = attrs.get("bb") {
                    bounds = Some(parse_bounds(bb, line_no)?);
                }
            }
            "node" | "edge" => {}
            _ => {
                if let Some((tail, head)) = subject.split_once("->") {
                    let tail = parse_id(tail, line_no)?;
                    let head = parse_id(head, line_no)?;
                    vertices.insert(tail);
                    vertices.insert(head);
                    raw_edges.push((tail, head, attrs));
                } else {
                    let id = parse_id(subject, line_no)?;
                    vertices.insert(id);
                    if let Some(comment) = attrs.get("comment") {
                        positions.insert(id, parse_coordinates(comment, line_no)?);
                    }
                }
            }
        }
    }

    let mut edges = Vec::with_capacity(raw_edges.len() * 2);
    for (tail, head, attrs) in raw_edges {
        let length = match attrs.get("length") {
            Some(value) => parse_number(value, "length")?,
            None => measured_length(&positions, tail, head)?,
        };
        let speed = match attrs.get("speed") {
            Some(value) => parse_number(value, "speed")?,
            None => config.default_speed_kmh,
        };
        let undirected = attrs.get("dir").is_some_and(|dir| dir == "none");
        let one_way = !undirected && attrs.get("oneway").is_some_and(|value| value == "true");

        let edge = Edge::with_speed_kmh(tail, head, length, speed, one_way);
        edges.push(edge);
        if undirected {
            edges.push(edge.reversed());
        }
    }

    let graph = Graph::new(vertices, edges)?;
    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        positioned = positions.len(),
        "loaded DOT map"
    );

    Ok(LoadedMap {
        graph,
        overlay: MapOverlay::new(positions, bounds),
    })
}

/// Split `subject [attrs]` into its two halves.
fn split_statement(line: &str) -> (&str, &str) {
    match line.find('[') {
        Some(open) => {
            let close = line.rfind(']').unwrap_or(line.len());
            let close = close.max(open + 1);
            (line[..open].trim(), &line[open + 1..close])
        }
        None => (line.trim(), ""),
    }
}

/// Parse `key=value, key="quoted, value"` pairs.
fn parse_attributes(input: &str) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace() || *c == ',' || *c == ';') {
            chars.next();
        }
        let key: String = chars
            .by_ref()
            .take_while(|c| *c != '=')
            .collect::<String>()
            .trim()
            .to_string();
        if key.is_empty() {
            break;
        }

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        let value = if chars.peek() == Some(&'"') {
            chars.next();
            let mut value = String::new();
            while let Some(c) = chars.next() {
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            value.push(escaped);
                        }
                    }
                    '"' => break,
                    _ => value.push(c),
                }
            }
            value
        } else {
            let mut value = String::new();
            while let Some(&c) = chars.peek() {
                if c == ',' || c == ';' {
                    break;
                }
                value.push(c);
                chars.next();
            }
            value.trim().to_string()
        };
        attrs.insert(key, value);
    }

    attrs
}

fn parse_id(raw: &str, line_no: usize) -> Result<VertexId> {
    let trimmed = raw.trim().trim_matches('"');
    trimmed.parse().map_err(|_| {
        Error::invalid_map(format!(
            "line {}: vertex id '{trimmed}' is not an integer",
            line_no + 1
        ))
    })
}

fn parse_number(raw: &str, what: &str) -> Result<f64> {
    raw.trim()
        .parse()
        .map_err(|_| Error::invalid_map(format!("invalid {what} value '{raw}'")))
}

fn parse_pair(raw: &str, line_no: usize) -> Result<(f64, f64)> {
    let cleaned = raw.trim().trim_end_matches('!');
    let parsed = cleaned
        .split_once(',')
        .and_then(|(a, b)| Some((a.trim().parse().ok()?, b.trim().parse().ok()?)));
    parsed.ok_or_else(|| {
        Error::invalid_map(format!(
            "line {}: expected 'a,b' pair, got '{raw}'",
            line_no + 1
        ))
    })
}

fn parse_coordinates(raw: &str, line_no: usize) -> Result<Coordinates> {
    let (lat, lon) = parse_pair(raw, line_no)?;
    Ok(Coordinates::new(lat, lon))
}

fn parse_bounds(raw: &str, line_no: usize) -> Result<Bounds> {
    let values: Vec<f64> = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| {
            Error::invalid_map(format!("line {}: invalid bb '{raw}'", line_no + 1))
        })?;
    let [min_lon, min_lat, max_lon, max_lat] = values[..] else {
        return Err(Error::invalid_map(format!(
            "line {}: bb needs four values, got '{raw}'",
            line_no + 1
        )));
    };
    Ok(Bounds {
        min_lat: min_lat / POSITION_SCALE,
        min_lon: min_lon / POSITION_SCALE,
        max_lat: max_lat / POSITION_SCALE,
        max_lon: max_lon / POSITION_SCALE,
    })
}

fn measured_length(
    positions: &HashMap<VertexId, Coordinates>,
    tail: VertexId,
    head: VertexId,
) -> Result<f64> {
    match (positions.get(&tail), positions.get(&head)) {
        (Some(a), Some(b)) => Ok(a.haversine_m(b)),
        _ => Err(Error::invalid_map(format!(
            "edge {tail} -> {head} has no length and its endpoints have no coordinates"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attributes_with_quoted_commas() {
        let attrs = parse_attributes(r#"pos="1.5,2.5!", comment="50.1,14.2", oneway=true"#);
        assert_eq!(attrs.get("pos").map(String::as_str), Some("1.5,2.5!"));
        assert_eq!(attrs.get("comment").map(String::as_str), Some("50.1,14.2"));
        assert_eq!(attrs.get("oneway").map(String::as_str), Some("true"));
    }

    #[test]
    fn statement_without_attributes() {
        assert_eq!(split_statement("\"7\""), ("\"7\"", ""));
        assert_eq!(
            split_statement("\"1\" -> \"2\" [length=3]"),
            ("\"1\" -> \"2\"", "length=3")
        );
    }

    #[test]
    fn missing_length_is_measured() {
        let document = r#"digraph osmnav {
  "1" [comment="50.0,14.0"];
  "2" [comment="50.001,14.0"];
  "1" -> "2" [oneway=true];
}"#;
        let map = parse_dot(document, &LoaderConfig::default()).expect("parse");
        let edge = map.graph.edges()[0];
        assert!((edge.length - 111.19).abs() < 0.1, "length {}", edge.length);
        assert!(edge.one_way);
        assert!((edge.speed_kmh() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        let error = parse_dot("digraph g {\n  \"a\";\n}", &LoaderConfig::default())
            .expect_err("non numeric id");
        assert!(matches!(error, Error::InvalidMapData { .. }));
    }
}
