use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, info};

use super::{LoadedMap, LoaderConfig};
use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, VertexId};
use crate::overlay::{Bounds, Coordinates, MapOverlay};

const MPH_TO_KMH: f64 = 1.609_344;

/// Travel direction permitted on a way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Both,
    Forward,
    Backward,
}

impl Direction {
    fn from_tag(value: Option<&str>) -> Self {
        match value {
            Some("yes") | Some("true") | Some("1") => Direction::Forward,
            Some("-1") | Some("reverse") => Direction::Backward,
            _ => Direction::Both,
        }
    }
}

#[derive(Debug, Default)]
struct Way {
    id: i64,
    refs: Vec<VertexId>,
    tags: HashMap<String, String>,
}

/// Load an OpenStreetMap XML extract from disk.
pub fn load_osm(path: &Path, config: &LoaderConfig) -> Result<LoadedMap> {
    let file = File::open(path)?;
    parse_osm(BufReader::new(file), config)
}

/// Parse OpenStreetMap XML from any buffered reader.
///
/// Only ways whose `highway` tag is listed in `config` become edges; vertices
/// are the nodes those ways reference.
pub fn parse_osm<R: BufRead>(input: R, config: &LoaderConfig) -> Result<LoadedMap> {
    let mut reader = Reader::from_reader(input);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut nodes: HashMap<VertexId, Coordinates> = HashMap::new();
    let mut bounds: Option<Bounds> = None;
    let mut ways: Vec<Way> = Vec::new();
    let mut current: Option<Way> = None;
    let mut skipped_ways = 0usize;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(element) => match element.name().as_ref() {
                b"way" => {
                    current = Some(Way {
                        id: required(&element, b"id")?,
                        ..Way::default()
                    });
                }
                _ => read_leaf(&element, &mut nodes, &mut bounds, current.as_mut())?,
            },
            Event::Empty(element) => {
                read_leaf(&element, &mut nodes, &mut bounds, current.as_mut())?
            }
            Event::End(element) if element.name().as_ref() == b"way" => {
                if let Some(way) = current.take() {
                    let keep = way
                        .tags
                        .get("highway")
                        .is_some_and(|kind| config.accepts_highway(kind));
                    if keep {
                        ways.push(way);
                    } else {
                        skipped_ways += 1;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    debug!(
        nodes = nodes.len(),
        ways = ways.len(),
        skipped_ways,
        "read OSM elements"
    );

    let mut vertices: BTreeSet<VertexId> = BTreeSet::new();
    let mut edges: Vec<Edge> = Vec::new();
    for way in &ways {
        append_way_edges(way, &nodes, config, &mut vertices, &mut edges)?;
    }

    let positions = vertices
        .iter()
        .filter_map(|id| nodes.get(id).map(|position| (*id, *position)))
        .collect();
    let graph = Graph::new(vertices, edges)?;

    info!(
        ways = ways.len(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "loaded OSM map"
    );

    Ok(LoadedMap {
        graph,
        overlay: MapOverlay::new(positions, bounds),
    })
}

fn read_leaf(
    element: &BytesStart<'_>,
    nodes: &mut HashMap<VertexId, Coordinates>,
    bounds: &mut Option<Bounds>,
    way: Option<&mut Way>,
) -> Result<()> {
    match element.name().as_ref() {
        b"node" => {
            let id: VertexId = required(element, b"id")?;
            let lat: f64 = required(element, b"lat")?;
            let lon: f64 = required(element, b"lon")?;
            nodes.insert(id, Coordinates::new(lat, lon));
        }
        b"bounds" => {
            *bounds = Some(Bounds {
                min_lat: required(element, b"minlat")?,
                min_lon: required(element, b"minlon")?,
                max_lat: required(element, b"maxlat")?,
                max_lon: required(element, b"maxlon")?,
            });
        }
        b"nd" => {
            if let Some(way) = way {
                way.refs.push(required(element, b"ref")?);
            }
        }
        b"tag" => {
            if let Some(way) = way {
                let key = attribute(element, b"k")?.unwrap_or_default();
                let value = attribute(element, b"v")?.unwrap_or_default();
                way.tags.insert(key, value);
            }
        }
        _ => {}
    }
    Ok(())
}

fn append_way_edges(
    way: &Way,
    nodes: &HashMap<VertexId, Coordinates>,
    config: &LoaderConfig,
    vertices: &mut BTreeSet<VertexId>,
    edges: &mut Vec<Edge>,
) -> Result<()> {
    let speed = way
        .tags
        .get("maxspeed")
        .and_then(|value| parse_maxspeed(value))
        .unwrap_or(config.default_speed_kmh);
    let direction = Direction::from_tag(way.tags.get("oneway").map(String::as_str));

    for pair in way.refs.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if from == to {
            continue;
        }
        let position = |id: VertexId| {
            nodes.get(&id).ok_or_else(|| {
                Error::invalid_map(format!(
                    "way {} references node {id} without coordinates",
                    way.id
                ))
            })
        };
        let length = position(from)?.haversine_m(position(to)?);

        vertices.insert(from);
        vertices.insert(to);
        match direction {
            Direction::Forward => {
                edges.push(Edge::with_speed_kmh(from, to, length, speed, true));
            }
            Direction::Backward => {
                edges.push(Edge::with_speed_kmh(to, from, length, speed, true));
            }
            Direction::Both => {
                let edge = Edge::with_speed_kmh(from, to, length, speed, false);
                edges.push(edge);
                edges.push(edge.reversed());
            }
        }
    }
    Ok(())
}

/// Parse an OSM `maxspeed` value into km/h. Symbolic values yield `None`.
fn parse_maxspeed(value: &str) -> Option<f64> {
    let value = value.trim();
    let numeric: String = value
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let speed: f64 = numeric.parse().ok()?;
    if speed <= 0.0 {
        return None;
    }
    if value.ends_with("mph") {
        Some(speed * MPH_TO_KMH)
    } else {
        Some(speed)
    }
}

fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attribute in element.attributes() {
        let attribute = attribute?;
        if attribute.key.as_ref() == key {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn required<T: FromStr>(element: &BytesStart<'_>, key: &[u8]) -> Result<T> {
    let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
    let key_name = String::from_utf8_lossy(key).into_owned();
    let raw = attribute(element, key)?.ok_or_else(|| {
        Error::invalid_map(format!("<{name}> element is missing the '{key_name}' attribute"))
    })?;
    raw.trim().parse().map_err(|_| {
        Error::invalid_map(format!("<{name}> has invalid '{key_name}' value '{raw}'"))
    })
}
