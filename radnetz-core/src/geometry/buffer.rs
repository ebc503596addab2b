use geo::{BooleanOps, Coord, LineString, MultiLineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

// vertices per full circle when polygonizing round caps and joins
const CIRCLE_SEGMENTS: usize = 16;

/// end-cap style of a line buffer. flat caps stop at the line ends, round
/// caps extend by the buffer radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapStyle {
    Flat,
    Round,
}

impl Display for CapStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapStyle::Flat => write!(f, "flat"),
            CapStyle::Round => write!(f, "round"),
        }
    }
}

/// polygonized circle around a coordinate.
pub fn circle(center: Coord<f64>, radius: f64) -> Polygon<f64> {
    let coords: Vec<Coord<f64>> = (0..=CIRCLE_SEGMENTS)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * (i % CIRCLE_SEGMENTS) as f64
                / CIRCLE_SEGMENTS as f64;
            Coord {
                x: center.x + radius * theta.cos(),
                y: center.y + radius * theta.sin(),
            }
        })
        .collect();
    Polygon::new(LineString::new(coords), vec![])
}

fn segment_quad(a: Coord<f64>, b: Coord<f64>, distance: f64) -> Option<Polygon<f64>> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return None;
    }
    // unit normal, pointing left of travel
    let nx = -dy / len * distance;
    let ny = dx / len * distance;
    let ring = vec![
        Coord { x: a.x + nx, y: a.y + ny },
        Coord { x: b.x + nx, y: b.y + ny },
        Coord { x: b.x - nx, y: b.y - ny },
        Coord { x: a.x - nx, y: a.y - ny },
        Coord { x: a.x + nx, y: a.y + ny },
    ];
    Some(Polygon::new(LineString::new(ring), vec![]))
}

/// buffer polygon of a single linestring: per-segment quads plus join
/// circles at interior vertices; round caps add circles at the two ends.
pub fn buffer_linestring(
    line: &LineString<f64>,
    distance: f64,
    cap_style: CapStyle,
) -> Vec<Polygon<f64>> {
    let coords = &line.0;
    let mut polygons: Vec<Polygon<f64>> = Vec::new();
    if coords.is_empty() || distance <= 0.0 {
        return polygons;
    }
    if coords.len() == 1 {
        if cap_style == CapStyle::Round {
            polygons.push(circle(coords[0], distance));
        }
        return polygons;
    }
    for window in coords.windows(2) {
        if let Some(quad) = segment_quad(window[0], window[1], distance) {
            polygons.push(quad);
        }
    }
    let last = coords.len() - 1;
    for (i, c) in coords.iter().enumerate() {
        let interior = i != 0 && i != last;
        if interior || cap_style == CapStyle::Round {
            polygons.push(circle(*c, distance));
        }
    }
    polygons
}

/// balanced pairwise union of a polygon collection.
pub fn union_all(polygons: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
    let mut parts: Vec<MultiPolygon<f64>> = polygons
        .into_iter()
        .map(|p| MultiPolygon::new(vec![p]))
        .collect();
    if parts.is_empty() {
        return MultiPolygon::new(vec![]);
    }
    while parts.len() > 1 {
        parts = parts
            .chunks(2)
            .map(|pair| {
                if pair.len() == 2 {
                    pair[0].union(&pair[1])
                } else {
                    pair[0].clone()
                }
            })
            .collect();
    }
    parts.pop().unwrap_or_else(|| MultiPolygon::new(vec![]))
}

/// buffer polygon of a multi-part line.
pub fn buffer_line(
    geometry: &MultiLineString<f64>,
    distance: f64,
    cap_style: CapStyle,
) -> MultiPolygon<f64> {
    let polygons = geometry
        .0
        .iter()
        .flat_map(|line| buffer_linestring(line, distance, cap_style))
        .collect();
    union_all(polygons)
}

/// single union buffer around a whole network of edges.
pub fn buffer_network<'a>(
    geometries: impl IntoIterator<Item = &'a MultiLineString<f64>>,
    distance: f64,
    cap_style: CapStyle,
) -> MultiPolygon<f64> {
    let polygons: Vec<Polygon<f64>> = geometries
        .into_iter()
        .flat_map(|g| {
            g.0.iter()
                .flat_map(|line| buffer_linestring(line, distance, cap_style))
                .collect::<Vec<_>>()
        })
        .collect();
    union_all(polygons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, Contains, Point};

    #[test]
    fn test_buffer_contains_offset_point() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)];
        let buffered = buffer_line(&MultiLineString::new(vec![line]), 5.0, CapStyle::Round);
        assert!(buffered.0.iter().any(|p| p.contains(&Point::new(5.0, 4.0))));
        assert!(!buffered.0.iter().any(|p| p.contains(&Point::new(5.0, 6.0))));
    }

    #[test]
    fn test_flat_cap_does_not_extend_past_end() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)];
        let flat = buffer_line(&MultiLineString::new(vec![line.clone()]), 5.0, CapStyle::Flat);
        assert!(!flat.0.iter().any(|p| p.contains(&Point::new(13.0, 0.0))));
        let round = buffer_line(&MultiLineString::new(vec![line]), 5.0, CapStyle::Round);
        assert!(round.0.iter().any(|p| p.contains(&Point::new(13.0, 0.0))));
    }

    #[test]
    fn test_network_buffer_unions_overlaps() {
        let a = MultiLineString::new(vec![line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)]]);
        let b = MultiLineString::new(vec![line_string![(x: 5.0, y: 0.0), (x: 5.0, y: 10.0)]]);
        let buffered = buffer_network([&a, &b], 2.0, CapStyle::Round);
        // overlapping buffers dissolve into a single polygon
        assert_eq!(buffered.0.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let empty = MultiLineString::<f64>::new(vec![]);
        let buffered = buffer_line(&empty, 5.0, CapStyle::Round);
        assert!(buffered.0.is_empty());
    }
}
