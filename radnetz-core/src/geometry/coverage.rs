use crate::error::NetzError;
use geo::{
    BooleanOps, Distance, Euclidean, Geometry, Length, LineInterpolatePoint, LineString,
    MultiLineString, MultiPolygon, Point,
};

// fraction above which a line counts as fully covered; absorbs clipping
// noise at polygon boundaries
const FULL_COVERAGE: f64 = 0.999;

pub fn linestring_length(line: &LineString<f64>) -> f64 {
    Euclidean.length(line)
}

pub fn length_of(geometry: &MultiLineString<f64>) -> f64 {
    geometry.0.iter().map(|line| Euclidean.length(line)).sum()
}

/// fraction of `line`'s length that lies inside `cover`, in [0, 1].
pub fn coverage_fraction(line: &MultiLineString<f64>, cover: &MultiPolygon<f64>) -> f64 {
    let total = length_of(line);
    if total <= 0.0 || cover.0.is_empty() {
        return 0.0;
    }
    let clipped = cover.clip(line, false);
    length_of(&clipped) / total
}

/// whether a line lies entirely inside the cover polygon.
pub fn covered_by(line: &MultiLineString<f64>, cover: &MultiPolygon<f64>) -> bool {
    coverage_fraction(line, cover) >= FULL_COVERAGE
}

/// start and end point of a (multi-)line: first vertex of the first part,
/// last vertex of the last part.
pub fn endpoints(geometry: &MultiLineString<f64>) -> Option<(Point<f64>, Point<f64>)> {
    let first = geometry.0.first().and_then(|line| line.0.first())?;
    let last = geometry.0.last().and_then(|line| line.0.last())?;
    Some((Point::from(*first), Point::from(*last)))
}

/// arc-length midpoint of a linestring.
pub fn midpoint(line: &LineString<f64>) -> Point<f64> {
    line.line_interpolate_point(0.5)
        .or_else(|| line.0.first().copied().map(Point::from))
        .unwrap_or_else(|| Point::new(0.0, 0.0))
}

/// reverses the direction of a geometry, part order included.
pub fn reverse_line(geometry: &MultiLineString<f64>) -> MultiLineString<f64> {
    let parts = geometry
        .0
        .iter()
        .rev()
        .map(|line| LineString::new(line.0.iter().rev().copied().collect()))
        .collect();
    MultiLineString::new(parts)
}

/// normalizes a generic geometry from the vector I/O boundary into its
/// line parts. non-linear geometry in a line dataset is a programming
/// error, not a recoverable condition.
pub fn lines_from_geometry(geometry: Geometry<f64>) -> Result<MultiLineString<f64>, NetzError> {
    match geometry {
        Geometry::LineString(line) => Ok(MultiLineString::new(vec![line])),
        Geometry::MultiLineString(lines) => Ok(lines),
        other => Err(NetzError::UnsupportedGeometry {
            operation: String::from("lines_from_geometry"),
            geometry: String::from(geometry_name(&other)),
        }),
    }
}

fn geometry_name(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// smallest euclidean distance between a multi-part line and a linestring.
pub fn line_distance(a: &MultiLineString<f64>, b: &LineString<f64>) -> f64 {
    a.0.iter()
        .map(|part| Euclidean.distance(part, b))
        .fold(f64::INFINITY, f64::min)
}

/// smallest euclidean distance between a point and a multi-part line.
pub fn point_distance(geometry: &MultiLineString<f64>, point: &Point<f64>) -> f64 {
    geometry
        .0
        .iter()
        .map(|part| Euclidean.distance(point, part))
        .fold(f64::INFINITY, f64::min)
}
