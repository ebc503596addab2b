use geo::{Coord, LineString, MultiLineString, Point};

fn bearing(from: Coord<f64>, to: Coord<f64>) -> f64 {
    let degrees = (to.y - from.y).atan2(to.x - from.x).to_degrees();
    (degrees + 360.0) % 360.0
}

/// bearing of a linestring in degrees [0, 360), measured from its first to
/// its last vertex. empty or single-vertex inputs yield 0.
pub fn linestring_angle(line: &LineString<f64>) -> f64 {
    match (line.0.first(), line.0.last()) {
        (Some(first), Some(last)) if line.0.len() >= 2 => bearing(*first, *last),
        _ => 0.0,
    }
}

/// bearing of a (multi-)line in degrees [0, 360). multi-part inputs use the
/// first vertex of the first part and the last vertex of the last part.
pub fn line_angle(geometry: &MultiLineString<f64>) -> f64 {
    let first = geometry.0.first().and_then(|line| line.0.first());
    let last = geometry.0.last().and_then(|line| line.0.last());
    match (first, last) {
        (Some(a), Some(b)) => bearing(*a, *b),
        _ => 0.0,
    }
}

/// smallest unsigned difference between two bearings, in [0, 180].
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % 360.0;
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// orientation difference between two bearings ignoring travel direction,
/// in [0, 90]. two anti-parallel lines are considered aligned.
pub fn normalized_angle_difference(a: f64, b: f64) -> f64 {
    let diff = angle_difference(a, b);
    if diff > 90.0 {
        180.0 - diff
    } else {
        diff
    }
}

/// whether `point` lies left of the straight line from the first to the
/// last vertex of `line`, by the sign of the 2-D cross product.
pub fn is_left(line: &LineString<f64>, point: &Point<f64>) -> bool {
    let (start, end) = match (line.0.first(), line.0.last()) {
        (Some(s), Some(e)) => (*s, *e),
        _ => return false,
    };
    let cross = (end.x - start.x) * (point.y() - start.y)
        - (end.y - start.y) * (point.x() - start.x);
    cross > 0.0
}
