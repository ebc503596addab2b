use geo::{Coord, Euclidean, Length, LineString, MultiLineString};

const CUT_EPSILON: f64 = 1e-9;

/// splits a linestring into `n = max(1, ceil(len / segment_length))` pieces
/// of equal arc length by interpolation. original vertices are preserved
/// inside the pieces.
pub fn split_linestring(line: &LineString<f64>, segment_length: f64) -> Vec<LineString<f64>> {
    let total = Euclidean.length(line);
    if line.0.len() < 2 || total <= 0.0 || segment_length <= 0.0 {
        return vec![line.clone()];
    }
    let n = ((total / segment_length).ceil() as usize).max(1);
    if n == 1 {
        return vec![line.clone()];
    }
    let piece_length = total / n as f64;

    let mut pieces: Vec<LineString<f64>> = Vec::with_capacity(n);
    let mut current: Vec<Coord<f64>> = vec![line.0[0]];
    let mut walked = 0.0;
    let mut next_cut = piece_length;

    for window in line.0.windows(2) {
        let (a, b) = (window[0], window[1]);
        let seg_len = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
        if seg_len == 0.0 {
            continue;
        }
        // all cut points that fall strictly inside this vertex-to-vertex span
        while next_cut < walked + seg_len - CUT_EPSILON && pieces.len() < n - 1 {
            let t = (next_cut - walked) / seg_len;
            let cut = Coord {
                x: a.x + (b.x - a.x) * t,
                y: a.y + (b.y - a.y) * t,
            };
            push_coord(&mut current, cut);
            pieces.push(LineString::new(std::mem::replace(&mut current, vec![cut])));
            next_cut += piece_length;
        }
        push_coord(&mut current, b);
        walked += seg_len;
    }

    if current.len() >= 2 {
        pieces.push(LineString::new(current));
    }
    pieces
}

/// splits every part of a multi-part geometry; attributes of the parent row
/// are replicated by the caller, one per returned piece.
pub fn split_line(geometry: &MultiLineString<f64>, segment_length: f64) -> Vec<LineString<f64>> {
    geometry
        .0
        .iter()
        .flat_map(|line| split_linestring(line, segment_length))
        .collect()
}

fn push_coord(coords: &mut Vec<Coord<f64>>, c: Coord<f64>) {
    if coords.last() != Some(&c) {
        coords.push(c);
    }
}
