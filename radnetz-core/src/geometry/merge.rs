use geo::{Coord, LineString, MultiLineString};
use itertools::Itertools;
use std::collections::BTreeMap;

// merging snaps endpoints to a millimeter grid to defeat floating-point
// inequality between coordinates that are topologically the same point
const QUANTIZE_SCALE: f64 = 1_000.0;

type GridPoint = (i64, i64);

fn quantize(c: &Coord<f64>) -> GridPoint {
    (
        (c.x * QUANTIZE_SCALE).round() as i64,
        (c.y * QUANTIZE_SCALE).round() as i64,
    )
}

/// topological line merge: linestrings sharing an endpoint with exactly one
/// other linestring are concatenated into chains. input order does not
/// change the result; chains start at nodes of degree other than two.
pub fn linemerge(lines: &[LineString<f64>]) -> MultiLineString<f64> {
    let lines = lines.iter().filter(|l| l.0.len() >= 2).collect_vec();
    if lines.is_empty() {
        return MultiLineString::new(vec![]);
    }

    // endpoint -> (line index, line starts at this endpoint)
    let mut endpoint_map: BTreeMap<GridPoint, Vec<(usize, bool)>> = BTreeMap::new();
    for (idx, line) in lines.iter().enumerate() {
        let start = quantize(line.0.first().expect("non-empty line"));
        let end = quantize(line.0.last().expect("non-empty line"));
        endpoint_map.entry(start).or_default().push((idx, true));
        endpoint_map.entry(end).or_default().push((idx, false));
    }
    for entries in endpoint_map.values_mut() {
        entries.sort();
    }

    let mut used = vec![false; lines.len()];
    let mut merged: Vec<LineString<f64>> = Vec::new();

    // chains seeded at junctions and dead ends
    for entries in endpoint_map.values() {
        if entries.len() == 2 && entries[0].0 != entries[1].0 {
            continue;
        }
        for &(idx, starts_here) in entries {
            if used[idx] {
                continue;
            }
            merged.push(walk_chain(&lines, &endpoint_map, &mut used, idx, starts_here));
        }
    }

    // remaining lines form closed rings of degree-two nodes
    for idx in 0..lines.len() {
        if used[idx] {
            continue;
        }
        merged.push(walk_chain(&lines, &endpoint_map, &mut used, idx, true));
    }

    MultiLineString::new(merged)
}

fn walk_chain(
    lines: &[&LineString<f64>],
    endpoint_map: &BTreeMap<GridPoint, Vec<(usize, bool)>>,
    used: &mut [bool],
    first: usize,
    starts_at_seed: bool,
) -> LineString<f64> {
    let mut coords: Vec<Coord<f64>> = Vec::new();
    let mut idx = first;
    let mut forward = starts_at_seed;

    loop {
        used[idx] = true;
        append_oriented(&mut coords, lines[idx], forward);
        let tail = quantize(coords.last().expect("chain has coordinates"));

        let entries = match endpoint_map.get(&tail) {
            Some(e) => e,
            None => break,
        };
        if entries.len() != 2 {
            break;
        }
        let next = entries.iter().find(|(i, _)| *i != idx && !used[*i]);
        match next {
            Some(&(next_idx, next_starts_here)) => {
                idx = next_idx;
                forward = next_starts_here;
            }
            None => break,
        }
    }

    LineString::new(coords)
}

fn append_oriented(coords: &mut Vec<Coord<f64>>, line: &LineString<f64>, forward: bool) {
    let iter: Box<dyn Iterator<Item = &Coord<f64>>> = if forward {
        Box::new(line.0.iter())
    } else {
        Box::new(line.0.iter().rev())
    };
    for c in iter {
        if coords.last().map(quantize) != Some(quantize(c)) {
            coords.push(*c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;

    #[test]
    fn test_merge_two_touching_lines() {
        let a = line_string![(x: 0.0, y: 0.0), (x: 5.0, y: 0.0)];
        let b = line_string![(x: 5.0, y: 0.0), (x: 10.0, y: 0.0)];
        let merged = linemerge(&[a, b]);
        assert_eq!(merged.0.len(), 1);
        assert_eq!(merged.0[0].0.len(), 3);
    }

    #[test]
    fn test_merge_respects_reversed_input() {
        let a = line_string![(x: 0.0, y: 0.0), (x: 5.0, y: 0.0)];
        let b = line_string![(x: 10.0, y: 0.0), (x: 5.0, y: 0.0)];
        let merged = linemerge(&[a, b]);
        assert_eq!(merged.0.len(), 1);
        let chain = &merged.0[0];
        assert_eq!(chain.0.len(), 3);
    }

    #[test]
    fn test_disjoint_lines_stay_separate() {
        let a = line_string![(x: 0.0, y: 0.0), (x: 5.0, y: 0.0)];
        let b = line_string![(x: 20.0, y: 0.0), (x: 30.0, y: 0.0)];
        let merged = linemerge(&[a, b]);
        assert_eq!(merged.0.len(), 2);
    }

    #[test]
    fn test_junction_stops_chain() {
        // three lines meeting at (5, 0): none may be merged through the junction
        let a = line_string![(x: 0.0, y: 0.0), (x: 5.0, y: 0.0)];
        let b = line_string![(x: 5.0, y: 0.0), (x: 10.0, y: 0.0)];
        let c = line_string![(x: 5.0, y: 0.0), (x: 5.0, y: 5.0)];
        let merged = linemerge(&[a, b, c]);
        assert_eq!(merged.0.len(), 3);
    }

    #[test]
    fn test_merge_preserves_total_length() {
        use geo::{Euclidean, Length};
        let a = line_string![(x: 0.0, y: 0.0), (x: 5.0, y: 0.0)];
        let b = line_string![(x: 5.0, y: 0.0), (x: 8.0, y: 4.0)];
        let merged = linemerge(&[a.clone(), b.clone()]);
        let before = Euclidean.length(&a) + Euclidean.length(&b);
        let after: f64 = merged.0.iter().map(|l| Euclidean.length(l)).sum();
        assert!((before - after).abs() < 0.01);
    }
}
