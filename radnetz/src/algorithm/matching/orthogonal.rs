use crate::config::OrthogonalFilterConfiguration;
use geo::{BoundingRect, LineInterpolatePoint, LineString, MultiLineString};
use itertools::Itertools;
use radnetz_core::geometry::{
    length_of, line_angle, line_distance, linemerge, linestring_angle, linestring_length,
    normalized_angle_difference,
};
use radnetz_core::index::{expand_rect, SpatialIndex};
use radnetz_core::model::PriorityEdge;
use radnetz_osm::model::TranslatedWay;
use std::collections::BTreeSet;

/// flags short ways running orthogonally to the priority network. the
/// merged network is probed in short chords; a short way whose orientation
/// disagrees with the local probes is removed from the match. junction
/// areas, where the probes themselves disagree, never remove a way that is
/// aligned with at least one probe.
pub fn orthogonal_removals(
    priority: &[PriorityEdge],
    ways: &[TranslatedWay],
    config: &OrthogonalFilterConfiguration,
) -> BTreeSet<i64> {
    let merged = linemerge(
        &priority
            .iter()
            .flat_map(|edge| edge.geometry.0.iter().cloned())
            .collect_vec(),
    );
    let probes = probe_segments(&merged, config.probe_length);
    if probes.is_empty() {
        return BTreeSet::new();
    }
    let probe_index = SpatialIndex::build_linestrings(probes.iter());
    let probe_bearings: Vec<f64> = probes.iter().map(linestring_angle).collect();

    let mut removals = BTreeSet::new();
    for way in ways {
        if length_of(&way.geometry) >= config.short_way_threshold {
            continue;
        }
        let Some(bbox) = way.geometry.bounding_rect() else {
            continue;
        };
        let nearby: Vec<usize> = probe_index
            .query_rect(&expand_rect(&bbox, config.way_buffer))
            .into_iter()
            .filter(|&idx| line_distance(&way.geometry, &probes[idx]) <= config.way_buffer)
            .collect();
        if nearby.is_empty() {
            continue;
        }

        let way_bearing = line_angle(&way.geometry);
        let bearings: Vec<f64> = nearby.iter().map(|&idx| probe_bearings[idx]).collect();

        // junction or curve: the probes disagree among themselves. keep the
        // way if it is aligned with any of them.
        let spread = bearings
            .iter()
            .tuple_combinations()
            .map(|(a, b)| normalized_angle_difference(*a, *b))
            .fold(0.0, f64::max);
        if spread > config.complex_spread {
            let aligned = bearings
                .iter()
                .any(|b| normalized_angle_difference(way_bearing, *b) <= config.aligned_angle);
            if aligned {
                continue;
            }
        }

        let representative = representative_bearing(&probes, &nearby);
        if normalized_angle_difference(way_bearing, representative) > config.removal_angle {
            removals.insert(way.osm_id);
        }
    }
    removals
}

/// chord probes of fixed length along every part of the merged network
fn probe_segments(merged: &MultiLineString<f64>, probe_length: f64) -> Vec<LineString<f64>> {
    let mut probes = Vec::new();
    for line in &merged.0 {
        let total = linestring_length(line);
        if total <= 0.0 {
            continue;
        }
        let mut distance = 0.0;
        while distance < total {
            let end = (distance + probe_length).min(total);
            let start_point = line.line_interpolate_point(distance / total);
            let end_point = line.line_interpolate_point(end / total);
            if let (Some(a), Some(b)) = (start_point, end_point) {
                if a != b {
                    probes.push(LineString::from(vec![(a.x(), a.y()), (b.x(), b.y())]));
                }
            }
            distance += probe_length;
        }
    }
    probes
}

/// bearing of the longest chain after merging the hit probes back together
fn representative_bearing(probes: &[LineString<f64>], hits: &[usize]) -> f64 {
    let merged = linemerge(&hits.iter().map(|&idx| probes[idx].clone()).collect_vec());
    merged
        .0
        .iter()
        .max_by(|a, b| linestring_length(a).total_cmp(&linestring_length(b)))
        .map(linestring_angle)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::line_string;
    use radnetz_core::model::{DataSource, NormalizedAttributes};
    use std::collections::BTreeMap;

    fn priority_edge(coords: [(f64, f64); 2]) -> PriorityEdge {
        PriorityEdge {
            element_nr: Some(String::from("A_B.01")),
            from_node: None,
            to_node: None,
            geometry: MultiLineString::new(vec![line_string![
                (x: coords[0].0, y: coords[0].1),
                (x: coords[1].0, y: coords[1].1)
            ]]),
            extras: BTreeMap::new(),
        }
    }

    fn way(osm_id: i64, coords: [(f64, f64); 2]) -> TranslatedWay {
        TranslatedWay {
            osm_id,
            data_source: DataSource::Bikelanes,
            attributes: NormalizedAttributes::no_infrastructure(),
            bemerkung: None,
            manual_action: None,
            tilda: BTreeMap::new(),
            geometry: MultiLineString::new(vec![line_string![
                (x: coords[0].0, y: coords[0].1),
                (x: coords[1].0, y: coords[1].1)
            ]]),
        }
    }

    #[test]
    fn test_orthogonal_short_way_removed() {
        let priority = vec![priority_edge([(0.0, 0.0), (200.0, 0.0)])];
        // 20 m crossing at a right angle
        let crossing = way(1, [(100.0, -10.0), (100.0, 10.0)]);
        // 20 m running parallel
        let parallel = way(2, [(90.0, 5.0), (110.0, 5.0)]);

        let config = OrthogonalFilterConfiguration::default();
        let removals = orthogonal_removals(&priority, &[crossing, parallel], &config);
        assert_eq!(removals, BTreeSet::from([1]));
    }

    #[test]
    fn test_long_ways_are_never_flagged() {
        let priority = vec![priority_edge([(0.0, 0.0), (200.0, 0.0)])];
        // orthogonal but longer than the short-way threshold
        let long_crossing = way(1, [(100.0, -40.0), (100.0, 40.0)]);

        let config = OrthogonalFilterConfiguration::default();
        let removals = orthogonal_removals(&priority, &[long_crossing], &config);
        assert!(removals.is_empty());
    }

    #[test]
    fn test_junction_guard_keeps_aligned_way() {
        // two priority edges meeting at a right angle: probe bearings spread
        // beyond the complex threshold
        let priority = vec![
            priority_edge([(0.0, 0.0), (100.0, 0.0)]),
            priority_edge([(100.0, 0.0), (100.0, 100.0)]),
        ];
        // short way aligned with the second leg, close to the junction
        let aligned = way(1, [(95.0, 10.0), (95.0, 30.0)]);

        let config = OrthogonalFilterConfiguration::default();
        let removals = orthogonal_removals(&priority, &[aligned], &config);
        assert!(removals.is_empty());
    }
}
