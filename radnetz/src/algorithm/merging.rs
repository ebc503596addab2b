use itertools::Itertools;
use radnetz_core::geometry::{length_of, linemerge};
use radnetz_core::model::{AttributedEdge, Fuehrung, SnappedSegment};
use std::collections::BTreeMap;

/// merges runs of snapped segments whose normalized attributes agree back
/// into contiguous edges. groups are keyed by `(element_nr, ri,
/// normalized attributes)`; each group keeps the attribute values of its
/// first segment and re-merges the geometry.
pub fn merge_segments(segments: &[SnappedSegment]) -> Vec<AttributedEdge> {
    // group membership in input order, groups emitted in key order
    let mut groups: BTreeMap<(String, u8, String), Vec<usize>> = BTreeMap::new();
    for (idx, segment) in segments.iter().enumerate() {
        let key = (
            segment.element_nr.clone(),
            segment.ri.index(),
            segment.attributes.grouping_key(),
        );
        groups.entry(key).or_default().push(idx);
    }

    let mut edges: Vec<AttributedEdge> = Vec::with_capacity(groups.len());
    for (sfid, (_, members)) in groups.into_iter().enumerate() {
        let first = &segments[members[0]];
        let geometry = linemerge(
            &members
                .iter()
                .map(|&idx| segments[idx].geometry.clone())
                .collect_vec(),
        );
        let laenge = length_of(&geometry).round() as i64;

        let mut attributes = first.attributes.clone();
        // mixed traffic has no meaningful cycling width
        if attributes.fuehr == Fuehrung::Mischverkehr {
            attributes.breite = None;
        }

        edges.push(AttributedEdge {
            sfid: sfid as u64 + 1,
            element_nr: first.element_nr.clone(),
            ri: first.ri,
            edge_source: first.edge_source,
            street_name: first.street_name.clone(),
            street_class: first.street_class.clone(),
            bezirk: first.bezirk.clone(),
            geometry,
            attributes,
            data_source: first.data_source,
            laenge,
            tilda: first.tilda.clone(),
            extras: first.extras.clone(),
        });
    }

    log::info!(
        "segment merge: {} segments -> {} attributed edges",
        segments.len(),
        edges.len()
    );
    edges
}
