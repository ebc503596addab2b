mod scoring;

pub use scoring::{best_for_direction, candidate_priority, compare_for_direction, ScoredCandidate};

use crate::config::PipelineConfiguration;
use crate::io::candidate_log::{CandidateLogEntry, CandidateLogger};
use geo::{BoundingRect, LineString};
use kdam::{Bar, BarExt};
use radnetz_core::geometry::{
    angle_difference, line_angle, line_distance, linestring_angle, midpoint, point_distance,
    split_line,
};
use radnetz_core::index::{expand_rect, SpatialIndex};
use radnetz_core::model::{
    Direction, EnrichedEdge, Fuehrung, NormalizedAttributes, SnappedSegment,
};
use radnetz_osm::model::TranslatedWay;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// provenance keys copied from the chosen candidate onto each variant
const REFERENCE_KEYS: [&str; 8] = [
    "tilda_id",
    "tilda_name",
    "tilda_oneway",
    "tilda_category",
    "tilda_traffic_sign",
    "tilda_mapillary",
    "tilda_mapillary_forward",
    "tilda_mapillary_backward",
];

/// one piece of an enriched edge awaiting attribution
struct SegmentJob<'a> {
    parent: &'a EnrichedEdge,
    geometry: LineString<f64>,
}

/// shared read-only state of a snapping run. workers borrow the candidate
/// collection and its spatial index, nothing is mutated across batches.
struct SnapContext<'a> {
    ways: &'a [TranslatedWay],
    index: SpatialIndex,
    snap_buffer: f64,
    max_angle_difference: f64,
}

/// cuts the enriched network into short segments and attributes every
/// segment per direction from the best OSM candidate. emits one variant
/// per direction, except for genuine one-way mixed-traffic streets which
/// emit a single directed edge.
pub fn snap_network(
    enriched: &[EnrichedEdge],
    ways: &[TranslatedWay],
    config: &PipelineConfiguration,
    mut logger: Option<&mut CandidateLogger>,
) -> Vec<SnappedSegment> {
    let jobs: Vec<SegmentJob> = enriched
        .iter()
        .flat_map(|edge| {
            split_line(&edge.geometry, config.segment_length)
                .into_iter()
                .filter(|piece| piece.0.len() >= 2)
                .map(move |piece| SegmentJob {
                    parent: edge,
                    geometry: piece,
                })
        })
        .collect();
    log::info!(
        "snapping {} segments from {} edges against {} candidate ways",
        jobs.len(),
        enriched.len(),
        ways.len()
    );

    let context = SnapContext {
        ways,
        index: SpatialIndex::build(ways.iter().map(|w| &w.geometry)),
        snap_buffer: config.snap_buffer,
        max_angle_difference: config.max_angle_difference,
    };

    let workers = config.worker_count();
    let parallel = logger.is_none() && workers > 1 && jobs.len() > config.batch_size;

    if !parallel {
        let mut segments = Vec::with_capacity(jobs.len() * 2);
        for job in &jobs {
            segments.extend(process_segment(job, &context, &mut logger));
        }
        return segments;
    }

    // batches keep submission order through the ordered parallel collect,
    // so the output sequence is deterministic
    let bar = Arc::new(Mutex::new(
        Bar::builder()
            .total(jobs.len())
            .desc("snapping")
            .build()
            .unwrap_or_default(),
    ));
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build();
    let batches: Vec<&[SegmentJob]> = jobs.chunks(config.batch_size).collect();
    let run = || {
        batches
            .par_iter()
            .map(|batch| {
                let mut out = Vec::with_capacity(batch.len() * 2);
                let mut no_logger: Option<&mut CandidateLogger> = None;
                for job in *batch {
                    out.extend(process_segment(job, &context, &mut no_logger));
                }
                if let Ok(mut b) = bar.lock() {
                    let _ = b.update(batch.len());
                }
                out
            })
            .collect::<Vec<Vec<SnappedSegment>>>()
    };
    let results = match pool {
        Ok(pool) => pool.install(run),
        Err(e) => {
            log::warn!("worker pool unavailable ({}), falling back to the global pool", e);
            run()
        }
    };
    eprintln!();
    results.into_iter().flatten().collect()
}

/// candidate search and variant creation for one segment.
fn process_segment(
    job: &SegmentJob,
    context: &SnapContext,
    logger: &mut Option<&mut CandidateLogger>,
) -> Vec<SnappedSegment> {
    let segment_bearing = linestring_angle(&job.geometry);
    let segment_midpoint = midpoint(&job.geometry);

    let Some(bbox) = job.geometry.bounding_rect() else {
        return vec![];
    };
    let query = expand_rect(&bbox, context.snap_buffer);

    // distance filter over the bbox hits
    let candidates: Vec<ScoredCandidate> = context
        .index
        .query_rect(&query)
        .into_iter()
        .filter_map(|idx| {
            let way = &context.ways[idx];
            if line_distance(&way.geometry, &job.geometry) > context.snap_buffer {
                return None;
            }
            let way_bearing = line_angle(&way.geometry);
            Some(ScoredCandidate {
                way,
                distance: point_distance(&way.geometry, &segment_midpoint),
                angle_diff: angle_difference(way_bearing, segment_bearing),
                priority: candidate_priority(way),
            })
        })
        .collect();

    // oriented set: orientation within the angle threshold regardless of
    // travel direction; an empty oriented set falls back to everything
    // within distance
    let oriented: Vec<ScoredCandidate> = candidates
        .iter()
        .filter(|c| orientation_diff(c.angle_diff) <= context.max_angle_difference)
        .cloned()
        .collect();
    let working = if oriented.is_empty() { candidates } else { oriented };

    if working.is_empty() {
        // planned-network coverage survives without any infrastructure
        if let Some(logger) = logger {
            for ri in Direction::BOTH {
                logger.log_segment(&job.parent.element_nr, ri, &[]);
            }
        }
        return Direction::BOTH
            .into_iter()
            .map(|ri| placeholder_variant(job, ri))
            .collect();
    }

    // a street that is one-way for all traffic (and not a dual
    // carriageway) has no reverse direction at all: emit a single edge
    let all_oneway_mixed = working
        .iter()
        .all(|c| c.is_oneway() && c.way.attributes.fuehr == Fuehrung::Mischverkehr);
    let any_dual_carriageway = working.iter().any(|c| c.is_dual_carriageway());
    if all_oneway_mixed && !any_dual_carriageway {
        let best = working
            .iter()
            .min_by(|a, b| {
                b.priority
                    .cmp(&a.priority)
                    .then(a.distance.total_cmp(&b.distance))
                    .then(a.way.osm_id.cmp(&b.way.osm_id))
            })
            .expect("working set is non-empty");
        let ri = best.orientation();
        if let Some(logger) = logger {
            logger.log_segment(&job.parent.element_nr, ri, &log_entries(&working, ri, Some(best)));
        }
        return vec![attributed_variant(job, ri, best)];
    }

    let mut variants = Vec::with_capacity(2);
    for ri in Direction::BOTH {
        let best = best_for_direction(&working, ri);
        if let Some(logger) = logger {
            logger.log_segment(&job.parent.element_nr, ri, &log_entries(&working, ri, best));
        }
        match best {
            Some(candidate) => variants.push(attributed_variant(job, ri, candidate)),
            None => variants.push(placeholder_variant(job, ri)),
        }
    }
    variants
}

/// folds a directed bearing difference onto [0, 90]
fn orientation_diff(angle_diff: f64) -> f64 {
    if angle_diff > 90.0 {
        180.0 - angle_diff
    } else {
        angle_diff
    }
}

fn attributed_variant(
    job: &SegmentJob,
    ri: Direction,
    candidate: &ScoredCandidate,
) -> SnappedSegment {
    let mut tilda = BTreeMap::new();
    for key in REFERENCE_KEYS {
        if let Some(value) = candidate.way.tilda_value(key) {
            tilda.insert(String::from(key), String::from(value));
        }
    }
    SnappedSegment {
        element_nr: job.parent.element_nr.clone(),
        ri,
        edge_source: job.parent.edge_source,
        street_name: job.parent.street_name.clone(),
        street_class: job.parent.street_class.clone(),
        bezirk: job.parent.bezirk.clone(),
        geometry: job.geometry.clone(),
        attributes: candidate.way.attributes.clone(),
        data_source: Some(candidate.way.data_source),
        tilda,
        extras: job.parent.extras.clone(),
    }
}

fn placeholder_variant(job: &SegmentJob, ri: Direction) -> SnappedSegment {
    SnappedSegment {
        element_nr: job.parent.element_nr.clone(),
        ri,
        edge_source: job.parent.edge_source,
        street_name: job.parent.street_name.clone(),
        street_class: job.parent.street_class.clone(),
        bezirk: job.parent.bezirk.clone(),
        geometry: job.geometry.clone(),
        attributes: NormalizedAttributes::no_infrastructure(),
        data_source: None,
        tilda: BTreeMap::new(),
        extras: job.parent.extras.clone(),
    }
}

fn log_entries(
    working: &[ScoredCandidate],
    ri: Direction,
    selected: Option<&ScoredCandidate>,
) -> Vec<CandidateLogEntry> {
    working
        .iter()
        .map(|c| CandidateLogEntry {
            osm_id: c.way.osm_id,
            distance: c.distance,
            angle_diff: c.angle_diff,
            compatibility: c.compatibility(ri),
            priority: c.priority,
            verkehrsri: c
                .way
                .attributes
                .verkehrsri
                .map(|v| v.to_string())
                .unwrap_or_else(|| String::from("NULL")),
            selected: selected.is_some_and(|s| s.way.osm_id == c.way.osm_id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, MultiLineString};
    use radnetz_core::model::{DataSource, EdgeSource, Oberflaeche, Verkehrsrichtung};

    fn edge(element_nr: &str, coords: [(f64, f64); 2]) -> EnrichedEdge {
        EnrichedEdge {
            element_nr: String::from(element_nr),
            from_node: None,
            to_node: None,
            edge_source: EdgeSource::Detailnetz,
            street_name: None,
            street_class: None,
            bezirk: None,
            geometry: MultiLineString::new(vec![line_string![
                (x: coords[0].0, y: coords[0].1),
                (x: coords[1].0, y: coords[1].1)
            ]]),
            extras: BTreeMap::new(),
        }
    }

    fn candidate_way(
        osm_id: i64,
        coords: [(f64, f64); 2],
        verkehrsri: Verkehrsrichtung,
        fuehr: Fuehrung,
        oneway_tag: &str,
    ) -> TranslatedWay {
        let mut attributes = NormalizedAttributes::no_infrastructure();
        attributes.fuehr = fuehr;
        attributes.verkehrsri = Some(verkehrsri);
        attributes.ofm = Some(Oberflaeche::Asphalt);
        let mut tilda = BTreeMap::new();
        tilda.insert(String::from("tilda_id"), osm_id.to_string());
        if !oneway_tag.is_empty() {
            tilda.insert(String::from("tilda_oneway"), String::from(oneway_tag));
        }
        TranslatedWay {
            osm_id,
            data_source: DataSource::Bikelanes,
            attributes,
            bemerkung: None,
            manual_action: None,
            tilda,
            geometry: MultiLineString::new(vec![line_string![
                (x: coords[0].0, y: coords[0].1),
                (x: coords[1].0, y: coords[1].1)
            ]]),
        }
    }

    fn snap(
        enriched: &[EnrichedEdge],
        ways: &[TranslatedWay],
    ) -> Vec<SnappedSegment> {
        let config = PipelineConfiguration::default();
        snap_network(enriched, ways, &config, None)
    }

    #[test]
    fn test_oneway_candidate_serves_only_its_direction() {
        // an identical-bearing one-way candidate: ri=0 picks it, ri=1 gets
        // the no-infrastructure placeholder
        let net = vec![edge("E1", [(0.0, 0.0), (10.0, 0.0)])];
        let ways = vec![candidate_way(
            7,
            [(0.0, 1.0), (10.0, 1.0)],
            Verkehrsrichtung::Einrichtungsverkehr,
            Fuehrung::Radweg,
            "yes",
        )];

        let segments = snap(&net, &ways);
        let forward: Vec<_> = segments
            .iter()
            .filter(|s| s.ri == Direction::Forward)
            .collect();
        let reverse: Vec<_> = segments
            .iter()
            .filter(|s| s.ri == Direction::Reverse)
            .collect();
        assert!(!forward.is_empty());
        assert!(!reverse.is_empty());
        assert!(forward
            .iter()
            .all(|s| s.attributes.fuehr == Fuehrung::Radweg));
        assert!(reverse
            .iter()
            .all(|s| s.attributes.fuehr == Fuehrung::KeineRadinfrastruktur));
    }

    #[test]
    fn test_dual_carriageway_serves_both_directions() {
        let net = vec![edge("E1", [(0.0, 0.0), (10.0, 0.0)])];
        let ways = vec![
            candidate_way(
                1,
                [(0.0, 3.0), (10.0, 3.0)],
                Verkehrsrichtung::Einrichtungsverkehr,
                Fuehrung::Mischverkehr,
                "yes_dual_carriageway",
            ),
            candidate_way(
                2,
                [(10.0, -3.0), (0.0, -3.0)],
                Verkehrsrichtung::Einrichtungsverkehr,
                Fuehrung::Mischverkehr,
                "yes_dual_carriageway",
            ),
        ];

        let segments = snap(&net, &ways);
        let forward: Vec<_> = segments
            .iter()
            .filter(|s| s.ri == Direction::Forward)
            .collect();
        let reverse: Vec<_> = segments
            .iter()
            .filter(|s| s.ri == Direction::Reverse)
            .collect();
        assert!(!forward.is_empty());
        assert!(!reverse.is_empty());
        assert!(forward
            .iter()
            .all(|s| s.tilda.get("tilda_id").map(String::as_str) == Some("1")));
        assert!(reverse
            .iter()
            .all(|s| s.tilda.get("tilda_id").map(String::as_str) == Some("2")));
    }

    #[test]
    fn test_oneway_mixed_traffic_emits_single_variant() {
        let net = vec![edge("E1", [(0.0, 0.0), (10.0, 0.0)])];
        // one-way street drawn against the segment direction
        let ways = vec![candidate_way(
            1,
            [(10.0, 1.0), (0.0, 1.0)],
            Verkehrsrichtung::Einrichtungsverkehr,
            Fuehrung::Mischverkehr,
            "yes",
        )];

        let segments = snap(&net, &ways);
        // one variant per segment, all on the reverse direction
        assert!(segments.iter().all(|s| s.ri == Direction::Reverse));
        let element_dirs: std::collections::HashSet<Direction> =
            segments.iter().map(|s| s.ri).collect();
        assert_eq!(element_dirs.len(), 1);
    }

    #[test]
    fn test_no_candidates_yields_placeholders_for_both_directions() {
        let net = vec![edge("E1", [(0.0, 0.0), (10.0, 0.0)])];
        let ways = vec![candidate_way(
            1,
            [(500.0, 500.0), (510.0, 500.0)],
            Verkehrsrichtung::Zweirichtungsverkehr,
            Fuehrung::Radweg,
            "",
        )];

        let segments = snap(&net, &ways);
        assert!(segments
            .iter()
            .all(|s| s.attributes.fuehr == Fuehrung::KeineRadinfrastruktur));
        assert!(segments.iter().any(|s| s.ri == Direction::Forward));
        assert!(segments.iter().any(|s| s.ri == Direction::Reverse));
        assert!(segments.iter().all(|s| s.data_source.is_none()));
    }

    #[test]
    fn test_two_way_candidate_serves_both_directions() {
        let net = vec![edge("E1", [(0.0, 0.0), (10.0, 0.0)])];
        let ways = vec![candidate_way(
            9,
            [(0.0, 1.0), (10.0, 1.0)],
            Verkehrsrichtung::Zweirichtungsverkehr,
            Fuehrung::Radweg,
            "no",
        )];

        let segments = snap(&net, &ways);
        assert!(segments
            .iter()
            .all(|s| s.attributes.fuehr == Fuehrung::Radweg));
        assert!(segments.iter().any(|s| s.ri == Direction::Forward));
        assert!(segments.iter().any(|s| s.ri == Direction::Reverse));
    }

    #[test]
    fn test_segment_count_tracks_edge_length() {
        // 10 m edge at 2.5 m segments: 4 pieces, two directions each
        let net = vec![edge("E1", [(0.0, 0.0), (10.0, 0.0)])];
        let ways = vec![candidate_way(
            9,
            [(0.0, 1.0), (10.0, 1.0)],
            Verkehrsrichtung::Zweirichtungsverkehr,
            Fuehrung::Radweg,
            "",
        )];
        let segments = snap(&net, &ways);
        assert_eq!(segments.len(), 8);
    }
}
