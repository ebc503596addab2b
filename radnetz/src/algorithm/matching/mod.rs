mod difference;
mod manual;
mod orthogonal;

pub use difference::subtract_by_buffer;
pub use manual::{apply_manual_interventions, ManualLists};
pub use orthogonal::orthogonal_removals;

use crate::config::OrthogonalFilterConfiguration;
use geo::MultiPolygon;
use kdam::tqdm;
use radnetz_core::geometry::coverage_fraction;
use radnetz_core::model::{DataSource, PriorityEdge};
use radnetz_osm::model::TranslatedWay;
use std::collections::{BTreeSet, HashSet};

/// step 1: buffered containment. a way survives iff at least
/// `fraction_threshold` of its length lies inside the union buffer.
pub fn ways_in_buffer(
    ways: &[TranslatedWay],
    unified_buffer: &MultiPolygon<f64>,
    fraction_threshold: f64,
    data_source: DataSource,
) -> Vec<TranslatedWay> {
    let mut matched = Vec::new();
    for way in tqdm!(
        ways.iter(),
        total = ways.len(),
        desc = format!("buffer matching {}", data_source)
    ) {
        if coverage_fraction(&way.geometry, unified_buffer) >= fraction_threshold {
            matched.push(way.clone());
        }
    }
    eprintln!();
    log::info!(
        "{}: {} of {} ways inside the buffer",
        data_source,
        matched.len(),
        ways.len()
    );
    matched
}

/// step 2: drops the short ways flagged by the orthogonal filter.
pub fn remove_orthogonal_short_ways(
    step1: Vec<TranslatedWay>,
    priority: &[PriorityEdge],
    data_source: DataSource,
    config: &OrthogonalFilterConfiguration,
) -> Vec<TranslatedWay> {
    let removals: BTreeSet<i64> = orthogonal_removals(priority, &step1, config);
    let before = step1.len();
    let kept: Vec<TranslatedWay> = step1
        .into_iter()
        .filter(|way| !removals.contains(&way.osm_id))
        .collect();
    log::info!(
        "{}: orthogonal filter removed {} short ways",
        data_source,
        before - kept.len()
    );
    kept
}

/// step 5: concatenation of the per-source results with duplicate ids
/// dropped, first occurrence wins.
pub fn combine_matched(collections: Vec<Vec<TranslatedWay>>) -> Vec<TranslatedWay> {
    let mut seen: HashSet<i64> = HashSet::new();
    let mut combined: Vec<TranslatedWay> = Vec::new();
    let mut dropped = 0usize;
    for collection in collections {
        for way in collection {
            if seen.insert(way.osm_id) {
                combined.push(way);
            } else {
                dropped += 1;
            }
        }
    }
    if dropped > 0 {
        log::warn!("combine: dropped {} duplicate way ids", dropped);
    }
    log::info!("combined matched dataset: {} ways", combined.len());
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, MultiLineString};
    use radnetz_core::geometry::{buffer_network, CapStyle};
    use radnetz_core::model::NormalizedAttributes;
    use std::collections::BTreeMap;

    fn way(osm_id: i64, coords: [(f64, f64); 2], data_source: DataSource) -> TranslatedWay {
        TranslatedWay {
            osm_id,
            data_source,
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
    fn test_buffer_containment_threshold() {
        let net = MultiLineString::new(vec![line_string![(x: 0.0, y: 0.0), (x: 100.0, y: 0.0)]]);
        let buffer = buffer_network([&net], 25.0, CapStyle::Flat);

        let inside = way(1, [(0.0, 5.0), (100.0, 5.0)], DataSource::Bikelanes);
        let outside = way(2, [(0.0, 80.0), (100.0, 80.0)], DataSource::Bikelanes);
        // roughly half inside the flat-capped buffer
        let halfway = way(3, [(50.0, 5.0), (170.0, 5.0)], DataSource::Bikelanes);

        let ways = vec![inside, outside, halfway];
        let matched = ways_in_buffer(&ways, &buffer, 0.7, DataSource::Bikelanes);
        let ids: Vec<i64> = matched.iter().map(|w| w.osm_id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_combine_drops_duplicate_ids() {
        let a = vec![way(1, [(0.0, 0.0), (1.0, 0.0)], DataSource::Bikelanes)];
        let b = vec![
            way(1, [(0.0, 0.0), (1.0, 0.0)], DataSource::Streets),
            way(2, [(0.0, 0.0), (1.0, 0.0)], DataSource::Streets),
        ];
        let combined = combine_matched(vec![a, b]);
        assert_eq!(combined.len(), 2);
        // first occurrence keeps its data source
        assert_eq!(combined[0].data_source, DataSource::Bikelanes);
    }
}
