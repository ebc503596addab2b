use crate::config::PipelineConfiguration;
use kdam::tqdm;
use radnetz_core::geometry::{buffer_network, covered_by, endpoints, length_of, CapStyle};
use radnetz_core::model::{DetailEdge, EdgeSource, EnrichedEdge, PriorityEdge};
use std::collections::HashSet;

/// replaces coarse priority geometry with detail-network geometry wherever
/// the detail network covers it. detail edges fully inside the priority
/// buffer carry the coverage; priority edges not covered by the collected
/// detail edges are kept as gap edges with `edge_source = rvn`.
pub fn stitch_detail_network(
    priority: &[PriorityEdge],
    detail: &[DetailEdge],
    config: &PipelineConfiguration,
) -> Vec<EnrichedEdge> {
    log::info!(
        "stitching {} detail edges onto {} priority edges (buffer {}m)",
        detail.len(),
        priority.len(),
        config.stitch_buffer
    );

    let priority_buffer = buffer_network(
        priority.iter().map(|e| &e.geometry),
        config.stitch_buffer,
        CapStyle::Round,
    );

    let mut enriched: Vec<EnrichedEdge> = Vec::new();
    for edge in tqdm!(detail.iter(), total = detail.len(), desc = "detail coverage") {
        if covered_by(&edge.geometry, &priority_buffer) {
            enriched.push(EnrichedEdge {
                element_nr: edge.element_nr.clone(),
                from_node: edge.from_node.clone(),
                to_node: edge.to_node.clone(),
                edge_source: EdgeSource::Detailnetz,
                street_name: edge.street_name.clone(),
                street_class: edge.street_class.clone(),
                bezirk: edge.bezirk.clone(),
                geometry: edge.geometry.clone(),
                extras: edge.extras.clone(),
            });
        }
    }
    eprintln!();
    let detail_count = enriched.len();

    // gap detection against the buffer of the collected detail coverage
    let detail_buffer = buffer_network(
        enriched.iter().map(|e| &e.geometry),
        config.stitch_buffer,
        CapStyle::Round,
    );
    let mut gap_count = 0;
    for edge in priority {
        if covered_by(&edge.geometry, &detail_buffer) {
            continue;
        }
        let Some(element_nr) = edge.element_nr.clone() else {
            log::warn!("priority edge without element_nr skipped in gap detection");
            continue;
        };
        gap_count += 1;
        enriched.push(EnrichedEdge {
            element_nr,
            from_node: edge.from_node.clone(),
            to_node: edge.to_node.clone(),
            edge_source: EdgeSource::Rvn,
            street_name: None,
            street_class: None,
            bezirk: None,
            geometry: edge.geometry.clone(),
            extras: edge.extras.clone(),
        });
    }

    let before_dedup = enriched.len();
    let enriched = drop_duplicates(enriched);
    if before_dedup != enriched.len() {
        log::info!("dropped {} duplicate rows", before_dedup - enriched.len());
    }

    let excluded: HashSet<&String> = config.excluded_element_nrs.iter().collect();
    let before_exclusion = enriched.len();
    let enriched: Vec<EnrichedEdge> = enriched
        .into_iter()
        .filter(|e| !excluded.contains(&e.element_nr))
        .collect();
    if before_exclusion != enriched.len() {
        log::info!(
            "removed {} edges via element_nr exclusion list",
            before_exclusion - enriched.len()
        );
    }

    log::info!(
        "stitched network: {} detail edges, {} gap edges, {} total",
        detail_count,
        gap_count,
        enriched.len()
    );
    enriched
}

/// duplicate key: element_nr plus a coarse geometry fingerprint (quantized
/// endpoints and length)
fn drop_duplicates(edges: Vec<EnrichedEdge>) -> Vec<EnrichedEdge> {
    let mut seen: HashSet<(String, i64, i64, i64, i64, i64)> = HashSet::new();
    edges
        .into_iter()
        .filter(|edge| {
            let key = match endpoints(&edge.geometry) {
                Some((start, end)) => (
                    edge.element_nr.clone(),
                    (start.x() * 1000.0).round() as i64,
                    (start.y() * 1000.0).round() as i64,
                    (end.x() * 1000.0).round() as i64,
                    (end.y() * 1000.0).round() as i64,
                    (length_of(&edge.geometry) * 1000.0).round() as i64,
                ),
                None => (edge.element_nr.clone(), 0, 0, 0, 0, 0),
            };
            seen.insert(key)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, MultiLineString};
    use std::collections::BTreeMap;

    fn priority_edge(element_nr: &str, coords: [(f64, f64); 2]) -> PriorityEdge {
        PriorityEdge {
            element_nr: Some(String::from(element_nr)),
            from_node: None,
            to_node: None,
            geometry: MultiLineString::new(vec![line_string![
                (x: coords[0].0, y: coords[0].1),
                (x: coords[1].0, y: coords[1].1)
            ]]),
            extras: BTreeMap::new(),
        }
    }

    fn detail_edge(element_nr: &str, coords: [(f64, f64); 2]) -> DetailEdge {
        DetailEdge {
            element_nr: String::from(element_nr),
            street_name: Some(String::from("Teststraße")),
            street_class: Some(String::from("II")),
            from_node: None,
            to_node: None,
            bezirk: None,
            geometry: MultiLineString::new(vec![line_string![
                (x: coords[0].0, y: coords[0].1),
                (x: coords[1].0, y: coords[1].1)
            ]]),
            extras: BTreeMap::new(),
        }
    }

    #[test]
    fn test_detail_coverage_replaces_priority() {
        let priority = vec![priority_edge("A_B.01", [(0.0, 0.0), (100.0, 0.0)])];
        // runs 2 m beside the priority edge, well within the 5 m buffer
        let detail = vec![detail_edge("D1", [(0.0, 2.0), (100.0, 2.0)])];
        let config = PipelineConfiguration::default();

        let enriched = stitch_detail_network(&priority, &detail, &config);
        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].edge_source, EdgeSource::Detailnetz);
        assert_eq!(enriched[0].street_name.as_deref(), Some("Teststraße"));
    }

    #[test]
    fn test_uncovered_priority_edge_becomes_gap() {
        let priority = vec![
            priority_edge("A_B.01", [(0.0, 0.0), (100.0, 0.0)]),
            priority_edge("B_C.01", [(500.0, 500.0), (600.0, 500.0)]),
        ];
        let detail = vec![detail_edge("D1", [(0.0, 2.0), (100.0, 2.0)])];
        let config = PipelineConfiguration::default();

        let enriched = stitch_detail_network(&priority, &detail, &config);
        assert_eq!(enriched.len(), 2);
        let gap = enriched
            .iter()
            .find(|e| e.element_nr == "B_C.01")
            .expect("gap edge present");
        assert_eq!(gap.edge_source, EdgeSource::Rvn);
        assert!(gap.street_name.is_none());
    }

    #[test]
    fn test_exclusion_list() {
        let priority = vec![priority_edge("A_B.01", [(0.0, 0.0), (100.0, 0.0)])];
        let detail: Vec<DetailEdge> = vec![];
        let mut config = PipelineConfiguration::default();
        config.excluded_element_nrs = vec![String::from("A_B.01")];

        let enriched = stitch_detail_network(&priority, &detail, &config);
        assert!(enriched.is_empty());
    }

    #[test]
    fn test_duplicate_rows_dropped() {
        let priority = vec![
            priority_edge("A_B.01", [(0.0, 0.0), (100.0, 0.0)]),
            priority_edge("A_B.01", [(0.0, 0.0), (100.0, 0.0)]),
        ];
        let detail: Vec<DetailEdge> = vec![];
        let config = PipelineConfiguration::default();

        let enriched = stitch_detail_network(&priority, &detail, &config);
        assert_eq!(enriched.len(), 1);
    }
}
