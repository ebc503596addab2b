use crate::config::PipelineConfiguration;
use itertools::Itertools;
use radnetz_core::geometry::endpoints;
use radnetz_core::index::PointIndex;
use radnetz_core::model::{format_element_nr, NetworkNode, PriorityEdge, VpId};
use std::collections::{HashMap, HashSet, VecDeque};
use wkt::ToWkt;

// endpoint coordinates are snapped to a millimeter grid so that edges
// meeting at the same junction share a graph node despite float noise
const QUANTIZE_SCALE: f64 = 1_000.0;

type GridPoint = (i64, i64);

fn quantize(x: f64, y: f64) -> GridPoint {
    (
        (x * QUANTIZE_SCALE).round() as i64,
        (y * QUANTIZE_SCALE).round() as i64,
    )
}

/// undirected endpoint graph over the priority network. each edge knows its
/// source row; adjacency is keyed by quantized coordinates.
struct EndpointGraph {
    /// grid point -> incident (edge index, far grid point)
    adjacency: HashMap<GridPoint, Vec<(usize, GridPoint)>>,
    /// representative real coordinate per grid point
    coordinates: HashMap<GridPoint, geo::Point<f64>>,
}

impl EndpointGraph {
    fn build(edges: &[PriorityEdge]) -> EndpointGraph {
        let mut adjacency: HashMap<GridPoint, Vec<(usize, GridPoint)>> = HashMap::new();
        let mut coordinates: HashMap<GridPoint, geo::Point<f64>> = HashMap::new();
        for (idx, edge) in edges.iter().enumerate() {
            let Some((start, end)) = endpoints(&edge.geometry) else {
                log::warn!(
                    "priority edge {} has no endpoints, skipping: {}",
                    idx,
                    edge.geometry.to_wkt()
                );
                continue;
            };
            let start_key = quantize(start.x(), start.y());
            let end_key = quantize(end.x(), end.y());
            coordinates.entry(start_key).or_insert(start);
            coordinates.entry(end_key).or_insert(end);
            adjacency.entry(start_key).or_default().push((idx, end_key));
            adjacency.entry(end_key).or_default().push((idx, start_key));
        }
        // incident edges sorted for deterministic traversal order
        for entries in adjacency.values_mut() {
            entries.sort();
        }
        EndpointGraph {
            adjacency,
            coordinates,
        }
    }
}

/// summary of endpoint resolution, reported after assignment.
#[derive(Debug, Default, Clone, Copy)]
pub struct TopologyStats {
    pub total: usize,
    pub both_resolved: usize,
    pub one_resolved: usize,
    pub none_resolved: usize,
}

/// assigns `(from_node, to_node, element_nr)` to every priority edge. each
/// endpoint first looks for a named node within the tolerance; unresolved
/// endpoints chase the graph with a bounded breadth-first search, and all
/// edges traversed on the way inherit the resolved triple.
pub fn assign_element_numbers(
    edges: &[PriorityEdge],
    nodes: &[NetworkNode],
    config: &PipelineConfiguration,
) -> Vec<PriorityEdge> {
    let mut result: Vec<PriorityEdge> = edges.to_vec();
    let graph = EndpointGraph::build(edges);
    let node_index = PointIndex::build(nodes.iter().map(|n| &n.geometry));

    let find_node_at = |point: &geo::Point<f64>| -> Option<VpId> {
        node_index
            .within(point, config.node_tolerance)
            .first()
            .map(|(idx, _)| nodes[*idx].vp_id.clone())
    };

    let mut processed: HashSet<usize> = HashSet::new();
    let mut unknown_counter: u32 = 1;
    let mut stats = TopologyStats {
        total: edges.len(),
        ..Default::default()
    };

    for idx in 0..edges.len() {
        if processed.contains(&idx) {
            continue;
        }
        let Some((start, end)) = endpoints(&edges[idx].geometry) else {
            processed.insert(idx);
            continue;
        };

        let mut from_node = find_node_at(&start);
        let mut to_node = find_node_at(&end);
        let mut connected: Vec<usize> = vec![idx];

        if from_node.is_none() {
            let (segments, found) = explore_direction(
                &graph,
                quantize(start.x(), start.y()),
                idx,
                &processed,
                &find_node_at,
                config.bfs_max_depth,
            );
            connected.extend(segments);
            from_node = found;
        }
        if to_node.is_none() {
            let (segments, found) = explore_direction(
                &graph,
                quantize(end.x(), end.y()),
                idx,
                &processed,
                &find_node_at,
                config.bfs_max_depth,
            );
            connected.extend(segments);
            to_node = found;
        }

        match (&from_node, &to_node) {
            (Some(_), Some(_)) => stats.both_resolved += 1,
            (None, None) => stats.none_resolved += 1,
            _ => stats.one_resolved += 1,
        }

        let element_nr =
            format_element_nr(from_node.as_ref(), to_node.as_ref(), &mut unknown_counter);
        for segment_idx in connected.into_iter().unique() {
            let row = &mut result[segment_idx];
            row.from_node = from_node.clone();
            row.to_node = to_node.clone();
            row.element_nr = Some(element_nr.clone());
            processed.insert(segment_idx);
        }
    }

    log::info!(
        "element_nr assignment: {} edges, {} with both nodes, {} with one, {} with none",
        stats.total,
        stats.both_resolved,
        stats.one_resolved,
        stats.none_resolved
    );
    result
}

/// bounded BFS from an unresolved endpoint. returns the edges traversed and
/// the first named node encountered, if any. the originating edge and
/// already-processed edges are never expanded.
fn explore_direction(
    graph: &EndpointGraph,
    start: GridPoint,
    exclude_idx: usize,
    processed: &HashSet<usize>,
    find_node_at: &impl Fn(&geo::Point<f64>) -> Option<VpId>,
    max_depth: usize,
) -> (Vec<usize>, Option<VpId>) {
    let mut found_segments: Vec<usize> = Vec::new();
    let mut visited: HashSet<GridPoint> = HashSet::new();
    let mut frontier: VecDeque<(GridPoint, usize)> = VecDeque::new();
    frontier.push_back((start, 0));

    while let Some((current, depth)) = frontier.pop_front() {
        if visited.contains(&current) || depth >= max_depth {
            continue;
        }
        visited.insert(current);

        let Some(neighbors) = graph.adjacency.get(&current) else {
            continue;
        };
        for &(edge_idx, neighbor) in neighbors {
            if edge_idx == exclude_idx || processed.contains(&edge_idx) {
                continue;
            }
            if let Some(point) = graph.coordinates.get(&neighbor) {
                if let Some(node_id) = find_node_at(point) {
                    // the edge that reached the node belongs to the chain too
                    if !found_segments.contains(&edge_idx) {
                        found_segments.push(edge_idx);
                    }
                    return (found_segments, Some(node_id));
                }
            }
            if !found_segments.contains(&edge_idx) {
                found_segments.push(edge_idx);
                frontier.push_back((neighbor, depth + 1));
            }
        }
    }

    (found_segments, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, MultiLineString, Point};
    use std::collections::BTreeMap;

    fn edge(coords: [(f64, f64); 2]) -> PriorityEdge {
        PriorityEdge {
            element_nr: None,
            from_node: None,
            to_node: None,
            geometry: MultiLineString::new(vec![line_string![
                (x: coords[0].0, y: coords[0].1),
                (x: coords[1].0, y: coords[1].1)
            ]]),
            extras: BTreeMap::new(),
        }
    }

    fn node(id: &str, x: f64, y: f64) -> NetworkNode {
        NetworkNode {
            vp_id: VpId::from(id),
            geometry: Point::new(x, y),
            bezirk: None,
        }
    }

    #[test]
    fn test_direct_endpoint_resolution() {
        let edges = vec![edge([(0.0, 0.0), (100.0, 0.0)])];
        let nodes = vec![node("A", 0.0, 0.0), node("B", 100.0, 0.3)];
        let config = PipelineConfiguration::default();

        let enriched = assign_element_numbers(&edges, &nodes, &config);
        assert_eq!(enriched[0].element_nr.as_deref(), Some("A_B.01"));
        assert_eq!(enriched[0].from_node, Some(VpId::from("A")));
        assert_eq!(enriched[0].to_node, Some(VpId::from("B")));
    }

    #[test]
    fn test_bfs_chases_unresolved_endpoint() {
        // chain A --e0-- x --e1-- B: e0's end has no node, BFS finds B
        // through e1, and e1 inherits the triple
        let edges = vec![
            edge([(0.0, 0.0), (100.0, 0.0)]),
            edge([(100.0, 0.0), (200.0, 0.0)]),
        ];
        let nodes = vec![node("A", 0.0, 0.0), node("B", 200.0, 0.0)];
        let config = PipelineConfiguration::default();

        let enriched = assign_element_numbers(&edges, &nodes, &config);
        assert_eq!(enriched[0].element_nr.as_deref(), Some("A_B.01"));
        assert_eq!(enriched[1].element_nr.as_deref(), Some("A_B.01"));
    }

    #[test]
    fn test_unknown_fallbacks() {
        let edges = vec![
            edge([(0.0, 0.0), (100.0, 0.0)]),
            edge([(500.0, 500.0), (600.0, 500.0)]),
        ];
        let nodes = vec![node("A", 0.0, 0.0)];
        let config = PipelineConfiguration::default();

        let enriched = assign_element_numbers(&edges, &nodes, &config);
        assert_eq!(enriched[0].element_nr.as_deref(), Some("A_UNKNOWN.01"));
        assert_eq!(
            enriched[1].element_nr.as_deref(),
            Some("UNKNOWN_UNKNOWN_001.01")
        );
    }

    #[test]
    fn test_nearest_node_wins() {
        let edges = vec![edge([(0.0, 0.0), (100.0, 0.0)])];
        let nodes = vec![node("FAR", 0.0, 0.9), node("NEAR", 0.0, 0.1), node("B", 100.0, 0.0)];
        let config = PipelineConfiguration::default();

        let enriched = assign_element_numbers(&edges, &nodes, &config);
        assert_eq!(enriched[0].from_node, Some(VpId::from("NEAR")));
    }
}
