use crate::io::dataset;
use geo::{BooleanOps, MultiLineString, MultiPolygon};
use radnetz_core::model::EnrichedEdge;
use radnetz_osm::model::TranslatedWay;
use std::path::Path;

const BOUNDARY_FILE: &str = "bezirk_neukoelln_grenze.json.gz";

/// loads the Neukölln boundary from the data directory. a missing boundary
/// disables clipping with a warning, the full dataset is used instead.
pub fn load_boundary(data_dir: &Path) -> Option<MultiPolygon<f64>> {
    let path = data_dir.join(BOUNDARY_FILE);
    if !path.exists() {
        log::warn!(
            "boundary file not found: {}, skipping clipping",
            path.display()
        );
        return None;
    }
    match dataset::read_dataset::<MultiPolygon<f64>>(&path) {
        Ok(polygons) => {
            let parts: Vec<_> = polygons.into_iter().flat_map(|mp| mp.0).collect();
            Some(MultiPolygon::new(parts))
        }
        Err(e) => {
            log::warn!("failure reading boundary: {}, skipping clipping", e);
            None
        }
    }
}

fn clip_geometry(
    geometry: &MultiLineString<f64>,
    boundary: &MultiPolygon<f64>,
) -> MultiLineString<f64> {
    boundary.clip(geometry, false)
}

pub fn clip_enriched(
    edges: Vec<EnrichedEdge>,
    boundary: &MultiPolygon<f64>,
) -> Vec<EnrichedEdge> {
    let before = edges.len();
    let clipped: Vec<EnrichedEdge> = edges
        .into_iter()
        .filter_map(|mut edge| {
            let geometry = clip_geometry(&edge.geometry, boundary);
            if geometry.0.is_empty() {
                return None;
            }
            edge.geometry = geometry;
            Some(edge)
        })
        .collect();
    log::info!("clipping: {} -> {} network edges", before, clipped.len());
    clipped
}

pub fn clip_ways(
    ways: Vec<TranslatedWay>,
    boundary: &MultiPolygon<f64>,
) -> Vec<TranslatedWay> {
    let before = ways.len();
    let clipped: Vec<TranslatedWay> = ways
        .into_iter()
        .filter_map(|mut way| {
            let geometry = clip_geometry(&way.geometry, boundary);
            if geometry.0.is_empty() {
                return None;
            }
            way.geometry = geometry;
            Some(way)
        })
        .collect();
    log::info!("clipping: {} -> {} ways", before, clipped.len());
    clipped
}
