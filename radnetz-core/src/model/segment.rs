use super::{DataSource, Direction, EdgeSource, NormalizedAttributes};
use geo::LineString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// one directed piece of an enriched edge after snapping, attributed from
/// the best OSM candidate for its direction. the `tilda` map carries the
/// provenance block of the chosen candidate (`tilda_id`, `tilda_name`,
/// `tilda_oneway`, `tilda_category`, `tilda_traffic_sign`,
/// `tilda_mapillary*`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnappedSegment {
    pub element_nr: String,
    pub ri: Direction,
    pub edge_source: EdgeSource,
    pub street_name: Option<String>,
    pub street_class: Option<String>,
    pub bezirk: Option<String>,
    pub geometry: LineString<f64>,
    pub attributes: NormalizedAttributes,
    pub data_source: Option<DataSource>,
    #[serde(default)]
    pub tilda: BTreeMap<String, String>,
    #[serde(default)]
    pub extras: BTreeMap<String, String>,
}
