use super::{DataSource, Direction, EdgeSource, NormalizedAttributes};
use geo::MultiLineString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// pre-aggregation directed edge: a run of snapped segments of one
/// `element_nr` whose normalized attributes agree, merged back into a
/// single geometry. `sfid` is the sequential id of this intermediate layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributedEdge {
    pub sfid: u64,
    pub element_nr: String,
    pub ri: Direction,
    pub edge_source: EdgeSource,
    pub street_name: Option<String>,
    pub street_class: Option<String>,
    pub bezirk: Option<String>,
    pub geometry: MultiLineString<f64>,
    pub attributes: NormalizedAttributes,
    pub data_source: Option<DataSource>,
    /// length of the merged geometry in whole meters
    pub laenge: i64,
    #[serde(default)]
    pub tilda: BTreeMap<String, String>,
    #[serde(default)]
    pub extras: BTreeMap<String, String>,
}

/// final output edge, one per `(element_nr, ri)`. `afid` restarts per
/// direction layer; `bezirksnummer` is the two-digit code of the district
/// holding the longest share of the geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalEdge {
    pub afid: u64,
    pub element_nr: String,
    pub ri: Direction,
    pub edge_source: EdgeSource,
    pub street_name: Option<String>,
    pub street_class: Option<String>,
    pub bezirk: Option<String>,
    pub bezirksnummer: Option<String>,
    pub geometry: MultiLineString<f64>,
    pub attributes: NormalizedAttributes,
    pub data_source: Option<DataSource>,
    pub laenge: i64,
    #[serde(default)]
    pub tilda: BTreeMap<String, String>,
    #[serde(default)]
    pub extras: BTreeMap<String, String>,
}
