use super::VpId;
use geo::MultiLineString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// which network contributed the geometry of an enriched edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeSource {
    Detailnetz,
    Rvn,
}

impl Display for EdgeSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeSource::Detailnetz => write!(f, "detailnetz"),
            EdgeSource::Rvn => write!(f, "rvn"),
        }
    }
}

/// coarse priority-network edge ("Radvorrangsnetz"). `element_nr` and the
/// endpoint node ids are empty until topology enrichment has run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityEdge {
    pub element_nr: Option<String>,
    pub from_node: Option<VpId>,
    pub to_node: Option<VpId>,
    pub geometry: MultiLineString<f64>,
    /// passthrough fields of the source dataset (okstra ids etc.)
    #[serde(default)]
    pub extras: BTreeMap<String, String>,
}

/// fine-grained street element of the Berlin detail network. source of
/// truth for geometry once stitched onto the priority network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailEdge {
    pub element_nr: String,
    pub street_name: Option<String>,
    pub street_class: Option<String>,
    pub from_node: Option<VpId>,
    pub to_node: Option<VpId>,
    pub bezirk: Option<String>,
    pub geometry: MultiLineString<f64>,
    #[serde(default)]
    pub extras: BTreeMap<String, String>,
}

/// output of topology enrichment and detail-network stitching: one edge of
/// the combined network carrying its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedEdge {
    pub element_nr: String,
    pub from_node: Option<VpId>,
    pub to_node: Option<VpId>,
    pub edge_source: EdgeSource,
    pub street_name: Option<String>,
    pub street_class: Option<String>,
    pub bezirk: Option<String>,
    pub geometry: MultiLineString<f64>,
    #[serde(default)]
    pub extras: BTreeMap<String, String>,
}

/// builds an `element_nr` from the resolved endpoint node ids in the form
/// `{from}_{to}.01`. unresolved endpoints fall back to `UNKNOWN` patterns,
/// fully unresolved edges draw a three-digit counter value.
pub fn format_element_nr(
    from: Option<&VpId>,
    to: Option<&VpId>,
    unknown_counter: &mut u32,
) -> String {
    match (from, to) {
        (Some(f), Some(t)) => format!("{}_{}.01", f, t),
        (Some(f), None) => format!("{}_UNKNOWN.01", f),
        (None, Some(t)) => format!("UNKNOWN_{}.01", t),
        (None, None) => {
            let nr = format!("UNKNOWN_UNKNOWN_{:03}.01", unknown_counter);
            *unknown_counter += 1;
            nr
        }
    }
}
