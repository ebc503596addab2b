mod attributes;
mod direction;
mod edge;
mod final_edge;
mod node;
mod segment;

pub use attributes::{
    Fuehrung, NormalizedAttributes, NutzungsBeschraenkung, Oberflaeche, Protektion, Trennstreifen,
    Verkehrsrichtung,
};
pub use direction::Direction;
pub use edge::{format_element_nr, DetailEdge, EdgeSource, EnrichedEdge, PriorityEdge};
pub use final_edge::{AttributedEdge, FinalEdge};
pub use node::{NetworkNode, VpId};
pub use segment::SnappedSegment;

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// origin of an OSM feature collection within the TILDA extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Bikelanes,
    Streets,
    Paths,
}

impl Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Bikelanes => write!(f, "bikelanes"),
            DataSource::Streets => write!(f, "streets"),
            DataSource::Paths => write!(f, "paths"),
        }
    }
}
