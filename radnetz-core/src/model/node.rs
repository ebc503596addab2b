use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// identifier of a connection point ("Verbindungspunkt") in the priority
/// network. synthetic ids minted during topology enrichment carry an
/// `UNKNOWN` prefix and are treated as opaque strings.
#[derive(
    Debug, Default, Clone, Eq, PartialEq, PartialOrd, Ord, Deserialize, Serialize, Hash,
)]
pub struct VpId(pub String);

impl Display for VpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VpId {
    fn from(value: &str) -> Self {
        VpId(String::from(value))
    }
}

/// a named node of the priority network with an optional two-digit
/// district code assigned from the Berlin district polygons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkNode {
    pub vp_id: VpId,
    pub geometry: Point<f64>,
    pub bezirk: Option<String>,
}
