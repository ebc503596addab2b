use geo::MultiLineString;
use radnetz_core::model::{DataSource, NormalizedAttributes};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// how a way entered or left the matched set through the manual
/// include/exclude lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManualAction {
    Added,
    Removed,
}

impl Display for ManualAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManualAction::Added => write!(f, "added"),
            ManualAction::Removed => write!(f, "removed"),
        }
    }
}

/// TILDA way after attribute translation: the normalized attribute set plus
/// every original attribute re-prefixed `tilda_*` in a sparse string map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatedWay {
    pub osm_id: i64,
    pub data_source: DataSource,
    pub attributes: NormalizedAttributes,
    /// construction-site remark for ways tagged temporary
    pub bemerkung: Option<String>,
    pub manual_action: Option<ManualAction>,
    #[serde(default)]
    pub tilda: BTreeMap<String, String>,
    pub geometry: MultiLineString<f64>,
}

impl TranslatedWay {
    pub fn tilda_value(&self, key: &str) -> Option<&str> {
        self.tilda.get(key).map(String::as_str)
    }

    pub fn tilda_category(&self) -> &str {
        self.tilda_value("tilda_category").unwrap_or("")
    }

    pub fn tilda_oneway(&self) -> &str {
        self.tilda_value("tilda_oneway").unwrap_or("")
    }

    pub fn tilda_traffic_sign(&self) -> &str {
        self.tilda_value("tilda_traffic_sign").unwrap_or("")
    }
}
