use geo::MultiLineString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// tags recorded for one side of a way (`separation:left`,
/// `markings:right`, ...).
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct SideTags {
    pub separation: Option<String>,
    pub markings: Option<String>,
    pub traffic_mode: Option<String>,
    pub buffer: Option<String>,
}

/// raw TILDA feature row as delivered by the classified OSM extract.
/// attributes the translation rules never touch travel in `extras`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TildaWay {
    pub osm_id: i64,
    pub name: Option<String>,
    pub category: Option<String>,
    pub traffic_sign: Option<String>,
    pub surface: Option<String>,
    pub surface_color: Option<String>,
    pub width: Option<String>,
    pub oneway: Option<String>,
    pub oneway_bicycle: Option<String>,
    pub temporary: Option<String>,
    pub mapillary: Option<String>,
    pub mapillary_forward: Option<String>,
    pub mapillary_backward: Option<String>,
    /// unsuffixed fallbacks for the side-tagged fields
    pub separation: Option<String>,
    pub markings: Option<String>,
    #[serde(default)]
    pub left: SideTags,
    #[serde(default)]
    pub right: SideTags,
    #[serde(default)]
    pub extras: BTreeMap<String, String>,
    pub geometry: MultiLineString<f64>,
}

impl Default for TildaWay {
    fn default() -> Self {
        Self {
            osm_id: 0,
            name: None,
            category: None,
            traffic_sign: None,
            surface: None,
            surface_color: None,
            width: None,
            oneway: None,
            oneway_bicycle: None,
            temporary: None,
            mapillary: None,
            mapillary_forward: None,
            mapillary_backward: None,
            separation: None,
            markings: None,
            left: SideTags::default(),
            right: SideTags::default(),
            extras: BTreeMap::default(),
            geometry: MultiLineString::new(Vec::new()),
        }
    }
}

impl TildaWay {
    /// side-specific separation value with fallback to the unsuffixed tag.
    pub fn separation_for(&self, side: Side) -> Option<&str> {
        self.side(side)
            .separation
            .as_deref()
            .or(self.separation.as_deref())
    }

    /// side-specific markings value with fallback to the unsuffixed tag.
    pub fn markings_for(&self, side: Side) -> Option<&str> {
        self.side(side)
            .markings
            .as_deref()
            .or(self.markings.as_deref())
    }

    pub fn traffic_mode_for(&self, side: Side) -> Option<&str> {
        self.side(side).traffic_mode.as_deref()
    }

    pub fn buffer_for(&self, side: Side) -> Option<&str> {
        self.side(side).buffer.as_deref()
    }

    fn side(&self, side: Side) -> &SideTags {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn category_str(&self) -> &str {
        self.category.as_deref().unwrap_or("").trim()
    }

    pub fn traffic_sign_str(&self) -> &str {
        self.traffic_sign.as_deref().unwrap_or("").trim()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];
}
