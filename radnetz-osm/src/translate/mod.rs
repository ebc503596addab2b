mod fuehrung;
mod nutzung;
mod oberflaeche;
mod protektion;
mod richtung;
pub mod signs;
mod trennstreifen;
pub mod width;

pub use fuehrung::{determine_fuehrung, determine_pflicht};
pub use nutzung::determine_nutz_beschr;
pub use oberflaeche::{determine_farbe, determine_ofm};
pub use protektion::determine_protek;
pub use richtung::determine_verkehrsrichtung;
pub use trennstreifen::determine_trennstreifen;

use crate::model::{TildaWay, TranslatedWay};
use radnetz_core::model::{
    DataSource, Fuehrung, NormalizedAttributes, Oberflaeche, Protektion,
};
use std::collections::BTreeMap;

// raw TILDA bookkeeping fields that carry no meaning downstream
const IRRELEVANT_FIELDS: [&str; 4] = ["updated_at", "checked_at", "length", "offset"];

const TEMPORARY_REMARK: &str =
    "Weg als temporärer Weg eingetragen; vermutlich Baustellen-Weg";

/// counters over translation fallbacks, reported once per input collection.
#[derive(Debug, Default, Clone)]
pub struct TranslationStats {
    pub total: usize,
    pub fuehr_not_found: usize,
    pub ofm_not_found: usize,
    pub protek_not_found: usize,
}

impl TranslationStats {
    fn record(&mut self, attributes: &NormalizedAttributes) {
        self.total += 1;
        if attributes.fuehr == Fuehrung::TodoFuehrungFehlt {
            self.fuehr_not_found += 1;
        }
        if attributes.ofm == Some(Oberflaeche::NichtGefunden) {
            self.ofm_not_found += 1;
        }
        if attributes.protek == Some(Protektion::TodoProtektionstypFehlt) {
            self.protek_not_found += 1;
        }
    }

    /// logs a warning per attribute for which mappings were missing.
    pub fn log_summary(&self, data_source: DataSource) {
        for (name, count) in [
            ("fuehr", self.fuehr_not_found),
            ("ofm", self.ofm_not_found),
            ("protek", self.protek_not_found),
        ] {
            if count > 0 && self.total > 0 {
                let percentage = (count as f64 / self.total as f64) * 100.0;
                log::warn!(
                    "{}: {} of {} features ({:.1}%) have no mapping for '{}'",
                    data_source,
                    count,
                    self.total,
                    percentage,
                    name
                );
            }
        }
    }
}

/// translates one TILDA way into the normalized attribute vocabulary and
/// re-prefixes its original attributes as `tilda_*` provenance.
pub fn translate_way(
    way: &TildaWay,
    data_source: DataSource,
    stats: &mut TranslationStats,
) -> TranslatedWay {
    let attributes = NormalizedAttributes {
        fuehr: determine_fuehrung(way, data_source),
        verkehrsri: Some(determine_verkehrsrichtung(way, data_source)),
        ofm: Some(determine_ofm(way)),
        protek: Some(determine_protek(way)),
        trennstreifen: Some(determine_trennstreifen(way)),
        nutz_beschr: Some(determine_nutz_beschr(way)),
        pflicht: Some(determine_pflicht(way, data_source)),
        farbe: Some(determine_farbe(way)),
        breite: way.width.as_deref().and_then(width::parse_width),
    };
    stats.record(&attributes);

    let bemerkung = match way.temporary.as_deref().map(str::trim) {
        Some(value) if value.eq_ignore_ascii_case("yes") => {
            Some(String::from(TEMPORARY_REMARK))
        }
        _ => None,
    };

    TranslatedWay {
        osm_id: way.osm_id,
        data_source,
        attributes,
        bemerkung,
        manual_action: None,
        tilda: tilda_prefix_map(way),
        geometry: way.geometry.clone(),
    }
}

/// translates a whole input collection, logging fallback statistics.
pub fn translate_collection(ways: &[TildaWay], data_source: DataSource) -> Vec<TranslatedWay> {
    let mut stats = TranslationStats::default();
    let translated = ways
        .iter()
        .map(|way| translate_way(way, data_source, &mut stats))
        .collect();
    stats.log_summary(data_source);
    translated
}

fn tilda_prefix_map(way: &TildaWay) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    let mut put = |key: &str, value: &Option<String>| {
        if let Some(v) = value {
            let trimmed = v.trim();
            if !trimmed.is_empty() {
                map.insert(format!("tilda_{}", key), String::from(trimmed));
            }
        }
    };

    put("name", &way.name);
    put("category", &way.category);
    put("traffic_sign", &way.traffic_sign);
    put("surface", &way.surface);
    put("surface_color", &way.surface_color);
    put("width", &way.width);
    put("oneway", &way.oneway);
    put("oneway_bicycle", &way.oneway_bicycle);
    put("temporary", &way.temporary);
    put("mapillary", &way.mapillary);
    put("mapillary_forward", &way.mapillary_forward);
    put("mapillary_backward", &way.mapillary_backward);
    put("separation", &way.separation);
    put("markings", &way.markings);
    put("separation:left", &way.left.separation);
    put("markings:left", &way.left.markings);
    put("traffic_mode:left", &way.left.traffic_mode);
    put("buffer:left", &way.left.buffer);
    put("separation:right", &way.right.separation);
    put("markings:right", &way.right.markings);
    put("traffic_mode:right", &way.right.traffic_mode);
    put("buffer:right", &way.right.buffer);

    map.insert(String::from("tilda_id"), way.osm_id.to_string());
    for (key, value) in &way.extras {
        if IRRELEVANT_FIELDS.contains(&key.as_str()) || value.trim().is_empty() {
            continue;
        }
        map.insert(format!("tilda_{}", key), String::from(value.trim()));
    }
    map
}
